//! Favor tiles and town tiles.
//!
//! Both are finite supplies drawn from shared pools. Tile kinds are closed
//! enums; their effects are data queried by the action layer rather than
//! behavior attached here.

use std::collections::BTreeMap;

use strum::{EnumIter, IntoEnumIterator};

use crate::cult::CultTrack;

/// The twelve favor tiles.
///
/// Naming is track + immediate cult advance. The +3 tiles exist once; the
/// +2 and +1 tiles three times each.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FavorKind {
    Fire3,
    Water3,
    Earth3,
    Air3,
    Fire2,
    Water2,
    Earth2,
    Air2,
    Fire1,
    Water1,
    Earth1,
    Air1,
}

impl FavorKind {
    pub const fn track(self) -> CultTrack {
        match self {
            FavorKind::Fire3 | FavorKind::Fire2 | FavorKind::Fire1 => CultTrack::Fire,
            FavorKind::Water3 | FavorKind::Water2 | FavorKind::Water1 => CultTrack::Water,
            FavorKind::Earth3 | FavorKind::Earth2 | FavorKind::Earth1 => CultTrack::Earth,
            FavorKind::Air3 | FavorKind::Air2 | FavorKind::Air1 => CultTrack::Air,
        }
    }

    /// Immediate cult advance granted when the tile is taken.
    pub const fn cult_advance(self) -> u8 {
        match self {
            FavorKind::Fire3 | FavorKind::Water3 | FavorKind::Earth3 | FavorKind::Air3 => 3,
            FavorKind::Fire2 | FavorKind::Water2 | FavorKind::Earth2 | FavorKind::Air2 => 2,
            FavorKind::Fire1 | FavorKind::Water1 | FavorKind::Earth1 | FavorKind::Air1 => 1,
        }
    }

    /// Copies in the shared pool.
    pub const fn stock(self) -> u8 {
        if self.cult_advance() == 3 { 1 } else { 3 }
    }

    /// Lowers the holder's town power threshold to six.
    pub const fn lowers_town_threshold(self) -> bool {
        matches!(self, FavorKind::Fire2)
    }

    /// Grants a once-per-round special action: advance one step on a
    /// chosen cult track.
    pub const fn grants_cult_action(self) -> bool {
        matches!(self, FavorKind::Water2)
    }

    /// Victory points whenever the holder builds a dwelling.
    pub const fn vp_per_dwelling(self) -> u32 {
        if matches!(self, FavorKind::Earth1) { 2 } else { 0 }
    }

    /// Victory points whenever the holder upgrades into a trading house.
    pub const fn vp_per_trading_house(self) -> u32 {
        if matches!(self, FavorKind::Water1) { 3 } else { 0 }
    }

    /// Victory points when passing, by trading houses on the board.
    pub const fn pass_vp(self, trading_houses: usize) -> u32 {
        if matches!(self, FavorKind::Air1) {
            match trading_houses {
                0 => 0,
                1 => 2,
                2 => 3,
                3 => 3,
                _ => 4,
            }
        } else {
            0
        }
    }
}

/// The eight town tiles. Naming is victory points + reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TownTileKind {
    Vp5Coins6,
    Vp6Power8,
    Vp7Workers2,
    Vp8CultsAll1,
    Vp9Priest1,
    Vp11,
    Vp2CultsAll2,
    Vp4Shipping1,
}

impl TownTileKind {
    pub const fn victory_points(self) -> u32 {
        match self {
            TownTileKind::Vp5Coins6 => 5,
            TownTileKind::Vp6Power8 => 6,
            TownTileKind::Vp7Workers2 => 7,
            TownTileKind::Vp8CultsAll1 => 8,
            TownTileKind::Vp9Priest1 => 9,
            TownTileKind::Vp11 => 11,
            TownTileKind::Vp2CultsAll2 => 2,
            TownTileKind::Vp4Shipping1 => 4,
        }
    }

    /// Town keys granted; keys unlock cult track apexes.
    pub const fn keys(self) -> u8 {
        if matches!(self, TownTileKind::Vp2CultsAll2) {
            2
        } else {
            1
        }
    }

    pub const fn coins(self) -> u8 {
        if matches!(self, TownTileKind::Vp5Coins6) { 6 } else { 0 }
    }

    pub const fn power(self) -> u8 {
        if matches!(self, TownTileKind::Vp6Power8) { 8 } else { 0 }
    }

    pub const fn workers(self) -> u8 {
        if matches!(self, TownTileKind::Vp7Workers2) { 2 } else { 0 }
    }

    pub const fn priests(self) -> u8 {
        if matches!(self, TownTileKind::Vp9Priest1) { 1 } else { 0 }
    }

    /// Steps advanced on every cult track at once.
    pub const fn cult_advance_all(self) -> u8 {
        match self {
            TownTileKind::Vp8CultsAll1 => 1,
            TownTileKind::Vp2CultsAll2 => 2,
            _ => 0,
        }
    }

    pub const fn shipping_levels(self) -> u8 {
        if matches!(self, TownTileKind::Vp4Shipping1) { 1 } else { 0 }
    }

    /// Copies in the shared pool.
    pub const fn stock(self) -> u8 {
        match self {
            TownTileKind::Vp5Coins6
            | TownTileKind::Vp6Power8
            | TownTileKind::Vp7Workers2
            | TownTileKind::Vp8CultsAll1
            | TownTileKind::Vp9Priest1 => 2,
            TownTileKind::Vp11 | TownTileKind::Vp2CultsAll2 | TownTileKind::Vp4Shipping1 => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileError {
    #[error("favor tile {0:?} is out of stock")]
    FavorExhausted(FavorKind),

    #[error("town tile {0:?} is out of stock")]
    TownExhausted(TownTileKind),
}

/// Shared favor tile supply.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FavorPool {
    stock: BTreeMap<FavorKind, u8>,
}

impl FavorPool {
    pub fn full() -> Self {
        Self {
            stock: FavorKind::iter().map(|k| (k, k.stock())).collect(),
        }
    }

    pub fn remaining(&self, kind: FavorKind) -> u8 {
        self.stock.get(&kind).copied().unwrap_or(0)
    }

    pub fn take(&mut self, kind: FavorKind) -> Result<FavorKind, TileError> {
        let left = self
            .stock
            .get_mut(&kind)
            .filter(|left| **left > 0)
            .ok_or(TileError::FavorExhausted(kind))?;
        *left -= 1;
        Ok(kind)
    }
}

impl Default for FavorPool {
    fn default() -> Self {
        Self::full()
    }
}

/// Shared town tile supply.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TownTilePool {
    stock: BTreeMap<TownTileKind, u8>,
}

impl TownTilePool {
    pub fn full() -> Self {
        Self {
            stock: TownTileKind::iter().map(|k| (k, k.stock())).collect(),
        }
    }

    pub fn remaining(&self, kind: TownTileKind) -> u8 {
        self.stock.get(&kind).copied().unwrap_or(0)
    }

    pub fn take(&mut self, kind: TownTileKind) -> Result<TownTileKind, TileError> {
        let left = self
            .stock
            .get_mut(&kind)
            .filter(|left| **left > 0)
            .ok_or(TileError::TownExhausted(kind))?;
        *left -= 1;
        Ok(kind)
    }
}

impl Default for TownTilePool {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_three_favors_run_out_after_one_take() {
        let mut pool = FavorPool::full();
        pool.take(FavorKind::Fire3).unwrap();
        assert_eq!(
            pool.take(FavorKind::Fire3),
            Err(TileError::FavorExhausted(FavorKind::Fire3))
        );
        // The +2 of the same track has its own stock.
        assert_eq!(pool.remaining(FavorKind::Fire2), 3);
    }

    #[test]
    fn town_tile_stock_depletes() {
        let mut pool = TownTilePool::full();
        pool.take(TownTileKind::Vp11).unwrap();
        assert_eq!(
            pool.take(TownTileKind::Vp11),
            Err(TileError::TownExhausted(TownTileKind::Vp11))
        );
        pool.take(TownTileKind::Vp5Coins6).unwrap();
        assert_eq!(pool.remaining(TownTileKind::Vp5Coins6), 1);
    }

    #[test]
    fn every_town_tile_grants_at_least_one_key() {
        use strum::IntoEnumIterator;
        for kind in TownTileKind::iter() {
            assert!(kind.keys() >= 1);
        }
        assert_eq!(TownTileKind::Vp2CultsAll2.keys(), 2);
    }
}
