//! Buildings and the upgrade ladder.

use strum::EnumIter;

use crate::ids::{FactionId, PlayerId};

/// The five building tiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildingTier {
    Dwelling,
    TradingHouse,
    Temple,
    Sanctuary,
    Stronghold,
}

impl BuildingTier {
    /// Power value radiated to neighbors and counted for town qualification.
    pub const fn power_value(self) -> u8 {
        match self {
            BuildingTier::Dwelling => 1,
            BuildingTier::TradingHouse | BuildingTier::Temple => 2,
            BuildingTier::Sanctuary | BuildingTier::Stronghold => 3,
        }
    }

    /// Whether `self` may be upgraded into `target`.
    ///
    /// Dwelling -> trading house; trading house -> temple or stronghold;
    /// temple -> sanctuary. Sanctuaries and strongholds are terminal.
    pub const fn upgrades_to(self, target: BuildingTier) -> bool {
        matches!(
            (self, target),
            (BuildingTier::Dwelling, BuildingTier::TradingHouse)
                | (BuildingTier::TradingHouse, BuildingTier::Temple)
                | (BuildingTier::TradingHouse, BuildingTier::Stronghold)
                | (BuildingTier::Temple, BuildingTier::Sanctuary)
        )
    }

    /// Tiers that award a favor tile selection when built.
    pub const fn grants_favor_tile(self) -> bool {
        matches!(self, BuildingTier::Temple | BuildingTier::Sanctuary)
    }
}

/// A building occupying a hex.
///
/// Created by build/upgrade actions and removed only by explicit removal
/// actions; the board never garbage-collects buildings on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Building {
    pub tier: BuildingTier,
    pub faction: FactionId,
    pub owner: PlayerId,
}

impl Building {
    pub const fn new(tier: BuildingTier, faction: FactionId, owner: PlayerId) -> Self {
        Self {
            tier,
            faction,
            owner,
        }
    }

    pub const fn power_value(&self) -> u8 {
        self.tier.power_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_values_match_tier_ladder() {
        assert_eq!(BuildingTier::Dwelling.power_value(), 1);
        assert_eq!(BuildingTier::TradingHouse.power_value(), 2);
        assert_eq!(BuildingTier::Temple.power_value(), 2);
        assert_eq!(BuildingTier::Sanctuary.power_value(), 3);
        assert_eq!(BuildingTier::Stronghold.power_value(), 3);
    }

    #[test]
    fn upgrade_ladder_rejects_skips_and_terminals() {
        assert!(BuildingTier::Dwelling.upgrades_to(BuildingTier::TradingHouse));
        assert!(BuildingTier::TradingHouse.upgrades_to(BuildingTier::Temple));
        assert!(BuildingTier::TradingHouse.upgrades_to(BuildingTier::Stronghold));
        assert!(BuildingTier::Temple.upgrades_to(BuildingTier::Sanctuary));

        assert!(!BuildingTier::Dwelling.upgrades_to(BuildingTier::Temple));
        assert!(!BuildingTier::Sanctuary.upgrades_to(BuildingTier::Stronghold));
        assert!(!BuildingTier::Stronghold.upgrades_to(BuildingTier::Sanctuary));
    }
}
