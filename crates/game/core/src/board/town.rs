//! Town qualification.
//!
//! A town forms from a connected group of same-faction buildings with at
//! least [`MIN_TOWN_BUILDINGS`] members whose combined power value meets the
//! player's threshold. Groups that already contain a town hex never form
//! another.
//!
//! River-skip factions may additionally join two groups across exactly one
//! river hex, but only when neither group qualifies on its own; the town
//! tile is then placed on the skipped river hex.

use std::collections::BTreeSet;

use super::{Board, Hex};
use crate::ids::FactionId;

/// Minimum buildings in a qualifying town.
pub const MIN_TOWN_BUILDINGS: usize = 4;

/// Combined power value a group must reach to form a town.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TownThreshold(pub u8);

impl TownThreshold {
    pub const STANDARD: Self = Self(7);
    /// Lowered threshold granted by the fire cult favor.
    pub const REDUCED: Self = Self(6);
}

impl Default for TownThreshold {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// A group of buildings that qualifies as a new town.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TownCandidate {
    /// Building hexes making up the town, sorted.
    pub members: Vec<Hex>,
    /// Combined power value of the member buildings.
    pub power: u8,
    /// River hex joined over by a river-skip faction, if any. The town tile
    /// is placed here instead of being kept by the player board.
    pub skipped_river: Option<Hex>,
}

impl TownCandidate {
    /// Towns joined over a river may be claimed later; plain land towns
    /// block further actions until the tile is chosen.
    pub fn is_delayable(&self) -> bool {
        self.skipped_river.is_some()
    }
}

impl Board {
    /// Finds every new town the faction's current buildings would form.
    ///
    /// Pure query; claiming a candidate (marking hexes, handing out the
    /// tile) is the caller's job. `river_skip` enables the cross-river
    /// merge rule.
    pub fn detect_new_towns(
        &self,
        faction: FactionId,
        threshold: TownThreshold,
        river_skip: bool,
    ) -> Vec<TownCandidate> {
        let components = self.faction_components(faction);

        let qualifies = |buildings: usize, power: u8| {
            buildings >= MIN_TOWN_BUILDINGS && power >= threshold.0
        };

        let mut towns = Vec::new();
        let mut satisfied: BTreeSet<usize> = BTreeSet::new();
        for (index, component) in components.iter().enumerate() {
            if component.tainted {
                continue;
            }
            if qualifies(component.members.len(), component.power) {
                satisfied.insert(index);
                towns.push(TownCandidate {
                    members: component.members.clone(),
                    power: component.power,
                    skipped_river: None,
                });
            }
        }

        if river_skip {
            towns.extend(self.river_skip_towns(&components, &satisfied, qualifies));
        }
        towns
    }

    /// Merges component pairs across single river hexes.
    ///
    /// A merge is only taken when none of the joined components qualifies
    /// alone, matching the "only when necessary" restriction.
    fn river_skip_towns(
        &self,
        components: &[Component],
        satisfied: &BTreeSet<usize>,
        qualifies: impl Fn(usize, u8) -> bool,
    ) -> Vec<TownCandidate> {
        let mut towns: Vec<TownCandidate> = Vec::new();
        // One building group may touch several river hexes; it still forms
        // only one town, over the first such hex in board order.
        let mut merged: BTreeSet<Vec<usize>> = BTreeSet::new();
        for &river in &self.rivers {
            if self
                .hex(river)
                .is_none_or(|map_hex| map_hex.town_tile.is_some())
            {
                continue;
            }

            // Distinct untainted components with a building touching this
            // river hex.
            let mut joined: Vec<usize> = Vec::new();
            for neighbor in river.neighbors() {
                if self.building(neighbor).is_none() {
                    continue;
                }
                if let Some(index) = components
                    .iter()
                    .position(|c| !c.tainted && c.members.contains(&neighbor))
                {
                    if !joined.contains(&index) {
                        joined.push(index);
                    }
                }
            }
            if joined.len() < 2 {
                continue;
            }
            if joined.iter().any(|index| satisfied.contains(index)) {
                continue;
            }

            joined.sort_unstable();
            if merged.contains(&joined) {
                continue;
            }

            let buildings: usize = joined.iter().map(|&i| components[i].members.len()).sum();
            let power: u8 = joined.iter().map(|&i| components[i].power).sum();
            if !qualifies(buildings, power) {
                continue;
            }

            let mut members: Vec<Hex> = joined
                .iter()
                .flat_map(|&i| components[i].members.iter().copied())
                .collect();
            members.sort_unstable();
            merged.insert(joined);
            towns.push(TownCandidate {
                members,
                power,
                skipped_river: Some(river),
            });
        }
        towns
    }

    /// Connected components of the faction's buildings under direct
    /// adjacency. Components touching an existing town are flagged tainted.
    fn faction_components(&self, faction: FactionId) -> Vec<Component> {
        let mut seen: BTreeSet<Hex> = BTreeSet::new();
        let mut components = Vec::new();
        let starts: Vec<Hex> = self
            .hexes
            .iter()
            .filter(|(_, map_hex)| {
                map_hex
                    .building
                    .as_ref()
                    .is_some_and(|b| b.faction == faction)
            })
            .map(|(&hex, _)| hex)
            .collect();

        for start in starts {
            if !seen.insert(start) {
                continue;
            }
            let members = self.find_connected_buildings(start, faction);
            seen.extend(members.iter().copied());

            let mut power = 0u8;
            let mut tainted = false;
            for &hex in &members {
                let map_hex = &self.hexes[&hex];
                if map_hex.part_of_town {
                    tainted = true;
                }
                if let Some(building) = &map_hex.building {
                    power += building.power_value();
                }
            }

            let mut members = members;
            members.sort_unstable();
            components.push(Component {
                members,
                power,
                tainted,
            });
        }
        components
    }
}

struct Component {
    members: Vec<Hex>,
    power: u8,
    tainted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Building, BuildingTier, TerrainKind};
    use crate::ids::PlayerId;

    fn open_board() -> Board {
        let mut layout = Vec::new();
        for q in 0..8 {
            for r in 0..3 {
                let terrain = if r == 1 && q >= 4 {
                    TerrainKind::River
                } else {
                    TerrainKind::Plains
                };
                layout.push((Hex::new(q, r), terrain));
            }
        }
        Board::from_layout(layout)
    }

    fn place(board: &mut Board, hex: Hex, tier: BuildingTier) {
        board
            .place_building(hex, Building::new(tier, FactionId(0), PlayerId(0)))
            .unwrap();
    }

    #[test]
    fn four_dwellings_do_not_reach_the_standard_threshold() {
        let mut board = open_board();
        for q in 0..4 {
            place(&mut board, Hex::new(q, 0), BuildingTier::Dwelling);
        }
        // 4 buildings but power 4 < 7.
        assert!(board
            .detect_new_towns(FactionId(0), TownThreshold::STANDARD, false)
            .is_empty());
    }

    #[test]
    fn dwellings_plus_sanctuary_form_a_town() {
        let mut board = open_board();
        for q in 0..3 {
            place(&mut board, Hex::new(q, 0), BuildingTier::Dwelling);
        }
        place(&mut board, Hex::new(3, 0), BuildingTier::Sanctuary);
        // Power 1+1+1+3 = 6: short at 7, enough at the reduced threshold.
        assert!(board
            .detect_new_towns(FactionId(0), TownThreshold::STANDARD, false)
            .is_empty());
        let towns = board.detect_new_towns(FactionId(0), TownThreshold::REDUCED, false);
        assert_eq!(towns.len(), 1);
        assert_eq!(towns[0].power, 6);
        assert_eq!(towns[0].members.len(), 4);
        assert_eq!(towns[0].skipped_river, None);
    }

    #[test]
    fn three_big_buildings_are_not_enough_buildings() {
        let mut board = open_board();
        place(&mut board, Hex::new(0, 0), BuildingTier::Sanctuary);
        place(&mut board, Hex::new(1, 0), BuildingTier::Stronghold);
        place(&mut board, Hex::new(2, 0), BuildingTier::TradingHouse);
        // Power 8 >= 7 but only 3 buildings.
        assert!(board
            .detect_new_towns(FactionId(0), TownThreshold::STANDARD, false)
            .is_empty());
    }

    #[test]
    fn existing_town_hexes_block_reuse() {
        let mut board = open_board();
        for q in 0..2 {
            place(&mut board, Hex::new(q, 0), BuildingTier::Dwelling);
        }
        place(&mut board, Hex::new(2, 0), BuildingTier::TradingHouse);
        place(&mut board, Hex::new(3, 0), BuildingTier::Stronghold);
        // Power 1+1+2+3 = 7 across four buildings.
        let towns = board.detect_new_towns(FactionId(0), TownThreshold::STANDARD, false);
        assert_eq!(towns.len(), 1);

        board.mark_town(&towns[0].members);
        // Growing the marked group does not form a second town.
        place(&mut board, Hex::new(0, 1), BuildingTier::Sanctuary);
        assert!(board
            .detect_new_towns(FactionId(0), TownThreshold::STANDARD, false)
            .is_empty());
    }

    #[test]
    fn river_skip_merges_two_short_groups() {
        let mut board = open_board();
        // Group A, row 0 east side: two trading houses (power 4).
        place(&mut board, Hex::new(5, 0), BuildingTier::TradingHouse);
        place(&mut board, Hex::new(6, 0), BuildingTier::TradingHouse);
        // Group B, row 2, touching river hex (5,1): two trading houses.
        place(&mut board, Hex::new(4, 2), BuildingTier::TradingHouse);
        place(&mut board, Hex::new(5, 2), BuildingTier::TradingHouse);

        assert!(board
            .detect_new_towns(FactionId(0), TownThreshold::STANDARD, false)
            .is_empty());

        let towns = board.detect_new_towns(FactionId(0), TownThreshold::STANDARD, true);
        assert_eq!(towns.len(), 1);
        let town = &towns[0];
        assert_eq!(town.members.len(), 4);
        assert_eq!(town.power, 8);
        assert!(town.skipped_river.is_some());
        assert!(town.is_delayable());
    }

    #[test]
    fn river_skip_is_not_used_when_one_side_already_qualifies() {
        let mut board = open_board();
        // East row 0 group qualifies by itself.
        place(&mut board, Hex::new(4, 0), BuildingTier::Dwelling);
        place(&mut board, Hex::new(5, 0), BuildingTier::TradingHouse);
        place(&mut board, Hex::new(6, 0), BuildingTier::TradingHouse);
        place(&mut board, Hex::new(7, 0), BuildingTier::Sanctuary);
        // Lone dwelling across the river.
        place(&mut board, Hex::new(5, 2), BuildingTier::Dwelling);

        let towns = board.detect_new_towns(FactionId(0), TownThreshold::STANDARD, true);
        assert_eq!(towns.len(), 1);
        assert_eq!(towns[0].skipped_river, None);
    }
}
