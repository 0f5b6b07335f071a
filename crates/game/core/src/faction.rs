//! Faction capabilities.
//!
//! The engine never hardcodes faction content. Hosts register
//! [`FactionProfile`] implementations in a [`FactionCatalog`] and hand the
//! engine a [`GameEnv`] wrapping it; everything faction-specific (home
//! terrain, cost schedules, movement tricks) is answered through that seam.

use crate::board::{BuildingTier, Connectivity, TerrainKind};
use crate::ids::FactionId;
use crate::power::PowerPool;
use crate::resources::{Cost, ResourcePool};

/// Movement rules that replace shipping for some factions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpecialMovement {
    /// Reaches any hex within the given range, terrain ignored.
    Flight { range: u32 },
    /// Reaches across one intervening hex.
    Tunneling,
}

impl SpecialMovement {
    pub fn range(self) -> u32 {
        match self {
            SpecialMovement::Flight { range } => range,
            SpecialMovement::Tunneling => 2,
        }
    }
}

/// Everything the rules need to know about one faction.
///
/// Defaults encode the standard schedules; content implementations override
/// only what their faction changes.
pub trait FactionProfile {
    fn name(&self) -> &str;

    fn home_terrain(&self) -> TerrainKind;

    fn building_cost(&self, tier: BuildingTier) -> Cost {
        match tier {
            BuildingTier::Dwelling => Cost::workers(1),
            BuildingTier::TradingHouse => Cost::new(6, 2, 0),
            BuildingTier::Temple => Cost::new(5, 2, 0),
            BuildingTier::Sanctuary => Cost::new(8, 4, 0),
            BuildingTier::Stronghold => Cost::new(6, 4, 0),
        }
    }

    /// Workers one spade costs at the given digging level.
    fn workers_per_spade(&self, digging: u8) -> u8 {
        3u8.saturating_sub(digging).max(1)
    }

    fn max_digging(&self) -> u8 {
        2
    }

    fn max_shipping(&self) -> u8 {
        3
    }

    /// Cost of raising shipping to `level`.
    fn shipping_upgrade_cost(&self, level: u8) -> Cost {
        Cost::new(level.saturating_mul(2), 0, 1)
    }

    /// Cost of raising digging to `level`.
    fn digging_upgrade_cost(&self, _level: u8) -> Cost {
        Cost::new(5, 2, 1)
    }

    /// Replaces shipping entirely when present; also used for end-game
    /// area connectivity.
    fn special_movement(&self) -> Option<SpecialMovement> {
        None
    }

    /// May join two building groups over one river hex to form a town.
    fn river_skip(&self) -> bool {
        false
    }

    /// Price of placing a bridge as a regular action. `None` means the
    /// faction only gets bridges from the public power action.
    fn bridge_cost(&self) -> Option<Cost> {
        None
    }

    /// Coins per victory point in end-game resource conversion. Standard
    /// is 3; conversion-efficient factions trade at 2.
    fn coins_per_vp(&self) -> u8 {
        3
    }

    fn starting_resources(&self) -> ResourcePool {
        ResourcePool::new(15, 3, 0)
    }

    fn starting_power(&self) -> PowerPool {
        PowerPool::new(5, 7, 0)
    }

    /// End-game area connectivity for this faction.
    fn area_connectivity(&self, shipping: u8) -> Connectivity {
        match self.special_movement() {
            Some(movement) => Connectivity::Range(movement.range()),
            None => Connectivity::Shipping(shipping),
        }
    }
}

/// Source of faction profiles for a match.
pub trait FactionCatalog {
    fn profile(&self, id: FactionId) -> Option<&dyn FactionProfile>;
}

/// Read-only collaborators an action evaluation needs beside the state.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    pub catalog: &'a dyn FactionCatalog,
}

impl<'a> GameEnv<'a> {
    pub fn new(catalog: &'a dyn FactionCatalog) -> Self {
        Self { catalog }
    }

    pub fn profile(&self, id: FactionId) -> Option<&'a dyn FactionProfile> {
        self.catalog.profile(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plainfolk;

    impl FactionProfile for Plainfolk {
        fn name(&self) -> &str {
            "plainfolk"
        }

        fn home_terrain(&self) -> TerrainKind {
            TerrainKind::Plains
        }
    }

    #[test]
    fn default_schedules_apply() {
        let profile = Plainfolk;
        assert_eq!(
            profile.building_cost(BuildingTier::Dwelling),
            Cost::workers(1)
        );
        assert_eq!(profile.workers_per_spade(0), 3);
        assert_eq!(profile.workers_per_spade(2), 1);
        assert_eq!(profile.coins_per_vp(), 3);
        assert_eq!(profile.area_connectivity(2), Connectivity::Shipping(2));
    }

    #[test]
    fn special_movement_overrides_area_connectivity() {
        struct Skyborne;
        impl FactionProfile for Skyborne {
            fn name(&self) -> &str {
                "skyborne"
            }
            fn home_terrain(&self) -> TerrainKind {
                TerrainKind::Mountain
            }
            fn special_movement(&self) -> Option<SpecialMovement> {
                Some(SpecialMovement::Flight { range: 3 })
            }
        }
        assert_eq!(
            Skyborne.area_connectivity(1),
            Connectivity::Range(3)
        );
    }
}
