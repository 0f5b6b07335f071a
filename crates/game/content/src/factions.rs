//! Reference faction profiles and a static catalog of them.
//!
//! These are the stock factions hosts get without writing content of their
//! own. Each one overrides only what it changes from the standard
//! schedules in [`FactionProfile`].

use riverlands_core::board::BuildingTier;
use riverlands_core::faction::{FactionCatalog, FactionProfile, SpecialMovement};
use riverlands_core::ids::FactionId;
use riverlands_core::resources::{Cost, ResourcePool};
use riverlands_core::TerrainKind;

pub const MEADOWKIN: FactionId = FactionId(0);
pub const TIDECALLERS: FactionId = FactionId(1);
pub const PEAKBORN: FactionId = FactionId(2);
pub const SKYWEAVERS: FactionId = FactionId(3);
pub const ASHWALKERS: FactionId = FactionId(4);
pub const MARSHFOLK: FactionId = FactionId(5);

/// Plains baseline; every schedule at its defaults.
pub struct Meadowkin;

impl FactionProfile for Meadowkin {
    fn name(&self) -> &str {
        "meadowkin"
    }

    fn home_terrain(&self) -> TerrainKind {
        TerrainKind::Plains
    }
}

/// Lake dwellers who may join towns over a single river hex.
pub struct Tidecallers;

impl FactionProfile for Tidecallers {
    fn name(&self) -> &str {
        "tidecallers"
    }

    fn home_terrain(&self) -> TerrainKind {
        TerrainKind::Lake
    }

    fn river_skip(&self) -> bool {
        true
    }

    fn starting_resources(&self) -> ResourcePool {
        ResourcePool::new(15, 3, 1)
    }
}

/// Mountain folk reaching across one intervening hex instead of shipping,
/// and bridging rivers for plain workers.
pub struct Peakborn;

impl FactionProfile for Peakborn {
    fn name(&self) -> &str {
        "peakborn"
    }

    fn home_terrain(&self) -> TerrainKind {
        TerrainKind::Mountain
    }

    fn special_movement(&self) -> Option<SpecialMovement> {
        Some(SpecialMovement::Tunneling)
    }

    fn bridge_cost(&self) -> Option<Cost> {
        Some(Cost::workers(2))
    }
}

/// Forest fliers; range three, no shipping track at all.
pub struct Skyweavers;

impl FactionProfile for Skyweavers {
    fn name(&self) -> &str {
        "skyweavers"
    }

    fn home_terrain(&self) -> TerrainKind {
        TerrainKind::Forest
    }

    fn special_movement(&self) -> Option<SpecialMovement> {
        Some(SpecialMovement::Flight { range: 3 })
    }
}

/// Wasteland traders converting leftovers at two coins per point.
pub struct Ashwalkers;

impl FactionProfile for Ashwalkers {
    fn name(&self) -> &str {
        "ashwalkers"
    }

    fn home_terrain(&self) -> TerrainKind {
        TerrainKind::Wasteland
    }

    fn coins_per_vp(&self) -> u8 {
        2
    }

    fn starting_resources(&self) -> ResourcePool {
        ResourcePool::new(13, 3, 0)
    }
}

/// Swamp builders with cheap halls but an expensive sanctuary.
pub struct Marshfolk;

impl FactionProfile for Marshfolk {
    fn name(&self) -> &str {
        "marshfolk"
    }

    fn home_terrain(&self) -> TerrainKind {
        TerrainKind::Swamp
    }

    fn building_cost(&self, tier: BuildingTier) -> Cost {
        match tier {
            BuildingTier::TradingHouse => Cost::new(4, 2, 0),
            BuildingTier::Sanctuary => Cost::new(10, 4, 0),
            other => Meadowkin.building_cost(other),
        }
    }
}

/// Catalog answering for all six stock factions.
#[derive(Default)]
pub struct StockCatalog;

impl FactionCatalog for StockCatalog {
    fn profile(&self, id: FactionId) -> Option<&dyn FactionProfile> {
        match id {
            MEADOWKIN => Some(&Meadowkin),
            TIDECALLERS => Some(&Tidecallers),
            PEAKBORN => Some(&Peakborn),
            SKYWEAVERS => Some(&Skyweavers),
            ASHWALKERS => Some(&Ashwalkers),
            MARSHFOLK => Some(&Marshfolk),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riverlands_core::board::Connectivity;

    #[test]
    fn catalog_answers_for_every_stock_faction() {
        let catalog = StockCatalog;
        for id in [
            MEADOWKIN,
            TIDECALLERS,
            PEAKBORN,
            SKYWEAVERS,
            ASHWALKERS,
            MARSHFOLK,
        ] {
            assert!(catalog.profile(id).is_some());
        }
        assert!(catalog.profile(FactionId(99)).is_none());
    }

    #[test]
    fn movement_factions_score_area_by_range() {
        assert_eq!(Peakborn.area_connectivity(2), Connectivity::Range(2));
        assert_eq!(Skyweavers.area_connectivity(0), Connectivity::Range(3));
        assert_eq!(Meadowkin.area_connectivity(2), Connectivity::Shipping(2));
    }

    #[test]
    fn only_peakborn_price_bridges_directly() {
        assert_eq!(Peakborn.bridge_cost(), Some(Cost::workers(2)));
        assert_eq!(Meadowkin.bridge_cost(), None);
        assert_eq!(Tidecallers.bridge_cost(), None);
    }

    #[test]
    fn marshfolk_cost_overrides_are_partial() {
        assert_eq!(
            Marshfolk.building_cost(BuildingTier::TradingHouse),
            Cost::new(4, 2, 0)
        );
        assert_eq!(
            Marshfolk.building_cost(BuildingTier::Dwelling),
            Meadowkin.building_cost(BuildingTier::Dwelling)
        );
    }
}
