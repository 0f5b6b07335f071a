//! Terrain kinds and the terraform wheel.

use strum::EnumIter;

/// Terrain of a single hex.
///
/// The seven land terrains sit on a cyclic wheel; the spade cost of a
/// transform is the shortest way around it. `River` is off the wheel and can
/// never be terraformed or built on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Plains,
    Swamp,
    Lake,
    Forest,
    Mountain,
    Wasteland,
    Desert,
    River,
}

/// Land terrains in wheel order.
const WHEEL: [TerrainKind; 7] = [
    TerrainKind::Plains,
    TerrainKind::Swamp,
    TerrainKind::Lake,
    TerrainKind::Forest,
    TerrainKind::Mountain,
    TerrainKind::Wasteland,
    TerrainKind::Desert,
];

impl TerrainKind {
    pub fn is_river(self) -> bool {
        self == TerrainKind::River
    }

    /// Spades needed to transform `self` into `to`.
    ///
    /// Returns `None` when either side is river.
    pub fn spade_distance(self, to: TerrainKind) -> Option<u8> {
        if self == to {
            return Some(0);
        }
        let from_idx = WHEEL.iter().position(|&t| t == self)?;
        let to_idx = WHEEL.iter().position(|&t| t == to)?;
        let forward = (to_idx + WHEEL.len() - from_idx) % WHEEL.len();
        let backward = (from_idx + WHEEL.len() - to_idx) % WHEEL.len();
        Some(forward.min(backward) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn wheel_distance_is_symmetric_and_at_most_three() {
        for a in TerrainKind::iter().filter(|t| !t.is_river()) {
            for b in TerrainKind::iter().filter(|t| !t.is_river()) {
                let d = a.spade_distance(b).unwrap();
                assert_eq!(Some(d), b.spade_distance(a));
                assert!(d <= 3);
            }
        }
    }

    #[test]
    fn river_has_no_spade_distance() {
        assert_eq!(TerrainKind::River.spade_distance(TerrainKind::Plains), None);
        assert_eq!(TerrainKind::Desert.spade_distance(TerrainKind::River), None);
    }

    #[test]
    fn adjacent_wheel_terrains_cost_one_spade() {
        assert_eq!(
            TerrainKind::Plains.spade_distance(TerrainKind::Swamp),
            Some(1)
        );
        // Wheel wraps: desert is next to plains going the other way.
        assert_eq!(
            TerrainKind::Plains.spade_distance(TerrainKind::Desert),
            Some(1)
        );
    }
}
