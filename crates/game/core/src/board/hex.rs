//! Axial hex coordinates for a pointy-top grid.
//!
//! The board uses 9 rows alternating 13/12 hexes, addressed by axial (q, r)
//! pairs. All geometry (neighbors, distance, rotation) lives here; terrain
//! and occupancy are layered on top by [`Board`](super::Board).

use core::fmt;

/// The six axial direction vectors for pointy-top hexagons.
///
/// Order: E, NE, NW, W, SW, SE.
pub const DIRECTIONS: [Hex; 6] = [
    Hex::new(1, 0),
    Hex::new(1, -1),
    Hex::new(0, -1),
    Hex::new(-1, 0),
    Hex::new(-1, 1),
    Hex::new(0, 1),
];

/// An axial coordinate on the hex grid.
///
/// Value type; equality and ordering are by the (q, r) pair, which makes it
/// usable as a deterministic `BTreeMap`/`BTreeSet` key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub const fn add(self, other: Hex) -> Hex {
        Hex::new(self.q + other.q, self.r + other.r)
    }

    pub const fn sub(self, other: Hex) -> Hex {
        Hex::new(self.q - other.q, self.r - other.r)
    }

    pub const fn scale(self, k: i32) -> Hex {
        Hex::new(self.q * k, self.r * k)
    }

    /// Neighbor in the given direction (0-5, see [`DIRECTIONS`]).
    pub const fn neighbor(self, direction: usize) -> Hex {
        self.add(DIRECTIONS[direction])
    }

    /// All six edge-sharing neighbors.
    pub fn neighbors(self) -> [Hex; 6] {
        let mut out = [Hex::default(); 6];
        for (slot, dir) in out.iter_mut().zip(DIRECTIONS) {
            *slot = self.add(dir);
        }
        out
    }

    /// Hex distance between two coordinates.
    ///
    /// Derived from the cube-coordinate constraint s = -q - r:
    /// distance = (|dq| + |dr| + |ds|) / 2.
    pub fn distance(self, other: Hex) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).unsigned_abs();
        (dq + dr + ds) / 2
    }

    /// True when the two hexes share an edge.
    pub fn touches(self, other: Hex) -> bool {
        self.distance(other) == 1
    }

    /// Rotates this coordinate around the origin by `k` * 60 degrees.
    ///
    /// Used by bridge geometry validation to fold the six canonical span
    /// patterns into one.
    pub fn rotate60(self, k: u32) -> Hex {
        // axial -> cube
        let mut x = self.q;
        let mut z = self.r;
        let mut y = -x - z;
        for _ in 0..(k % 6) {
            // 60 degree rotation: (x, y, z) -> (-z, -x, -y)
            let (nx, ny, nz) = (-z, -x, -y);
            x = nx;
            y = ny;
            z = nz;
        }
        Hex::new(x, z)
    }

    /// All hexes at exactly `radius` steps from this one.
    pub fn ring(self, radius: u32) -> Vec<Hex> {
        if radius == 0 {
            return vec![self];
        }
        let mut out = Vec::with_capacity(radius as usize * 6);
        // Start `radius` steps away in direction 4, then walk the perimeter.
        let mut hex = self.add(DIRECTIONS[4].scale(radius as i32));
        for direction in 0..6 {
            for _ in 0..radius {
                out.push(hex);
                hex = hex.neighbor(direction);
            }
        }
        out
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.q, self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Hex::new(2, -1);
        let b = Hex::new(-1, 3);
        assert_eq!(a.distance(a), 0);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn neighbors_are_all_at_distance_one() {
        let center = Hex::new(4, 2);
        for n in center.neighbors() {
            assert_eq!(center.distance(n), 1);
            assert!(center.touches(n));
        }
    }

    #[test]
    fn ring_has_six_times_radius_hexes() {
        let center = Hex::new(0, 0);
        for radius in 1..4 {
            let ring = center.ring(radius);
            assert_eq!(ring.len(), radius as usize * 6);
            for hex in ring {
                assert_eq!(center.distance(hex), radius);
            }
        }
    }

    #[test]
    fn rotate60_six_times_is_identity() {
        let hex = Hex::new(1, -2);
        let mut rotated = hex;
        for _ in 0..6 {
            rotated = rotated.rotate60(1);
        }
        assert_eq!(rotated, hex);
    }

    #[test]
    fn rotations_of_a_distance_two_offset_stay_at_distance_two() {
        let origin = Hex::new(0, 0);
        let base = Hex::new(1, -2);
        for k in 0..6 {
            assert_eq!(origin.distance(base.rotate60(k)), 2);
        }
    }
}
