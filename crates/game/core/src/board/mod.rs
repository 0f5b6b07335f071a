//! Board state: terrain, buildings, bridges, rivers, and every
//! adjacency/connectivity query the rules depend on.
//!
//! The board owns all spatial state. Mutation goes through its own
//! operations (`place_building`, `build_bridge`, `transform_terrain`, ...)
//! so the spatial invariants stay auditable in one place; actions never poke
//! at hexes directly.
//!
//! # Adjacency classes
//!
//! - *Direct*: shared edge, or a built bridge between the two hexes.
//! - *Indirect (shipping)*: a bounded walk through contiguous river hexes up
//!   to the player's shipping level, ending edge-adjacent to the target.
//!   Only defined between non-river hexes that are not already direct.
//! - *Special*: pure hex-distance reachability (flight, tunneling), used
//!   exclusively for final-area scoring.

mod building;
mod hex;
mod terrain;
mod town;

pub use building::{Building, BuildingTier};
pub use hex::{DIRECTIONS, Hex};
pub use terrain::TerrainKind;
pub use town::{TownCandidate, TownThreshold, MIN_TOWN_BUILDINGS};

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::ids::{FactionId, PlayerId};
use crate::tiles::TownTileKind;

/// Bridges a single player may hold.
pub const MAX_BRIDGES_PER_PLAYER: usize = 3;

/// Canonical distance-2 bridge span pattern, one orientation.
///
/// The target offset and the two river hexes it crosses; the other five
/// orientations are 60-degree rotations of all three.
const BRIDGE_TARGET: Hex = Hex::new(1, -2);
const BRIDGE_MID_A: Hex = Hex::new(0, -1);
const BRIDGE_MID_B: Hex = Hex::new(1, -1);

/// Errors raised by board operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoardError {
    #[error("hex {0} is not on the board")]
    UnknownHex(Hex),

    #[error("hex {0} already has a building")]
    Occupied(Hex),

    #[error("hex {0} has no building")]
    Empty(Hex),

    #[error("cannot build or terraform on river hex {0}")]
    RiverHex(Hex),

    #[error("bridge endpoints must be land hexes")]
    BridgeOnRiver,

    #[error("bridge from {0} to {1} does not span a river edge")]
    BadBridgeGeometry(Hex, Hex),

    #[error("bridge between {0} and {1} already exists")]
    DuplicateBridge(Hex, Hex),

    #[error("player {0} already holds {MAX_BRIDGES_PER_PLAYER} bridges")]
    BridgeLimit(PlayerId),

    #[error("terrain at {0} is already {1:?}")]
    TerrainUnchanged(Hex, TerrainKind),

    #[error("terrain at {hex} is {found:?}, needs {needed:?}")]
    WrongTerrain {
        hex: Hex,
        found: TerrainKind,
        needed: TerrainKind,
    },

    #[error("hex {0} is not reachable from any of the player's buildings")]
    NotReachable(Hex),
}

/// One hex of board state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapHex {
    pub terrain: TerrainKind,
    pub building: Option<Building>,
    /// Set once the hex has been counted into a claimed town.
    pub part_of_town: bool,
    /// Town tile physically placed on this hex. Normally `None`; river-skip
    /// towns place their tile on the skipped river hex.
    pub town_tile: Option<TownTileKind>,
}

impl MapHex {
    fn new(terrain: TerrainKind) -> Self {
        Self {
            terrain,
            building: None,
            part_of_town: false,
            town_tile: None,
        }
    }
}

/// Connectivity rule used for final-area scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Connectivity {
    /// Direct adjacency plus river shipping up to the given level.
    Shipping(u8),
    /// Faction-special movement: everything within pure hex distance counts
    /// as connected (flight range N, tunneling distance 2).
    Range(u32),
}

/// The game board.
///
/// Keyed by [`Hex`]; iteration order is deterministic (`BTreeMap`), which
/// keeps derived facts (leech offer order, town enumeration) reproducible.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    // Hex-keyed maps travel as pair lists; JSON map keys must be strings.
    #[cfg_attr(feature = "serde", serde(with = "serde_pairs"))]
    hexes: BTreeMap<Hex, MapHex>,
    /// Built bridges, keyed by normalized (low, high) endpoint pair.
    #[cfg_attr(feature = "serde", serde(with = "serde_pairs"))]
    bridges: BTreeMap<(Hex, Hex), PlayerId>,
    rivers: BTreeSet<Hex>,
}

#[cfg(feature = "serde")]
mod serde_pairs {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize + Ord,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub(super) fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let pairs = Vec::<(K, V)>::deserialize(deserializer)?;
        Ok(pairs.into_iter().collect())
    }
}

fn bridge_key(a: Hex, b: Hex) -> (Hex, Hex) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Board {
    /// Builds a board from a static layout table.
    pub fn from_layout<I>(layout: I) -> Self
    where
        I: IntoIterator<Item = (Hex, TerrainKind)>,
    {
        let mut hexes = BTreeMap::new();
        let mut rivers = BTreeSet::new();
        for (hex, terrain) in layout {
            if terrain.is_river() {
                rivers.insert(hex);
            }
            hexes.insert(hex, MapHex::new(terrain));
        }
        Self {
            hexes,
            bridges: BTreeMap::new(),
            rivers,
        }
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.hexes.contains_key(&hex)
    }

    pub fn hex(&self, hex: Hex) -> Option<&MapHex> {
        self.hexes.get(&hex)
    }

    pub fn is_river(&self, hex: Hex) -> bool {
        self.rivers.contains(&hex)
    }

    pub fn building(&self, hex: Hex) -> Option<&Building> {
        self.hexes.get(&hex).and_then(|h| h.building.as_ref())
    }

    /// Iterates all hexes carrying a building of the given player.
    pub fn player_buildings(&self, player: PlayerId) -> impl Iterator<Item = (Hex, &Building)> {
        self.hexes.iter().filter_map(move |(&hex, map_hex)| {
            map_hex
                .building
                .as_ref()
                .filter(|b| b.owner == player)
                .map(|b| (hex, b))
        })
    }

    // ========================================================================
    // Bridges
    // ========================================================================

    pub fn has_bridge(&self, a: Hex, b: Hex) -> bool {
        self.bridges.contains_key(&bridge_key(a, b))
    }

    pub fn bridge_count(&self, player: PlayerId) -> usize {
        self.bridges.values().filter(|&&p| p == player).count()
    }

    /// Checks bridge legality without mutating: endpoints on-board and
    /// non-river, offset matching a canonical span pattern, both
    /// intermediate hexes river, no duplicate, builder under the limit.
    pub fn validate_bridge(&self, a: Hex, b: Hex, builder: PlayerId) -> Result<(), BoardError> {
        if !self.contains(a) {
            return Err(BoardError::UnknownHex(a));
        }
        if !self.contains(b) {
            return Err(BoardError::UnknownHex(b));
        }
        if self.is_river(a) || self.is_river(b) {
            return Err(BoardError::BridgeOnRiver);
        }
        if !self.bridge_spans_river(a, b) {
            return Err(BoardError::BadBridgeGeometry(a, b));
        }
        if self.has_bridge(a, b) {
            return Err(BoardError::DuplicateBridge(a, b));
        }
        if self.bridge_count(builder) >= MAX_BRIDGES_PER_PLAYER {
            return Err(BoardError::BridgeLimit(builder));
        }
        Ok(())
    }

    /// Builds a bridge between two land hexes.
    pub fn build_bridge(&mut self, a: Hex, b: Hex, builder: PlayerId) -> Result<(), BoardError> {
        self.validate_bridge(a, b, builder)?;
        self.bridges.insert(bridge_key(a, b), builder);
        Ok(())
    }

    /// True when `b - a` matches one of the six canonical distance-2 span
    /// offsets and both intermediate hexes along it are river.
    fn bridge_spans_river(&self, a: Hex, b: Hex) -> bool {
        let delta = b.sub(a);
        for k in 0..6 {
            if delta == BRIDGE_TARGET.rotate60(k) {
                let mid_a = a.add(BRIDGE_MID_A.rotate60(k));
                let mid_b = a.add(BRIDGE_MID_B.rotate60(k));
                return self.is_river(mid_a) && self.is_river(mid_b);
            }
        }
        false
    }

    // ========================================================================
    // Adjacency
    // ========================================================================

    /// Direct adjacency: shared edge or built bridge.
    pub fn directly_adjacent(&self, a: Hex, b: Hex) -> bool {
        a.touches(b) || self.has_bridge(a, b)
    }

    /// All directly adjacent hexes: the six edge neighbors that exist on the
    /// board, plus any bridge-connected hexes.
    pub fn direct_neighbors(&self, hex: Hex) -> Vec<Hex> {
        let mut out: Vec<Hex> = hex
            .neighbors()
            .into_iter()
            .filter(|n| self.contains(*n))
            .collect();
        for (&(a, b), _) in &self.bridges {
            if a == hex {
                out.push(b);
            } else if b == hex {
                out.push(a);
            }
        }
        out
    }

    /// Indirect adjacency via shipping: a river walk of at most
    /// `shipping` steps from a river neighbor of `a` reaching a river hex
    /// edge-adjacent to `b`. Both endpoints must be land and not already
    /// directly adjacent.
    pub fn shipping_adjacent(&self, a: Hex, b: Hex, shipping: u8) -> bool {
        if shipping == 0 || self.directly_adjacent(a, b) {
            return false;
        }
        if self.is_river(a) || self.is_river(b) {
            return false;
        }

        // Bounded BFS through river hexes only.
        let mut visited = BTreeSet::new();
        let mut frontier: VecDeque<(Hex, u8)> = VecDeque::new();
        for n in a.neighbors() {
            if self.contains(n) && self.is_river(n) && visited.insert(n) {
                frontier.push_back((n, 1));
            }
        }
        while let Some((river, steps)) = frontier.pop_front() {
            if river.touches(b) {
                return true;
            }
            if steps == shipping {
                continue;
            }
            for n in river.neighbors() {
                if self.contains(n) && self.is_river(n) && visited.insert(n) {
                    frontier.push_back((n, steps + 1));
                }
            }
        }
        false
    }

    /// Whether `target` is reachable from any of the player's buildings
    /// under build-time adjacency (direct, or shipping at the given level).
    pub fn reachable_from_buildings(&self, target: Hex, player: PlayerId, shipping: u8) -> bool {
        self.player_buildings(player).any(|(hex, _)| {
            self.directly_adjacent(hex, target) || self.shipping_adjacent(hex, target, shipping)
        })
    }

    // ========================================================================
    // Building placement and terrain
    // ========================================================================

    /// Checks that a new building may be placed at `hex` for a faction with
    /// the given home terrain. Setup dwellings skip the adjacency rule.
    pub fn validate_placement(
        &self,
        hex: Hex,
        player: PlayerId,
        home_terrain: TerrainKind,
        shipping: u8,
        setup: bool,
    ) -> Result<(), BoardError> {
        let map_hex = self.hex(hex).ok_or(BoardError::UnknownHex(hex))?;
        if map_hex.building.is_some() {
            return Err(BoardError::Occupied(hex));
        }
        if map_hex.terrain.is_river() {
            return Err(BoardError::RiverHex(hex));
        }
        if map_hex.terrain != home_terrain {
            return Err(BoardError::WrongTerrain {
                hex,
                found: map_hex.terrain,
                needed: home_terrain,
            });
        }
        if !setup && !self.reachable_from_buildings(hex, player, shipping) {
            return Err(BoardError::NotReachable(hex));
        }
        Ok(())
    }

    pub fn place_building(&mut self, hex: Hex, building: Building) -> Result<(), BoardError> {
        let map_hex = self.hexes.get_mut(&hex).ok_or(BoardError::UnknownHex(hex))?;
        if map_hex.building.is_some() {
            return Err(BoardError::Occupied(hex));
        }
        map_hex.building = Some(building);
        Ok(())
    }

    /// Replaces the building at `hex`, returning the previous one.
    pub fn replace_building(&mut self, hex: Hex, building: Building) -> Result<Building, BoardError> {
        let map_hex = self.hexes.get_mut(&hex).ok_or(BoardError::UnknownHex(hex))?;
        let previous = map_hex.building.take().ok_or(BoardError::Empty(hex))?;
        map_hex.building = Some(building);
        Ok(previous)
    }

    pub fn remove_building(&mut self, hex: Hex) -> Result<Building, BoardError> {
        let map_hex = self.hexes.get_mut(&hex).ok_or(BoardError::UnknownHex(hex))?;
        map_hex.building.take().ok_or(BoardError::Empty(hex))
    }

    pub fn transform_terrain(&mut self, hex: Hex, terrain: TerrainKind) -> Result<(), BoardError> {
        let map_hex = self.hexes.get_mut(&hex).ok_or(BoardError::UnknownHex(hex))?;
        if map_hex.terrain.is_river() {
            return Err(BoardError::RiverHex(hex));
        }
        if map_hex.building.is_some() {
            return Err(BoardError::Occupied(hex));
        }
        if map_hex.terrain == terrain {
            return Err(BoardError::TerrainUnchanged(hex, terrain));
        }
        map_hex.terrain = terrain;
        Ok(())
    }

    /// Marks every hex of a claimed town.
    pub(crate) fn mark_town(&mut self, members: &[Hex]) {
        for hex in members {
            if let Some(map_hex) = self.hexes.get_mut(hex) {
                map_hex.part_of_town = true;
            }
        }
    }

    /// Places a town tile marker on a river hex (river-skip towns).
    pub(crate) fn place_town_tile(&mut self, hex: Hex, tile: TownTileKind) {
        if let Some(map_hex) = self.hexes.get_mut(&hex) {
            map_hex.town_tile = Some(tile);
        }
    }

    // ========================================================================
    // Connectivity queries
    // ========================================================================

    /// All hexes holding same-faction buildings connected to `start` via
    /// direct adjacency only.
    pub fn find_connected_buildings(&self, start: Hex, faction: FactionId) -> Vec<Hex> {
        let owned = |hex: Hex| {
            self.building(hex)
                .is_some_and(|b| b.faction == faction)
        };
        if !owned(start) {
            return Vec::new();
        }
        let mut visited = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            out.push(current);
            for neighbor in self.direct_neighbors(current) {
                if owned(neighbor) && visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        out
    }

    /// Size of the player's largest connected component under the given
    /// end-game connectivity rule.
    pub fn largest_connected_area(&self, player: PlayerId, connectivity: Connectivity) -> usize {
        let mut visited: BTreeSet<Hex> = BTreeSet::new();
        let mut largest = 0;
        let starts: Vec<Hex> = self.player_buildings(player).map(|(hex, _)| hex).collect();
        for &start in &starts {
            if visited.contains(&start) {
                continue;
            }
            let mut size = 0;
            let mut queue = VecDeque::from([start]);
            visited.insert(start);
            while let Some(current) = queue.pop_front() {
                size += 1;
                for &candidate in &starts {
                    if visited.contains(&candidate) {
                        continue;
                    }
                    if self.area_connected(current, candidate, connectivity) {
                        visited.insert(candidate);
                        queue.push_back(candidate);
                    }
                }
            }
            largest = largest.max(size);
        }
        largest
    }

    fn area_connected(&self, a: Hex, b: Hex, connectivity: Connectivity) -> bool {
        match connectivity {
            Connectivity::Range(range) => a.distance(b) <= range,
            Connectivity::Shipping(level) => {
                self.directly_adjacent(a, b) || self.shipping_adjacent(a, b, level)
            }
        }
    }

    /// Opponents owning a building edge-adjacent to `hex`.
    ///
    /// Bridges deliberately do not count here; leech reach is edge-sharing
    /// only.
    pub fn leech_neighbors(&self, hex: Hex, builder: PlayerId) -> Vec<PlayerId> {
        let mut out: Vec<PlayerId> = Vec::new();
        for neighbor in hex.neighbors() {
            if let Some(building) = self.building(neighbor) {
                if building.owner != builder && !out.contains(&building.owner) {
                    out.push(building.owner);
                }
            }
        }
        out.sort_unstable();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_board() -> Board {
        // Two land rows separated by a river row:
        //   r=0 land, r=1 river, r=2 land
        let mut layout = Vec::new();
        for q in -2..6 {
            layout.push((Hex::new(q, 0), TerrainKind::Plains));
            layout.push((Hex::new(q, 1), TerrainKind::River));
            layout.push((Hex::new(q, 2), TerrainKind::Swamp));
        }
        Board::from_layout(layout)
    }

    fn dwelling(player: u8) -> Building {
        Building::new(BuildingTier::Dwelling, FactionId(0), PlayerId(player))
    }

    #[test]
    fn bridge_requires_river_intermediates_and_land_endpoints() {
        let mut board = test_board();
        // (1,0) -> (0,2): delta (-1,2) = rotation of (1,-2); midpoints
        // (0,1) and (1,1) are river.
        board
            .build_bridge(Hex::new(1, 0), Hex::new(0, 2), PlayerId(0))
            .unwrap();
        assert!(board.has_bridge(Hex::new(0, 2), Hex::new(1, 0)));
    }

    #[test]
    fn bridge_rejects_distance_one() {
        let mut board = test_board();
        let err = board
            .build_bridge(Hex::new(0, 0), Hex::new(1, 0), PlayerId(0))
            .unwrap_err();
        assert!(matches!(err, BoardError::BadBridgeGeometry(..)));
    }

    #[test]
    fn bridge_rejects_river_endpoint() {
        let mut board = test_board();
        let err = board
            .build_bridge(Hex::new(0, 1), Hex::new(1, -1), PlayerId(0))
            .unwrap_err();
        assert!(matches!(
            err,
            BoardError::BridgeOnRiver | BoardError::UnknownHex(_)
        ));
    }

    #[test]
    fn bridge_rejects_land_intermediates() {
        // Same offset as a valid span, but over land.
        let mut layout = Vec::new();
        for q in 0..4 {
            for r in 0..4 {
                layout.push((Hex::new(q, r), TerrainKind::Plains));
            }
        }
        let mut board = Board::from_layout(layout);
        let err = board
            .build_bridge(Hex::new(1, 0), Hex::new(2, 2), PlayerId(0))
            .unwrap_err();
        assert!(matches!(err, BoardError::BadBridgeGeometry(..)));
    }

    #[test]
    fn bridge_limit_is_three_per_player() {
        let mut board = test_board();
        for q in 0..3 {
            board
                .build_bridge(Hex::new(q + 1, 0), Hex::new(q, 2), PlayerId(0))
                .unwrap();
        }
        let err = board
            .build_bridge(Hex::new(4, 0), Hex::new(3, 2), PlayerId(0))
            .unwrap_err();
        assert_eq!(err, BoardError::BridgeLimit(PlayerId(0)));
        // A different player may still build.
        board
            .build_bridge(Hex::new(4, 0), Hex::new(3, 2), PlayerId(1))
            .unwrap();
    }

    #[test]
    fn duplicate_bridge_is_rejected() {
        let mut board = test_board();
        board
            .build_bridge(Hex::new(1, 0), Hex::new(0, 2), PlayerId(0))
            .unwrap();
        let err = board
            .build_bridge(Hex::new(0, 2), Hex::new(1, 0), PlayerId(1))
            .unwrap_err();
        assert!(matches!(err, BoardError::DuplicateBridge(..)));
    }

    #[test]
    fn bridge_makes_hexes_directly_adjacent() {
        let mut board = test_board();
        let (a, b) = (Hex::new(1, 0), Hex::new(0, 2));
        assert!(!board.directly_adjacent(a, b));
        board.build_bridge(a, b, PlayerId(0)).unwrap();
        assert!(board.directly_adjacent(a, b));
    }

    #[test]
    fn shipping_crosses_the_river_at_level_one() {
        let board = test_board();
        // (0,0) and (0,2) sit across the single river row.
        assert!(board.shipping_adjacent(Hex::new(0, 0), Hex::new(0, 2), 1));
        assert!(!board.shipping_adjacent(Hex::new(0, 0), Hex::new(0, 2), 0));
    }

    #[test]
    fn shipping_does_not_apply_to_direct_neighbors() {
        let board = test_board();
        assert!(!board.shipping_adjacent(Hex::new(0, 0), Hex::new(1, 0), 2));
    }

    #[test]
    fn shipping_range_is_bounded() {
        // Land edges at both ends of a long river channel.
        let mut layout = vec![
            (Hex::new(0, 0), TerrainKind::Plains),
            (Hex::new(4, 0), TerrainKind::Plains),
        ];
        for q in 1..4 {
            layout.push((Hex::new(q, 0), TerrainKind::River));
        }
        let board = Board::from_layout(layout);
        // Three river hexes must be walked before touching (4,0).
        assert!(!board.shipping_adjacent(Hex::new(0, 0), Hex::new(4, 0), 2));
        assert!(board.shipping_adjacent(Hex::new(0, 0), Hex::new(4, 0), 3));
    }

    #[test]
    fn connected_buildings_follow_edges_and_bridges() {
        let mut board = test_board();
        board.place_building(Hex::new(0, 0), dwelling(0)).unwrap();
        board.place_building(Hex::new(1, 0), dwelling(0)).unwrap();
        board.place_building(Hex::new(0, 2), dwelling(0)).unwrap();

        let component = board.find_connected_buildings(Hex::new(0, 0), FactionId(0));
        assert_eq!(component.len(), 2);

        board
            .build_bridge(Hex::new(1, 0), Hex::new(0, 2), PlayerId(0))
            .unwrap();
        let component = board.find_connected_buildings(Hex::new(0, 0), FactionId(0));
        assert_eq!(component.len(), 3);
    }

    #[test]
    fn largest_area_uses_shipping_but_not_for_range_factions() {
        let mut board = test_board();
        board.place_building(Hex::new(0, 0), dwelling(0)).unwrap();
        board.place_building(Hex::new(0, 2), dwelling(0)).unwrap();
        board.place_building(Hex::new(4, 0), dwelling(0)).unwrap();

        assert_eq!(
            board.largest_connected_area(PlayerId(0), Connectivity::Shipping(0)),
            1
        );
        assert_eq!(
            board.largest_connected_area(PlayerId(0), Connectivity::Shipping(1)),
            2
        );
        // Tunneling-style distance 2 links across the river too.
        assert_eq!(
            board.largest_connected_area(PlayerId(0), Connectivity::Range(2)),
            2
        );
    }

    #[test]
    fn leech_neighbors_ignore_bridges() {
        let mut board = test_board();
        board.place_building(Hex::new(1, 0), dwelling(0)).unwrap();
        board.place_building(Hex::new(2, 0), dwelling(1)).unwrap();
        board.place_building(Hex::new(0, 2), dwelling(2)).unwrap();
        board
            .build_bridge(Hex::new(1, 0), Hex::new(0, 2), PlayerId(2))
            .unwrap();

        // Player 1 shares an edge; player 2 is only bridge-connected.
        assert_eq!(board.leech_neighbors(Hex::new(1, 0), PlayerId(0)), vec![PlayerId(1)]);
    }
}
