//! Match state and its lifecycle.
//!
//! [`GameState`] is the single authoritative value. It is built once from a
//! [`MatchSetup`], mutated only by the action layer, and snapshotable via
//! the `serde` feature.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use strum::EnumIter;

use crate::board::{Board, Hex, TerrainKind, TownThreshold};
use crate::cult::CultBoard;
use crate::error::{MissingFact, MissingInformation};
use crate::faction::GameEnv;
use crate::ids::{FactionId, PlayerId};
use crate::leech::LeechOffer;
use crate::pending::{PendingChoice, PlayerPending};
use crate::power::PowerPool;
use crate::resources::ResourcePool;
use crate::tiles::{FavorKind, FavorPool, TownTileKind, TownTilePool};

/// Rounds in a full match.
pub const ROUNDS: u8 = 6;

/// The six public power action slots, each usable once per round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerAction {
    Bridge,
    Priest,
    TwoWorkers,
    SevenCoins,
    OneSpade,
    TwoSpades,
}

impl PowerAction {
    /// Power price of the slot.
    pub const fn cost(self) -> u8 {
        match self {
            PowerAction::Bridge | PowerAction::Priest => 3,
            PowerAction::TwoWorkers | PowerAction::SevenCoins | PowerAction::OneSpade => 4,
            PowerAction::TwoSpades => 6,
        }
    }

    pub const fn spades(self) -> u8 {
        match self {
            PowerAction::OneSpade => 1,
            PowerAction::TwoSpades => 2,
            _ => 0,
        }
    }
}

/// One player's personal state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerState {
    pub id: PlayerId,
    pub faction: FactionId,
    pub resources: ResourcePool,
    pub power: PowerPool,
    pub victory_points: u32,
    pub shipping: u8,
    pub digging: u8,
    pub town_keys: u8,
    pub favor_tiles: Vec<FavorKind>,
    pub town_tiles: Vec<TownTileKind>,
    pub pending: PlayerPending,
    pub has_passed: bool,
}

impl PlayerState {
    fn new(id: PlayerId, faction: FactionId, resources: ResourcePool, power: PowerPool) -> Self {
        Self {
            id,
            faction,
            resources,
            power,
            victory_points: 20,
            shipping: 0,
            digging: 0,
            town_keys: 0,
            favor_tiles: Vec::new(),
            town_tiles: Vec::new(),
            pending: PlayerPending::default(),
            has_passed: false,
        }
    }

    pub fn has_favor(&self, kind: FavorKind) -> bool {
        self.favor_tiles.contains(&kind)
    }

    /// Power threshold this player's towns must reach.
    pub fn town_threshold(&self) -> TownThreshold {
        if self.favor_tiles.iter().any(|f| f.lowers_town_threshold()) {
            TownThreshold::REDUCED
        } else {
            TownThreshold::STANDARD
        }
    }

    pub fn award_vp(&mut self, amount: u32) {
        self.victory_points = self.victory_points.saturating_add(amount);
    }

    /// Victory points can be spent below what is on hand but never below
    /// zero; leech costs clamp.
    pub fn pay_vp(&mut self, amount: u32) {
        self.victory_points = self.victory_points.saturating_sub(amount);
    }
}

/// Per-round turn bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Round number, 1-based. Zero means the match has not started.
    pub round: u8,
    /// Seat index of the player whose turn it is.
    pub current_seat: usize,
    /// Open leech offers, resolved front to back.
    pub leech_queue: VecDeque<LeechOffer>,
    /// Power action slots already used this round.
    pub power_actions_used: BTreeSet<PowerAction>,
    /// Players who used their cult special action this round.
    pub cult_actions_used: BTreeSet<PlayerId>,
    /// Players in the order they passed; seeds the next round's turn order.
    pub pass_order: Vec<PlayerId>,
}

/// Describes a match to be started.
///
/// Built by the host; [`MatchSetup::build`] verifies the description is
/// complete and reports every missing fact at once.
#[derive(Clone, Debug, Default)]
pub struct MatchSetup {
    pub layout: Vec<(Hex, TerrainKind)>,
    pub players: Vec<(PlayerId, FactionId)>,
}

impl MatchSetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: Vec<(Hex, TerrainKind)>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_player(mut self, player: PlayerId, faction: FactionId) -> Self {
        self.players.push((player, faction));
        self
    }

    /// Validates the description and builds the opening state.
    pub fn build(self, env: &GameEnv<'_>) -> Result<GameState, MissingInformation> {
        let mut missing = MissingInformation::new();
        if self.layout.is_empty() {
            missing.push(MissingFact::BoardLayout);
        }
        if self.players.len() < 2 {
            missing.push(MissingFact::TooFewPlayers(self.players.len()));
        }
        let mut taken: BTreeSet<FactionId> = BTreeSet::new();
        for &(_, faction) in &self.players {
            if !taken.insert(faction) {
                missing.push(MissingFact::DuplicateFaction(faction));
            }
            if env.profile(faction).is_none() {
                missing.push(MissingFact::FactionProfile(faction));
            }
        }
        missing.into_result()?;

        let mut players = BTreeMap::new();
        let mut seats = Vec::with_capacity(self.players.len());
        for &(id, faction) in &self.players {
            // Profiles were checked above.
            if let Some(profile) = env.profile(faction) {
                players.insert(
                    id,
                    PlayerState::new(
                        id,
                        faction,
                        profile.starting_resources(),
                        profile.starting_power(),
                    ),
                );
                seats.push(id);
            }
        }

        Ok(GameState {
            board: Board::from_layout(self.layout),
            cults: CultBoard::new(),
            favor_pool: FavorPool::full(),
            town_pool: TownTilePool::full(),
            players,
            seats,
            turn: TurnState {
                round: 1,
                ..TurnState::default()
            },
        })
    }
}

/// Full authoritative match state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub board: Board,
    pub cults: CultBoard,
    pub favor_pool: FavorPool,
    pub town_pool: TownTilePool,
    pub players: BTreeMap<PlayerId, PlayerState>,
    /// Turn order.
    pub seats: Vec<PlayerId>,
    pub turn: TurnState,
}

impl GameState {
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(&id)
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> PlayerId {
        self.seats[self.turn.current_seat % self.seats.len()]
    }

    pub fn is_over(&self) -> bool {
        self.turn.round > ROUNDS
    }

    /// The single decision being waited on, if the game is frozen on one.
    ///
    /// Priority: leech responses first, then blocking favor, cult ordering,
    /// and town choices, then pending spades of the current player.
    pub fn pending_choice(&self) -> Option<PendingChoice> {
        if let Some(&offer) = self.turn.leech_queue.front() {
            return Some(PendingChoice::LeechResponse(offer));
        }
        for &seat in &self.seats {
            let player = &self.players[&seat];
            if player.pending.favor_choices > 0 {
                return Some(PendingChoice::FavorTile { player: seat });
            }
            if player.pending.cult_top_steps.is_some() {
                return Some(PendingChoice::CultTop { player: seat });
            }
            if !player.pending.towns.is_empty() {
                return Some(PendingChoice::TownTile { player: seat });
            }
        }
        let current = self.current_player();
        let spades = self.players[&current].pending.spades;
        if spades > 0 {
            return Some(PendingChoice::Spades {
                player: current,
                count: spades,
            });
        }
        None
    }

    /// Moves the turn to the next seat that has not passed.
    ///
    /// No-op while every player has passed; the round transition handles
    /// that case.
    pub fn advance_turn(&mut self) {
        if self.players.values().all(|p| p.has_passed) {
            return;
        }
        loop {
            self.turn.current_seat = (self.turn.current_seat + 1) % self.seats.len();
            if !self.players[&self.current_player()].has_passed {
                break;
            }
        }
    }

    pub fn all_passed(&self) -> bool {
        self.players.values().all(|p| p.has_passed)
    }

    /// Ends the round: declines every unanswered leech offer, discards
    /// leftover bought spades, clears the once-per-round action slots,
    /// reseats everyone in the order they passed, and opens the next round.
    pub fn end_round(&mut self) {
        self.turn.leech_queue.clear();
        for player in self.players.values_mut() {
            player.pending.spades = 0;
            player.has_passed = false;
        }
        self.turn.power_actions_used.clear();
        self.turn.cult_actions_used.clear();
        if self.turn.pass_order.len() == self.seats.len() {
            self.seats = std::mem::take(&mut self.turn.pass_order);
        } else {
            self.turn.pass_order.clear();
        }
        self.turn.round += 1;
        self.turn.current_seat = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::faction::{FactionCatalog, FactionProfile};

    struct Flatland;
    impl FactionProfile for Flatland {
        fn name(&self) -> &str {
            "flatland"
        }
        fn home_terrain(&self) -> TerrainKind {
            TerrainKind::Plains
        }
    }

    struct OneFaction;
    impl FactionCatalog for OneFaction {
        fn profile(&self, id: FactionId) -> Option<&dyn FactionProfile> {
            (id == FactionId(0)).then_some(&Flatland as &dyn FactionProfile)
        }
    }

    fn tiny_layout() -> Vec<(Hex, TerrainKind)> {
        vec![
            (Hex::new(0, 0), TerrainKind::Plains),
            (Hex::new(1, 0), TerrainKind::Plains),
        ]
    }

    #[test]
    fn setup_reports_all_missing_facts_at_once() {
        let catalog = OneFaction;
        let env = GameEnv::new(&catalog);
        let err = MatchSetup::new()
            .with_player(PlayerId(0), FactionId(9))
            .build(&env)
            .unwrap_err();
        // Empty layout, too few players, and an unknown faction, together.
        assert_eq!(err.facts.len(), 3);
        assert!(err.facts.contains(&MissingFact::BoardLayout));
        assert!(err.facts.contains(&MissingFact::TooFewPlayers(1)));
        assert!(err.facts.contains(&MissingFact::FactionProfile(FactionId(9))));
    }

    #[test]
    fn setup_rejects_shared_factions() {
        let catalog = OneFaction;
        let env = GameEnv::new(&catalog);
        let err = MatchSetup::new()
            .with_layout(tiny_layout())
            .with_player(PlayerId(0), FactionId(0))
            .with_player(PlayerId(1), FactionId(0))
            .build(&env)
            .unwrap_err();
        assert!(err.facts.contains(&MissingFact::DuplicateFaction(FactionId(0))));
    }

    struct AnyFaction;
    impl FactionCatalog for AnyFaction {
        fn profile(&self, _id: FactionId) -> Option<&dyn FactionProfile> {
            Some(&Flatland)
        }
    }

    #[test]
    fn advance_turn_skips_passed_players() {
        let catalog = AnyFaction;
        let env = GameEnv::new(&catalog);
        let mut state = MatchSetup::new()
            .with_layout(tiny_layout())
            .with_player(PlayerId(0), FactionId(0))
            .with_player(PlayerId(1), FactionId(1))
            .with_player(PlayerId(2), FactionId(2))
            .build(&env)
            .unwrap();

        state.player_mut(PlayerId(1)).unwrap().has_passed = true;
        assert_eq!(state.current_player(), PlayerId(0));
        state.advance_turn();
        assert_eq!(state.current_player(), PlayerId(2));
    }

    #[test]
    fn end_round_declines_open_leeches_and_resets_slots() {
        let catalog = AnyFaction;
        let env = GameEnv::new(&catalog);
        let mut state = MatchSetup::new()
            .with_layout(tiny_layout())
            .with_player(PlayerId(0), FactionId(0))
            .with_player(PlayerId(1), FactionId(1))
            .build(&env)
            .unwrap();

        state.turn.leech_queue.push_back(LeechOffer {
            to: PlayerId(1),
            from: PlayerId(0),
            amount: 2,
            source: Hex::new(0, 0),
        });
        state.turn.power_actions_used.insert(PowerAction::Bridge);
        state.turn.cult_actions_used.insert(PlayerId(1));
        state.player_mut(PlayerId(0)).unwrap().pending.spades = 1;
        state.player_mut(PlayerId(0)).unwrap().has_passed = true;

        state.end_round();
        assert!(state.turn.leech_queue.is_empty());
        assert!(state.turn.power_actions_used.is_empty());
        assert!(state.turn.cult_actions_used.is_empty());
        assert_eq!(state.player(PlayerId(0)).unwrap().pending.spades, 0);
        assert!(!state.player(PlayerId(0)).unwrap().has_passed);
        assert_eq!(state.turn.round, 2);
    }
}
