//! The action layer.
//!
//! Every state change goes through one [`Action`] variant. Each variant is
//! a small struct implementing [`ActionTransition`], with legality checks in
//! `pre_validate` and the mutation in `apply`; the engine runs the full
//! pipeline and refuses to touch state when validation fails.
//!
//! # Module structure
//!
//! - `error`: the [`ActionError`] taxonomy
//! - `build`: placing dwellings, terraforming, discarding spades
//! - `upgrade`: the building upgrade ladder
//! - `advance`: shipping and digging track upgrades
//! - `cult_actions`: sending priests, the cult favor special action
//! - `power_actions`: the six public power action slots
//! - `convert`: free resource conversions
//! - `leech_actions`: accepting and declining leech offers
//! - `favor_actions`, `town_actions`: resolving owed tile choices
//! - `pass`: ending a player's round

pub mod advance;
pub mod build;
pub mod convert;
pub mod cult_actions;
pub mod error;
pub mod favor_actions;
pub mod leech_actions;
pub mod pass;
pub mod power_actions;
pub mod town_actions;
pub mod upgrade;

pub use advance::{UpgradeDigging, UpgradeShipping};
pub use build::{BuildBridge, BuildDwelling, DiscardPendingSpades, TransformAndBuild};
pub use convert::{Conversion, Convert};
pub use cult_actions::{PriestCommitment, SendPriest, UseCultAction};
pub use error::ActionError;
pub use favor_actions::SelectFavorTile;
pub use leech_actions::RespondToLeech;
pub use pass::Pass;
pub use power_actions::UsePowerAction;
pub use town_actions::{ClaimDelayedTown, SelectTownCultTop, SelectTownTile};
pub use upgrade::UpgradeBuilding;

use crate::board::{Hex, TownCandidate};
use crate::cult::{APEX, AdvanceContext, AdvanceOutcome, CultTrack};
use crate::error::{MissingFact, MissingInformation};
use crate::faction::{FactionProfile, GameEnv};
use crate::ids::{FactionId, PlayerId};
use crate::leech;
use crate::resources::PRIEST_SUPPLY;
use crate::state::{GameState, PlayerState};
use crate::tiles::TownTileKind;

/// What the engine should do after an action applied cleanly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    /// The action used up the player's turn.
    pub ends_turn: bool,
}

impl ActionOutcome {
    pub const TURN: Self = Self { ends_turn: true };
    pub const FREE: Self = Self { ends_turn: false };
}

/// Defines how a concrete action variant mutates match state.
///
/// Implementors surface pre- and post-conditions around the mutation; all
/// hooks receive read-only faction facts through the environment and must
/// leave state untouched on error.
pub trait ActionTransition {
    /// The player performing this action.
    fn actor(&self) -> PlayerId;

    /// Validates pre-conditions against the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        Ok(())
    }

    /// Applies the action. Implementations may assume `pre_validate`
    /// succeeded on this exact state.
    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError>;

    /// Validates post-conditions against the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        Ok(())
    }
}

/// Every action a host can submit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Action {
    BuildDwelling(BuildDwelling),
    TransformAndBuild(TransformAndBuild),
    BuildBridge(BuildBridge),
    UpgradeBuilding(UpgradeBuilding),
    UpgradeShipping(UpgradeShipping),
    UpgradeDigging(UpgradeDigging),
    SendPriest(SendPriest),
    UsePowerAction(UsePowerAction),
    UseCultAction(UseCultAction),
    Convert(Convert),
    Pass(Pass),
    RespondToLeech(RespondToLeech),
    SelectFavorTile(SelectFavorTile),
    SelectTownTile(SelectTownTile),
    SelectTownCultTop(SelectTownCultTop),
    ClaimDelayedTown(ClaimDelayedTown),
    DiscardPendingSpades(DiscardPendingSpades),
}

macro_rules! dispatch {
    ($self:expr, $inner:pat => $body:expr) => {
        match $self {
            Action::BuildDwelling($inner) => $body,
            Action::TransformAndBuild($inner) => $body,
            Action::BuildBridge($inner) => $body,
            Action::UpgradeBuilding($inner) => $body,
            Action::UpgradeShipping($inner) => $body,
            Action::UpgradeDigging($inner) => $body,
            Action::SendPriest($inner) => $body,
            Action::UsePowerAction($inner) => $body,
            Action::UseCultAction($inner) => $body,
            Action::Convert($inner) => $body,
            Action::Pass($inner) => $body,
            Action::RespondToLeech($inner) => $body,
            Action::SelectFavorTile($inner) => $body,
            Action::SelectTownTile($inner) => $body,
            Action::SelectTownCultTop($inner) => $body,
            Action::ClaimDelayedTown($inner) => $body,
            Action::DiscardPendingSpades($inner) => $body,
        }
    };
}

impl Action {
    pub fn actor(&self) -> PlayerId {
        dispatch!(self, inner => inner.actor())
    }

    pub fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        dispatch!(self, inner => inner.pre_validate(state, env))
    }

    pub fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        dispatch!(self, inner => inner.apply(state, env))
    }

    pub fn post_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        dispatch!(self, inner => inner.post_validate(state, env))
    }

    /// Snake case name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::BuildDwelling(_) => "build_dwelling",
            Action::TransformAndBuild(_) => "transform_and_build",
            Action::BuildBridge(_) => "build_bridge",
            Action::UpgradeBuilding(_) => "upgrade_building",
            Action::UpgradeShipping(_) => "upgrade_shipping",
            Action::UpgradeDigging(_) => "upgrade_digging",
            Action::SendPriest(_) => "send_priest",
            Action::UsePowerAction(_) => "use_power_action",
            Action::UseCultAction(_) => "use_cult_action",
            Action::Convert(_) => "convert",
            Action::Pass(_) => "pass",
            Action::RespondToLeech(_) => "respond_to_leech",
            Action::SelectFavorTile(_) => "select_favor_tile",
            Action::SelectTownTile(_) => "select_town_tile",
            Action::SelectTownCultTop(_) => "select_town_cult_top",
            Action::ClaimDelayedTown(_) => "claim_delayed_town",
            Action::DiscardPendingSpades(_) => "discard_pending_spades",
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn missing_profile(faction: FactionId) -> ActionError {
    let mut missing = MissingInformation::new();
    missing.push(MissingFact::FactionProfile(faction));
    ActionError::Missing(missing)
}

pub(crate) fn profile_for<'a>(
    env: &GameEnv<'a>,
    faction: FactionId,
) -> Result<&'a dyn FactionProfile, ActionError> {
    env.profile(faction).ok_or_else(|| missing_profile(faction))
}

pub(crate) fn player_of(state: &GameState, id: PlayerId) -> Result<&PlayerState, ActionError> {
    state.player(id).ok_or(ActionError::UnknownPlayer(id))
}

pub(crate) fn player_of_mut(
    state: &mut GameState,
    id: PlayerId,
) -> Result<&mut PlayerState, ActionError> {
    state.player_mut(id).ok_or(ActionError::UnknownPlayer(id))
}

/// Priests the player may still gain. Priests parked on cult spaces never
/// come back, so they count against the supply of seven alongside the ones
/// on hand.
pub(crate) fn priest_headroom(state: &GameState, actor: PlayerId) -> Result<u8, ActionError> {
    let player = player_of(state, actor)?;
    let owned = state
        .cults
        .priests_committed(actor)
        .saturating_add(player.resources.priests);
    Ok(PRIEST_SUPPLY.saturating_sub(owned))
}

/// Advances a player on a cult track, wiring keys and unclaimed towns into
/// the apex rule and spending a key when the advance used one.
pub(crate) fn advance_cult(
    state: &mut GameState,
    actor: PlayerId,
    track: CultTrack,
    steps: u8,
) -> Result<AdvanceOutcome, ActionError> {
    let GameState { cults, players, .. } = state;
    let player = players.get_mut(&actor).ok_or(ActionError::UnknownPlayer(actor))?;
    let outcome = cults.advance(
        actor,
        track,
        steps,
        AdvanceContext {
            town_keys: player.town_keys,
            town_pending: player.pending.has_unclaimed_town(),
            pool: &mut player.power,
        },
    );
    if outcome.spent_key {
        player.town_keys -= 1;
    }
    Ok(outcome)
}

/// Runs town detection for one player and queues any new formations.
///
/// Detected towns are marked on the board immediately; only the tile choice
/// stays open. Land towns block, river-joined towns wait in the delayed
/// queue.
pub(crate) fn detect_towns_for(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: PlayerId,
) -> Result<usize, ActionError> {
    let (faction, threshold) = {
        let player = player_of(state, actor)?;
        (player.faction, player.town_threshold())
    };
    let river_skip = profile_for(env, faction)?.river_skip();

    let candidates = state.board.detect_new_towns(faction, threshold, river_skip);
    let formed = candidates.len();
    for candidate in candidates {
        state.board.mark_town(&candidate.members);
        let pending = &mut player_of_mut(state, actor)?.pending;
        if candidate.is_delayable() {
            pending.delayed_towns.push(candidate);
        } else {
            pending.towns.push(candidate);
        }
    }
    Ok(formed)
}

/// Settles the aftermath of a raised building value at `hex`: leech offers
/// to edge neighbors, then town detection for the builder.
pub(crate) fn settle_building_change(
    state: &mut GameState,
    env: &GameEnv<'_>,
    actor: PlayerId,
    hex: Hex,
    value_delta: u8,
) -> Result<(), ActionError> {
    let offers = leech::offers_for_change(&state.board, &state.seats, hex, actor, value_delta);
    state.turn.leech_queue.extend(offers);
    detect_towns_for(state, env, actor)?;
    Ok(())
}

pub(crate) const ALL_TRACKS: [CultTrack; CultTrack::COUNT] = [
    CultTrack::Fire,
    CultTrack::Water,
    CultTrack::Earth,
    CultTrack::Air,
];

/// Tracks where an advance of `steps` could enter a free apex.
fn apex_candidates(state: &GameState, actor: PlayerId, steps: u8) -> u8 {
    ALL_TRACKS
        .iter()
        .filter(|&&track| {
            let position = state.cults.position(actor, track);
            state.cults.apex_holder(track).is_none()
                && position < APEX
                && position + steps >= APEX
        })
        .count() as u8
}

/// Pays out a chosen town tile: victory points, keys, resources, power,
/// cult advances, shipping. For river-joined towns the tile is also placed
/// on the skipped river hex.
///
/// When the tile advances all cults and the player's keys cannot cover
/// every apex in reach, the advance is left pending so the player may order
/// the tracks instead of a fixed order deciding for them.
pub(crate) fn grant_town_tile(
    state: &mut GameState,
    actor: PlayerId,
    candidate: &TownCandidate,
    kind: TownTileKind,
) -> Result<(), ActionError> {
    // The tile's priest (if any) only materializes while the supply lasts.
    let priest_gain = kind.priests().min(priest_headroom(state, actor)?);
    {
        let player = player_of_mut(state, actor)?;
        player.award_vp(kind.victory_points());
        player.town_keys += kind.keys();
        player.resources.coins = player.resources.coins.saturating_add(kind.coins());
        player.resources.workers = player.resources.workers.saturating_add(kind.workers());
        player.resources.priests = player.resources.priests.saturating_add(priest_gain);
        player.power.gain(kind.power());
        player.shipping = player.shipping.saturating_add(kind.shipping_levels());
        player.town_tiles.push(kind);
    }

    let steps = kind.cult_advance_all();
    if steps > 0 {
        let candidates = apex_candidates(state, actor, steps);
        let player = player_of_mut(state, actor)?;
        let keys_cover = player.pending.has_unclaimed_town() || player.town_keys >= candidates;
        if candidates > 1 && !keys_cover && player.town_keys > 0 {
            player.pending.cult_top_steps = Some(steps);
        } else {
            for track in ALL_TRACKS {
                advance_cult(state, actor, track, steps)?;
            }
        }
    }

    if let Some(river) = candidate.skipped_river {
        state.board.place_town_tile(river, kind);
    }
    Ok(())
}
