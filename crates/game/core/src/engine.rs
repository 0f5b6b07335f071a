//! Action execution pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. Every
//! submitted action passes a gate (turn order, open obligations), then the
//! three transition phases: pre_validate, apply, post_validate. Rejections
//! carry the phase that produced them.

use tracing::{debug, warn};

use crate::action::{Action, ActionError, ActionOutcome};
use crate::board::{Building, BuildingTier, Hex};
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::pending::PendingChoice;
use crate::state::GameState;

/// Identifies which stage of the pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    Gate,
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::Gate => "gate",
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// An action rejection, tagged with the phase that raised it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{} failed: {error}", phase.as_str())]
pub struct ExecuteError {
    pub phase: TransitionPhase,
    pub error: ActionError,
}

impl ExecuteError {
    fn new(phase: TransitionPhase, error: ActionError) -> Self {
        Self { phase, error }
    }
}

/// The reducer driving a match.
///
/// Owns nothing: it borrows the state it mutates, so hosts keep control of
/// persistence and snapshots.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    /// Places a free starting dwelling before round play. Skips adjacency,
    /// costs, and leech; setup placements trigger none of them.
    pub fn place_setup_dwelling(
        &mut self,
        env: &GameEnv<'_>,
        player: PlayerId,
        hex: Hex,
    ) -> Result<(), ActionError> {
        let faction = self
            .state
            .player(player)
            .ok_or(ActionError::UnknownPlayer(player))?
            .faction;
        let profile = env
            .profile(faction)
            .ok_or_else(|| crate::action::missing_profile(faction))?;
        self.state
            .board
            .validate_placement(hex, player, profile.home_terrain(), 0, true)?;
        self.state
            .board
            .place_building(hex, Building::new(BuildingTier::Dwelling, faction, player))?;
        Ok(())
    }

    /// Runs one action through the full pipeline.
    ///
    /// On success the turn is advanced (or the round closed) when the
    /// action used the turn up. On error the state is as the failing phase
    /// left it; the gate and pre_validate never mutate.
    pub fn execute(
        &mut self,
        env: &GameEnv<'_>,
        action: &Action,
    ) -> Result<ActionOutcome, ExecuteError> {
        self.gate(action)
            .map_err(|error| self.reject(action, TransitionPhase::Gate, error))?;

        action
            .pre_validate(self.state, env)
            .map_err(|error| self.reject(action, TransitionPhase::PreValidate, error))?;

        let outcome = action
            .apply(self.state, env)
            .map_err(|error| self.reject(action, TransitionPhase::Apply, error))?;

        action
            .post_validate(self.state, env)
            .map_err(|error| self.reject(action, TransitionPhase::PostValidate, error))?;

        debug!(
            action = action.name(),
            actor = %action.actor(),
            ends_turn = outcome.ends_turn,
            "action applied"
        );

        if outcome.ends_turn {
            if self.state.all_passed() {
                self.state.end_round();
                debug!(round = self.state.turn.round, "round opened");
            } else {
                self.state.advance_turn();
            }
        }
        Ok(outcome)
    }

    /// Turn-order and obligation gating, before any per-action validation.
    fn gate(&self, action: &Action) -> Result<(), ActionError> {
        if self.state.is_over() {
            return Err(ActionError::GameOver);
        }
        let actor = action.actor();
        if self.state.player(actor).is_none() {
            return Err(ActionError::UnknownPlayer(actor));
        }

        if let Some(choice) = self.state.pending_choice() {
            let allowed = actor == choice.player()
                && match choice {
                    PendingChoice::LeechResponse(_) => {
                        matches!(action, Action::RespondToLeech(_))
                    }
                    PendingChoice::FavorTile { .. } => {
                        matches!(action, Action::SelectFavorTile(_))
                    }
                    PendingChoice::TownTile { .. } => {
                        matches!(action, Action::SelectTownTile(_))
                    }
                    PendingChoice::CultTop { .. } => {
                        matches!(action, Action::SelectTownCultTop(_))
                    }
                    PendingChoice::Spades { .. } => matches!(
                        action,
                        Action::TransformAndBuild(_) | Action::DiscardPendingSpades(_)
                    ),
                };
            if !allowed {
                return Err(ActionError::BlockedByPending {
                    waiting_on: choice.player(),
                });
            }
            return Ok(());
        }

        if actor != self.state.current_player() {
            return Err(ActionError::NotYourTurn(actor));
        }
        if self.state.players[&actor].has_passed {
            return Err(ActionError::AlreadyPassed(actor));
        }
        Ok(())
    }

    fn reject(&self, action: &Action, phase: TransitionPhase, error: ActionError) -> ExecuteError {
        warn!(
            action = action.name(),
            actor = %action.actor(),
            phase = phase.as_str(),
            %error,
            "action rejected"
        );
        ExecuteError::new(phase, error)
    }
}
