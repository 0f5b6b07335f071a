//! Priests on the cult tracks, and the cult favor's special action.

use crate::cult::CultTrack;
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::resources::{Cost, Resource, ResourceShortfall};
use crate::state::GameState;

use super::{
    ActionError, ActionOutcome, ActionTransition, advance_cult, player_of, player_of_mut,
};

/// How a priest is committed to a track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriestCommitment {
    /// Parks the priest on an open action space, worth 2 or 3 steps. The
    /// priest never comes back.
    Space { steps: u8 },
    /// Gives the priest up for a single step without occupying a space.
    Sacrifice,
}

/// Sends one priest to a cult track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SendPriest {
    pub player: PlayerId,
    pub track: CultTrack,
    pub commitment: PriestCommitment,
}

impl ActionTransition for SendPriest {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        if player.resources.priests == 0 {
            return Err(ResourceShortfall {
                resource: Resource::Priests,
                needed: 1,
                available: 0,
            }
            .into());
        }
        if let PriestCommitment::Space { steps } = self.commitment {
            state.cults.space_available(self.track, steps)?;
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        player_of_mut(state, self.player)?
            .resources
            .spend(Cost::new(0, 0, 1))?;
        let steps = match self.commitment {
            PriestCommitment::Space { steps } => {
                state.cults.take_priest_space(self.player, self.track, steps)?
            }
            PriestCommitment::Sacrifice => 1,
        };
        advance_cult(state, self.player, self.track, steps)?;
        Ok(ActionOutcome::TURN)
    }
}

/// The once-per-round special action granted by the cult favor tile:
/// advance one step on a chosen track.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseCultAction {
    pub player: PlayerId,
    pub track: CultTrack,
}

impl ActionTransition for UseCultAction {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        if !player.favor_tiles.iter().any(|f| f.grants_cult_action()) {
            return Err(ActionError::NoCultAction(self.player));
        }
        if state.turn.cult_actions_used.contains(&self.player) {
            return Err(ActionError::CultActionTaken);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        state.turn.cult_actions_used.insert(self.player);
        advance_cult(state, self.player, self.track, 1)?;
        Ok(ActionOutcome::TURN)
    }
}
