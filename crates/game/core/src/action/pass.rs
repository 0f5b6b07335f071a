//! Passing out of the round.

use crate::board::BuildingTier;
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::state::GameState;

use super::{ActionError, ActionOutcome, ActionTransition, player_of, player_of_mut};

/// Ends the player's round. Pass order becomes next round's turn order, so
/// the first player to pass opens it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pass {
    pub player: PlayerId,
}

impl ActionTransition for Pass {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if player_of(state, self.player)?.has_passed {
            return Err(ActionError::AlreadyPassed(self.player));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        let trading_houses = state
            .board
            .player_buildings(self.player)
            .filter(|(_, b)| b.tier == BuildingTier::TradingHouse)
            .count();

        state.turn.pass_order.push(self.player);

        let player = player_of_mut(state, self.player)?;
        let pass_vp: u32 = player
            .favor_tiles
            .iter()
            .map(|f| f.pass_vp(trading_houses))
            .sum();
        player.award_vp(pass_vp);
        player.has_passed = true;
        Ok(ActionOutcome::TURN)
    }
}
