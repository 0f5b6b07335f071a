//! Answering leech offers.

use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::leech::LeechOffer;
use crate::state::GameState;

use super::{ActionError, ActionOutcome, ActionTransition, player_of_mut};

/// Accepts or declines the leech offer at the front of the queue.
///
/// `accept` is how much of the offered power to take; `None` declines.
/// Cost in victory points is one less than the power actually absorbed,
/// never negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RespondToLeech {
    pub player: PlayerId,
    pub accept: Option<u8>,
}

impl RespondToLeech {
    fn open_offer(&self, state: &GameState) -> Result<LeechOffer, ActionError> {
        let offer = state
            .turn
            .leech_queue
            .front()
            .copied()
            .ok_or(ActionError::NoOpenLeech(self.player))?;
        if offer.to != self.player {
            return Err(ActionError::NoOpenLeech(self.player));
        }
        Ok(offer)
    }
}

impl ActionTransition for RespondToLeech {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let offer = self.open_offer(state)?;
        if let Some(asked) = self.accept {
            if asked > offer.amount {
                return Err(ActionError::AcceptTooMuch {
                    offered: offer.amount,
                    asked,
                });
            }
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        let offer = self.open_offer(state)?;
        state.turn.leech_queue.pop_front();
        if let Some(asked) = self.accept {
            let player = player_of_mut(state, self.player)?;
            let resolution = offer.accept(asked, &mut player.power);
            player.pay_vp(resolution.vp_cost);
        }
        Ok(ActionOutcome::FREE)
    }
}
