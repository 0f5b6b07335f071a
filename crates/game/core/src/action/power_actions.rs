//! The six public power action slots.
//!
//! Each slot is taken at most once per round, by any player, for bowl III
//! power. The spade slots leave pending spades behind; the turn only ends
//! once those are dug in or discarded.

use crate::board::Hex;
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::resources::Cost;
use crate::state::{GameState, PowerAction};

use super::{
    ActionError, ActionOutcome, ActionTransition, detect_towns_for, player_of, player_of_mut,
    priest_headroom,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsePowerAction {
    pub player: PlayerId,
    pub slot: PowerAction,
    /// Endpoints for the bridge slot; ignored by every other slot.
    pub bridge: Option<(Hex, Hex)>,
}

impl ActionTransition for UsePowerAction {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if state.turn.power_actions_used.contains(&self.slot) {
            return Err(ActionError::PowerActionTaken(self.slot));
        }
        let player = player_of(state, self.player)?;
        let mut probe = player.power;
        probe.spend(self.slot.cost())?;

        if self.slot == PowerAction::Bridge {
            let (a, b) = self
                .bridge
                .ok_or(ActionError::BridgeEndpointsRequired(self.slot))?;
            state.board.validate_bridge(a, b, self.player)?;
        }
        if self.slot == PowerAction::Priest && priest_headroom(state, self.player)? == 0 {
            return Err(ActionError::PriestSupplyEmpty(self.player));
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        state.turn.power_actions_used.insert(self.slot);
        player_of_mut(state, self.player)?
            .power
            .spend(self.slot.cost())?;

        match self.slot {
            PowerAction::Bridge => {
                let (a, b) = self
                    .bridge
                    .ok_or(ActionError::BridgeEndpointsRequired(self.slot))?;
                state.board.build_bridge(a, b, self.player)?;
                // A bridge can join two building groups into a town.
                detect_towns_for(state, env, self.player)?;
            }
            PowerAction::Priest => {
                player_of_mut(state, self.player)?
                    .resources
                    .receive(Cost::new(0, 0, 1));
            }
            PowerAction::TwoWorkers => {
                player_of_mut(state, self.player)?
                    .resources
                    .receive(Cost::workers(2));
            }
            PowerAction::SevenCoins => {
                player_of_mut(state, self.player)?
                    .resources
                    .receive(Cost::coins(7));
            }
            PowerAction::OneSpade | PowerAction::TwoSpades => {
                player_of_mut(state, self.player)?.pending.spades += self.slot.spades();
                // Turn continues until the spades are used or discarded.
                return Ok(ActionOutcome::FREE);
            }
        }
        Ok(ActionOutcome::TURN)
    }
}
