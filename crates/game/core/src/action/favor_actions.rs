//! Resolving owed favor tile picks.

use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::state::GameState;
use crate::tiles::FavorKind;

use super::{
    ActionError, ActionOutcome, ActionTransition, advance_cult, detect_towns_for, player_of,
    player_of_mut,
};

/// Takes one favor tile, owed by a freshly built temple or sanctuary.
///
/// A player never holds two copies of the same tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectFavorTile {
    pub player: PlayerId,
    pub kind: FavorKind,
}

impl ActionTransition for SelectFavorTile {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        if player.pending.favor_choices == 0 {
            return Err(ActionError::NoFavorOwed(self.player));
        }
        if player.has_favor(self.kind) {
            return Err(ActionError::FavorAlreadyHeld {
                player: self.player,
                kind: self.kind,
            });
        }
        if state.favor_pool.remaining(self.kind) == 0 {
            return Err(crate::tiles::TileError::FavorExhausted(self.kind).into());
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        state.favor_pool.take(self.kind)?;
        {
            let player = player_of_mut(state, self.player)?;
            player.pending.favor_choices -= 1;
            player.favor_tiles.push(self.kind);
        }

        // A lowered town threshold can qualify an existing group right
        // away; that town must exist before the cult advance below so the
        // advance may enter an apex on its credit.
        if self.kind.lowers_town_threshold() {
            detect_towns_for(state, env, self.player)?;
        }

        advance_cult(state, self.player, self.kind.track(), self.kind.cult_advance())?;
        Ok(ActionOutcome::FREE)
    }
}
