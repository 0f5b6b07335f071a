//! Claiming formed towns.

use crate::cult::CultTrack;
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::state::GameState;
use crate::tiles::TownTileKind;

use super::{
    ActionError, ActionOutcome, ActionTransition, advance_cult, grant_town_tile, player_of,
    player_of_mut,
};

fn check_stock(state: &GameState, kind: TownTileKind) -> Result<(), ActionError> {
    if state.town_pool.remaining(kind) == 0 {
        return Err(crate::tiles::TileError::TownExhausted(kind).into());
    }
    Ok(())
}

/// Chooses the tile for the oldest blocking town formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectTownTile {
    pub player: PlayerId,
    pub kind: TownTileKind,
}

impl ActionTransition for SelectTownTile {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if player_of(state, self.player)?.pending.towns.is_empty() {
            return Err(ActionError::NoTownPending(self.player));
        }
        check_stock(state, self.kind)
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        let candidate = {
            let pending = &mut player_of_mut(state, self.player)?.pending;
            if pending.towns.is_empty() {
                return Err(ActionError::NoTownPending(self.player));
            }
            pending.towns.remove(0)
        };
        state.town_pool.take(self.kind)?;
        grant_town_tile(state, self.player, &candidate, self.kind)?;
        Ok(ActionOutcome::FREE)
    }
}

/// Claims a town that was joined over a river, whenever its owner likes.
///
/// `index` picks among the player's delayed formations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClaimDelayedTown {
    pub player: PlayerId,
    pub index: usize,
    pub kind: TownTileKind,
}

impl ActionTransition for ClaimDelayedTown {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if self.index >= player_of(state, self.player)?.pending.delayed_towns.len() {
            return Err(ActionError::NoDelayedTown(self.player));
        }
        check_stock(state, self.kind)
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        let candidate = {
            let pending = &mut player_of_mut(state, self.player)?.pending;
            if self.index >= pending.delayed_towns.len() {
                return Err(ActionError::NoDelayedTown(self.player));
            }
            pending.delayed_towns.remove(self.index)
        };
        state.town_pool.take(self.kind)?;
        grant_town_tile(state, self.player, &candidate, self.kind)?;
        Ok(ActionOutcome::FREE)
    }
}

/// Orders the all-track cult advance owed by a claimed town tile.
///
/// Tracks advance in the given order and keys run out in that order, so
/// the order decides which apexes the player enters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectTownCultTop {
    pub player: PlayerId,
    pub order: [CultTrack; CultTrack::COUNT],
}

impl ActionTransition for SelectTownCultTop {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if player_of(state, self.player)?.pending.cult_top_steps.is_none() {
            return Err(ActionError::NoCultTopPending(self.player));
        }
        let mut seen = [false; CultTrack::COUNT];
        for track in self.order {
            seen[track.index()] = true;
        }
        if seen.contains(&false) {
            return Err(ActionError::BadCultTopOrder);
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        let steps = player_of_mut(state, self.player)?
            .pending
            .cult_top_steps
            .take()
            .ok_or(ActionError::NoCultTopPending(self.player))?;
        for track in self.order {
            advance_cult(state, self.player, track, steps)?;
        }
        Ok(ActionOutcome::FREE)
    }
}
