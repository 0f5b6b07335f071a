//! Raising the shipping and digging tracks.

use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::state::GameState;

use super::{ActionError, ActionOutcome, ActionTransition, player_of, player_of_mut, profile_for};

/// Raises shipping by one level.
///
/// Factions with special movement never ship and cannot take this action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeShipping {
    pub player: PlayerId,
}

impl ActionTransition for UpgradeShipping {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        let profile = profile_for(env, player.faction)?;
        if profile.special_movement().is_some() {
            return Err(ActionError::NoShipping);
        }
        if player.shipping >= profile.max_shipping() {
            return Err(ActionError::ShippingAtMax);
        }
        let mut probe = player.resources;
        probe.spend(profile.shipping_upgrade_cost(player.shipping + 1))?;
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        let faction = player_of(state, self.player)?.faction;
        let profile = profile_for(env, faction)?;
        let player = player_of_mut(state, self.player)?;
        let level = player.shipping + 1;
        player.resources.spend(profile.shipping_upgrade_cost(level))?;
        player.shipping = level;
        player.award_vp(u32::from(level) + 1);
        Ok(ActionOutcome::TURN)
    }
}

/// Raises digging by one level, cheapening every future spade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeDigging {
    pub player: PlayerId,
}

impl ActionTransition for UpgradeDigging {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        let profile = profile_for(env, player.faction)?;
        if player.digging >= profile.max_digging() {
            return Err(ActionError::DiggingAtMax);
        }
        let mut probe = player.resources;
        probe.spend(profile.digging_upgrade_cost(player.digging + 1))?;
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        let faction = player_of(state, self.player)?.faction;
        let profile = profile_for(env, faction)?;
        let player = player_of_mut(state, self.player)?;
        let level = player.digging + 1;
        player.resources.spend(profile.digging_upgrade_cost(level))?;
        player.digging = level;
        player.award_vp(6);
        Ok(ActionOutcome::TURN)
    }
}
