//! Upgrading buildings along the ladder.

use crate::board::{Building, BuildingTier, Hex};
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::state::GameState;

use super::{
    ActionError, ActionOutcome, ActionTransition, player_of, player_of_mut, profile_for,
    settle_building_change,
};

/// Replaces the player's building at `hex` with the next tier.
///
/// Temples and sanctuaries owe the player a favor tile pick, which blocks
/// play until made.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeBuilding {
    pub player: PlayerId,
    pub hex: Hex,
    pub to: BuildingTier,
}

impl UpgradeBuilding {
    fn current(&self, state: &GameState) -> Result<Building, ActionError> {
        let building = state
            .board
            .building(self.hex)
            .copied()
            .ok_or(crate::board::BoardError::Empty(self.hex))?;
        if building.owner != self.player {
            return Err(ActionError::NotYourBuilding(self.hex));
        }
        Ok(building)
    }
}

impl ActionTransition for UpgradeBuilding {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        let profile = profile_for(env, player.faction)?;
        let current = self.current(state)?;
        if !current.tier.upgrades_to(self.to) {
            return Err(ActionError::InvalidUpgrade {
                from: current.tier,
                to: self.to,
            });
        }
        let mut probe = player.resources;
        probe.spend(profile.building_cost(self.to))?;
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        let current = self.current(state)?;
        let faction = player_of(state, self.player)?.faction;
        let profile = profile_for(env, faction)?;
        let cost = profile.building_cost(self.to);

        {
            let player = player_of_mut(state, self.player)?;
            player.resources.spend(cost)?;
            if self.to == BuildingTier::TradingHouse {
                let vp: u32 = player
                    .favor_tiles
                    .iter()
                    .map(|f| f.vp_per_trading_house())
                    .sum();
                player.award_vp(vp);
            }
            if self.to.grants_favor_tile() {
                player.pending.favor_choices += 1;
            }
        }

        state
            .board
            .replace_building(self.hex, Building::new(self.to, faction, self.player))?;

        let delta = self
            .to
            .power_value()
            .saturating_sub(current.tier.power_value());
        settle_building_change(state, env, self.player, self.hex, delta)?;
        Ok(ActionOutcome::TURN)
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        match state.board.building(self.hex) {
            Some(b) if b.tier == self.to && b.owner == self.player => Ok(()),
            _ => Err(crate::error::InvariantViolation::new(format!(
                "upgrade to {:?} not present at {} after apply",
                self.to, self.hex
            ))
            .into()),
        }
    }
}
