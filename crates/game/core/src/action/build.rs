//! Placing dwellings and terraforming.

use crate::board::{Building, BuildingTier, Hex, TerrainKind};
use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::resources::Cost;
use crate::state::GameState;

use super::{
    ActionError, ActionOutcome, ActionTransition, detect_towns_for, player_of, player_of_mut,
    profile_for, settle_building_change,
};

/// Builds a dwelling on a hex already showing the faction's home terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildDwelling {
    pub player: PlayerId,
    pub hex: Hex,
}

impl ActionTransition for BuildDwelling {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        let profile = profile_for(env, player.faction)?;
        state.board.validate_placement(
            self.hex,
            self.player,
            profile.home_terrain(),
            player.shipping,
            false,
        )?;
        let cost = profile.building_cost(BuildingTier::Dwelling);
        if !player.resources.can_afford(cost) {
            // Re-run spend on a copy to name the short resource.
            let mut probe = player.resources;
            probe.spend(cost)?;
        }
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        let faction = player_of(state, self.player)?.faction;
        let profile = profile_for(env, faction)?;
        let cost = profile.building_cost(BuildingTier::Dwelling);

        {
            let player = player_of_mut(state, self.player)?;
            player.resources.spend(cost)?;
            let dwelling_vp: u32 = player
                .favor_tiles
                .iter()
                .map(|f| f.vp_per_dwelling())
                .sum();
            player.award_vp(dwelling_vp);
        }
        state.board.place_building(
            self.hex,
            Building::new(BuildingTier::Dwelling, faction, self.player),
        )?;

        settle_building_change(
            state,
            env,
            self.player,
            self.hex,
            BuildingTier::Dwelling.power_value(),
        )?;
        Ok(ActionOutcome::TURN)
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        match state.board.building(self.hex) {
            Some(b) if b.owner == self.player => Ok(()),
            _ => Err(crate::error::InvariantViolation::new(format!(
                "dwelling missing at {} after build",
                self.hex
            ))
            .into()),
        }
    }
}

/// Terraforms a hex toward the faction's home terrain, optionally building
/// a dwelling on it in the same action.
///
/// Spades come from the player's pending stock first (bought from power
/// actions); the remainder is paid in workers at the faction's per-spade
/// rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransformAndBuild {
    pub player: PlayerId,
    pub hex: Hex,
    pub target: TerrainKind,
    pub build: bool,
}

impl TransformAndBuild {
    /// Spades the transform needs, workers the shortfall costs, and the
    /// dwelling cost if building.
    fn price(
        &self,
        state: &GameState,
        env: &GameEnv<'_>,
    ) -> Result<(u8, Cost, Cost), ActionError> {
        let player = player_of(state, self.player)?;
        let profile = profile_for(env, player.faction)?;

        let map_hex = self
            .hex_on_board(state)?;
        let needed = map_hex
            .terrain
            .spade_distance(self.target)
            .ok_or(crate::board::BoardError::RiverHex(self.hex))?;
        if needed == 0 {
            return Err(crate::board::BoardError::TerrainUnchanged(self.hex, self.target).into());
        }

        let from_pending = needed.min(player.pending.spades);
        let paid_spades = needed - from_pending;
        let worker_cost = Cost::workers(paid_spades * profile.workers_per_spade(player.digging));
        let build_cost = if self.build {
            profile.building_cost(BuildingTier::Dwelling)
        } else {
            Cost::FREE
        };
        Ok((from_pending, worker_cost, build_cost))
    }

    fn hex_on_board<'s>(
        &self,
        state: &'s GameState,
    ) -> Result<&'s crate::board::MapHex, ActionError> {
        state
            .board
            .hex(self.hex)
            .ok_or_else(|| crate::board::BoardError::UnknownHex(self.hex).into())
    }
}

impl ActionTransition for TransformAndBuild {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        let profile = profile_for(env, player.faction)?;

        let map_hex = self.hex_on_board(state)?;
        if map_hex.building.is_some() {
            return Err(crate::board::BoardError::Occupied(self.hex).into());
        }
        if !state
            .board
            .reachable_from_buildings(self.hex, self.player, player.shipping)
        {
            return Err(crate::board::BoardError::NotReachable(self.hex).into());
        }
        if self.build && self.target != profile.home_terrain() {
            return Err(crate::board::BoardError::WrongTerrain {
                hex: self.hex,
                found: self.target,
                needed: profile.home_terrain(),
            }
            .into());
        }

        let (_, worker_cost, build_cost) = self.price(state, env)?;
        let mut probe = player.resources;
        probe.spend(worker_cost)?;
        probe.spend(build_cost)?;
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        let (from_pending, worker_cost, build_cost) = self.price(state, env)?;
        let faction = player_of(state, self.player)?.faction;

        {
            let player = player_of_mut(state, self.player)?;
            player.pending.spades -= from_pending;
            player.resources.spend(worker_cost)?;
        }
        state.board.transform_terrain(self.hex, self.target)?;

        if self.build {
            {
                let player = player_of_mut(state, self.player)?;
                player.resources.spend(build_cost)?;
                let dwelling_vp: u32 = player
                    .favor_tiles
                    .iter()
                    .map(|f| f.vp_per_dwelling())
                    .sum();
                player.award_vp(dwelling_vp);
            }
            state.board.place_building(
                self.hex,
                Building::new(BuildingTier::Dwelling, faction, self.player),
            )?;
            settle_building_change(
                state,
                env,
                self.player,
                self.hex,
                BuildingTier::Dwelling.power_value(),
            )?;
        }
        Ok(ActionOutcome::TURN)
    }
}

/// Places a bridge between two of the player's shores, paid in resources.
///
/// Only factions whose profile prices bridges directly may take this; the
/// public power action covers everyone else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildBridge {
    pub player: PlayerId,
    pub a: Hex,
    pub b: Hex,
}

impl ActionTransition for BuildBridge {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        let player = player_of(state, self.player)?;
        let profile = profile_for(env, player.faction)?;
        let cost = profile.bridge_cost().ok_or(ActionError::NoBridgeAbility)?;
        state.board.validate_bridge(self.a, self.b, self.player)?;
        let mut probe = player.resources;
        probe.spend(cost)?;
        Ok(())
    }

    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<ActionOutcome, ActionError> {
        let faction = player_of(state, self.player)?.faction;
        let profile = profile_for(env, faction)?;
        let cost = profile.bridge_cost().ok_or(ActionError::NoBridgeAbility)?;
        player_of_mut(state, self.player)?.resources.spend(cost)?;
        state.board.build_bridge(self.a, self.b, self.player)?;
        // A bridge can join two building groups into a town.
        detect_towns_for(state, env, self.player)?;
        Ok(ActionOutcome::TURN)
    }
}

/// Gives up spades bought from a power action instead of digging with them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscardPendingSpades {
    pub player: PlayerId,
}

impl ActionTransition for DiscardPendingSpades {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if player_of(state, self.player)?.pending.spades == 0 {
            return Err(ActionError::NoPendingSpades(self.player));
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        player_of_mut(state, self.player)?.pending.spades = 0;
        Ok(ActionOutcome::TURN)
    }
}
