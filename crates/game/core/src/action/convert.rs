//! Free resource conversions.
//!
//! Conversions never use up the turn; a player may chain any number of
//! them before their real action.

use crate::faction::GameEnv;
use crate::ids::PlayerId;
use crate::resources::Cost;
use crate::state::GameState;

use super::{
    ActionError, ActionOutcome, ActionTransition, player_of, player_of_mut, priest_headroom,
};

/// Exchange rates, power side always from bowl III.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Conversion {
    /// 1 power -> 1 coin, `amount` times.
    PowerToCoins { amount: u8 },
    /// 3 power -> 1 worker, `amount` workers.
    PowerToWorkers { amount: u8 },
    /// 5 power -> 1 priest.
    PowerToPriest,
    /// 1 priest -> 1 worker, `amount` times.
    PriestsToWorkers { amount: u8 },
    /// 1 worker -> 1 coin, `amount` times.
    WorkersToCoins { amount: u8 },
    /// Charges `amount` tokens into bowl III by destroying as many from bowl II.
    BurnPower { amount: u8 },
}

impl Conversion {
    /// Power from bowl III this conversion needs.
    fn power_cost(self) -> u8 {
        match self {
            Conversion::PowerToCoins { amount } => amount,
            Conversion::PowerToWorkers { amount } => amount.saturating_mul(3),
            Conversion::PowerToPriest => 5,
            _ => 0,
        }
    }

    fn resource_cost(self) -> Cost {
        match self {
            Conversion::PriestsToWorkers { amount } => Cost::new(0, 0, amount),
            Conversion::WorkersToCoins { amount } => Cost::workers(amount),
            _ => Cost::FREE,
        }
    }

    fn yield_(self) -> Cost {
        match self {
            Conversion::PowerToCoins { amount } => Cost::coins(amount),
            Conversion::PowerToWorkers { amount } => Cost::workers(amount),
            Conversion::PowerToPriest => Cost::new(0, 0, 1),
            Conversion::PriestsToWorkers { amount } => Cost::workers(amount),
            Conversion::WorkersToCoins { amount } => Cost::coins(amount),
            Conversion::BurnPower { .. } => Cost::FREE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Convert {
    pub player: PlayerId,
    pub conversion: Conversion,
}

impl ActionTransition for Convert {
    fn actor(&self) -> PlayerId {
        self.player
    }

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), ActionError> {
        if self.conversion == Conversion::PowerToPriest && priest_headroom(state, self.player)? == 0
        {
            return Err(ActionError::PriestSupplyEmpty(self.player));
        }
        let player = player_of(state, self.player)?;
        let mut power = player.power;
        if let Conversion::BurnPower { amount } = self.conversion {
            power.burn(amount)?;
        }
        power.spend(self.conversion.power_cost())?;
        let mut resources = player.resources;
        resources.spend(self.conversion.resource_cost())?;
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _env: &GameEnv<'_>,
    ) -> Result<ActionOutcome, ActionError> {
        let player = player_of_mut(state, self.player)?;
        if let Conversion::BurnPower { amount } = self.conversion {
            player.power.burn(amount)?;
        }
        player.power.spend(self.conversion.power_cost())?;
        player.resources.spend(self.conversion.resource_cost())?;
        player.resources.receive(self.conversion.yield_());
        Ok(ActionOutcome::FREE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burn_charges_one_per_two_destroyed() {
        let conversion = Conversion::BurnPower { amount: 2 };
        assert_eq!(conversion.power_cost(), 0);
        assert_eq!(conversion.yield_(), Cost::FREE);

        let mut pool = crate::power::PowerPool::new(0, 6, 0);
        pool.burn(2).unwrap();
        assert_eq!(pool.bowl3(), 2);
        assert_eq!(pool.total(), 4);
    }

    #[test]
    fn worker_to_coin_is_one_for_one() {
        let conversion = Conversion::WorkersToCoins { amount: 3 };
        assert_eq!(conversion.resource_cost(), Cost::workers(3));
        assert_eq!(conversion.yield_(), Cost::coins(3));
    }
}
