//! Coins, workers, and priests.

use core::fmt;

/// Priests a player owns in total, on hand and parked on cult spaces.
pub const PRIEST_SUPPLY: u8 = 7;

/// A basic resource kind, used in error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resource {
    Coins,
    Workers,
    Priests,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Coins => "coins",
            Resource::Workers => "workers",
            Resource::Priests => "priests",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("need {needed} {resource}, have {available}")]
pub struct ResourceShortfall {
    pub resource: Resource,
    pub needed: u8,
    pub available: u8,
}

/// A price expressed in basic resources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost {
    pub coins: u8,
    pub workers: u8,
    pub priests: u8,
}

impl Cost {
    pub const FREE: Self = Self::new(0, 0, 0);

    pub const fn new(coins: u8, workers: u8, priests: u8) -> Self {
        Self {
            coins,
            workers,
            priests,
        }
    }

    pub const fn coins(amount: u8) -> Self {
        Self::new(amount, 0, 0)
    }

    pub const fn workers(amount: u8) -> Self {
        Self::new(0, amount, 0)
    }
}

/// A player's stock of basic resources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub coins: u8,
    pub workers: u8,
    pub priests: u8,
}

impl ResourcePool {
    pub const fn new(coins: u8, workers: u8, priests: u8) -> Self {
        Self {
            coins,
            workers,
            priests,
        }
    }

    pub fn can_afford(&self, cost: Cost) -> bool {
        self.coins >= cost.coins && self.workers >= cost.workers && self.priests >= cost.priests
    }

    /// Deducts `cost`, or reports the first shortfall without mutating.
    pub fn spend(&mut self, cost: Cost) -> Result<(), ResourceShortfall> {
        if self.coins < cost.coins {
            return Err(ResourceShortfall {
                resource: Resource::Coins,
                needed: cost.coins,
                available: self.coins,
            });
        }
        if self.workers < cost.workers {
            return Err(ResourceShortfall {
                resource: Resource::Workers,
                needed: cost.workers,
                available: self.workers,
            });
        }
        if self.priests < cost.priests {
            return Err(ResourceShortfall {
                resource: Resource::Priests,
                needed: cost.priests,
                available: self.priests,
            });
        }
        self.coins -= cost.coins;
        self.workers -= cost.workers;
        self.priests -= cost.priests;
        Ok(())
    }

    pub fn receive(&mut self, cost: Cost) {
        self.coins = self.coins.saturating_add(cost.coins);
        self.workers = self.workers.saturating_add(cost.workers);
        self.priests = self.priests.saturating_add(cost.priests);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_is_atomic_on_shortfall() {
        let mut pool = ResourcePool::new(5, 1, 0);
        let err = pool.spend(Cost::new(3, 2, 0)).unwrap_err();
        assert_eq!(err.resource, Resource::Workers);
        // Nothing was deducted.
        assert_eq!(pool, ResourcePool::new(5, 1, 0));
    }

    #[test]
    fn spend_and_receive_round_trip() {
        let mut pool = ResourcePool::new(8, 4, 1);
        pool.spend(Cost::new(6, 2, 0)).unwrap();
        assert_eq!(pool, ResourcePool::new(2, 2, 1));
        pool.receive(Cost::new(0, 0, 1));
        assert_eq!(pool.priests, 2);
    }
}
