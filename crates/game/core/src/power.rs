//! The three-bowl power cycle.
//!
//! Power tokens move, never mint: gains promote tokens I -> II -> III,
//! spending demotes III -> I, and burning destroys bowl II tokens to promote
//! their pair. The pool total only changes through [`PowerPool::burn`].

/// A player's power tokens split across the three bowls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerPool {
    bowl1: u8,
    bowl2: u8,
    bowl3: u8,
}

/// Errors raised by power spending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PowerError {
    #[error("need {needed} power in bowl three, have {available}")]
    NotCharged { needed: u8, available: u8 },

    #[error("need {needed} power in bowl two to burn, have {available}")]
    NotBurnable { needed: u8, available: u8 },
}

impl PowerPool {
    pub const fn new(bowl1: u8, bowl2: u8, bowl3: u8) -> Self {
        Self {
            bowl1,
            bowl2,
            bowl3,
        }
    }

    pub const fn bowl1(&self) -> u8 {
        self.bowl1
    }

    pub const fn bowl2(&self) -> u8 {
        self.bowl2
    }

    /// Power ready to spend.
    pub const fn bowl3(&self) -> u8 {
        self.bowl3
    }

    pub const fn total(&self) -> u8 {
        self.bowl1 + self.bowl2 + self.bowl3
    }

    /// Power ready to spend right now.
    pub const fn spendable(&self) -> u8 {
        self.bowl3
    }

    /// Extra spendable power a full burn of bowl II would produce.
    pub const fn burnable_gain(&self) -> u8 {
        self.bowl2 / 2
    }

    /// Greatest amount a single gain could still move.
    pub const fn capacity(&self) -> u8 {
        // Each bowl I token takes two promotions, each bowl II token one.
        self.bowl1 * 2 + self.bowl2
    }

    /// Gains up to `amount` power and returns how much actually moved.
    ///
    /// Promotes from bowl I into II first; any remainder promotes II into
    /// III, bounded by what bowl II held before this gain finishes.
    pub fn gain(&mut self, amount: u8) -> u8 {
        let from_one = amount.min(self.bowl1);
        self.bowl1 -= from_one;
        self.bowl2 += from_one;

        let from_two = (amount - from_one).min(self.bowl2);
        self.bowl2 -= from_two;
        self.bowl3 += from_two;

        from_one + from_two
    }

    /// Spends `amount` from bowl III, returning the tokens to bowl I.
    pub fn spend(&mut self, amount: u8) -> Result<(), PowerError> {
        if self.bowl3 < amount {
            return Err(PowerError::NotCharged {
                needed: amount,
                available: self.bowl3,
            });
        }
        self.bowl3 -= amount;
        self.bowl1 += amount;
        Ok(())
    }

    /// Burns `amount` power: removes `amount` tokens from bowl II for good
    /// and promotes another `amount` from II straight to III.
    pub fn burn(&mut self, amount: u8) -> Result<(), PowerError> {
        let needed = amount.saturating_mul(2);
        if self.bowl2 < needed {
            return Err(PowerError::NotBurnable {
                needed,
                available: self.bowl2,
            });
        }
        self.bowl2 -= needed;
        self.bowl3 += amount;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_fills_bowl_two_before_bowl_three() {
        let mut pool = PowerPool::new(5, 7, 0);
        assert_eq!(pool.gain(3), 3);
        assert_eq!((pool.bowl1(), pool.bowl2(), pool.bowl3()), (2, 10, 0));

        assert_eq!(pool.gain(4), 4);
        assert_eq!((pool.bowl1(), pool.bowl2(), pool.bowl3()), (0, 10, 2));
    }

    #[test]
    fn gain_shortfall_promotion_is_bounded_by_bowl_two() {
        let mut pool = PowerPool::new(1, 2, 0);
        // One token promotes I -> II (bowl II becomes 3), then at most
        // three promote II -> III.
        assert_eq!(pool.gain(10), 4);
        assert_eq!((pool.bowl1(), pool.bowl2(), pool.bowl3()), (0, 0, 3));
    }

    #[test]
    fn gain_on_fully_charged_pool_moves_nothing() {
        let mut pool = PowerPool::new(0, 0, 12);
        assert_eq!(pool.gain(5), 0);
        assert_eq!(pool.bowl3(), 12);
    }

    #[test]
    fn spend_returns_tokens_to_bowl_one() {
        let mut pool = PowerPool::new(0, 0, 4);
        pool.spend(3).unwrap();
        assert_eq!((pool.bowl1(), pool.bowl2(), pool.bowl3()), (3, 0, 1));

        let err = pool.spend(2).unwrap_err();
        assert_eq!(
            err,
            PowerError::NotCharged {
                needed: 2,
                available: 1
            }
        );
    }

    #[test]
    fn burn_trades_two_for_one_and_shrinks_the_pool() {
        let mut pool = PowerPool::new(0, 6, 0);
        pool.burn(2).unwrap();
        assert_eq!((pool.bowl1(), pool.bowl2(), pool.bowl3()), (0, 2, 2));
        assert_eq!(pool.total(), 4);

        let err = pool.burn(2).unwrap_err();
        assert_eq!(
            err,
            PowerError::NotBurnable {
                needed: 4,
                available: 2
            }
        );
    }

    #[test]
    fn capacity_tracks_remaining_promotions() {
        assert_eq!(PowerPool::new(5, 7, 0).capacity(), 17);
        assert_eq!(PowerPool::new(0, 3, 9).capacity(), 3);
        assert_eq!(PowerPool::new(0, 0, 12).capacity(), 0);
    }
}
