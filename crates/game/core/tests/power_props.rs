//! Property checks for the power cycle.

use proptest::prelude::*;
use riverlands_core::PowerPool;

fn pools() -> impl Strategy<Value = PowerPool> {
    (0u8..=12, 0u8..=12, 0u8..=12).prop_map(|(b1, b2, b3)| PowerPool::new(b1, b2, b3))
}

proptest! {
    #[test]
    fn gain_conserves_tokens_and_reports_moved(mut pool in pools(), amount in 0u8..=30) {
        let total = pool.total();
        let capacity = pool.capacity();
        let moved = pool.gain(amount);

        prop_assert_eq!(pool.total(), total);
        prop_assert!(moved <= amount);
        prop_assert_eq!(pool.capacity(), capacity - moved);
    }

    #[test]
    fn spend_conserves_tokens_or_rejects(mut pool in pools(), amount in 0u8..=15) {
        let before = pool;
        match pool.spend(amount) {
            Ok(()) => {
                prop_assert_eq!(pool.total(), before.total());
                prop_assert_eq!(pool.bowl3(), before.bowl3() - amount);
                prop_assert_eq!(pool.bowl1(), before.bowl1() + amount);
            }
            Err(_) => prop_assert_eq!(pool, before),
        }
    }

    #[test]
    fn burn_destroys_exactly_the_burned_tokens(mut pool in pools(), amount in 0u8..=10) {
        let before = pool;
        match pool.burn(amount) {
            Ok(()) => {
                prop_assert_eq!(pool.total(), before.total() - amount);
                prop_assert_eq!(pool.bowl3(), before.bowl3() + amount);
            }
            Err(_) => prop_assert_eq!(pool, before),
        }
    }

    #[test]
    fn repeated_gains_eventually_charge_everything(mut pool in pools()) {
        // No gain sequence can exceed the pool's promotion capacity.
        let mut moved_total = 0u32;
        for _ in 0..40 {
            moved_total += u32::from(pool.gain(1));
        }
        prop_assert_eq!(pool.capacity(), 0);
        prop_assert_eq!(pool.bowl3(), pool.total());
        prop_assert!(moved_total <= 36);
    }
}
