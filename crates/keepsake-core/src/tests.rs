#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::deps;
    use crate::effects::{deep_effect, deep_effect_with_key};
    use crate::previous::{previous, previous_with_key};
    use crate::runtime::{after_commit, remember, remember_state, ComposeGuard, COMPOSER};
    use crate::value::{deps_changed, structural_eq, DepValue};

    fn reset_composer() {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            c.slots.clear();
            c.keyed_slots.clear();
            c.pending.clear();
            c.cursor = 0;
            c.cycle_active = false;
        });
    }

    /// Runs `f` inside one composition cycle; commits when the guard drops.
    fn cycle<R>(f: impl FnOnce() -> R) -> R {
        let _guard = ComposeGuard::begin();
        f()
    }

    #[test]
    fn test_deep_effect_first_cycle_runs_once() {
        reset_composer();
        let mut runs = 0;
        cycle(|| deep_effect(deps![1, "a"], || runs += 1));
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_deep_effect_skips_identical_fresh_maps() {
        reset_composer();
        let mut runs = 0;
        for _ in 0..2 {
            // A brand-new map each cycle: same keys, same order, same values.
            let d = deps![DepValue::map([("a", 1), ("b", 2)])];
            cycle(|| deep_effect(d, || runs += 1));
        }
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_deep_effect_runs_on_structural_change() {
        reset_composer();
        let mut runs = 0;
        for v in [1, 2] {
            let d = deps![DepValue::map([("a", v)])];
            cycle(|| deep_effect(d, || runs += 1));
        }
        assert_eq!(runs, 2);
    }

    #[test]
    fn test_deep_effect_ignores_map_key_order() {
        reset_composer();
        let mut runs = 0;
        let cycles = [
            deps![DepValue::map([("a", 1), ("b", 2)])],
            deps![DepValue::map([("b", 2), ("a", 1)])],
        ];
        for d in cycles {
            cycle(|| deep_effect(d, || runs += 1));
        }
        // Maps compare as key sets, so reordering alone never re-fires.
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_deep_effect_length_change_counts_as_changed() {
        reset_composer();
        let mut runs = 0;
        for d in [deps![1], deps![1, 2], deps![1]] {
            cycle(|| deep_effect(d, || runs += 1));
        }
        assert_eq!(runs, 3);
    }

    #[test]
    fn test_deep_effect_empty_deps_run_first_cycle_only() {
        reset_composer();
        let mut runs = 0;
        for _ in 0..3 {
            cycle(|| deep_effect(deps![], || runs += 1));
        }
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_deep_effect_opaque_deps_always_refire() {
        reset_composer();
        struct Handler;
        let mut runs = 0;
        for _ in 0..3 {
            cycle(|| deep_effect(deps![DepValue::opaque(Handler)], || runs += 1));
        }
        assert_eq!(runs, 3);
    }

    #[test]
    fn test_keyed_deep_effect_survives_slot_reordering() {
        reset_composer();
        let mut runs = 0;
        cycle(|| deep_effect_with_key("fx", deps![1], || runs += 1));
        cycle(|| {
            // An extra order-based slot appears before the keyed hook.
            let _extra = remember_state(|| 0usize);
            deep_effect_with_key("fx", deps![1], || runs += 1);
        });
        assert_eq!(runs, 1);
    }

    #[test]
    fn test_previous_first_cycle_is_none() {
        reset_composer();
        assert_eq!(cycle(|| previous(42)), None);
    }

    #[test]
    fn test_previous_lags_by_one_cycle() {
        reset_composer();
        let mut seen = Vec::new();
        for value in [10, 20, 30] {
            seen.push(cycle(|| previous(value)));
        }
        assert_eq!(seen, [None, Some(10), Some(20)]);
    }

    #[test]
    fn test_previous_stable_within_cycle() {
        reset_composer();
        let (a, b) = cycle(|| (previous_with_key("k", 10), previous_with_key("k", 10)));
        assert_eq!((a, b), (None, None));
        let (a, b) = cycle(|| (previous_with_key("k", 20), previous_with_key("k", 20)));
        // Both reads see cycle 1's value; the write to 20 lands at commit.
        assert_eq!((a, b), (Some(10), Some(10)));
        let (a, _) = cycle(|| (previous_with_key("k", 30), previous_with_key("k", 30)));
        assert_eq!(a, Some(20));
    }

    #[test]
    fn test_previous_accepts_none_values() {
        reset_composer();
        let a = cycle(|| previous(None::<i32>));
        let b = cycle(|| previous(Some(7)));
        assert_eq!(a, None);
        assert_eq!(b, Some(None));
    }

    #[test]
    fn test_callsite_macros_are_stable_across_cycles() {
        reset_composer();
        let mut runs = 0;
        for i in [1, 1, 2] {
            cycle(|| crate::deep_effect!(deps![i], || runs += 1));
        }
        assert_eq!(runs, 2);

        let mut seen = Vec::new();
        for v in ["x", "y"] {
            seen.push(cycle(|| crate::previous!(v)));
        }
        assert_eq!(seen, [None, Some("x")]);
    }

    #[test]
    fn test_remember_persists_across_cycles() {
        reset_composer();
        for expected in 1..=3 {
            cycle(|| {
                let count = remember_state(|| 0);
                *count.borrow_mut() += 1;
                assert_eq!(*count.borrow(), expected);
            });
        }
    }

    #[test]
    fn test_remember_slot_type_mismatch_replaces() {
        reset_composer();
        cycle(|| {
            let v = remember(|| 42i32);
            assert_eq!(*v, 42);
        });
        cycle(|| {
            // Same slot, different type: warn and replace.
            let v = remember(|| String::from("fresh"));
            assert_eq!(*v, "fresh");
        });
    }

    #[test]
    fn test_after_commit_defers_until_guard_drops() {
        reset_composer();
        let hit = Rc::new(RefCell::new(false));
        {
            let _guard = ComposeGuard::begin();
            let h = hit.clone();
            after_commit(move || *h.borrow_mut() = true);
            assert!(!*hit.borrow());
        }
        assert!(*hit.borrow());
    }

    #[test]
    fn test_after_commit_outside_cycle_applies_immediately() {
        reset_composer();
        let hit = Rc::new(RefCell::new(false));
        let h = hit.clone();
        after_commit(move || *h.borrow_mut() = true);
        assert!(*hit.borrow());
    }

    #[test]
    fn test_structural_eq_nested() {
        let a = DepValue::map([
            ("items", DepValue::from(vec![1, 2, 3])),
            ("meta", DepValue::map([("page", 1)])),
        ]);
        let b = DepValue::map([
            ("meta", DepValue::map([("page", 1)])),
            ("items", DepValue::from(vec![1, 2, 3])),
        ]);
        assert!(structural_eq(&a, &b));

        let c = DepValue::map([
            ("items", DepValue::from(vec![1, 2, 4])),
            ("meta", DepValue::map([("page", 1)])),
        ]);
        assert!(!structural_eq(&a, &c));
    }

    #[test]
    fn test_structural_eq_atomics() {
        assert!(structural_eq(&DepValue::Null, &DepValue::Null));
        assert!(!structural_eq(&DepValue::Int(1), &DepValue::Float(1.0)));
        assert!(!structural_eq(&DepValue::from("1"), &DepValue::Int(1)));
        // NaN is stable: a NaN dep must not re-fire every cycle.
        assert!(structural_eq(
            &DepValue::Float(f64::NAN),
            &DepValue::Float(f64::NAN)
        ));
        assert!(!structural_eq(&DepValue::Float(0.5), &DepValue::Float(0.25)));
    }

    #[test]
    fn test_deps_changed_policies() {
        let a = deps![1, "x"];
        let b = deps![1, "x"];
        assert!(!deps_changed(&a, &b));
        assert!(deps_changed(&a, &deps![1]));
        assert!(deps_changed(&a, &deps![1, "x", 2]));
        assert!(deps_changed(&a, &deps![2, "x"]));
        let opaque = deps![DepValue::opaque(0u8)];
        assert!(deps_changed(&opaque, &opaque.clone()));
    }
}
