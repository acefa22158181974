//! Deep-compare effects.
//!
//! The runtime's `remember` slots compare nothing: an effect conditioned on a
//! freshly built map would naively re-run every cycle, and one conditioned on
//! an in-place-mutated value would never re-run. `deep_effect` closes that
//! gap by keeping the previous cycle's dependency sequence in a retained cell
//! and comparing structurally.

use std::cell::{Cell, RefCell};

use crate::runtime::{remember, remember_with_key};
use crate::value::{deps_changed, Deps};

/// Runs `effect` on the first cycle, and on any later cycle whose `deps`
/// differ structurally from the previous cycle's. The current `deps` are
/// stored unconditionally, so each cycle is compared against its immediate
/// predecessor.
///
/// Slot-based: the callsite must be reached unconditionally every cycle. For
/// conditional composition use [`deep_effect_with_key`] or the
/// [`deep_effect!`](crate::deep_effect!) macro.
///
/// ```rust
/// use keepsake_core::prelude::*;
///
/// let mut runs = 0;
/// for user in ["ada", "ada", "grace"] {
///     let _cycle = ComposeGuard::begin();
///     deep_effect(deps![user], || runs += 1);
/// }
/// assert_eq!(runs, 2); // first cycle, then the ada -> grace change
/// ```
pub fn deep_effect(deps: Deps, effect: impl FnOnce()) {
    let first = remember(|| Cell::new(true));
    let prev = remember(|| RefCell::new(Deps::new()));
    run_gated(&first, &prev, deps, effect);
}

/// Key-based variant of [`deep_effect`], stable across conditional branches.
pub fn deep_effect_with_key(key: impl Into<String>, deps: Deps, effect: impl FnOnce()) {
    let key = key.into();
    let first = remember_with_key(format!("deep:first:{key}"), || Cell::new(true));
    let prev = remember_with_key(format!("deep:prev:{key}"), || RefCell::new(Deps::new()));
    run_gated(&first, &prev, deps, effect);
}

fn run_gated(first: &Cell<bool>, prev: &RefCell<Deps>, deps: Deps, effect: impl FnOnce()) {
    let run = first.get() || deps_changed(&prev.borrow(), &deps);
    if run {
        effect();
    }
    first.set(false);
    *prev.borrow_mut() = deps;
}

/// [`deep_effect_with_key`] keyed by the callsite.
#[macro_export]
macro_rules! deep_effect {
    ($deps:expr, $effect:expr) => {
        $crate::effects::deep_effect_with_key(
            concat!(module_path!(), ":", line!(), ":", column!()),
            $deps,
            $effect,
        )
    };
}
