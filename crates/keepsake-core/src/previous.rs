//! Previous-value tracking.
//!
//! "What was this value last cycle?" has no built-in answer in a slot-based
//! runtime: by the time a cycle runs, the old value is gone. `previous` keeps
//! it in a retained cell, and defers the write-back to the commit phase so
//! that every read within one cycle sees the same previous value.

use std::cell::RefCell;
use std::rc::Rc;

use crate::runtime::{after_commit, remember, remember_with_key};

/// Returns the value passed on the previous cycle, or `None` on the first.
///
/// The cell is updated with `value` only when the current cycle commits, so
/// the update is never observable within the cycle that scheduled it.
///
/// ```rust
/// use keepsake_core::prelude::*;
///
/// let mut seen = Vec::new();
/// for value in [10, 20, 30] {
///     let _cycle = ComposeGuard::begin();
///     seen.push(previous(value));
/// }
/// assert_eq!(seen, [None, Some(10), Some(20)]);
/// ```
pub fn previous<T: Clone + 'static>(value: T) -> Option<T> {
    let cell = remember(|| RefCell::new(None::<T>));
    read_then_defer(cell, value)
}

/// Key-based variant of [`previous`], stable across conditional branches.
pub fn previous_with_key<T: Clone + 'static>(key: impl Into<String>, value: T) -> Option<T> {
    let cell = remember_with_key(format!("previous:{}", key.into()), || RefCell::new(None::<T>));
    read_then_defer(cell, value)
}

fn read_then_defer<T: Clone + 'static>(cell: Rc<RefCell<Option<T>>>, value: T) -> Option<T> {
    let out = cell.borrow().clone();
    after_commit(move || {
        *cell.borrow_mut() = Some(value);
    });
    out
}

/// [`previous_with_key`] keyed by the callsite.
#[macro_export]
macro_rules! previous {
    ($value:expr) => {
        $crate::previous::previous_with_key(
            concat!(module_path!(), ":", line!(), ":", column!()),
            $value,
        )
    };
}
