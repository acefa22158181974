//! # Retained-slot hooks
//!
//! Keepsake provides two hooks for slot-based composition runtimes, plus the
//! minimal runtime they run on:
//!
//! - `deep_effect` — run a callback only when its dependencies are
//!   *structurally* different from the previous cycle, not merely a fresh
//!   allocation.
//! - `previous` — read the value a variable had on the previous cycle.
//!
//! Both exist because slot runtimes compare dependencies by identity or not
//! at all: an effect keyed on a freshly built map re-fires every cycle, and
//! nothing remembers last cycle's value for you.
//!
//! ## Cycles
//!
//! A "cycle" is one composition pass, bracketed by a [`ComposeGuard`]:
//!
//! ```rust
//! use keepsake_core::prelude::*;
//!
//! let mut runs = 0;
//! for _ in 0..3 {
//!     let _cycle = ComposeGuard::begin();
//!     // a fresh map every cycle, structurally identical
//!     deep_effect(deps![DepValue::map([("page", 1), ("size", 50)])], || runs += 1);
//! }
//! assert_eq!(runs, 1);
//! ```
//!
//! Retained cells created with `remember*` keep their values across cycles;
//! writes queued with [`after_commit`] become visible only once the guard
//! drops. That deferral is what makes `previous` stable within a cycle:
//!
//! ```rust
//! use keepsake_core::prelude::*;
//!
//! let mut seen = Vec::new();
//! for value in [10, 20, 30] {
//!     let _cycle = ComposeGuard::begin();
//!     seen.push(previous(value));
//! }
//! assert_eq!(seen, [None, Some(10), Some(20)]);
//! ```
//!
//! ## Order-based vs key-based
//!
//! Like `remember`, the plain hooks are order-based: the Nth hook call in a
//! cycle always refers to the Nth slot. Under conditional composition use
//! the `_with_key` variants, or the [`deep_effect!`] / [`previous!`] macros
//! which bake the callsite into the key.
//!
//! ## Equality
//!
//! Dependencies are [`DepValue`]s compared by recursive structural equality:
//! sequences element-wise, maps as key sets (key order never matters),
//! atomics by value. Values with no comparable structure
//! ([`DepValue::Opaque`]) always count as changed. Nothing is serialized and
//! comparison cannot fail.

pub mod effects;
pub mod error;
pub mod prelude;
pub mod previous;
pub mod runtime;
pub mod tests;
pub mod value;

pub use effects::*;
pub use error::*;
pub use previous::*;
pub use runtime::*;
pub use value::*;
