pub use crate::effects::deep_effect_with_key;
pub use crate::error::SlotError;
pub use crate::previous::previous_with_key;
pub use crate::runtime::{
    after_commit, remember, remember_state, remember_state_with_key, remember_with_key,
    ComposeGuard,
};
pub use crate::value::{deps_changed, structural_eq, DepValue, Deps};
pub use crate::{deep_effect, deps, previous};
