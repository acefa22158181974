use thiserror::Error;

/// Slot-table misuse. Recoverable: the runtime replaces the slot and keeps
/// going, using these only as structured warning messages.
#[derive(Debug, Error)]
pub enum SlotError {
    #[error("slot {index} does not hold a {requested}")]
    TypeMismatch { index: usize, requested: &'static str },

    #[error("keyed slot '{key}' does not hold a {requested}")]
    KeyedTypeMismatch { key: String, requested: &'static str },
}
