//! The slot-based composition runtime: retained cells and the cycle boundary.
//!
//! Hooks store their per-instance state in "slots" owned by a thread-local
//! [`Composer`]. A slot's value at the start of cycle N is exactly what was
//! stored there at the end of cycle N-1; slots live until the composer is
//! torn down with the thread.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::SlotError;

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
    pub pending: Vec<Box<dyn FnOnce()>>,
    pub cycle_active: bool,
}

/// Marks one composition cycle. `begin()` resets the slot cursor; dropping
/// the guard commits the cycle and runs everything queued with
/// [`after_commit`].
pub struct ComposeGuard {
    _priv: (),
}

impl ComposeGuard {
    pub fn begin() -> Self {
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            if c.cycle_active {
                log::warn!("ComposeGuard::begin: previous cycle still active");
            }
            c.cycle_active = true;
            c.cursor = 0;
        });
        ComposeGuard { _priv: () }
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        let pending = COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            c.cycle_active = false;
            std::mem::take(&mut c.pending)
        });
        // Commit phase: runs after the cycle's reads are done, so writes
        // queued during cycle N become observable in cycle N+1.
        for commit in pending {
            commit();
        }
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            // replace (else panics)
            log::warn!(
                "remember: {}; replacing. If this is due to conditional \
                 composition, prefer remember_with_key.",
                SlotError::TypeMismatch {
                    index: cursor,
                    requested: std::any::type_name::<T>(),
                }
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            } else {
                log::warn!(
                    "remember_with_key: {}; replacing.",
                    SlotError::KeyedTypeMismatch {
                        key: key.clone(),
                        requested: std::any::type_name::<T>(),
                    }
                );
            }
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}

/// Defers `f` to the commit phase of the current cycle.
///
/// Inside a cycle the write stays invisible until the [`ComposeGuard`]
/// drops; outside any cycle there is nothing to defer against and `f` runs
/// immediately.
pub fn after_commit(f: impl FnOnce() + 'static) {
    let deferred = COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        if c.cycle_active {
            c.pending.push(Box::new(f));
            None
        } else {
            Some(f)
        }
    });
    if let Some(f) = deferred {
        f();
    }
}
