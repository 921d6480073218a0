//! Weak Registry - Non-owning registry of shared capability objects.
//!
//! Holds `Weak` handles only, so registered objects stay owned by whoever
//! created them. Dead entries are swept before every operation:
//! - `add` is idempotent by identity
//! - `get` returns a materialized snapshot in registration order, so callers
//!   may mutate the registry while iterating it
//!
//! Every operation is O(n); expected cardinality is a handful of entries.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub struct WeakRegistry<T: ?Sized> {
    entries: RefCell<Vec<Weak<T>>>,
}

impl<T: ?Sized> Default for WeakRegistry<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<T: ?Sized> WeakRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `target`. Returns false if it was already present.
    pub fn add(&self, target: &Rc<T>) -> bool {
        self.prune();
        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|entry| same_target(entry, target)) {
            return false;
        }
        entries.push(Rc::downgrade(target));
        true
    }

    /// Unregister `target`. Returns false if it was not present.
    pub fn remove(&self, target: &Rc<T>) -> bool {
        self.prune();
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|entry| same_target(entry, target)) {
            Some(pos) => {
                entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// True if `target` is registered and still alive.
    pub fn contains(&self, target: &Rc<T>) -> bool {
        self.prune();
        self.entries.borrow().iter().any(|entry| same_target(entry, target))
    }

    /// Live entries in registration order.
    pub fn get(&self) -> Vec<Rc<T>> {
        self.prune();
        self.entries.borrow().iter().filter_map(Weak::upgrade).collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.prune();
        self.entries.borrow().len()
    }

    /// True if no live target remains.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&self) {
        self.entries.borrow_mut().retain(|entry| entry.strong_count() > 0);
    }
}

fn same_target<T: ?Sized>(entry: &Weak<T>, target: &Rc<T>) -> bool {
    std::ptr::addr_eq(entry.as_ptr(), Rc::as_ptr(target))
}

// =============================================================================
// TESTS
// =============================================================================
