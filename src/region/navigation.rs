//! Navigation - Pending selection requests, broadcast and history.
//!
//! A navigation request is held until it can be honored:
//!
//! ```text
//! navigate(Some(k)) -> PendingKey(k) --(adapter live, item k realized)--> Idle
//! navigate(None)    -> PendingClear  --(adapter live)--------------------> Idle
//! ```
//!
//! Resolution is retried after every adapter registration and injection.
//! Selection changes are recorded in a bounded back/forward journal and
//! reported to [`NavigationEvent`] subscribers.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::Region;
use crate::view_model::ViewModel;

/// Pending navigation request of a region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NavigationState {
    #[default]
    Idle,
    PendingKey(String),
    /// An explicit request to select nothing.
    PendingClear,
}

/// Selection change reported to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub region: String,
    pub old_key: Option<String>,
    pub new_key: Option<String>,
}

// =============================================================================
// NAVIGATED CALLBACKS
// =============================================================================

type NavigatedCallback = Rc<dyn Fn(&NavigationEvent)>;

#[derive(Default)]
pub(super) struct NavigatedCallbacks {
    next_id: Cell<usize>,
    entries: Rc<RefCell<Vec<(usize, NavigatedCallback)>>>,
}

impl NavigatedCallbacks {
    fn register(&self, callback: NavigatedCallback) -> impl FnOnce() + use<> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, callback));

        let entries = Rc::downgrade(&self.entries);
        move || {
            if let Some(entries) = entries.upgrade() {
                entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
            }
        }
    }

    fn snapshot(&self) -> Vec<NavigatedCallback> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect()
    }
}

// =============================================================================
// JOURNAL
// =============================================================================

/// Bounded back/forward history of selected keys.
#[derive(Debug, Default)]
pub(super) struct NavigationJournal {
    back: VecDeque<String>,
    forward: Vec<String>,
    limit: usize,
}

impl NavigationJournal {
    pub(super) fn new(limit: usize) -> Self {
        Self {
            back: VecDeque::new(),
            forward: Vec::new(),
            limit,
        }
    }

    /// Record the key being left by an ordinary selection change.
    fn record(&mut self, previous: String) {
        self.push_back(previous);
        self.forward.clear();
    }

    fn push_back(&mut self, key: String) {
        if self.limit == 0 {
            return;
        }
        self.back.push_back(key);
        while self.back.len() > self.limit {
            self.back.pop_front();
        }
    }

    pub(super) fn clear(&mut self) {
        self.back.clear();
        self.forward.clear();
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Back,
    Forward,
}

// =============================================================================
// REGION NAVIGATION
// =============================================================================

impl Region {
    /// Request selection of `key`, or of nothing when `None`.
    ///
    /// Resolves immediately when possible, otherwise stays pending.
    pub fn navigate(&self, key: Option<&str>) {
        let state = match key {
            Some(key) => NavigationState::PendingKey(key.to_string()),
            None => NavigationState::PendingClear,
        };
        tracing::debug!(region = %self.name, ?state, "navigation requested");
        *self.navigation.borrow_mut() = state;
        self.try_resolve_navigation();
    }

    /// Honor the pending navigation request if possible.
    ///
    /// Returns true if a request was resolved.
    pub fn try_resolve_navigation(&self) -> bool {
        let state = self.navigation.borrow().clone();
        match state {
            NavigationState::Idle => false,
            _ if self.adapters.is_empty() => {
                tracing::trace!(region = %self.name, "navigation deferred, no adapters");
                false
            }
            NavigationState::PendingClear => {
                *self.navigation.borrow_mut() = NavigationState::Idle;
                let event = self.set_selected_key(None, true);
                self.broadcast_selected(None);
                self.emit_navigated(event);
                true
            }
            NavigationState::PendingKey(key) => {
                let Some(view_model) = self.view_model(&key) else {
                    tracing::debug!(region = %self.name, key = %key, "navigation deferred, item not realized");
                    return false;
                };
                *self.navigation.borrow_mut() = NavigationState::Idle;
                let event = self.set_selected_key(Some(key), true);
                self.broadcast_selected(Some(view_model));
                self.emit_navigated(event);
                true
            }
        }
    }

    /// Report a selection made by an adapter.
    ///
    /// The selection is re-broadcast to every adapter, the originator
    /// included, so all surfaces converge. An echo of the key already
    /// selected that arrives while a broadcast is in flight is dropped.
    pub fn on_navigation(&self, key: Option<&str>, view_model: Option<Rc<dyn ViewModel>>) {
        let key = key.map(str::to_string);
        if self.broadcast_depth.get() > 0 && self.selected_key.get() == key {
            tracing::trace!(region = %self.name, ?key, "ignoring selection echo");
            return;
        }
        let event = self.set_selected_key(key, true);
        self.broadcast_selected(view_model);
        self.emit_navigated(event);
    }

    /// Subscribe to selection changes. Call the returned closure to
    /// unsubscribe.
    pub fn on_navigated<F>(&self, callback: F) -> impl FnOnce() + use<F>
    where
        F: Fn(&NavigationEvent) + 'static,
    {
        self.navigated.register(Rc::new(callback))
    }

    // =========================================================================
    // JOURNAL
    // =========================================================================

    /// True if a back target with a live view-model exists.
    pub fn can_go_back(&self) -> bool {
        self.has_journal_target(Direction::Back)
    }

    /// True if a forward target with a live view-model exists.
    pub fn can_go_forward(&self) -> bool {
        self.has_journal_target(Direction::Forward)
    }

    /// Select the previous key still backed by a live view-model.
    pub fn go_back(&self) -> bool {
        self.journal_move(Direction::Back)
    }

    /// Undo the last [`Region::go_back`].
    pub fn go_forward(&self) -> bool {
        self.journal_move(Direction::Forward)
    }

    fn has_journal_target(&self, direction: Direction) -> bool {
        let keys: Vec<String> = {
            let journal = self.journal.borrow();
            match direction {
                Direction::Back => journal.back.iter().cloned().collect(),
                Direction::Forward => journal.forward.clone(),
            }
        };
        keys.iter().any(|key| self.view_model(key).is_some())
    }

    fn journal_move(&self, direction: Direction) -> bool {
        if self.adapters.is_empty() {
            return false;
        }
        loop {
            let target = {
                let mut journal = self.journal.borrow_mut();
                match direction {
                    Direction::Back => journal.back.pop_back(),
                    Direction::Forward => journal.forward.pop(),
                }
            };
            let Some(target) = target else {
                return false;
            };
            // Stale entries are dropped
            let Some(view_model) = self.view_model(&target) else {
                continue;
            };

            if let Some(current) = self.selected_key() {
                let mut journal = self.journal.borrow_mut();
                match direction {
                    Direction::Back => journal.forward.push(current),
                    Direction::Forward => journal.push_back(current),
                }
            }
            *self.navigation.borrow_mut() = NavigationState::Idle;
            let event = self.set_selected_key(Some(target), false);
            self.broadcast_selected(Some(view_model));
            self.emit_navigated(event);
            return true;
        }
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Update the selected key. Returns the event to emit once adapters
    /// are in sync, or `None` if nothing changed.
    pub(super) fn set_selected_key(&self, key: Option<String>, record: bool) -> Option<NavigationEvent> {
        let old_key = self.selected_key.get();
        if old_key == key {
            return None;
        }
        if record {
            if let Some(previous) = old_key.clone() {
                self.journal.borrow_mut().record(previous);
            }
        }
        self.selected_key.set(key.clone());
        Some(NavigationEvent {
            region: self.name.clone(),
            old_key,
            new_key: key,
        })
    }

    pub(super) fn emit_navigated(&self, event: Option<NavigationEvent>) {
        let Some(event) = event else {
            return;
        };
        tracing::debug!(region = %self.name, old = ?event.old_key, new = ?event.new_key, "navigated");
        for callback in self.navigated.snapshot() {
            callback(&event);
        }
    }

    /// Push `view_model` into every adapter's selected slot.
    fn broadcast_selected(&self, view_model: Option<Rc<dyn ViewModel>>) {
        let depth = self.broadcast_depth.get();
        if depth >= self.max_broadcast_depth {
            tracing::warn!(region = %self.name, depth, "selection broadcast nested too deep, dropped");
            return;
        }

        let _guard = DepthGuard::enter(&self.broadcast_depth);
        for adapter in self.broadcast_targets() {
            adapter.set_selected(view_model.clone());
        }
    }
}

/// Keeps the broadcast depth balanced even if an adapter panics.
struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

// =============================================================================
// TESTS
// =============================================================================
