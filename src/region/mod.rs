//! Region - Named container coordinating navigation across adapters.
//!
//! A region owns an ordered list of items (key -> lazily created view-model)
//! and a weak registry of adapters rendering them. It keeps every live
//! adapter in sync:
//!
//! - **Injection** - new items are broadcast into every adapter
//! - **Navigation** - selection requests wait until an adapter and the
//!   target view-model exist (see [`navigation`])
//! - **Persistence** - logical and visual state are captured and restored
//!   independently (see [`persistence`])
//!
//! Broadcasts always visit adapters most-recently-registered first.
//!
//! # Example
//!
//! ```ignore
//! let region = Region::new("Documents", context);
//! region.register_adapter(&tabs)?;
//! region.inject(ItemDescriptor::with_name("readme", "DocumentViewModel"), None)?;
//! region.navigate(Some("readme"));
//! ```

mod item;
pub mod navigation;
pub mod persistence;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::adapter::RegionAdapter;
use crate::config::RegionSettings;
use crate::context::RegionContext;
use crate::error::{RegionError, Result};
use crate::registry::WeakRegistry;
use crate::types::VisualItemInfo;
use crate::view_model::{Parameter, ViewModel};

pub(crate) use item::RegionItem;
pub use item::{ItemDescriptor, ItemFactory, ViewModelSource, ViewSource};
pub use navigation::{NavigationEvent, NavigationState};
use navigation::{NavigatedCallbacks, NavigationJournal};
use persistence::SerializationModes;

/// Named container of keyed items shown by a set of adapters.
pub struct Region {
    name: String,
    context: RegionContext,
    adapters: WeakRegistry<dyn RegionAdapter>,
    items: RefCell<Vec<Rc<RegionItem>>>,
    selected_key: Signal<Option<String>>,
    navigation: RefCell<NavigationState>,
    journal: RefCell<NavigationJournal>,
    navigated: NavigatedCallbacks,
    broadcast_depth: Cell<usize>,
    max_broadcast_depth: usize,
    modes: RefCell<SerializationModes>,
    visual_state: RefCell<Vec<VisualItemInfo>>,
    /// Selected key from the last `set_info`, consumed by `apply_info`.
    remembered_key: RefCell<Option<Option<String>>>,
}

impl Region {
    pub fn new(name: impl Into<String>, context: RegionContext) -> Self {
        Self::with_settings(name, context, RegionSettings::default())
    }

    /// Region with explicit modes and limits, as created by the manager.
    pub fn with_settings(name: impl Into<String>, context: RegionContext, settings: RegionSettings) -> Self {
        Self {
            name: name.into(),
            context,
            adapters: WeakRegistry::new(),
            items: RefCell::new(Vec::new()),
            selected_key: signal(None),
            navigation: RefCell::new(NavigationState::Idle),
            journal: RefCell::new(NavigationJournal::new(settings.history_limit)),
            navigated: NavigatedCallbacks::default(),
            broadcast_depth: Cell::new(0),
            max_broadcast_depth: settings.max_broadcast_depth,
            modes: RefCell::new(SerializationModes::new(settings.logical_mode, settings.visual_mode)),
            visual_state: RefCell::new(Vec::new()),
            remembered_key: RefCell::new(None),
        }
    }

    /// Name the region was registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Item keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.items.borrow().iter().map(|item| item.key().to_string()).collect()
    }

    /// True if an item with `key` exists, realized or not.
    pub fn contains(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Number of items, including unrealized ones.
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// True if the region holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// The view-model for `key`, if realized and still alive.
    pub fn view_model(&self, key: &str) -> Option<Rc<dyn ViewModel>> {
        self.find(key).and_then(|item| item.view_model())
    }

    /// Live realized view-models in item order.
    pub fn view_models(&self) -> Vec<Rc<dyn ViewModel>> {
        self.items_snapshot()
            .iter()
            .filter_map(|item| item.view_model())
            .collect()
    }

    /// Key of the item owning `view_model`.
    pub fn key_of(&self, view_model: &Rc<dyn ViewModel>) -> Option<String> {
        self.find_by_view_model(view_model)
            .map(|item| item.key().to_string())
    }

    /// Currently selected key. May name an item that was since removed.
    pub fn selected_key(&self) -> Option<String> {
        self.selected_key.get()
    }

    /// Reactive handle on the selected key, for bindings.
    pub fn selected_key_signal(&self) -> Signal<Option<String>> {
        self.selected_key.clone()
    }

    /// Live view-model of the selected key, if any.
    pub fn selected_view_model(&self) -> Option<Rc<dyn ViewModel>> {
        self.selected_key().and_then(|key| self.view_model(&key))
    }

    /// Pending navigation request.
    pub fn navigation_state(&self) -> NavigationState {
        self.navigation.borrow().clone()
    }

    /// Live adapters in registration order.
    pub fn adapters(&self) -> Vec<Rc<dyn RegionAdapter>> {
        self.adapters.get()
    }

    /// Locators and serializer shared with the manager.
    pub fn context(&self) -> &RegionContext {
        &self.context
    }

    // =========================================================================
    // ADAPTERS
    // =========================================================================

    /// Attach `adapter` and bring it up to date.
    ///
    /// Current items are injected into this adapter alone. If no pending
    /// navigation resolves, the adapter receives the existing selection
    /// directly, without a navigation event.
    ///
    /// The adapter is registered even if an item fails to realize. Such
    /// items are dropped and the first error is returned.
    pub fn register_adapter(&self, adapter: &Rc<dyn RegionAdapter>) -> Result<()> {
        if self.adapters.contains(adapter) {
            return Ok(());
        }

        let mut failure = None;
        for item in self.items_snapshot() {
            if let Err(err) = self.inject_item(&item, adapter.as_ref()) {
                failure.get_or_insert(err);
            }
        }
        self.adapters.add(adapter);
        tracing::debug!(region = %self.name, adapters = self.adapters.len(), "adapter registered");

        if !self.try_resolve_navigation() {
            if let Some(selected) = self.selected_view_model() {
                adapter.set_selected(Some(selected));
            }
        }
        failure.map_or(Ok(()), Err)
    }

    /// Detach `adapter`. Returns false if it was not registered.
    pub fn unregister_adapter(&self, adapter: &Rc<dyn RegionAdapter>) -> bool {
        let removed = self.adapters.remove(adapter);
        if removed {
            tracing::debug!(region = %self.name, "adapter unregistered");
        }
        removed
    }

    /// Live adapters, most recently registered first.
    pub(crate) fn broadcast_targets(&self) -> impl Iterator<Item = Rc<dyn RegionAdapter>> {
        self.adapters.get().into_iter().rev()
    }

    // =========================================================================
    // ITEMS
    // =========================================================================

    /// Append an item and broadcast it into every adapter.
    ///
    /// `parameter` is handed to the view-model when it is realized.
    pub fn inject(&self, descriptor: ItemDescriptor, parameter: Option<Parameter>) -> Result<()> {
        if self.contains(&descriptor.key) {
            return Err(RegionError::DuplicateKey {
                region: self.name.clone(),
                key: descriptor.key,
            });
        }

        let item = Rc::new(RegionItem::new(descriptor, parameter));
        let adapters: Vec<_> = self.broadcast_targets().collect();
        // A failed realization leaves the region untouched. The instance is
        // held until the adapters own it.
        let _realized = if adapters.is_empty() {
            None
        } else {
            item.realize(&self.context)?
        };
        self.items.borrow_mut().push(item.clone());
        tracing::debug!(region = %self.name, key = item.key(), "item injected");

        for adapter in adapters {
            self.inject_item(&item, adapter.as_ref())?;
        }
        self.try_resolve_navigation();
        Ok(())
    }

    /// Remove the item for `key`. Unknown keys are ignored.
    ///
    /// The selected key is left untouched even if it names this item.
    pub fn remove(&self, key: &str) {
        let Some(item) = self.find(key) else {
            return;
        };

        if let Some(view_model) = item.view_model() {
            for adapter in self.broadcast_targets() {
                adapter.remove(&view_model);
            }
        }
        self.items
            .borrow_mut()
            .retain(|existing| !Rc::ptr_eq(existing, &item));
        tracing::debug!(region = %self.name, key, realized = item.is_realized(), "item removed");
    }

    /// Remove every item and reset navigation.
    pub fn clear(&self) {
        for adapter in self.broadcast_targets() {
            adapter.clear();
        }
        self.items.borrow_mut().clear();
        *self.navigation.borrow_mut() = NavigationState::Idle;
        self.journal.borrow_mut().clear();
        let event = self.set_selected_key(None, false);
        self.emit_navigated(event);
        tracing::debug!(region = %self.name, "region cleared");
    }

    /// Inject `item` into `adapter`. An item whose view-model cannot be
    /// realized is dropped from the region, since realization is never
    /// retried.
    pub(crate) fn inject_item(&self, item: &Rc<RegionItem>, adapter: &dyn RegionAdapter) -> Result<()> {
        let result = item.inject(adapter, &self.context);
        if let Err(err) = &result {
            tracing::warn!(region = %self.name, key = item.key(), error = %err, "item failed to realize, dropped");
            self.items
                .borrow_mut()
                .retain(|existing| !Rc::ptr_eq(existing, item));
        }
        result
    }

    /// Item list at the time of the call.
    pub(crate) fn items_snapshot(&self) -> Vec<Rc<RegionItem>> {
        self.items.borrow().clone()
    }

    fn find(&self, key: &str) -> Option<Rc<RegionItem>> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.key() == key)
            .cloned()
    }

    fn find_by_view_model(&self, view_model: &Rc<dyn ViewModel>) -> Option<Rc<RegionItem>> {
        self.items
            .borrow()
            .iter()
            .find(|item| item.is(view_model))
            .cloned()
    }
}

// =============================================================================
// TESTS
// =============================================================================
