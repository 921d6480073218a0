//! Name resolution for view-models and views.
//!
//! Regions depend only on the [`ViewModelLocator`] and [`ViewLocator`]
//! traits. The map-backed implementations here cover hosts that register
//! their types up front.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::types::{short_type_name, ViewType};
use crate::view_model::ViewModel;

/// Creates a view-model instance; `None` means resolution failed.
pub type ViewModelFactory = Rc<dyn Fn() -> Option<Rc<dyn ViewModel>>>;

/// Resolves view-models by name.
pub trait ViewModelLocator {
    fn resolve(&self, name: &str) -> Option<Rc<dyn ViewModel>>;

    /// Name under which `view_model` can later be resolved again.
    fn type_name(&self, view_model: &dyn ViewModel) -> String {
        short_type_name(view_model.type_name()).to_string()
    }
}

/// Resolves view types by name.
pub trait ViewLocator {
    fn resolve(&self, view_name: &str) -> Option<ViewType>;

    fn type_name(&self, view_type: &ViewType) -> String {
        view_type.short_name().to_string()
    }
}

// =============================================================================
// MAP-BACKED LOCATORS
// =============================================================================

/// View-model locator backed by registered factories.
#[derive(Default)]
pub struct NamedViewModelLocator {
    factories: RefCell<HashMap<String, ViewModelFactory>>,
}

impl NamedViewModelLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `name`. Replaces any previous factory.
    pub fn register(&self, name: impl Into<String>, factory: impl Fn() -> Option<Rc<dyn ViewModel>> + 'static) {
        self.factories.borrow_mut().insert(name.into(), Rc::new(factory));
    }

    /// Register `V::default` under the short type name of `V`.
    pub fn register_default<V: ViewModel + Default>(&self) {
        let name = short_type_name(std::any::type_name::<V>()).to_string();
        self.register(name, || Some(Rc::new(V::default()) as Rc<dyn ViewModel>));
    }

    /// True if a factory is registered under `name`.
    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.borrow().contains_key(name)
    }
}

impl ViewModelLocator for NamedViewModelLocator {
    fn resolve(&self, name: &str) -> Option<Rc<dyn ViewModel>> {
        // The map is released before the factory runs, so it may register
        let factory = self.factories.borrow().get(name).cloned()?;
        factory()
    }
}

/// View locator backed by registered view types.
#[derive(Default)]
pub struct NamedViewLocator {
    views: RefCell<HashMap<String, ViewType>>,
}

impl NamedViewLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `V` under its short type name.
    pub fn register<V: 'static>(&self) -> ViewType {
        let view_type = ViewType::of::<V>();
        self.register_as(view_type.short_name(), view_type);
        view_type
    }

    /// Register `view_type` under an explicit name.
    pub fn register_as(&self, name: impl Into<String>, view_type: ViewType) {
        self.views.borrow_mut().insert(name.into(), view_type);
    }
}

impl ViewLocator for NamedViewLocator {
    fn resolve(&self, view_name: &str) -> Option<ViewType> {
        self.views.borrow().get(view_name).copied()
    }
}

// =============================================================================
// TESTS
// =============================================================================
