//! Region Item - One logical (key, view-model) binding.
//!
//! Items are created from a live [`ItemDescriptor`] by `Region::inject` or
//! from a persisted [`LogicalItemInfo`] by `Region::set_info`. The view-model
//! is realized lazily the first time the item is injected into an adapter,
//! at most once. Afterwards the item keeps only a weak handle: the adapters
//! own the instance.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::adapter::RegionAdapter;
use crate::context::RegionContext;
use crate::error::{RegionError, Result};
use crate::types::{Capabilities, LogicalItemInfo, ViewModelState, ViewType};
use crate::view_model::{same_view_model, Parameter, ViewModel};

/// One-shot factory for an item's view-model.
pub type ItemFactory = Box<dyn FnOnce() -> Option<Rc<dyn ViewModel>>>;

/// Where an item's view-model comes from.
pub enum ViewModelSource {
    Factory(ItemFactory),
    /// Resolved through the view-model locator.
    Name(String),
}

/// Where an item's view comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSource {
    Type(ViewType),
    /// Resolved through the view locator.
    Name(String),
}

/// Live description of an item to inject.
pub struct ItemDescriptor {
    pub key: String,
    pub view_model: ViewModelSource,
    pub view: Option<ViewSource>,
}

impl ItemDescriptor {
    pub fn with_factory(
        key: impl Into<String>,
        factory: impl FnOnce() -> Option<Rc<dyn ViewModel>> + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            view_model: ViewModelSource::Factory(Box::new(factory)),
            view: None,
        }
    }

    /// Wrap an existing instance. The region still holds it weakly.
    pub fn with_instance(key: impl Into<String>, view_model: Rc<dyn ViewModel>) -> Self {
        Self::with_factory(key, move || Some(view_model))
    }

    pub fn with_name(key: impl Into<String>, view_model_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            view_model: ViewModelSource::Name(view_model_name.into()),
            view: None,
        }
    }

    pub fn view_type(mut self, view_type: ViewType) -> Self {
        self.view = Some(ViewSource::Type(view_type));
        self
    }

    pub fn view_name(mut self, view_name: impl Into<String>) -> Self {
        self.view = Some(ViewSource::Name(view_name.into()));
        self
    }
}

// =============================================================================
// REGION ITEM
// =============================================================================

pub(crate) struct RegionItem {
    key: String,
    state: RefCell<ItemState>,
}

#[derive(Default)]
struct ItemState {
    /// `None` until realized; may fail to upgrade afterwards.
    view_model: Option<Weak<dyn ViewModel>>,
    factory: Option<ItemFactory>,
    view_model_name: Option<String>,
    view_type: Option<ViewType>,
    view_name: Option<String>,
    parameter: Option<Parameter>,
    pending_state: Option<ViewModelState>,
}

impl RegionItem {
    pub(crate) fn new(descriptor: ItemDescriptor, parameter: Option<Parameter>) -> Self {
        let mut state = ItemState {
            parameter,
            ..ItemState::default()
        };
        match descriptor.view_model {
            ViewModelSource::Factory(factory) => state.factory = Some(factory),
            ViewModelSource::Name(name) => state.view_model_name = Some(name),
        }
        match descriptor.view {
            Some(ViewSource::Type(view_type)) => state.view_type = Some(view_type),
            Some(ViewSource::Name(name)) => state.view_name = Some(name),
            None => {}
        }
        Self {
            key: descriptor.key,
            state: RefCell::new(state),
        }
    }

    /// Rebuild an item from persisted logical state.
    ///
    /// The state blob is deserialized now and applied on first injection.
    pub(crate) fn from_persisted(info: &LogicalItemInfo, context: &RegionContext) -> Result<Self> {
        let pending_state = match info.view_model_state.as_deref() {
            Some(blob) => {
                let state_type = info.view_model_state_type.as_deref().unwrap_or_default();
                Some(context.serializer.deserialize(blob, state_type)?)
            }
            None => None,
        };
        Ok(Self {
            key: info.key.clone(),
            state: RefCell::new(ItemState {
                view_model_name: Some(info.view_model_name.clone()),
                view_name: info.view_name.clone(),
                pending_state,
                ..ItemState::default()
            }),
        })
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn is_realized(&self) -> bool {
        self.state.borrow().view_model.is_some()
    }

    /// The realized view-model, if it is still alive.
    pub(crate) fn view_model(&self) -> Option<Rc<dyn ViewModel>> {
        self.state.borrow().view_model.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn is(&self, view_model: &Rc<dyn ViewModel>) -> bool {
        self.view_model()
            .is_some_and(|own| same_view_model(&own, view_model))
    }

    /// Name visual state is filed under: the view name, or the view-model
    /// name when the adapter chooses the view itself.
    pub(crate) fn visual_name(&self) -> Option<String> {
        let state = self.state.borrow();
        state.view_name.clone().or_else(|| state.view_model_name.clone())
    }

    /// Create the view-model if this has not happened yet.
    ///
    /// Returns `Ok(None)` when the item was realized earlier but its
    /// view-model has since been dropped; realization is never repeated.
    pub(crate) fn realize(&self, context: &RegionContext) -> Result<Option<Rc<dyn ViewModel>>> {
        let (factory, name) = {
            let mut state = self.state.borrow_mut();
            if let Some(weak) = &state.view_model {
                return Ok(weak.upgrade());
            }
            (state.factory.take(), state.view_model_name.clone())
        };

        // No borrow is held while user code runs
        let resolved = match (factory, name.as_deref()) {
            (Some(factory), _) => factory(),
            (None, Some(name)) => context.view_model_locator.resolve(name),
            (None, None) => None,
        };
        let Some(view_model) = resolved else {
            return Err(RegionError::NullResolution {
                key: self.key.clone(),
                source_name: name.unwrap_or_else(|| "factory".to_string()),
            });
        };

        let parameter = self.state.borrow_mut().parameter.take();
        if let Some(parameter) = parameter {
            let Some(acceptor) = view_model.as_accepts_parameter() else {
                return Err(RegionError::Capability {
                    key: self.key.clone(),
                    capability: Capabilities::ACCEPTS_PARAMETER,
                });
            };
            acceptor.accept_parameter(parameter);
        }

        let (view_type, view_name) = {
            let state = self.state.borrow();
            (state.view_type, state.view_name.clone())
        };
        let view_type = match (view_type, view_name.as_deref()) {
            (Some(view_type), _) => Some(view_type),
            (None, Some(view_name)) => context.view_locator.resolve(view_name),
            (None, None) => None,
        };
        let view_name = view_name.or_else(|| {
            view_type
                .as_ref()
                .map(|view_type| context.view_locator.type_name(view_type))
        });
        let view_model_name =
            name.unwrap_or_else(|| context.view_model_locator.type_name(view_model.as_ref()));

        tracing::debug!(
            key = %self.key,
            view_model = %view_model_name,
            view = ?view_name,
            "realized view-model"
        );

        let mut state = self.state.borrow_mut();
        state.view_model = Some(Rc::downgrade(&view_model));
        state.view_model_name = Some(view_model_name);
        state.view_type = view_type;
        state.view_name = view_name;
        Ok(Some(view_model))
    }

    /// Realize if needed, restore pending state, and hand the view-model to
    /// `adapter`.
    pub(crate) fn inject(&self, adapter: &dyn RegionAdapter, context: &RegionContext) -> Result<()> {
        let Some(view_model) = self.realize(context)? else {
            tracing::debug!(key = %self.key, "view-model dropped, skipping injection");
            return Ok(());
        };

        let pending = self.state.borrow_mut().pending_state.take();
        if let Some(pending) = pending {
            match view_model.as_restores_state() {
                Some(restorer) => restorer.restore_state(pending),
                None => tracing::trace!(key = %self.key, "view-model does not restore state"),
            }
        }

        let view_type = self.state.borrow().view_type;
        adapter.inject(view_model, view_type);
        Ok(())
    }

    /// Persistable description of this item, or `None` if it has no live
    /// view-model.
    pub(crate) fn capture_logical_info(&self, context: &RegionContext) -> Result<Option<LogicalItemInfo>> {
        let Some(view_model) = self.view_model() else {
            return Ok(None);
        };

        let (view_model_state_type, view_model_state) = match view_model.as_captures_state() {
            Some(capture) => {
                let state_type = capture.state_type();
                let blob = context
                    .serializer
                    .serialize(&capture.capture_state(), &state_type)?;
                (Some(state_type), Some(blob))
            }
            None => (None, None),
        };

        let state = self.state.borrow();
        Ok(Some(LogicalItemInfo {
            key: self.key.clone(),
            view_model_name: state.view_model_name.clone().unwrap_or_default(),
            view_name: state.view_name.clone(),
            view_model_state_type,
            view_model_state,
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================
