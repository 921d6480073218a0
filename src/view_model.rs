//! View-model contract and its optional capabilities.
//!
//! A view-model opts into each capability by returning `Some(self)` from the
//! matching `as_*` accessor. The region checks capabilities per instance:
//!
//! - **AcceptsParameter** - receives the one-shot parameter given to `inject`
//! - **CapturesState** - produces data for logical persistence
//! - **RestoresState** - consumes data from logical persistence
//! - **FlushesVisualState** - hands pending layout state to the region
//!
//! # Example
//!
//! ```ignore
//! struct DocumentViewModel { title: RefCell<String> }
//!
//! impl ViewModel for DocumentViewModel {
//!     fn as_restores_state(&self) -> Option<&dyn RestoresState> { Some(self) }
//! }
//!
//! impl RestoresState for DocumentViewModel {
//!     fn restore_state(&self, state: ViewModelState) {
//!         *self.title.borrow_mut() = state["title"].as_str().unwrap_or_default().into();
//!     }
//! }
//! ```

use std::any::Any;
use std::rc::Rc;

use crate::types::{Capabilities, ViewModelState};

/// One-shot construction parameter handed to a freshly realized view-model.
pub type Parameter = Box<dyn Any>;

/// A view-model displayed by region adapters.
pub trait ViewModel: Any {
    fn as_accepts_parameter(&self) -> Option<&dyn AcceptsParameter> {
        None
    }

    fn as_captures_state(&self) -> Option<&dyn CapturesState> {
        None
    }

    fn as_restores_state(&self) -> Option<&dyn RestoresState> {
        None
    }

    fn as_flushes_visual_state(&self) -> Option<&dyn FlushesVisualState> {
        None
    }

    /// Type name used when no locator name is known.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any;
}

/// Receives the parameter passed to `Region::inject`.
pub trait AcceptsParameter {
    fn accept_parameter(&self, parameter: Parameter);
}

/// Produces state for logical persistence.
pub trait CapturesState {
    /// Tag identifying the shape of [`CapturesState::capture_state`] output.
    fn state_type(&self) -> String;

    fn capture_state(&self) -> ViewModelState;
}

/// Consumes state restored from logical persistence.
pub trait RestoresState {
    fn restore_state(&self, state: ViewModelState);
}

/// Holds pending visual state that must be handed over before a save.
pub trait FlushesVisualState {
    /// Drain pending `(view part, state)` pairs.
    fn flush_visual_state(&self) -> Vec<(String, String)>;
}

/// Detect the capability set of a view-model instance.
pub fn capabilities(view_model: &dyn ViewModel) -> Capabilities {
    let mut caps = Capabilities::empty();
    if view_model.as_accepts_parameter().is_some() {
        caps |= Capabilities::ACCEPTS_PARAMETER;
    }
    if view_model.as_captures_state().is_some() {
        caps |= Capabilities::CAPTURES_STATE;
    }
    if view_model.as_restores_state().is_some() {
        caps |= Capabilities::RESTORES_STATE;
    }
    if view_model.as_flushes_visual_state().is_some() {
        caps |= Capabilities::FLUSHES_VISUAL_STATE;
    }
    caps
}

/// Identity comparison of two view-models (same allocation).
pub fn same_view_model(a: &Rc<dyn ViewModel>, b: &Rc<dyn ViewModel>) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

// =============================================================================
// TESTS
// =============================================================================
