//! Adapter contract - UI surfaces a region drives but does not own.
//!
//! An adapter displays view-models and reports the selection its user made
//! back through [`crate::Region::on_navigation`]. Regions hold adapters
//! weakly; dropping the last `Rc` unregisters the adapter implicitly.
//!
//! All methods take `&self`: adapters are shared with the host UI and may
//! call back into the region from inside any of them.

use std::cell::Cell;
use std::rc::Rc;

use crate::types::ViewType;
use crate::view_model::ViewModel;

pub trait RegionAdapter {
    /// View-models the surface currently displays.
    fn view_models(&self) -> Vec<Rc<dyn ViewModel>>;

    fn selected(&self) -> Option<Rc<dyn ViewModel>>;

    /// Set by the region. Adapters must not report a value they already hold.
    fn set_selected(&self, view_model: Option<Rc<dyn ViewModel>>);

    fn inject(&self, view_model: Rc<dyn ViewModel>, view_type: Option<ViewType>);

    fn remove(&self, view_model: &Rc<dyn ViewModel>);

    fn clear(&self);
}

// =============================================================================
// WINDOW ADAPTERS
// =============================================================================

/// Outcome of a modal surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowResult {
    None,
    Ok,
    Cancel,
    Yes,
    No,
}

/// Adapter for a modal surface that reports a result once.
pub trait WindowAdapter: RegionAdapter {
    fn result(&self) -> Option<WindowResult>;

    /// Record the result. Returns false if one was already recorded.
    fn set_result(&self, result: WindowResult) -> bool;
}

/// One-shot storage for a [`WindowResult`].
#[derive(Debug, Default)]
pub struct ResultSlot {
    value: Cell<Option<WindowResult>>,
}

impl ResultSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<WindowResult> {
        self.value.get()
    }

    /// Store `result` unless a result is already present.
    pub fn set(&self, result: WindowResult) -> bool {
        if self.value.get().is_some() {
            return false;
        }
        self.value.set(Some(result));
        true
    }
}
