//! Collaborators shared by every region of a manager.

use std::rc::Rc;

use crate::locator::{NamedViewLocator, NamedViewModelLocator, ViewLocator, ViewModelLocator};
use crate::serializer::{JsonStateSerializer, StateSerializer};

/// Locators and serializer handed to regions by their owning manager.
#[derive(Clone)]
pub struct RegionContext {
    pub view_model_locator: Rc<dyn ViewModelLocator>,
    pub view_locator: Rc<dyn ViewLocator>,
    pub serializer: Rc<dyn StateSerializer>,
}

impl RegionContext {
    pub fn new(
        view_model_locator: Rc<dyn ViewModelLocator>,
        view_locator: Rc<dyn ViewLocator>,
        serializer: Rc<dyn StateSerializer>,
    ) -> Self {
        Self {
            view_model_locator,
            view_locator,
            serializer,
        }
    }

    /// Map-backed locators with the JSON serializer.
    pub fn named(view_models: Rc<NamedViewModelLocator>, views: Rc<NamedViewLocator>) -> Self {
        Self::new(view_models, views, Rc::new(JsonStateSerializer))
    }
}

impl Default for RegionContext {
    fn default() -> Self {
        Self::named(Rc::new(NamedViewModelLocator::new()), Rc::new(NamedViewLocator::new()))
    }
}
