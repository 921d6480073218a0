//! # spark-regions
//!
//! Region navigation and view-model lifetime coordination.
//!
//! A [`Region`] is a named slot in a UI shell (a tab strip, a document
//! well, a dialog host) that holds keyed items. Each item lazily realizes
//! a view-model and pushes it into every registered [`RegionAdapter`],
//! the surfaces that actually display it. Regions keep adapters and
//! view-models alive only weakly: the host UI owns them.
//!
//! Selection is reactive. The selected key lives in a
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) `Signal`
//! and navigation requests wait until an adapter and the requested item
//! exist:
//!
//! ```text
//! navigate(key) -> PendingKey -> (adapter + item ready) -> broadcast -> NavigationEvent
//! ```
//!
//! ## Modules
//!
//! - [`registry`] - Weak, ordered registries (adapters)
//! - [`view_model`] - View-model trait and optional capabilities
//! - [`adapter`] - The adapter contract and window adapters
//! - [`locator`] - Name resolution for view-models and views
//! - [`region`] - Regions, items, navigation and persistence
//! - [`manager`] - Owner of named regions and whole-app state
//! - [`config`] - Region defaults and per-region overrides
//! - [`logging`] - `tracing` subscriber setup

pub mod adapter;
pub mod config;
pub mod context;
pub mod error;
pub mod locator;
pub mod logging;
pub mod manager;
pub mod region;
pub mod registry;
pub mod serializer;
pub mod types;
pub mod view_model;

#[cfg(test)]
pub(crate) mod test_support;

pub use types::*;

pub use adapter::{RegionAdapter, ResultSlot, WindowAdapter, WindowResult};
pub use config::{RegionConfig, RegionOverrides, RegionSettings};
pub use context::RegionContext;
pub use error::{RegionError, Result};
pub use locator::{NamedViewLocator, NamedViewModelLocator, ViewLocator, ViewModelFactory, ViewModelLocator};
pub use logging::init_logging;
pub use manager::{ManagerState, RegionManager};
pub use region::persistence::RegionInfo;
pub use region::{
    ItemDescriptor, ItemFactory, NavigationEvent, NavigationState, Region, ViewModelSource, ViewSource,
};
pub use registry::WeakRegistry;
pub use serializer::{JsonStateSerializer, StateSerializer};
pub use view_model::{
    capabilities, same_view_model, AcceptsParameter, CapturesState, FlushesVisualState, Parameter,
    RestoresState, ViewModel,
};
