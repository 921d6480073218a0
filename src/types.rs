//! Core types for spark-regions.
//!
//! These types define the vocabulary shared by regions, items, adapters and
//! the persisted envelopes. They carry no behavior beyond small helpers.

use std::any::TypeId;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// SERIALIZATION MODES
// =============================================================================

/// Granularity of logical (identity + data) persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogicalSerializationMode {
    Disabled,
    #[default]
    Enabled,
}

/// Granularity of visual (layout) persistence.
///
/// `PerViewType` shares one entry between every item rendering the same view;
/// `PerKey` scopes the entry to a single logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VisualSerializationMode {
    Disabled,
    #[default]
    PerViewType,
    PerKey,
}

// =============================================================================
// CAPABILITIES
// =============================================================================

bitflags::bitflags! {
    /// Optional behaviors a view-model instance may support.
    ///
    /// Detected per instance, never assumed from the concrete type.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        const ACCEPTS_PARAMETER = 1 << 0;
        const CAPTURES_STATE = 1 << 1;
        const RESTORES_STATE = 1 << 2;
        const FLUSHES_VISUAL_STATE = 1 << 3;
    }
}

// =============================================================================
// VIEW TYPE
// =============================================================================

/// Opaque descriptor of a concrete view type.
///
/// Regions never instantiate views; they only hand this descriptor to
/// adapters and derive the canonical view name from it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewType {
    id: TypeId,
    name: &'static str,
}

impl ViewType {
    /// Descriptor for the view type `V`.
    pub fn of<V: 'static>() -> Self {
        Self {
            id: TypeId::of::<V>(),
            name: std::any::type_name::<V>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `app::views::DocumentView`.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Last path segment of the type name, e.g. `DocumentView`.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.name)
    }
}

impl fmt::Debug for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewType").field(&self.name).finish()
    }
}

/// Strip module path and generic arguments from a type name.
pub(crate) fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}

// =============================================================================
// PERSISTED ENVELOPES
// =============================================================================

/// Captured view-model data. Opaque to the region.
pub type ViewModelState = serde_json::Value;

/// Persisted logical state of one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalInfo {
    pub selected_key: Option<String>,
    #[serde(default)]
    pub items: Vec<LogicalItemInfo>,
}

/// One persisted (key, view-model) binding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicalItemInfo {
    pub key: String,
    pub view_model_name: String,
    pub view_name: Option<String>,
    pub view_model_state_type: Option<String>,
    pub view_model_state: Option<String>,
}

/// Persisted visual state of one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualInfo {
    pub region_name: String,
    #[serde(default)]
    pub items: Vec<VisualItemInfo>,
}

/// One visual-state blob, keyed by (key?, view name, view part).
///
/// `key` is present only under [`VisualSerializationMode::PerKey`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualItemInfo {
    pub key: Option<String>,
    pub view_name: String,
    pub view_part: String,
    pub state: String,
}

impl VisualItemInfo {
    pub(crate) fn matches(&self, key: Option<&str>, view_name: &str, view_part: &str) -> bool {
        self.key.as_deref() == key && self.view_name == view_name && self.view_part == view_part
    }
}

// =============================================================================
// TESTS
// =============================================================================
