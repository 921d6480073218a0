//! Region configuration.
//!
//! A [`RegionConfig`] document sets the defaults every new region starts
//! with, plus per-region overrides by name:
//!
//! ```json
//! {
//!   "logicalMode": "Enabled",
//!   "visualMode": "PerViewType",
//!   "historyLimit": 10,
//!   "regions": {
//!     "Documents": { "visualMode": "PerKey" },
//!     "Dialogs": { "logicalMode": "Disabled" }
//!   }
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{LogicalSerializationMode, VisualSerializationMode};

/// Journal entries kept per region.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Nested selection broadcasts allowed before further ones are dropped.
pub const DEFAULT_MAX_BROADCAST_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionConfig {
    pub logical_mode: LogicalSerializationMode,
    pub visual_mode: VisualSerializationMode,
    pub history_limit: usize,
    pub max_broadcast_depth: usize,
    pub regions: HashMap<String, RegionOverrides>,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            logical_mode: LogicalSerializationMode::default(),
            visual_mode: VisualSerializationMode::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_broadcast_depth: DEFAULT_MAX_BROADCAST_DEPTH,
            regions: HashMap::new(),
        }
    }
}

/// Per-region overrides of the config defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionOverrides {
    pub logical_mode: Option<LogicalSerializationMode>,
    pub visual_mode: Option<VisualSerializationMode>,
}

/// Effective settings for one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionSettings {
    pub logical_mode: LogicalSerializationMode,
    pub visual_mode: VisualSerializationMode,
    pub history_limit: usize,
    pub max_broadcast_depth: usize,
}

impl Default for RegionSettings {
    fn default() -> Self {
        RegionConfig::default().settings_for("")
    }
}

impl RegionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Effective settings for `region`, overrides applied.
    pub fn settings_for(&self, region: &str) -> RegionSettings {
        let overrides = self.regions.get(region);
        RegionSettings {
            logical_mode: overrides
                .and_then(|o| o.logical_mode)
                .unwrap_or(self.logical_mode),
            visual_mode: overrides
                .and_then(|o| o.visual_mode)
                .unwrap_or(self.visual_mode),
            history_limit: self.history_limit,
            max_broadcast_depth: self.max_broadcast_depth,
        }
    }
}
