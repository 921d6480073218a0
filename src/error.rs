//! Error types for region operations.
//!
//! Only realization and serialization can fail. Lookups that miss (unknown
//! key, unregistered adapter, unknown view-model) are silent no-ops and never
//! produce a [`RegionError`].

use thiserror::Error;

use crate::types::Capabilities;

#[derive(Error, Debug)]
pub enum RegionError {
    /// The factory or the view-model locator produced nothing on realize.
    #[error("view-model for key '{key}' resolved to nothing (source: {source_name})")]
    NullResolution { key: String, source_name: String },

    /// A parameter was supplied but the view-model cannot accept one.
    #[error("view-model for key '{key}' lacks capability {capability:?}")]
    Capability { key: String, capability: Capabilities },

    #[error("region '{region}' already contains key '{key}'")]
    DuplicateKey { region: String, key: String },

    /// A persisted state blob arrived without a type tag.
    #[error("persisted state blob has no state type")]
    MissingStateType,

    #[error("state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RegionError>;
