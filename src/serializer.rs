//! State serializer contract and the JSON implementation.
//!
//! Blobs are opaque strings to the region. Failures propagate unchanged to
//! whoever triggered the (de)serialization.

use crate::error::{RegionError, Result};
use crate::types::ViewModelState;

pub trait StateSerializer {
    fn serialize(&self, state: &ViewModelState, state_type: &str) -> Result<String>;

    fn deserialize(&self, blob: &str, state_type: &str) -> Result<ViewModelState>;
}

/// Stores view-model state as compact JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStateSerializer;

impl StateSerializer for JsonStateSerializer {
    fn serialize(&self, state: &ViewModelState, _state_type: &str) -> Result<String> {
        Ok(serde_json::to_string(state)?)
    }

    fn deserialize(&self, blob: &str, state_type: &str) -> Result<ViewModelState> {
        if state_type.is_empty() {
            return Err(RegionError::MissingStateType);
        }
        Ok(serde_json::from_str(blob)?)
    }
}
