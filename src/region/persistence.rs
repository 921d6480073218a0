//! Persistence - Logical and visual state of a region.
//!
//! Two independent axes:
//! - **Logical** - which items exist, their view-model names and captured
//!   data, and the selected key
//! - **Visual** - opaque layout blobs keyed by (view name, view part), shared
//!   per view type or scoped per key
//!
//! Each axis has a region default and optional per-key overrides.
//! Restoring is two-phase: `set_info` rebuilds items, `apply_info` pushes
//! them into adapters and re-navigates when asked to.

use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{Region, RegionItem};
use crate::error::Result;
use crate::types::{
    LogicalInfo, LogicalSerializationMode, VisualInfo, VisualItemInfo, VisualSerializationMode,
};
use crate::view_model::{same_view_model, ViewModel};

/// Logical and visual snapshot of one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionInfo {
    pub logical: LogicalInfo,
    pub visual: VisualInfo,
}

#[derive(Debug, Default)]
pub(super) struct SerializationModes {
    logical: LogicalSerializationMode,
    visual: VisualSerializationMode,
    logical_overrides: HashMap<String, LogicalSerializationMode>,
    visual_overrides: HashMap<String, VisualSerializationMode>,
}

impl SerializationModes {
    pub(super) fn new(logical: LogicalSerializationMode, visual: VisualSerializationMode) -> Self {
        Self {
            logical,
            visual,
            ..Self::default()
        }
    }

    fn logical_for(&self, key: &str) -> LogicalSerializationMode {
        self.logical_overrides.get(key).copied().unwrap_or(self.logical)
    }

    fn visual_for(&self, key: &str) -> VisualSerializationMode {
        self.visual_overrides.get(key).copied().unwrap_or(self.visual)
    }
}

impl Region {
    // =========================================================================
    // MODES
    // =========================================================================

    /// Region-wide logical mode.
    pub fn logical_serialization_mode(&self) -> LogicalSerializationMode {
        self.modes.borrow().logical
    }

    /// Set the logical mode for keys without an override.
    pub fn set_default_logical_serialization_mode(&self, mode: LogicalSerializationMode) {
        self.modes.borrow_mut().logical = mode;
    }

    /// Effective logical mode for `key`.
    pub fn logical_serialization_mode_for(&self, key: &str) -> LogicalSerializationMode {
        self.modes.borrow().logical_for(key)
    }

    /// Override the logical mode for `key`.
    pub fn set_logical_serialization_mode(&self, key: &str, mode: LogicalSerializationMode) {
        self.modes
            .borrow_mut()
            .logical_overrides
            .insert(key.to_string(), mode);
    }

    /// Drop the override for `key`.
    pub fn clear_logical_serialization_mode(&self, key: &str) {
        self.modes.borrow_mut().logical_overrides.remove(key);
    }

    /// Region-wide visual mode.
    pub fn visual_serialization_mode(&self) -> VisualSerializationMode {
        self.modes.borrow().visual
    }

    /// Set the visual mode for keys without an override.
    pub fn set_default_visual_serialization_mode(&self, mode: VisualSerializationMode) {
        self.modes.borrow_mut().visual = mode;
    }

    /// Effective visual mode for `key`.
    pub fn visual_serialization_mode_for(&self, key: &str) -> VisualSerializationMode {
        self.modes.borrow().visual_for(key)
    }

    /// Override the visual mode for `key`.
    pub fn set_visual_serialization_mode(&self, key: &str, mode: VisualSerializationMode) {
        self.modes
            .borrow_mut()
            .visual_overrides
            .insert(key.to_string(), mode);
    }

    /// Drop the override for `key`.
    pub fn clear_visual_serialization_mode(&self, key: &str) {
        self.modes.borrow_mut().visual_overrides.remove(key);
    }

    // =========================================================================
    // SNAPSHOT
    // =========================================================================

    /// Capture the logical and visual state of this region.
    pub fn get_info(&self) -> Result<RegionInfo> {
        Ok(RegionInfo {
            logical: self.logical_info()?,
            visual: self.visual_info(),
        })
    }

    fn logical_info(&self) -> Result<LogicalInfo> {
        let selected_key = match self.logical_serialization_mode() {
            LogicalSerializationMode::Enabled => self.selected_key(),
            LogicalSerializationMode::Disabled => None,
        };

        let mut items = Vec::new();
        for item in self.items_snapshot() {
            if self.logical_serialization_mode_for(item.key()) != LogicalSerializationMode::Enabled {
                continue;
            }
            if let Some(info) = item.capture_logical_info(&self.context)? {
                items.push(info);
            }
        }
        Ok(LogicalInfo { selected_key, items })
    }

    fn visual_info(&self) -> VisualInfo {
        self.flush_visual_state();
        VisualInfo {
            region_name: self.name.clone(),
            items: self.visual_state.borrow().clone(),
        }
    }

    /// Ask every displayed view-model to hand over pending visual state.
    fn flush_visual_state(&self) {
        let mut displayed: Vec<Rc<dyn ViewModel>> = Vec::new();
        for adapter in self.adapters.get() {
            for view_model in adapter.view_models() {
                if !displayed.iter().any(|seen| same_view_model(seen, &view_model)) {
                    displayed.push(view_model);
                }
            }
        }

        for view_model in &displayed {
            let Some(flusher) = view_model.as_flushes_visual_state() else {
                continue;
            };
            for (view_part, state) in flusher.flush_visual_state() {
                self.save_visual_state(view_model, &view_part, state);
            }
        }
    }

    // =========================================================================
    // RESTORE
    // =========================================================================

    /// Rebuild items from persisted state without touching adapters.
    ///
    /// Visual state is replaced wholesale unless it belongs to another
    /// region. Logical entries whose effective mode is disabled, or whose key
    /// already exists, are skipped. The persisted selected key is kept for
    /// [`Region::apply_info`]. A deserialization failure aborts before any
    /// item is added.
    pub fn set_info(&self, logical: Option<&LogicalInfo>, visual: Option<&VisualInfo>) -> Result<()> {
        if let Some(logical) = logical {
            let mut restored: Vec<Rc<RegionItem>> = Vec::new();
            for info in &logical.items {
                if self.logical_serialization_mode_for(&info.key) != LogicalSerializationMode::Enabled {
                    continue;
                }
                if self.contains(&info.key) || restored.iter().any(|item| item.key() == info.key) {
                    tracing::debug!(region = %self.name, key = %info.key, "persisted key already present, skipped");
                    continue;
                }
                restored.push(Rc::new(RegionItem::from_persisted(info, &self.context)?));
            }

            tracing::debug!(region = %self.name, items = restored.len(), "logical state restored");
            self.items.borrow_mut().extend(restored);
            *self.remembered_key.borrow_mut() = Some(logical.selected_key.clone());
        }

        if let Some(visual) = visual {
            if visual.region_name == self.name {
                *self.visual_state.borrow_mut() = visual.items.clone();
            } else {
                tracing::warn!(
                    region = %self.name,
                    payload = %visual.region_name,
                    "visual state belongs to another region, ignored"
                );
            }
        }
        Ok(())
    }

    /// Convenience for [`Region::set_info`] with both halves of a snapshot.
    pub fn restore_info(&self, info: &RegionInfo) -> Result<()> {
        self.set_info(Some(&info.logical), Some(&info.visual))
    }

    /// Push restored items into adapters and/or navigate to the persisted
    /// selection. The remembered key is used at most once.
    pub fn apply_info(&self, inject: bool, navigate: bool) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        if inject {
            for item in self.items_snapshot() {
                for adapter in self.broadcast_targets() {
                    self.inject_item(&item, adapter.as_ref())?;
                }
            }
        }

        if navigate {
            let remembered = self.remembered_key.borrow_mut().take();
            if let Some(key) = remembered {
                self.navigate(key.as_deref());
            }
        }
        Ok(())
    }

    // =========================================================================
    // VISUAL STATE
    // =========================================================================

    /// Store a visual-state blob for `view_part` of the view displaying
    /// `view_model`. Ignored for unknown view-models and disabled modes.
    pub fn save_visual_state(&self, view_model: &Rc<dyn ViewModel>, view_part: &str, state: impl Into<String>) {
        let Some((key, view_name)) = self.visual_slot(view_model) else {
            return;
        };

        let state = state.into();
        let mut entries = self.visual_state.borrow_mut();
        match entries
            .iter_mut()
            .find(|entry| entry.matches(key.as_deref(), &view_name, view_part))
        {
            Some(entry) => entry.state = state,
            None => entries.push(VisualItemInfo {
                key,
                view_name,
                view_part: view_part.to_string(),
                state,
            }),
        }
    }

    /// Saved visual-state blob for `view_part` of the view displaying
    /// `view_model`.
    pub fn get_saved_visual_state(&self, view_model: &Rc<dyn ViewModel>, view_part: &str) -> Option<String> {
        let (key, view_name) = self.visual_slot(view_model)?;
        self.visual_state
            .borrow()
            .iter()
            .find(|entry| entry.matches(key.as_deref(), &view_name, view_part))
            .map(|entry| entry.state.clone())
    }

    /// Entry key and view name under which `view_model` stores visual state.
    fn visual_slot(&self, view_model: &Rc<dyn ViewModel>) -> Option<(Option<String>, String)> {
        let item = self.find_by_view_model(view_model)?;
        let view_name = item.visual_name()?;
        match self.visual_serialization_mode_for(item.key()) {
            VisualSerializationMode::Disabled => None,
            VisualSerializationMode::PerViewType => Some((None, view_name)),
            VisualSerializationMode::PerKey => Some((Some(item.key().to_string()), view_name)),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
