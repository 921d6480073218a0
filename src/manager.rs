//! Region Manager - Owns named regions and their shared collaborators.
//!
//! Regions are created on first use with settings taken from the
//! [`RegionConfig`]. The manager also persists every region at once as a
//! single JSON document:
//!
//! ```json
//! { "regions": [ { "logical": { ... }, "visual": { "regionName": "Main", ... } } ] }
//! ```
//!
//! Entries are ordered by region name. On restore each entry is routed to
//! the region named by its visual half.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::adapter::RegionAdapter;
use crate::config::RegionConfig;
use crate::context::RegionContext;
use crate::error::Result;
use crate::region::persistence::RegionInfo;
use crate::region::{ItemDescriptor, Region};
use crate::view_model::Parameter;

/// Persisted state of every region of a manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerState {
    pub regions: Vec<RegionInfo>,
}

pub struct RegionManager {
    context: RegionContext,
    config: RegionConfig,
    regions: RefCell<HashMap<String, Rc<Region>>>,
}

impl RegionManager {
    pub fn new(context: RegionContext) -> Self {
        Self::with_config(context, RegionConfig::default())
    }

    /// Manager whose regions start from `config`.
    pub fn with_config(context: RegionContext, config: RegionConfig) -> Self {
        Self {
            context,
            config,
            regions: RefCell::new(HashMap::new()),
        }
    }

    /// Context handed to every region.
    pub fn context(&self) -> &RegionContext {
        &self.context
    }

    /// Config applied to regions on creation.
    pub fn config(&self) -> &RegionConfig {
        &self.config
    }

    // =========================================================================
    // REGIONS
    // =========================================================================

    /// Region named `name`, created on first use.
    pub fn region(&self, name: &str) -> Rc<Region> {
        if let Some(region) = self.regions.borrow().get(name) {
            return region.clone();
        }

        tracing::debug!(region = %name, "creating region");
        let settings = self.config.settings_for(name);
        let region = Rc::new(Region::with_settings(name, self.context.clone(), settings));
        self.regions
            .borrow_mut()
            .insert(name.to_string(), region.clone());
        region
    }

    /// Region named `name` if it already exists.
    pub fn get_region(&self, name: &str) -> Option<Rc<Region>> {
        self.regions.borrow().get(name).cloned()
    }

    /// Names of existing regions, sorted.
    pub fn region_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.regions.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    fn regions_sorted(&self) -> Vec<Rc<Region>> {
        let mut regions: Vec<Rc<Region>> = self.regions.borrow().values().cloned().collect();
        regions.sort_by(|a, b| a.name().cmp(b.name()));
        regions
    }

    // =========================================================================
    // FORWARDING
    // =========================================================================

    /// Register `adapter` with the named region, creating it if needed.
    pub fn register_adapter(&self, region: &str, adapter: &Rc<dyn RegionAdapter>) -> Result<()> {
        self.region(region).register_adapter(adapter)
    }

    /// Register several adapters with one region, in order.
    pub fn register_adapters(&self, region: &str, adapters: &[Rc<dyn RegionAdapter>]) -> Result<()> {
        let region = self.region(region);
        for adapter in adapters {
            region.register_adapter(adapter)?;
        }
        Ok(())
    }

    /// Returns false if the region does not exist or the adapter was not
    /// registered.
    pub fn unregister_adapter(&self, region: &str, adapter: &Rc<dyn RegionAdapter>) -> bool {
        self.get_region(region)
            .is_some_and(|region| region.unregister_adapter(adapter))
    }

    /// Request navigation in the named region, creating it if needed.
    pub fn navigate(&self, region: &str, key: Option<&str>) {
        self.region(region).navigate(key);
    }

    /// Inject an item into the named region, creating it if needed.
    pub fn inject(&self, region: &str, descriptor: ItemDescriptor, parameter: Option<Parameter>) -> Result<()> {
        self.region(region).inject(descriptor, parameter)
    }

    /// Remove `key` from the named region. Unknown regions are ignored.
    pub fn remove(&self, region: &str, key: &str) {
        if let Some(region) = self.get_region(region) {
            region.remove(key);
        }
    }

    /// Clear the named region. Unknown regions are ignored.
    pub fn clear(&self, region: &str) {
        if let Some(region) = self.get_region(region) {
            region.clear();
        }
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Capture every region.
    pub fn state(&self) -> Result<ManagerState> {
        let regions = self
            .regions_sorted()
            .iter()
            .map(|region| region.get_info())
            .collect::<Result<Vec<_>>>()?;
        Ok(ManagerState { regions })
    }

    /// Capture every region as a JSON document.
    pub fn save_state(&self) -> Result<String> {
        let json = serde_json::to_string(&self.state()?)?;
        tracing::info!(regions = self.regions.borrow().len(), bytes = json.len(), "region state saved");
        Ok(json)
    }

    /// Rebuild regions from a JSON document produced by
    /// [`RegionManager::save_state`]. Adapters are left untouched until
    /// [`RegionManager::apply_state`].
    pub fn restore_state(&self, json: &str) -> Result<()> {
        let state: ManagerState = serde_json::from_str(json)?;
        self.restore(&state)
    }

    /// Rebuild regions from an already parsed [`ManagerState`].
    pub fn restore(&self, state: &ManagerState) -> Result<()> {
        for info in &state.regions {
            let region = self.region(&info.visual.region_name);
            region.restore_info(info)?;
        }
        tracing::info!(regions = state.regions.len(), "region state restored");
        Ok(())
    }

    /// Push restored items into adapters and/or re-navigate, for every
    /// region.
    pub fn apply_state(&self, inject: bool, navigate: bool) -> Result<()> {
        for region in self.regions_sorted() {
            region.apply_info(inject, navigate)?;
        }
        Ok(())
    }
}

impl Default for RegionManager {
    fn default() -> Self {
        Self::new(RegionContext::default())
    }
}

// =============================================================================
// TESTS
// =============================================================================
