//! Shared fixtures for unit tests: recording and null adapters, sample
//! view-models, and a context wired to map-backed locators.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::adapter::{RegionAdapter, ResultSlot, WindowAdapter, WindowResult};
use crate::context::RegionContext;
use crate::locator::{NamedViewLocator, NamedViewModelLocator};
use crate::region::{ItemDescriptor, Region};
use crate::types::{LogicalItemInfo, ViewModelState, ViewType};
use crate::view_model::{
    same_view_model, AcceptsParameter, CapturesState, FlushesVisualState, Parameter, RestoresState, ViewModel,
};

pub(crate) type Log = Rc<RefCell<Vec<String>>>;

// =============================================================================
// VIEW-MODELS AND VIEWS
// =============================================================================

pub(crate) struct DocumentView;

/// View-model supporting every capability.
#[derive(Default)]
pub(crate) struct DocumentViewModel {
    label: String,
    title: RefCell<String>,
    parameter: RefCell<Option<String>>,
    pending_visual: RefCell<Vec<(String, String)>>,
}

impl DocumentViewModel {
    pub(crate) fn new(label: &str) -> Rc<Self> {
        Rc::new(Self {
            label: label.to_string(),
            title: RefCell::new(label.to_string()),
            ..Self::default()
        })
    }

    pub(crate) fn shared(label: &str) -> Rc<dyn ViewModel> {
        Self::new(label)
    }

    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn title(&self) -> String {
        self.title.borrow().clone()
    }

    pub(crate) fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    pub(crate) fn parameter(&self) -> Option<String> {
        self.parameter.borrow().clone()
    }

    pub(crate) fn queue_visual_state(&self, view_part: &str, state: &str) {
        self.pending_visual
            .borrow_mut()
            .push((view_part.to_string(), state.to_string()));
    }
}

impl ViewModel for DocumentViewModel {
    fn as_accepts_parameter(&self) -> Option<&dyn AcceptsParameter> {
        Some(self)
    }

    fn as_captures_state(&self) -> Option<&dyn CapturesState> {
        Some(self)
    }

    fn as_restores_state(&self) -> Option<&dyn RestoresState> {
        Some(self)
    }

    fn as_flushes_visual_state(&self) -> Option<&dyn FlushesVisualState> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl AcceptsParameter for DocumentViewModel {
    fn accept_parameter(&self, parameter: Parameter) {
        if let Ok(text) = parameter.downcast::<String>() {
            *self.parameter.borrow_mut() = Some(*text);
        }
    }
}

impl CapturesState for DocumentViewModel {
    fn state_type(&self) -> String {
        "DocumentState".to_string()
    }

    fn capture_state(&self) -> ViewModelState {
        serde_json::json!({ "title": self.title() })
    }
}

impl RestoresState for DocumentViewModel {
    fn restore_state(&self, state: ViewModelState) {
        if let Some(title) = state["title"].as_str() {
            self.set_title(title);
        }
    }
}

impl FlushesVisualState for DocumentViewModel {
    fn flush_visual_state(&self) -> Vec<(String, String)> {
        self.pending_visual.borrow_mut().drain(..).collect()
    }
}

/// View-model with no capabilities.
#[derive(Default)]
pub(crate) struct PlainViewModel;

impl ViewModel for PlainViewModel {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn label(view_model: &Rc<dyn ViewModel>) -> String {
    match view_model.as_any().downcast_ref::<DocumentViewModel>() {
        Some(doc) => doc.label().to_string(),
        None => "plain".to_string(),
    }
}

/// Item backed by a fresh `DocumentViewModel` labelled `key`.
pub(crate) fn doc(key: &str) -> ItemDescriptor {
    let label = key.to_string();
    ItemDescriptor::with_factory(key, move || Some(DocumentViewModel::shared(&label)))
        .view_type(ViewType::of::<DocumentView>())
}

/// Item resolved through the locator by name.
pub(crate) fn located(key: &str) -> ItemDescriptor {
    ItemDescriptor::with_name(key, "DocumentViewModel").view_name("DocumentView")
}

/// Persisted entry for a located document without captured state.
pub(crate) fn persisted(key: &str) -> LogicalItemInfo {
    LogicalItemInfo {
        key: key.to_string(),
        view_model_name: "DocumentViewModel".to_string(),
        view_name: Some("DocumentView".to_string()),
        view_model_state_type: None,
        view_model_state: None,
    }
}

// =============================================================================
// ADAPTERS
// =============================================================================

/// How a recording adapter reacts to `set_selected`.
enum Feedback {
    None,
    /// Report every value back to the region (misbehaving adapter).
    Echo(Weak<Region>),
    /// Report `key` back whenever another value is set.
    Insist(Weak<Region>, String),
}

/// Adapter that records every call into a shared log.
pub(crate) struct RecordingAdapter {
    name: String,
    log: Log,
    view_models: RefCell<Vec<Rc<dyn ViewModel>>>,
    selected: RefCell<Option<Rc<dyn ViewModel>>>,
    feedback: RefCell<Feedback>,
    result: ResultSlot,
}

impl RecordingAdapter {
    pub(crate) fn new(name: &str, log: &Log) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            log: log.clone(),
            view_models: RefCell::new(Vec::new()),
            selected: RefCell::new(None),
            feedback: RefCell::new(Feedback::None),
            result: ResultSlot::new(),
        })
    }

    pub(crate) fn echo_to(&self, region: &Rc<Region>) {
        *self.feedback.borrow_mut() = Feedback::Echo(Rc::downgrade(region));
    }

    pub(crate) fn insist_on(&self, region: &Rc<Region>, key: &str) {
        *self.feedback.borrow_mut() = Feedback::Insist(Rc::downgrade(region), key.to_string());
    }

    fn record(&self, entry: String) {
        self.log.borrow_mut().push(format!("{}:{}", self.name, entry));
    }
}

impl RegionAdapter for RecordingAdapter {
    fn view_models(&self) -> Vec<Rc<dyn ViewModel>> {
        self.view_models.borrow().clone()
    }

    fn selected(&self) -> Option<Rc<dyn ViewModel>> {
        self.selected.borrow().clone()
    }

    fn set_selected(&self, view_model: Option<Rc<dyn ViewModel>>) {
        let entry = view_model.as_ref().map(label).unwrap_or_else(|| "none".to_string());
        self.record(format!("selected:{entry}"));
        *self.selected.borrow_mut() = view_model.clone();

        let report = match &*self.feedback.borrow() {
            Feedback::None => None,
            Feedback::Echo(region) => region.upgrade().map(|region| {
                let key = view_model.as_ref().and_then(|vm| region.key_of(vm));
                (region, key, view_model.clone())
            }),
            Feedback::Insist(region, key) => region.upgrade().and_then(|region| {
                let wanted = region.view_model(key)?;
                let already = view_model
                    .as_ref()
                    .is_some_and(|vm| same_view_model(vm, &wanted));
                (!already).then(|| (region, Some(key.clone()), Some(wanted)))
            }),
        };
        if let Some((region, key, view_model)) = report {
            region.on_navigation(key.as_deref(), view_model);
        }
    }

    fn inject(&self, view_model: Rc<dyn ViewModel>, _view_type: Option<ViewType>) {
        self.record(format!("inject:{}", label(&view_model)));
        self.view_models.borrow_mut().push(view_model);
    }

    fn remove(&self, view_model: &Rc<dyn ViewModel>) {
        self.record(format!("remove:{}", label(view_model)));
        self.view_models
            .borrow_mut()
            .retain(|existing| !same_view_model(existing, view_model));
    }

    fn clear(&self) {
        self.record("clear".to_string());
        self.view_models.borrow_mut().clear();
        *self.selected.borrow_mut() = None;
    }
}

impl WindowAdapter for RecordingAdapter {
    fn result(&self) -> Option<WindowResult> {
        self.result.get()
    }

    fn set_result(&self, result: WindowResult) -> bool {
        self.result.set(result)
    }
}

/// Headless adapter: accepts everything, displays nothing.
pub(crate) struct NullAdapter {
    selected: RefCell<Option<Rc<dyn ViewModel>>>,
    injected: Cell<usize>,
}

impl NullAdapter {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            selected: RefCell::new(None),
            injected: Cell::new(0),
        })
    }

    pub(crate) fn injected(&self) -> usize {
        self.injected.get()
    }
}

impl RegionAdapter for NullAdapter {
    fn view_models(&self) -> Vec<Rc<dyn ViewModel>> {
        Vec::new()
    }

    fn selected(&self) -> Option<Rc<dyn ViewModel>> {
        self.selected.borrow().clone()
    }

    fn set_selected(&self, view_model: Option<Rc<dyn ViewModel>>) {
        *self.selected.borrow_mut() = view_model;
    }

    fn inject(&self, _view_model: Rc<dyn ViewModel>, _view_type: Option<ViewType>) {
        self.injected.set(self.injected.get() + 1);
    }

    fn remove(&self, _view_model: &Rc<dyn ViewModel>) {}

    fn clear(&self) {}
}

// =============================================================================
// FIXTURE
// =============================================================================

pub(crate) struct Fixture {
    pub(crate) context: RegionContext,
    pub(crate) log: Log,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        crate::logging::init_test_logging();

        let view_models = Rc::new(NamedViewModelLocator::new());
        view_models.register("DocumentViewModel", || Some(DocumentViewModel::shared("located")));
        view_models.register_default::<PlainViewModel>();

        let views = Rc::new(NamedViewLocator::new());
        views.register::<DocumentView>();

        Self {
            context: RegionContext::named(view_models, views),
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub(crate) fn region(&self, name: &str) -> Rc<Region> {
        Rc::new(Region::new(name, self.context.clone()))
    }

    pub(crate) fn register(&self, region: &Region, name: &str) -> Rc<RecordingAdapter> {
        let adapter = RecordingAdapter::new(name, &self.log);
        let target: Rc<dyn RegionAdapter> = adapter.clone();
        region.register_adapter(&target).expect("register adapter");
        adapter
    }

    /// Register R1 then R2.
    pub(crate) fn register_pair(&self, region: &Region) -> (Rc<RecordingAdapter>, Rc<RecordingAdapter>) {
        let r1 = self.register(region, "R1");
        let r2 = self.register(region, "R2");
        (r1, r2)
    }

    pub(crate) fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub(crate) fn take_entries(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_adapter_keeps_region_navigable() {
        let fixture = Fixture::new();
        let region = fixture.region("Headless");
        let null = NullAdapter::new();
        let target: Rc<dyn RegionAdapter> = null.clone();
        region.register_adapter(&target).unwrap();

        // The null adapter does not hold view-models, so keep one alive
        let doc = DocumentViewModel::new("A");
        region
            .inject(ItemDescriptor::with_instance("A", doc.clone()), None)
            .unwrap();
        region.navigate(Some("A"));

        assert_eq!(null.injected(), 1);
        assert_eq!(region.selected_key().as_deref(), Some("A"));
        assert!(null.selected().is_some());
    }

    #[test]
    fn test_window_adapter_result_is_one_shot() {
        let fixture = Fixture::new();
        let window = RecordingAdapter::new("W", &fixture.log);
        assert_eq!(window.result(), None);
        assert!(window.set_result(WindowResult::Yes));
        assert!(!window.set_result(WindowResult::No));
        assert_eq!(window.result(), Some(WindowResult::Yes));
    }
}
