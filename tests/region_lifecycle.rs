//! End-to-end region lifecycle through the public API: a shell with two
//! regions, a tab strip and a dialog host, saved and restored as one
//! document.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use spark_regions::{
    init_logging, same_view_model, CapturesState, FlushesVisualState, ItemDescriptor, NamedViewLocator,
    NamedViewModelLocator, RegionAdapter, RegionConfig, RegionContext, RegionManager, RestoresState,
    ResultSlot, ViewModel, ViewModelState, ViewType, WindowAdapter, WindowResult,
};

// =============================================================================
// Host types
// =============================================================================

struct EditorView;

#[derive(Default)]
struct EditorViewModel {
    path: RefCell<String>,
    scroll: RefCell<Option<String>>,
}

impl EditorViewModel {
    fn path(&self) -> String {
        self.path.borrow().clone()
    }
}

impl ViewModel for EditorViewModel {
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

impl CapturesState for EditorViewModel {
    fn state_type(&self) -> String {
        "EditorState".to_string()
    }

    fn capture_state(&self) -> ViewModelState {
        serde_json::json!({ "path": self.path() })
    }
}

impl RestoresState for EditorViewModel {
    fn restore_state(&self, state: ViewModelState) {
        if let Some(path) = state["path"].as_str() {
            *self.path.borrow_mut() = path.to_string();
        }
    }
}

impl FlushesVisualState for EditorViewModel {
    fn flush_visual_state(&self) -> Vec<(String, String)> {
        self.scroll
            .borrow_mut()
            .take()
            .map(|offset| vec![("scroll".to_string(), offset)])
            .unwrap_or_default()
    }
}

/// Minimal tab strip: holds what it is given.
#[derive(Default)]
struct TabStrip {
    tabs: RefCell<Vec<Rc<dyn ViewModel>>>,
    active: RefCell<Option<Rc<dyn ViewModel>>>,
    result: ResultSlot,
}

impl RegionAdapter for TabStrip {
    fn view_models(&self) -> Vec<Rc<dyn ViewModel>> {
        self.tabs.borrow().clone()
    }

    fn selected(&self) -> Option<Rc<dyn ViewModel>> {
        self.active.borrow().clone()
    }

    fn set_selected(&self, view_model: Option<Rc<dyn ViewModel>>) {
        *self.active.borrow_mut() = view_model;
    }

    fn inject(&self, view_model: Rc<dyn ViewModel>, _view_type: Option<ViewType>) {
        self.tabs.borrow_mut().push(view_model);
    }

    fn remove(&self, view_model: &Rc<dyn ViewModel>) {
        self.tabs
            .borrow_mut()
            .retain(|tab| !same_view_model(tab, view_model));
    }

    fn clear(&self) {
        self.tabs.borrow_mut().clear();
        *self.active.borrow_mut() = None;
    }
}

impl WindowAdapter for TabStrip {
    fn result(&self) -> Option<WindowResult> {
        self.result.get()
    }

    fn set_result(&self, result: WindowResult) -> bool {
        self.result.set(result)
    }
}

fn context() -> RegionContext {
    let view_models = Rc::new(NamedViewModelLocator::new());
    view_models.register_default::<EditorViewModel>();
    let views = Rc::new(NamedViewLocator::new());
    views.register::<EditorView>();
    RegionContext::named(view_models, views)
}

fn editor(key: &str) -> ItemDescriptor {
    ItemDescriptor::with_name(key, "EditorViewModel").view_name("EditorView")
}

fn attach(manager: &RegionManager, region: &str) -> Rc<TabStrip> {
    let strip = Rc::new(TabStrip::default());
    let adapter: Rc<dyn RegionAdapter> = strip.clone();
    manager.register_adapter(region, &adapter).unwrap();
    strip
}

fn editor_of(view_model: &Rc<dyn ViewModel>) -> &EditorViewModel {
    view_model.as_any().downcast_ref::<EditorViewModel>().unwrap()
}

// =============================================================================
// TESTS
// =============================================================================

#[test]
fn test_shell_state_survives_restart() {
    init_logging("spark_regions=debug");

    let manager = RegionManager::new(context());
    let tabs = attach(&manager, "Documents");
    let _dialogs = attach(&manager, "Dialogs");

    manager.inject("Documents", editor("readme"), None).unwrap();
    manager.inject("Documents", editor("notes"), None).unwrap();
    manager.navigate("Documents", Some("notes"));

    let documents = manager.region("Documents");
    let notes = documents.view_model("notes").unwrap();
    *editor_of(&notes).path.borrow_mut() = "notes.md".to_string();
    *editor_of(&notes).scroll.borrow_mut() = Some("120".to_string());
    assert!(same_view_model(&tabs.selected().unwrap(), &notes));

    let saved = manager.save_state().unwrap();
    drop(documents);
    drop(notes);
    drop(tabs);
    drop(manager);

    // Fresh process: restore, attach surfaces, then apply
    let manager = RegionManager::new(context());
    manager.restore_state(&saved).unwrap();
    assert_eq!(manager.region_names(), vec!["Dialogs", "Documents"]);

    let tabs = attach(&manager, "Documents");
    manager.apply_state(true, true).unwrap();

    let documents = manager.region("Documents");
    assert_eq!(documents.keys(), vec!["readme", "notes"]);
    assert_eq!(documents.selected_key().as_deref(), Some("notes"));

    let notes = documents.view_model("notes").unwrap();
    assert_eq!(editor_of(&notes).path(), "notes.md");
    assert!(same_view_model(&tabs.selected().unwrap(), &notes));
    assert_eq!(documents.get_saved_visual_state(&notes, "scroll").as_deref(), Some("120"));
}

#[test]
fn test_dialog_result_is_reported_once() {
    let manager = RegionManager::new(context());
    let dialog = attach(&manager, "Dialogs");

    manager.inject("Dialogs", editor("confirm"), None).unwrap();
    manager.navigate("Dialogs", Some("confirm"));
    assert!(dialog.selected().is_some());

    assert!(dialog.set_result(WindowResult::Ok));
    assert!(!dialog.set_result(WindowResult::Cancel));
    assert_eq!(dialog.result(), Some(WindowResult::Ok));

    manager.clear("Dialogs");
    assert!(dialog.view_models().is_empty());
    assert_eq!(manager.region("Dialogs").selected_key(), None);
}

#[test]
fn test_config_document_drives_new_regions() {
    let config = RegionConfig::from_json(
        r#"{
            "historyLimit": 1,
            "regions": { "Dialogs": { "logicalMode": "Disabled" } }
        }"#,
    )
    .unwrap();
    let manager = RegionManager::with_config(context(), config);
    let _dialogs = attach(&manager, "Dialogs");
    manager.inject("Dialogs", editor("confirm"), None).unwrap();

    let saved = manager.save_state().unwrap();
    let restored = RegionManager::new(context());
    restored.restore_state(&saved).unwrap();
    assert!(restored.region("Dialogs").is_empty());
}

#[test]
fn test_init_logging_is_idempotent() {
    init_logging("spark_regions=info");
    assert!(!init_logging("spark_regions=info"));
}
