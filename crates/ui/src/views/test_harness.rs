use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{SheetService, SheetSnapshot};
use storage::repository::InMemoryStore;
use storage::{SheetRepository, StorageKeys};

use crate::context::{UiApp, build_app_context};
use crate::views::SheetView;

struct TestApp {
    sheet: Arc<SheetService>,
    initial: SheetSnapshot,
}

impl UiApp for TestApp {
    fn sheet_service(&self) -> Arc<SheetService> {
        Arc::clone(&self.sheet)
    }

    fn initial_snapshot(&self) -> SheetSnapshot {
        self.initial.clone()
    }
}

#[derive(Props, Clone)]
struct SheetHarnessProps {
    app: Arc<TestApp>,
}

impl PartialEq for SheetHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn SheetHarness(props: SheetHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    rsx! { SheetView {} }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub store: InMemoryStore,
    pub sheet: Arc<SheetService>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

/// Restore a service over `store` and mount the sheet view on the result.
pub async fn setup_view_harness(store: InMemoryStore) -> ViewHarness {
    let sheet = Arc::new(SheetService::new(SheetRepository::new(
        Arc::new(store.clone()),
        StorageKeys::default(),
    )));
    let initial = sheet.restore().await;

    let app = Arc::new(TestApp {
        sheet: Arc::clone(&sheet),
        initial,
    });
    let dom = VirtualDom::new_with_props(SheetHarness, SheetHarnessProps { app });

    ViewHarness { dom, store, sheet }
}
