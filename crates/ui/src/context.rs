use std::sync::Arc;

use services::{SheetService, SheetSnapshot};

pub trait UiApp: Send + Sync {
    fn sheet_service(&self) -> Arc<SheetService>;

    /// State restored before launch, drawn on the first frame.
    fn initial_snapshot(&self) -> SheetSnapshot;
}

#[derive(Clone)]
pub struct AppContext {
    sheet: Arc<SheetService>,
    initial: SheetSnapshot,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            sheet: app.sheet_service(),
            initial: app.initial_snapshot(),
        }
    }

    #[must_use]
    pub fn sheet_service(&self) -> Arc<SheetService> {
        Arc::clone(&self.sheet)
    }

    #[must_use]
    pub fn initial_snapshot(&self) -> SheetSnapshot {
        self.initial.clone()
    }
}

// Provided by the composition root in `crates/app`.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
