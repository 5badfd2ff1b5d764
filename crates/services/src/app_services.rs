use std::sync::Arc;

use storage::{SheetRepository, Storage, StorageKeys};

use crate::error::AppServicesError;
use crate::sheet_service::SheetService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    sheet: Arc<SheetService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, keys: StorageKeys) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, keys))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, keys: StorageKeys) -> Self {
        let repo = SheetRepository::new(Arc::clone(&storage.kv), keys);
        Self {
            sheet: Arc::new(SheetService::new(repo)),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(&Storage::in_memory(), StorageKeys::default())
    }

    #[must_use]
    pub fn sheet(&self) -> Arc<SheetService> {
        Arc::clone(&self.sheet)
    }
}
