use crate::errors::AppError;
use crate::models::AppData;
use crate::storage::persist_data;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Applies `change` to a copy of the document and only swaps the copy in
    /// once it has been written to disk. The lock is held throughout.
    pub async fn update<T>(
        &self,
        change: impl FnOnce(&mut AppData) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let outcome = change(&mut next)?;
        persist_data(&self.data_path, &next).await?;
        *data = next;
        Ok(outcome)
    }
}
