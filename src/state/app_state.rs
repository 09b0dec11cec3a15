// Application state
// Shared catalog, image store and upload receiver

use crate::config::{Config, CorsConfig};
use crate::services::images::{ImageStore, StorageError};
use crate::services::uploads::UploadReceiver;
use crate::state::catalog::Catalog;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Main application state
///
/// The catalog lock is the single exclusion point for every mutation:
/// handlers that change the image store do so while holding the write guard.
#[derive(Debug)]
pub struct AppState {
    /// Product collection
    pub catalog: RwLock<Catalog>,
    /// Committed product images
    pub images: ImageStore,
    /// Multipart staging
    pub uploads: UploadReceiver,
    /// Origin allow-list for the product API
    pub cors: CorsConfig,
    /// Delete a product's image together with the product
    pub prune_images_on_delete: bool,
}

/// State handle shared by all handlers
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create application state from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            catalog: RwLock::new(Catalog::new()),
            images: ImageStore::new(&config.storage.upload_dir),
            uploads: UploadReceiver::new(
                &config.storage.staging_dir,
                config.storage.max_upload_bytes,
            ),
            cors: config.cors.clone(),
            prune_images_on_delete: config.storage.prune_images_on_delete,
        }
    }

    /// Create the image and staging directories
    pub async fn prepare_storage(&self) -> Result<(), StorageError> {
        self.images.ensure_dirs().await?;
        self.uploads
            .ensure_dirs()
            .await
            .map_err(|source| StorageError::Io {
                action: "create directory",
                path: self.uploads.staging_dir().to_path_buf(),
                source,
            })
    }

    /// Wrap the state for sharing between handlers
    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }
}
