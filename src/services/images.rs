//! Image store service
//!
//! Owns the flat directory of product images. Staged uploads are committed
//! into it under their generated name plus an extension derived from the
//! declared content type.

use crate::services::uploads::StagedUpload;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{info, warn};

/// Errors raised by image store operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem operation failed
    #[error("Failed to {action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted
        action: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Image formats accepted for product images
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// `image/png`
    Png,
    /// `image/jpeg`
    Jpeg,
}

impl ImageKind {
    /// Map a declared content type to an image kind (exact match only)
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        match content_type {
            "image/png" => Some(ImageKind::Png),
            "image/jpeg" => Some(ImageKind::Jpeg),
            _ => None,
        }
    }

    /// File extension used when storing this kind
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpg",
        }
    }
}

/// Filesystem-backed image store
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the stored images
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store directory if it does not exist
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StorageError::io("create directory", &self.root, e))
    }

    /// Resolve a stored filename to its path
    ///
    /// Returns `None` for names that would escape the store directory.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        let is_plain = !filename.is_empty()
            && filename != "."
            && filename != ".."
            && !filename.contains(['/', '\\']);
        is_plain.then(|| self.root.join(filename))
    }

    /// Check whether a stored image exists
    pub async fn contains(&self, filename: &str) -> bool {
        match self.path_for(filename) {
            Some(path) => fs::try_exists(&path).await.unwrap_or(false),
            None => false,
        }
    }

    /// Move a staged upload into the store
    ///
    /// # Returns
    /// * `Ok(String)` - Filename under which the image was stored
    /// * `Err(StorageError)` - If the file could not be moved
    pub async fn commit(&self, staged: StagedUpload, kind: ImageKind) -> Result<String, StorageError> {
        let filename = format!("{}.{}", staged.temp_name(), kind.extension());
        let target = self.root.join(&filename);

        if let Err(rename_err) = fs::rename(staged.path(), &target).await {
            // Staging and store may sit on different filesystems
            warn!(
                error = %rename_err,
                from = %staged.path().display(),
                "Rename failed, copying staged upload instead"
            );
            if let Err(e) = fs::copy(staged.path(), &target).await {
                staged.discard().await;
                return Err(StorageError::io("copy staged upload to", target, e));
            }
            staged.discard().await;
        }

        info!(filename = %filename, "Stored product image");
        Ok(filename)
    }

    /// Delete a stored image if it exists
    ///
    /// Returns true if a file was removed.
    pub async fn remove(&self, filename: &str) -> Result<bool, StorageError> {
        let Some(path) = self.path_for(filename) else {
            return Ok(false);
        };

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(false);
        }

        fs::remove_file(&path)
            .await
            .map_err(|e| StorageError::io("remove", &path, e))?;
        info!(path = %path.display(), "Removed product image");
        Ok(true)
    }
}
