//! Upload receiver
//!
//! Reads the product multipart form, streaming the `file` part into the
//! staging directory under a generated name. The staged file stays there
//! until the image store commits it or the caller discards it.

use crate::error::AppError;
use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Multipart part carrying the product image
pub const FILE_FIELD: &str = "file";

/// An uploaded file waiting in the staging directory
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
    temp_name: String,
    content_type: Option<String>,
    size: u64,
}

impl StagedUpload {
    /// Describe a file already written to `path`
    pub fn new(path: PathBuf, content_type: Option<String>, size: u64) -> Self {
        let temp_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            temp_name,
            content_type,
            size,
        }
    }

    /// Location of the staged file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Generated name of the staged file
    pub fn temp_name(&self) -> &str {
        &self.temp_name
    }

    /// Content type declared by the client, if any
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Number of bytes received
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Remove the staged file
    pub async fn discard(self) {
        if let Err(e) = fs::remove_file(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "Failed to discard staged upload");
            }
        }
    }
}

/// Fields of a product create/update form
#[derive(Debug, Default)]
pub struct ProductForm {
    /// `name` text field
    pub name: Option<String>,
    /// `description` text field
    pub description: Option<String>,
    /// Staged `file` attachment
    pub file: Option<StagedUpload>,
}

impl ProductForm {
    /// Discard the staged attachment, if any
    pub async fn discard_file(&mut self) {
        if let Some(file) = self.file.take() {
            file.discard().await;
        }
    }
}

/// Stages multipart uploads to disk
#[derive(Debug, Clone)]
pub struct UploadReceiver {
    staging_dir: PathBuf,
    max_file_bytes: u64,
}

impl UploadReceiver {
    /// Create a receiver staging into `staging_dir`
    pub fn new(staging_dir: impl Into<PathBuf>, max_file_bytes: u64) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            max_file_bytes,
        }
    }

    /// Directory where uploads are staged
    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    /// Create the staging directory if it does not exist
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.staging_dir).await
    }

    /// Read a product form, staging its file attachment
    ///
    /// On error nothing is left behind in the staging directory.
    pub async fn receive(&self, mut multipart: Multipart) -> Result<ProductForm, AppError> {
        let mut form = ProductForm::default();

        if let Err(e) = self.read_fields(&mut multipart, &mut form).await {
            form.discard_file().await;
            return Err(e);
        }

        Ok(form)
    }

    async fn read_fields(
        &self,
        multipart: &mut Multipart,
        form: &mut ProductForm,
    ) -> Result<(), AppError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| self.form_error(e))?
        {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                FILE_FIELD if field.file_name().is_some_and(|n| !n.is_empty()) => {
                    if form.file.is_some() {
                        return Err(AppError::InvalidForm(format!(
                            "unexpected field: {}",
                            FILE_FIELD
                        )));
                    }
                    form.file = Some(self.stage(field).await?);
                }
                // Empty file input: no file was chosen
                FILE_FIELD => debug!("Skipping file part without a filename"),
                "name" => form.name = Some(self.read_text(field).await?),
                "description" => form.description = Some(self.read_text(field).await?),
                _ => {
                    warn!("Unknown multipart field: {}", field_name);
                }
            }
        }

        Ok(())
    }

    async fn read_text(&self, field: Field<'_>) -> Result<String, AppError> {
        field.text().await.map_err(|e| self.form_error(e))
    }

    /// Map a multipart read failure, keeping body-limit overruns distinct
    fn form_error(&self, e: MultipartError) -> AppError {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(self.max_file_bytes)
        } else {
            AppError::InvalidForm(e.to_string())
        }
    }

    async fn stage(&self, mut field: Field<'_>) -> Result<StagedUpload, AppError> {
        let content_type = field.content_type().map(|s| s.to_string());
        let path = self.staging_dir.join(Uuid::new_v4().simple().to_string());

        let mut file = fs::File::create(&path).await.map_err(|e| {
            error!("Failed to create staged upload {}: {}", path.display(), e);
            AppError::Internal(e.into())
        })?;

        let mut size: u64 = 0;
        let result: Result<(), AppError> = async {
            while let Some(chunk) = field.chunk().await.map_err(|e| self.form_error(e))? {
                size += chunk.len() as u64;
                if size > self.max_file_bytes {
                    return Err(AppError::PayloadTooLarge(self.max_file_bytes));
                }
                file.write_all(&chunk)
                    .await
                    .map_err(|e| AppError::Internal(e.into()))?;
            }
            file.sync_all()
                .await
                .map_err(|e| AppError::Internal(e.into()))
        }
        .await;

        let staged = StagedUpload::new(path, content_type, size);
        match result {
            Ok(()) => {
                debug!(
                    temp_name = %staged.temp_name(),
                    content_type = ?staged.content_type(),
                    size = staged.size(),
                    "Staged upload"
                );
                Ok(staged)
            }
            Err(e) => {
                drop(file);
                staged.discard().await;
                Err(e)
            }
        }
    }
}
