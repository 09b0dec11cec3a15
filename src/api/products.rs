//! Product API handlers
//!
//! Contains HTTP request handlers for product CRUD operations.

use crate::error::AppError;
use crate::services::images::ImageKind;
use crate::services::uploads::StagedUpload;
use crate::state::{Product, ProductId, SharedState};
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Acknowledgement returned by a successful create
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully.";

/// Message response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message
    pub message: String,
}

/// Parse a path segment into a product id
///
/// Anything that is not an unsigned integer cannot match a product.
fn parse_id(raw: &str) -> Result<ProductId, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ProductNotFound(raw.to_string()))
}

/// Check the declared content type of an upload
fn image_kind(file: &StagedUpload) -> Result<ImageKind, AppError> {
    file.content_type()
        .and_then(ImageKind::from_content_type)
        .ok_or_else(|| AppError::UnsupportedMediaType(file.content_type().map(str::to_string)))
}

/// GET /products - List all products
pub async fn list_products(State(state): State<SharedState>) -> Json<Vec<Product>> {
    let catalog = state.catalog.read().await;
    Json(catalog.list().to_vec())
}

/// POST /products - Create a product with an image
pub async fn create_product(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let mut form = state.uploads.receive(multipart).await?;

    let file = form.file.take().ok_or(AppError::MissingFile)?;
    let kind = match image_kind(&file) {
        Ok(kind) => kind,
        Err(e) => {
            file.discard().await;
            return Err(e);
        }
    };

    let mut catalog = state.catalog.write().await;
    let filename = state.images.commit(file, kind).await?;
    let product = catalog.insert(form.name, form.description, Some(filename));

    info!(
        product_id = product.id,
        image = ?product.image,
        "Created product"
    );

    Ok(Json(MessageResponse {
        message: UPLOAD_SUCCESS_MESSAGE.to_string(),
    }))
}

/// PUT /products/:id - Update a product, optionally replacing its image
pub async fn update_product(
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Product>, AppError> {
    let mut form = state.uploads.receive(multipart).await?;

    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(e) => {
            form.discard_file().await;
            return Err(e);
        }
    };

    let mut catalog = state.catalog.write().await;
    let Some(product) = catalog.get_mut(id) else {
        form.discard_file().await;
        return Err(AppError::ProductNotFound(raw_id));
    };

    if let Some(file) = form.file.take() {
        let kind = match image_kind(&file) {
            Ok(kind) => kind,
            Err(e) => {
                file.discard().await;
                return Err(e);
            }
        };

        let filename = state.images.commit(file, kind).await?;
        if let Some(old) = product.image.replace(filename) {
            if let Err(e) = state.images.remove(&old).await {
                warn!(product_id = id, image = %old, error = %e, "Failed to remove replaced image");
            }
        }
    }

    product.apply_fields(form.name, form.description);
    info!(product_id = id, image = ?product.image, "Updated product");

    Ok(Json(product.clone()))
}

/// DELETE /products/:id - Delete a product
///
/// The image file stays in the store unless pruning is enabled.
pub async fn delete_product(
    State(state): State<SharedState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&raw_id)?;

    let mut catalog = state.catalog.write().await;
    let removed = catalog
        .remove(id)
        .ok_or_else(|| AppError::ProductNotFound(raw_id))?;

    if state.prune_images_on_delete {
        if let Some(image) = &removed.image {
            if let Err(e) = state.images.remove(image).await {
                warn!(product_id = id, image = %image, error = %e, "Failed to prune image");
            }
        }
    }

    info!(product_id = id, remaining = catalog.len(), "Deleted product");
    Ok(StatusCode::NO_CONTENT)
}
