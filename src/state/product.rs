// Product record
// The single entity held by the catalog

use serde::{Deserialize, Serialize};

/// Identifier assigned to a product at creation
pub type ProductId = u64;

/// Product structure
/// A catalog entry with an optional stored image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Identifier, never reused within a process lifetime
    pub id: ProductId,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Filename of the image in the image store
    #[serde(
        rename = "productImageURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
}

impl Product {
    /// Create a new product
    pub fn new(
        id: ProductId,
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            image,
        }
    }

    /// Overwrite the text fields present in an update
    /// Fields passed as `None` keep their current value
    pub fn apply_fields(&mut self, name: Option<String>, description: Option<String>) {
        if let Some(name) = name {
            self.name = Some(name);
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
    }
}
