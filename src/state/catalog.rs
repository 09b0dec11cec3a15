// Product catalog
// Ordered in-memory collection of products with id assignment

use crate::state::product::{Product, ProductId};

/// In-memory product collection
///
/// Preserves insertion order. Ids come from a counter that only grows, so
/// deleting a product never causes a later product to reuse its id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    next_id: ProductId,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// All products in insertion order
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Number of products held
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog holds no products
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Append a product with the next id
    /// Returns the stored product
    pub fn insert(
        &mut self,
        name: Option<String>,
        description: Option<String>,
        image: Option<String>,
    ) -> &Product {
        let id = self.next_id;
        self.next_id += 1;
        self.products
            .push(Product::new(id, name, description, image));
        &self.products[self.products.len() - 1]
    }

    /// Get a product by ID
    /// Returns a mutable reference to the product if found
    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    /// Remove a product from the collection
    /// Later products shift position but keep their ids
    /// Returns the removed product if it existed
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let index = self.products.iter().position(|p| p.id == id)?;
        Some(self.products.remove(index))
    }
}
