//! API module
//!
//! Contains HTTP request handlers for the catalog endpoints

pub mod health;
pub mod products;

pub use health::health_check;
pub use products::{create_product, delete_product, list_products, update_product};
