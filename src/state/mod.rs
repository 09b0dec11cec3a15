// State management module
// Handles the product catalog and shared application state

pub mod app_state;
pub mod catalog;
pub mod product;

pub use app_state::{AppState, SharedState};
pub use catalog::Catalog;
pub use product::{Product, ProductId};
