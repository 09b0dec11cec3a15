//! Catalog Service Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod router;
pub mod services;
/// Application state management
///
/// Handles the product catalog and the shared handler state.
pub mod state;
