//! Service layer for upload staging and image storage
//!
//! This module keeps filesystem work out of the HTTP handlers.

pub mod images;
pub mod uploads;
