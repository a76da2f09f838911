//! Core domain model for timbre.
//!
//! This crate defines the song and catalog-row model, the six audio
//! features, the supported genre taxonomy, and the genre-expanded
//! [`CatalogIndex`] that every recommendation query runs against.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod taxonomy;

pub use catalog::{CatalogIndex, CatalogStats, MAX_POPULARITY_CAP};
pub use error::{Error, Result};
