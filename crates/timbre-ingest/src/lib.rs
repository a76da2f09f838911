//! Catalog ingestion for timbre.
//!
//! Reads the raw song catalog from CSV into a [`timbre_core::CatalogIndex`]
//! and resolves the layered configuration shared by the command-line tools.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod load;

pub use config::Config;
pub use error::{LoadError, LoadResult};
pub use load::{load_catalog, read_catalog};
