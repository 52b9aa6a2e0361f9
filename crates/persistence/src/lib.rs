//! Persistence layer for the user directory backend.
//!
//! This crate contains:
//! - Database connection settings and per-operation connection handling
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The store-level error taxonomy

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;

pub use error::StoreError;
