//! Domain layer for the user directory backend.
//!
//! This crate contains the domain models shared by the persistence and
//! request-handling layers.

pub mod models;
