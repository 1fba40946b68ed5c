//! Core services for the coursebook content backend.
//!
//! This crate owns the document store, the per-resource repositories, session
//! authentication, and the taxonomy image codec. It is transport-agnostic:
//! errors come back as [`CoreError`] variants and the REST crate decides what
//! each one means on the wire.

pub mod auth;
pub mod config;
pub mod error;
pub mod image;
pub mod models;
pub mod repositories;
pub mod store;

pub use config::CoreConfig;
pub use error::{CoreError, CoreResult};
pub use store::{DocumentStore, Filter};
