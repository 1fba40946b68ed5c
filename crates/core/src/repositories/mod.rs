//! Resource repositories.
//!
//! One service per resource type, each wrapping the injected document store
//! with that resource's key shape, validation, and deletion policy. No HTTP
//! concerns here; status-code translation lives in the api crate.

pub mod chapters;
pub mod domain_words;
pub mod sections;
pub mod taxonomy;
