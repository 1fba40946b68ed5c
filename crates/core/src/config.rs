//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into
//! services; nothing in core reads process-wide environment variables during
//! request handling.

use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    store_path: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// `store_path` is the document database location; SQLite's `:memory:`
    /// is accepted for ephemeral instances.
    pub fn new(store_path: PathBuf) -> CoreResult<Self> {
        if store_path.as_os_str().is_empty() {
            return Err(CoreError::InvalidArgument(
                "store path cannot be empty".to_string(),
            ));
        }
        Ok(Self { store_path })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_store_path() {
        let err = CoreConfig::new(PathBuf::new()).expect_err("empty path should be rejected");
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_keeps_store_path() {
        let cfg = CoreConfig::new(PathBuf::from("coursebook.db")).unwrap();
        assert_eq!(cfg.store_path(), Path::new("coursebook.db"));
    }
}
