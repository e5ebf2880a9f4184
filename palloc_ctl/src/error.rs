//! Operator-facing errors

use palloc_common::config::ConfigError;
use palloc_registry::PallocError;
use thiserror::Error;

/// Errors reported by the control tool
#[derive(Debug, Error)]
pub enum CtlError {
    /// Configuration could not be loaded or validated
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A registry operation on a named group failed
    #[error("group '{name}': {source}")]
    Group {
        /// Group name
        name: String,
        /// Registry error
        #[source]
        source: PallocError,
    },

    /// No group with this name exists in the session
    #[error("no such group: {0}")]
    UnknownGroup(String),
}

impl CtlError {
    /// Negative errno status matching the failing operation.
    pub fn errno(&self) -> i32 {
        match self {
            Self::Group { source, .. } => source.errno(),
            Self::Config(_) => -libc::EINVAL,
            Self::UnknownGroup(_) => -libc::ENOENT,
        }
    }
}
