//! Error types for bin-set parsing and registry operations

use crate::registry::GroupId;
use thiserror::Error;

/// Errors produced while parsing a bin range list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Syntactically invalid range list
    #[error("Malformed bin list at '{token}': {reason}")]
    Malformed {
        /// Offending list item
        token: String,
        /// What was wrong with it
        reason: &'static str,
    },

    /// Bin index outside `[0, capacity)`
    #[error("Bin {value} out of range (capacity {capacity})")]
    OutOfRange {
        /// Offending bin index
        value: u64,
        /// Configured bin capacity
        capacity: usize,
    },
}

impl ParseError {
    pub(crate) fn malformed(token: &str, reason: &'static str) -> Self {
        Self::Malformed {
            token: token.to_string(),
            reason,
        }
    }
}

/// Errors that can occur during registry and control-file operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PallocError {
    /// Group storage could not be obtained
    #[error("Group storage exhausted - group creation aborted")]
    ResourceExhausted,

    /// Group handle is stale or was never issued
    #[error("Unknown group: {id}")]
    UnknownGroup {
        /// Handle that failed to resolve
        id: GroupId,
    },

    /// Control file name not handled by this subsystem
    #[error("Unsupported control file: {name}")]
    UnsupportedFile {
        /// Requested file name
        name: String,
    },

    /// Write payload exceeds the control file's length bound
    #[error("Payload of {len} bytes exceeds limit of {max}")]
    PayloadTooLarge {
        /// Payload length in bytes
        len: usize,
        /// Accepted maximum
        max: usize,
    },

    /// Bin list rejected by the parser
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl PallocError {
    /// Negative errno status for transports that report integer results.
    pub fn errno(&self) -> i32 {
        let code = match self {
            Self::ResourceExhausted => libc::ENOMEM,
            Self::UnknownGroup { .. } => libc::ENOENT,
            Self::UnsupportedFile { .. } => libc::EINVAL,
            Self::PayloadTooLarge { .. } => libc::E2BIG,
            Self::Parse(ParseError::Malformed { .. }) => libc::EINVAL,
            Self::Parse(ParseError::OutOfRange { .. }) => libc::ERANGE,
        };
        -code
    }
}

/// Result type for registry operations
pub type PallocResult<T> = Result<T, PallocError>;
