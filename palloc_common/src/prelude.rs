//! Prelude module for common re-exports.
//!
//! ```rust
//! use palloc_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    BinCapacity, ConfigError, ConfigLoader, GroupConfig, PallocConfig, RegistryConfig,
    SharedConfig,
};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{BINS_FILE_NAME, MAX_LINE_LEN, MAX_PALLOC_BINS, SUBSYSTEM_NAME};
