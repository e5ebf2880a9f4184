//! palloc Common Library
//!
//! This crate provides shared constants and configuration loading utilities
//! for all palloc workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Bin limits, control-file bounds and default paths
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! Add to your `Cargo.toml` with alias for shorter imports:
//! ```toml
//! [dependencies]
//! palloc = { package = "palloc_common", path = "../palloc_common" }
//! ```
//!
//! Then import:
//! ```rust
//! use palloc_common::consts::*;
//! use palloc_common::config::{BinCapacity, ConfigLoader, PallocConfig};
//! ```

pub mod config;
pub mod consts;
pub mod prelude;
