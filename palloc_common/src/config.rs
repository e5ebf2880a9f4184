//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load the TOML configuration
//! that fixes the process-wide bin capacity and registry limits.
//!
//! # Usage
//!
//! ```rust,no_run
//! use palloc_common::config::{ConfigLoader, PallocConfig, ConfigError};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = PallocConfig::load(Path::new("palloc.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use crate::consts::{DEFAULT_MAX_GROUPS, MAX_LINE_LEN, MAX_PALLOC_BINS};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
///
/// This enum represents all possible errors that can occur when loading
/// configuration files.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Represents the verbosity level of logging output.
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Common configuration fields shared across palloc applications.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "palloc-node-01"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Number of colour bins available on this machine.
///
/// Fixed once at process start and handed to every bin-set constructor
/// and parser. Always within `1..=MAX_PALLOC_BINS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BinCapacity(u16);

impl BinCapacity {
    /// Capacity covering every representable bin.
    pub const MAX: Self = Self(MAX_PALLOC_BINS as u16);

    /// Validate and wrap a bin count.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `bins` is zero or exceeds
    /// `MAX_PALLOC_BINS`.
    pub fn new(bins: u32) -> Result<Self, ConfigError> {
        if bins == 0 || bins as usize > MAX_PALLOC_BINS {
            return Err(ConfigError::ValidationError(format!(
                "bins must be within 1..={MAX_PALLOC_BINS}, got {bins}"
            )));
        }
        Ok(Self(bins as u16))
    }

    /// Number of bins as `usize`.
    #[inline]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u32> for BinCapacity {
    type Error = ConfigError;

    fn try_from(bins: u32) -> Result<Self, Self::Error> {
        Self::new(bins)
    }
}

impl From<BinCapacity> for u32 {
    fn from(capacity: BinCapacity) -> Self {
        capacity.0 as u32
    }
}

fn default_max_groups() -> usize {
    DEFAULT_MAX_GROUPS
}

fn default_max_write_len() -> usize {
    MAX_LINE_LEN
}

/// Registry sizing.
///
/// ```toml
/// [registry]
/// bins = 64
/// max_groups = 1024
/// max_write_len = 768
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    /// Bin capacity shared by every group.
    pub bins: BinCapacity,

    /// Maximum number of live groups.
    #[serde(default = "default_max_groups")]
    pub max_groups: usize,

    /// Maximum accepted control-file write length in bytes.
    #[serde(default = "default_max_write_len")]
    pub max_write_len: usize,
}

impl RegistryConfig {
    /// Config with default limits for the given capacity.
    pub fn with_capacity(bins: BinCapacity) -> Self {
        Self {
            bins,
            max_groups: DEFAULT_MAX_GROUPS,
            max_write_len: MAX_LINE_LEN,
        }
    }

    /// Validate registry limits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `max_groups` is zero or
    /// `max_write_len` is outside `1..=MAX_LINE_LEN`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_groups == 0 {
            return Err(ConfigError::ValidationError(
                "max_groups must be at least 1".to_string(),
            ));
        }
        if self.max_write_len == 0 || self.max_write_len > MAX_LINE_LEN {
            return Err(ConfigError::ValidationError(format!(
                "max_write_len must be within 1..={MAX_LINE_LEN}, got {}",
                self.max_write_len
            )));
        }
        Ok(())
    }
}

/// A group to create at startup together with its initial bins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupConfig {
    /// Operator-facing group name.
    pub name: String,

    /// Initial contents of the `bins` file. Empty leaves the group with no bins.
    #[serde(default)]
    pub bins: String,
}

/// Complete configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PallocConfig {
    /// Shared application settings.
    pub shared: SharedConfig,

    /// Registry sizing.
    pub registry: RegistryConfig,

    /// Groups to create at startup.
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

impl PallocConfig {
    /// Validate every section.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::ValidationError` found; group names
    /// must be non-empty and unique.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.registry.validate()?;

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "group name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(group.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate group name '{}'",
                    group.name
                )));
            }
        }
        if self.groups.len() > self.registry.max_groups {
            return Err(ConfigError::ValidationError(format!(
                "{} groups configured but max_groups is {}",
                self.groups.len(),
                self.registry.max_groups
            )));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// This trait provides a default implementation that works with any type
/// implementing `serde::de::DeserializeOwned`.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid or a
///   typed field (such as `bins`) rejects its value
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
