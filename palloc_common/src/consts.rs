//! System-wide constants for the palloc workspace.
//!
//! Single source of truth for bin limits, control-file bounds and default paths.
//! Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

/// Upper bound on the number of colour bins any configuration may declare.
///
/// Every bin set is stored as `MAX_PALLOC_BINS / 64` machine words, so the
/// configured capacity may be smaller but never larger than this.
pub const MAX_PALLOC_BINS: usize = 256;

/// Number of 64-bit words backing one bin set.
pub const BINSET_WORDS: usize = MAX_PALLOC_BINS / 64;

/// Maximum accepted length of a control-file write, in bytes.
pub const MAX_LINE_LEN: usize = 6 * 128;

/// Subsystem name under which groups are exposed.
pub const SUBSYSTEM_NAME: &str = "palloc";

/// Name of the control file holding a group's allowed bins.
pub const BINS_FILE_NAME: &str = "bins";

/// Default maximum number of live groups.
pub const DEFAULT_MAX_GROUPS: usize = 1024;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/palloc/palloc.toml";

const_assert!(MAX_PALLOC_BINS % 64 == 0);
const_assert!(MAX_PALLOC_BINS <= u16::MAX as usize);
