//! # palloc Bin-Set Registry
//!
//! Per-group colour bin sets for a partitioned physical page allocator.
//! Physical memory is split into a fixed number of colour bins; every group
//! in a control hierarchy carries the subset of bins its tasks may allocate
//! from. Operators edit that subset through a text control file, and the
//! page allocator consults it on every allocation attempt.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Operator      │    │  GroupRecord    │    │   Allocator     │
//! │                 │    │                 │    │                 │
//! │ Registry::write ├───►│ [version|words] ├───►│ bins_for()      │
//! │ Registry::read  │◄───┤ admin mutex     │    │ (lock-free)     │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                 ▲
//!                        ┌─────────────────┐
//!                        │ SubsystemHooks  │
//!                        │ create/destroy  │
//!                        └─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use palloc_registry::{BinSet, FileKind, Registry, SubsystemHooks};
//! use palloc::config::BinCapacity;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let capacity = BinCapacity::new(16)?;
//! let mut registry = Registry::with_capacity(capacity);
//!
//! // Hierarchy framework instantiates a node
//! let group = registry.create()?;
//!
//! // Operator writes the bins file
//! registry.write(group, FileKind::Bins, "0-3,8\n")?;
//! assert_eq!(registry.read(group, FileKind::Bins)?, "0-3,8\n");
//!
//! // Allocator restricts candidate bins
//! let free = BinSet::parse("2-9", capacity)?;
//! let eligible = registry.bins_for(group)?.intersection(&free);
//! assert_eq!(eligible.format(), "2-3,8");
//!
//! registry.destroy(group);
//! # Ok(())
//! # }
//! ```
//!
//! ## Consistency
//!
//! - **Writes** parse into a fresh set first, then publish it under an
//!   even/odd version bump while holding the record's administrative lock.
//!   A rejected write never touches the record.
//! - **Allocator queries** copy the words between two version samples and
//!   retry only while a write is in flight; they never take a lock.
//! - **Destruction** needs `&mut Registry`, so no `BinSetView` can be alive
//!   when a record is released.
//!
//! ## Thread Safety
//!
//! - **Registry**: `Sync`; share `&Registry` across allocation contexts
//! - **GroupRecord**: single administrative writer at a time, any number of readers
//! - **BinSet / BinSetView**: plain `Copy` snapshots

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod binset;
pub mod control;
pub mod error;
pub mod lifecycle;
pub mod query;
pub mod record;
pub mod registry;
pub mod version;

pub use binset::{BinSet, Bins};
pub use control::FileKind;
pub use error::{PallocError, PallocResult, ParseError};
pub use lifecycle::SubsystemHooks;
pub use query::BinSetView;
pub use record::GroupRecord;
pub use registry::{GroupId, Registry};
pub use version::VersionCounter;

/// Initialize tracing for registry diagnostics
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
