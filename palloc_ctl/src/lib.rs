//! # palloc Control Library
//!
//! Operator-side driver for the bin-set registry: builds a registry from the
//! TOML configuration, creates the configured groups and applies their
//! `bins` files through the control surface.
//!
//! # Module Structure
//!
//! - [`session`] - Named groups on top of a [`Registry`](palloc_registry::Registry)
//! - [`error`] - Operator-facing error type

#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod session;

pub use error::CtlError;
pub use session::{ControlSession, parse_assignment};
