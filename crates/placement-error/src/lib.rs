//! # placement-error
//!
//! Unified error handling for placement-tree.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what error occurred (e.g., NotFound, TransportFailed)
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary)
//! - **Error Context**: Assist in locating the cause with rich context
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use placement_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::NotFound, "resource provider not found")
//!         .with_operation("tree::build_provider_graph")
//!         .with_context("uuid", "4f4b1d1e-6c07-4f5b-9c3d-2a1c7e0e0c11"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, placement_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using placement Error
pub type Result<T> = std::result::Result<T, Error>;
