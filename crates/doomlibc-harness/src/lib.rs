//! # doomlibc-harness
//!
//! Tooling around the shim's capability table:
//! - [`support_matrix`]: which symbols are provided and which trap.
//! - [`version_script`]: the GNU ld version script pinning the export set.
//! - [`log_check`]: validation of JSONL diagnostic logs.

#![forbid(unsafe_code)]

pub mod error;
pub mod log_check;
pub mod support_matrix;
pub mod version_script;

pub use error::HarnessError;
pub use support_matrix::{MatrixFormat, SupportMatrix};
