//! # doomlibc-core
//!
//! Safe Rust side of the doomlibc compatibility shim.
//!
//! The shim presents the C library symbol surface a hosted C game expects.
//! Almost every capability is a trap: calling it reports the symbol name and
//! halts. This crate owns everything that does not need raw pointers:
//!
//! - [`capability`]: the table of shim symbols and their dispositions
//! - [`trap`]: the failure reporter and its in-process ledger
//! - [`context`]: standard stream identities and the error status cell
//! - [`config`]: environment-driven runtime knobs
//! - [`va`]: typed variadic argument sequences
//! - [`stdio`]: the minimal printf engine
//! - [`string`], [`fs`], [`diag`]: small helpers behind the ABI entrypoints
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod capability;
pub mod config;
pub mod context;
pub mod diag;
pub mod error;
pub mod fs;
pub mod stdio;
pub mod string;
pub mod trap;
pub mod va;

pub use capability::{ApiFamily, Capability, Disposition};
pub use error::ShimError;
