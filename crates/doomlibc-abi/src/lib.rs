#![feature(c_variadic)]
// Every export takes raw pointers straight from C; the contract is the C
// standard's, not something worth restating per function.
#![allow(clippy::missing_safety_doc)]
//! # doomlibc-abi
//!
//! The `extern "C"` symbol surface the doom port links against.
//!
//! This crate produces a `cdylib` (`libc.so`) exposing the C library symbols
//! the game references. Most of them are traps: they report their own name
//! through the failure reporter and halt. A handful have small real bodies
//! backed by `doomlibc-core`.
//!
//! ```text
//! C caller -> ABI entry (this crate) -> core capability -> trap | trivial effect
//! ```
//!
//! Release builds export every symbol unmangled. Debug builds (and so the
//! test binaries) keep Rust mangling for the libc-named functions, so the
//! test process still runs on the host's own libc.

#[macro_use]
mod macros;

pub mod console;
pub mod ctype_abi;
pub mod errno_abi;
pub mod malloc_abi;
pub mod math_abi;
pub mod stdio_abi;
pub mod stdlib_abi;
pub mod string_abi;
pub mod trap_abi;
pub mod unistd_abi;
pub mod util;
