//! ABI layer for `<errno.h>`.
//!
//! The game declares `extern int errno` and touches it directly, so the cell
//! is a data symbol. `__errno_location` hands out the same cell for code
//! built against a libc that goes through the accessor.

use std::ffi::c_int;

use doomlibc_core::context::StatusCell;

/// The process-wide error status. Starts at 0.
#[allow(non_upper_case_globals)]
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub static errno: StatusCell = StatusCell::new(0);

#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn __errno_location() -> *mut c_int {
    errno.as_ptr()
}

/// Set `errno` from inside the ABI layer.
#[inline]
pub fn set_abi_errno(value: c_int) {
    errno.set(value);
}

/// Current `errno`.
#[inline]
pub fn abi_errno() -> c_int {
    errno.get()
}
