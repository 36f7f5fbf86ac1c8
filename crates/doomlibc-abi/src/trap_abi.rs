//! Failure reporter entry points.

use std::ffi::c_char;

use doomlibc_core::trap::report_unimplemented;
use doomlibc_core::{Capability, config};

use crate::console::StderrSink;
use crate::util::c_str_lossy;

/// Report `cap` as missing on stderr and halt per `DOOMLIBC_TRAP`.
pub fn trap(cap: Capability) -> ! {
    cap.trap(config::log_format(), &mut StderrSink, &config::trap_mode())
}

/// C `void unimplemented(const char *label)`: report `label` and halt.
///
/// Used by C-side stubs that name their own label. NULL prints `(null)`.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn unimplemented(label: *const c_char) -> ! {
    let label = unsafe { c_str_lossy(label) };
    report_unimplemented(
        &label,
        config::log_format(),
        &mut StderrSink,
        &config::trap_mode(),
    )
}
