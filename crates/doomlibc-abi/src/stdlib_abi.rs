//! ABI layer for the non-heap parts of `<stdlib.h>`.
//!
//! Numeric parsing traps. `exit` and `system` say what was asked of them on
//! stderr before trapping, so a halted run shows the status or command.

use std::ffi::{c_char, c_int};

use doomlibc_core::diag::{DiagEvent, DiagnosticRecord, Level};
use doomlibc_core::{ApiFamily, Capability};

use crate::console::diagnose;
use crate::trap_abi::trap;
use crate::util::c_str_lossy;

fn request(cap: Capability, event: DiagEvent, detail: String) -> DiagnosticRecord {
    DiagnosticRecord::new(Level::Info, event)
        .with_symbol(cap.symbol())
        .with_family(ApiFamily::Process)
        .with_detail(detail)
}

/// C `exit`. Prints `exit: <status>` and traps; the status is not honored.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn exit(status: c_int) -> ! {
    diagnose(&request(
        Capability::Exit,
        DiagEvent::ExitRequested,
        status.to_string(),
    ));
    trap(Capability::Exit)
}

/// C `system`. Prints `system: <command>` and traps without running it.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn system(command: *const c_char) -> c_int {
    let command = unsafe { c_str_lossy(command) };
    diagnose(&request(
        Capability::System,
        DiagEvent::CommandRequested,
        command.into_owned(),
    ));
    trap(Capability::System)
}

trap_fn! {
    /// C `atoi`.
    fn atoi(s: *const c_char) -> c_int => Atoi;
}

trap_fn! {
    /// C `atof`.
    fn atof(s: *const c_char) -> f64 => Atof;
}

trap_fn! {
    /// C `abs`.
    fn abs(j: c_int) -> c_int => Abs;
}
