//! ABI layer for the path operations the game links: `mkdir`, `rename`,
//! `remove`.

use std::ffi::{c_char, c_int};

use doomlibc_core::config;
use doomlibc_core::fs::plan_mkdir;

use crate::console::diagnose;
use crate::util::c_bytes_opt;

/// C `mkdir`. Creates nothing and returns 0 for any path and mode.
///
/// With `DOOMLIBC_MKDIR=notice` (the default) it also prints
/// `TODO: mkdir <path>`.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn mkdir(path: *const c_char, _mode: libc::mode_t) -> c_int {
    let path = unsafe { c_bytes_opt(path) };
    let plan = plan_mkdir(path, config::mkdir_policy());
    if let Some(notice) = &plan.notice {
        diagnose(notice);
    }
    plan.status
}

trap_fn! {
    /// C `rename`.
    fn rename(old: *const c_char, new: *const c_char) -> c_int => Rename;
}

trap_fn! {
    /// C `remove`.
    fn remove(path: *const c_char) -> c_int => Remove;
}
