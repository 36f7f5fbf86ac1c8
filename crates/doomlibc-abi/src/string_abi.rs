//! ABI layer for `<string.h>`.
//!
//! `strcmp`, `strcasecmp`, `strncpy` and `strrchr` have real bodies from
//! `doomlibc_core::string`. The rest trap.

use std::ffi::{c_char, c_int};

use doomlibc_core::string;

use crate::util::{c_bytes, scan_c_string};

/// C `strcmp`.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn strcmp(s1: *const c_char, s2: *const c_char) -> c_int {
    let (a, b) = unsafe { (c_bytes(s1), c_bytes(s2)) };
    string::compare(a, b)
}

/// C `strcasecmp`, ASCII folding only.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn strcasecmp(s1: *const c_char, s2: *const c_char) -> c_int {
    let (a, b) = unsafe { (c_bytes(s1), c_bytes(s2)) };
    string::compare_ignore_ascii_case(a, b)
}

/// C `strncpy`: copies at most `n` bytes and pads the remainder of `dest`
/// with NUL. `dest` is unterminated when `src` has `n` or more bytes.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn strncpy(dest: *mut c_char, src: *const c_char, n: usize) -> *mut c_char {
    if dest.is_null() || n == 0 {
        return dest;
    }
    let src_bytes: &[u8] = if src.is_null() {
        &[]
    } else {
        let (len, _) = unsafe { scan_c_string(src, Some(n)) };
        unsafe { std::slice::from_raw_parts(src.cast::<u8>(), len) }
    };
    let dst = unsafe { std::slice::from_raw_parts_mut(dest.cast::<u8>(), n) };
    string::copy_padded(dst, src_bytes);
    dest
}

/// C `strrchr`. Searching for 0 returns the terminator.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn strrchr(s: *const c_char, c: c_int) -> *mut c_char {
    if s.is_null() {
        return std::ptr::null_mut();
    }
    let bytes = unsafe { c_bytes(s) };
    match string::last_index_of(bytes, c as u8) {
        Some(idx) => unsafe { s.add(idx) }.cast_mut(),
        None => std::ptr::null_mut(),
    }
}

trap_fn! {
    /// C `strncasecmp`.
    fn strncasecmp(s1: *const c_char, s2: *const c_char, n: usize) -> c_int => Strncasecmp;
}

trap_fn! {
    /// C `strdup`.
    fn strdup(s: *const c_char) -> *mut c_char => Strdup;
}

trap_fn! {
    /// C `strstr`.
    fn strstr(haystack: *const c_char, needle: *const c_char) -> *mut c_char => Strstr;
}

trap_fn! {
    /// C `strchr`.
    fn strchr(s: *const c_char, c: c_int) -> *mut c_char => Strchr;
}

trap_fn! {
    /// C `strncmp`.
    fn strncmp(s1: *const c_char, s2: *const c_char, n: usize) -> c_int => Strncmp;
}
