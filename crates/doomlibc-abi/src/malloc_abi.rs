//! ABI layer for `malloc`, `calloc`, `realloc` and `free`.
//!
//! The heap itself is the host's: every call lands on glibc's internal
//! `__libc_*` entry points, which stay reachable even when this library
//! interposes the public names.

use std::ffi::c_void;

use crate::errno_abi::set_abi_errno;

unsafe extern "C" {
    #[link_name = "__libc_malloc@GLIBC_2.2.5"]
    fn native_libc_malloc_sym(size: usize) -> *mut c_void;
    #[link_name = "__libc_calloc@GLIBC_2.2.5"]
    fn native_libc_calloc_sym(nmemb: usize, size: usize) -> *mut c_void;
    #[link_name = "__libc_realloc@GLIBC_2.2.5"]
    fn native_libc_realloc_sym(ptr: *mut c_void, size: usize) -> *mut c_void;
    #[link_name = "__libc_free@GLIBC_2.2.5"]
    fn native_libc_free_sym(ptr: *mut c_void);
}

/// C `malloc`.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn malloc(size: usize) -> *mut c_void {
    // SAFETY: direct call to the libc allocator.
    let ptr = unsafe { native_libc_malloc_sym(size) };
    if ptr.is_null() {
        set_abi_errno(libc::ENOMEM);
    }
    ptr
}

/// C `calloc`. Fails with `ENOMEM` when `nmemb * size` overflows.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn calloc(nmemb: usize, size: usize) -> *mut c_void {
    if nmemb.checked_mul(size).is_none() {
        set_abi_errno(libc::ENOMEM);
        return std::ptr::null_mut();
    }
    // SAFETY: direct call to the libc allocator.
    let ptr = unsafe { native_libc_calloc_sym(nmemb, size) };
    if ptr.is_null() {
        set_abi_errno(libc::ENOMEM);
    }
    ptr
}

/// C `realloc`. `realloc(NULL, n)` allocates; `realloc(p, 0)` frees `p` and
/// returns NULL. On failure `ptr` is untouched.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn realloc(ptr: *mut c_void, size: usize) -> *mut c_void {
    if ptr.is_null() {
        return unsafe { malloc(size) };
    }
    if size == 0 {
        unsafe { free(ptr) };
        return std::ptr::null_mut();
    }
    // SAFETY: `ptr` came from this allocator per the C contract.
    let out = unsafe { native_libc_realloc_sym(ptr, size) };
    if out.is_null() {
        set_abi_errno(libc::ENOMEM);
    }
    out
}

/// C `free`. NULL is a no-op.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: `ptr` came from this allocator per the C contract.
    unsafe { native_libc_free_sym(ptr) }
}
