//! ABI layer for `<stdio.h>`.
//!
//! Only the three standard streams exist. Their `FILE *` values are the
//! descriptor numbers and are never dereferenced. Output is written straight
//! to the descriptor, so there is no buffering and `fflush` is a no-op.
//!
//! `printf`, `vfprintf` and `vsnprintf` drain their C arguments into typed
//! `VaArg`s guided by the format string, then render through the core format
//! engine. Conversions the engine does not render (floats, `%o`, `%n`) are
//! skipped with an `unknown format specifier` diagnostic. A long double
//! conversion fails the call with `EINVAL` before any argument is read, and a
//! field or result longer than `INT_MAX` fails it with `EOVERFLOW`.

use std::ffi::{VaList, c_char, c_int, c_long, c_void};

use doomlibc_core::Capability;
use doomlibc_core::context::{StreamHandle, StreamId};
use doomlibc_core::diag::DiagnosticRecord;
use doomlibc_core::stdio::{
    ArgSlot, FormatError, FormatSegment, arg_slots, parse_format_string, render,
};
use doomlibc_core::va::{ArgCursor, VaArg};

use crate::console::{diagnose, write_stream};
use crate::errno_abi::set_abi_errno;
use crate::trap_abi::trap;
use crate::util::c_bytes_opt;

// ---------------------------------------------------------------------------
// stdin / stdout / stderr
// ---------------------------------------------------------------------------

/// Global `stdin` pointer.
#[allow(non_upper_case_globals)]
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub static stdin: StreamHandle = StreamHandle::STDIN;

/// Global `stdout` pointer.
#[allow(non_upper_case_globals)]
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub static stdout: StreamHandle = StreamHandle::STDOUT;

/// Global `stderr` pointer.
#[allow(non_upper_case_globals)]
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub static stderr: StreamHandle = StreamHandle::STDERR;

/// The standard stream behind a C `FILE *`, if any.
fn stream_id(stream: *mut c_void) -> Option<StreamId> {
    StreamId::from_handle(StreamHandle::from_raw(stream as usize))
}

fn output_stream(stream: *mut c_void) -> Option<StreamId> {
    stream_id(stream).filter(|id| id.is_writable())
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Render parsed `segments` against collected `args`.
///
/// Skipped conversions are reported on stderr, one line each.
pub fn render_collected(
    segments: &[FormatSegment<'_>],
    args: &[VaArg<'_>],
) -> Result<Vec<u8>, FormatError> {
    let mut cursor = ArgCursor::new(args);
    let mut out = Vec::with_capacity(128);
    let unsupported = render(segments, &mut cursor, &mut out)?;
    for conversion in unsupported {
        diagnose(&DiagnosticRecord::unknown_specifier(conversion));
    }
    Ok(out)
}

/// Copy `rendered` into `dst` the way `vsnprintf` does: at most
/// `dst.len() - 1` bytes followed by NUL. Returns the untruncated length.
pub fn copy_truncated(dst: &mut [u8], rendered: &[u8]) -> usize {
    if let Some(room) = dst.len().checked_sub(1) {
        let take = room.min(rendered.len());
        dst[..take].copy_from_slice(&rendered[..take]);
        dst[take] = 0;
    }
    rendered.len()
}

/// Set errno for a failed format and return -1.
fn format_failed(err: FormatError) -> c_int {
    set_abi_errno(match err {
        FormatError::FieldOverflow(_) => libc::EOVERFLOW,
        FormatError::Argument(_) | FormatError::LongDouble(_) => libc::EINVAL,
    });
    -1
}

fn c_len(len: usize) -> c_int {
    c_int::try_from(len).unwrap_or_else(|_| format_failed(FormatError::FieldOverflow(len)))
}

fn plan(segments: &[FormatSegment<'_>]) -> Result<Vec<ArgSlot>, c_int> {
    arg_slots(segments).map_err(format_failed)
}

fn print_collected(stream: StreamId, segments: &[FormatSegment<'_>], args: &[VaArg<'_>]) -> c_int {
    let rendered = match render_collected(segments, args) {
        Ok(rendered) => rendered,
        Err(err) => return format_failed(err),
    };
    let len = c_len(rendered.len());
    if len < 0 {
        return len;
    }
    if write_stream(stream, &rendered) < 0 {
        return -1;
    }
    len
}

/// C `printf`, to stdout.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn printf(format: *const c_char, mut args: ...) -> c_int {
    let Some(fmt) = (unsafe { c_bytes_opt(format) }) else {
        set_abi_errno(libc::EINVAL);
        return -1;
    };
    let segments = parse_format_string(fmt);
    let slots = match plan(&segments) {
        Ok(slots) => slots,
        Err(rc) => return rc,
    };
    let collected = collect_va_args!(&slots, args);
    print_collected(StreamId::Stdout, &segments, &collected)
}

/// C `vfprintf`. Only stdout and stderr are writable; any other stream traps.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn vfprintf(
    stream: *mut c_void,
    format: *const c_char,
    mut ap: VaList,
) -> c_int {
    let Some(id) = output_stream(stream) else {
        trap(Capability::Vfprintf)
    };
    let Some(fmt) = (unsafe { c_bytes_opt(format) }) else {
        set_abi_errno(libc::EINVAL);
        return -1;
    };
    let segments = parse_format_string(fmt);
    let slots = match plan(&segments) {
        Ok(slots) => slots,
        Err(rc) => return rc,
    };
    let collected = collect_va_args!(&slots, ap);
    print_collected(id, &segments, &collected)
}

/// C `vsnprintf`. Writes at most `n - 1` bytes plus NUL into `s` and
/// returns the length the full output would have had.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn vsnprintf(
    s: *mut c_char,
    n: usize,
    format: *const c_char,
    mut ap: VaList,
) -> c_int {
    let Some(fmt) = (unsafe { c_bytes_opt(format) }) else {
        set_abi_errno(libc::EINVAL);
        return -1;
    };
    if s.is_null() && n > 0 {
        set_abi_errno(libc::EINVAL);
        return -1;
    }
    let segments = parse_format_string(fmt);
    let slots = match plan(&segments) {
        Ok(slots) => slots,
        Err(rc) => return rc,
    };
    let collected = collect_va_args!(&slots, ap);
    let rendered = match render_collected(&segments, &collected) {
        Ok(rendered) => rendered,
        Err(err) => return format_failed(err),
    };
    let dst: &mut [u8] = if n == 0 {
        &mut []
    } else {
        unsafe { std::slice::from_raw_parts_mut(s.cast::<u8>(), n) }
    };
    c_len(copy_truncated(dst, &rendered))
}

// ---------------------------------------------------------------------------
// Unformatted output
// ---------------------------------------------------------------------------

/// C `fwrite`. Only stdout and stderr are writable; any other stream traps.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn fwrite(
    ptr: *const c_void,
    size: usize,
    nmemb: usize,
    stream: *mut c_void,
) -> usize {
    let Some(id) = output_stream(stream) else {
        trap(Capability::Fwrite)
    };
    let Some(total) = size.checked_mul(nmemb) else {
        set_abi_errno(libc::EINVAL);
        return 0;
    };
    if total == 0 {
        return 0;
    }
    if ptr.is_null() {
        set_abi_errno(libc::EINVAL);
        return 0;
    }
    let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), total) };
    match write_stream(id, bytes) {
        rc if rc < 0 => 0,
        rc => rc as usize / size,
    }
}

/// C `fflush`. Nothing is buffered, so flushing a standard stream (or all
/// streams, with NULL) succeeds immediately. Any other stream traps.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn fflush(stream: *mut c_void) -> c_int {
    if stream_id(stream).is_some() {
        return 0;
    }
    trap(Capability::Fflush)
}

/// C `putchar`.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn putchar(c: c_int) -> c_int {
    let byte = c as u8;
    if write_stream(StreamId::Stdout, &[byte]) == 1 {
        c_int::from(byte)
    } else {
        libc::EOF
    }
}

/// C `puts`: the string and a newline, to stdout.
#[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
pub unsafe extern "C" fn puts(s: *const c_char) -> c_int {
    let Some(bytes) = (unsafe { c_bytes_opt(s) }) else {
        set_abi_errno(libc::EINVAL);
        return libc::EOF;
    };
    let mut line = Vec::with_capacity(bytes.len() + 1);
    line.extend_from_slice(bytes);
    line.push(b'\n');
    if write_stream(StreamId::Stdout, &line) == line.len() as isize {
        0
    } else {
        libc::EOF
    }
}

// ---------------------------------------------------------------------------
// Traps
// ---------------------------------------------------------------------------

trap_fn! {
    /// C `fprintf`.
    fn fprintf(stream: *mut c_void, format: *const c_char; ...) -> c_int => Fprintf;
}

trap_fn! {
    /// C `snprintf`.
    fn snprintf(s: *mut c_char, n: usize, format: *const c_char; ...) -> c_int => Snprintf;
}

trap_fn! {
    /// C `sscanf`.
    fn sscanf(s: *const c_char, format: *const c_char; ...) -> c_int => Sscanf;
}

trap_fn! {
    /// C `fopen`.
    fn fopen(path: *const c_char, mode: *const c_char) -> *mut c_void => Fopen;
}

trap_fn! {
    /// C `fclose`.
    fn fclose(stream: *mut c_void) -> c_int => Fclose;
}

trap_fn! {
    /// C `fread`.
    fn fread(ptr: *mut c_void, size: usize, nmemb: usize, stream: *mut c_void) -> usize => Fread;
}

trap_fn! {
    /// C `fseek`.
    fn fseek(stream: *mut c_void, offset: c_long, whence: c_int) -> c_int => Fseek;
}

trap_fn! {
    /// C `ftell`.
    fn ftell(stream: *mut c_void) -> c_long => Ftell;
}
