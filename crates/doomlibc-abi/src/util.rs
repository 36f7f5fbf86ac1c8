//! Shared internal utilities for ABI adapters.

use std::borrow::Cow;
use std::ffi::{CStr, c_char};

/// Scan a C string with an optional hard bound.
///
/// Returns `(len, terminated)`: the byte length before the first NUL (or the
/// bound), and whether a NUL was seen.
///
/// # Safety
///
/// `ptr` must be valid to read up to the discovered length (and bound when given).
pub unsafe fn scan_c_string(ptr: *const c_char, bound: Option<usize>) -> (usize, bool) {
    match bound {
        Some(limit) => {
            for i in 0..limit {
                if unsafe { *ptr.add(i) } == 0 {
                    return (i, true);
                }
            }
            (limit, false)
        }
        None => (unsafe { CStr::from_ptr(ptr) }.to_bytes().len(), true),
    }
}

/// Bytes of a C string without its terminator, `None` for NULL.
///
/// # Safety
///
/// A non-null `ptr` must point to a NUL-terminated string that outlives `'a`.
pub unsafe fn c_bytes_opt<'a>(ptr: *const c_char) -> Option<&'a [u8]> {
    if ptr.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(ptr) }.to_bytes())
    }
}

/// Bytes of a C string read no further than `bound`, `None` for NULL.
///
/// # Safety
///
/// A non-null `ptr` must be readable up to its NUL or `bound` bytes,
/// whichever comes first, for `'a`.
pub unsafe fn c_bytes_bounded<'a>(ptr: *const c_char, bound: Option<usize>) -> Option<&'a [u8]> {
    if ptr.is_null() {
        return None;
    }
    let (len, _) = unsafe { scan_c_string(ptr, bound) };
    Some(unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) })
}

/// Like [`c_bytes_opt`], treating NULL as the empty string.
///
/// # Safety
///
/// Same as [`c_bytes_opt`].
pub unsafe fn c_bytes<'a>(ptr: *const c_char) -> &'a [u8] {
    unsafe { c_bytes_opt(ptr) }.unwrap_or_default()
}

/// A C string for display: lossy UTF-8, `(null)` for NULL.
///
/// # Safety
///
/// Same as [`c_bytes_opt`].
pub unsafe fn c_str_lossy<'a>(ptr: *const c_char) -> Cow<'a, str> {
    match unsafe { c_bytes_opt(ptr) } {
        Some(bytes) => String::from_utf8_lossy(bytes),
        None => Cow::Borrowed("(null)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_scan_stops_at_limit() {
        let s = c"E1M1";
        assert_eq!(unsafe { scan_c_string(s.as_ptr(), Some(2)) }, (2, false));
        assert_eq!(unsafe { scan_c_string(s.as_ptr(), Some(8)) }, (4, true));
        assert_eq!(unsafe { scan_c_string(s.as_ptr(), None) }, (4, true));
    }

    #[test]
    fn bounded_bytes_accept_unterminated_arrays() {
        let lump = *b"TEXTURE1";
        let ptr = lump.as_ptr().cast::<c_char>();
        assert_eq!(unsafe { c_bytes_bounded(ptr, Some(8)) }, Some(&b"TEXTURE1"[..]));
        assert_eq!(unsafe { c_bytes_bounded(ptr, Some(3)) }, Some(&b"TEX"[..]));
        assert_eq!(unsafe { c_bytes_bounded(c"E1".as_ptr(), Some(8)) }, Some(&b"E1"[..]));
        assert_eq!(unsafe { c_bytes_bounded(c"E1".as_ptr(), None) }, Some(&b"E1"[..]));
        assert_eq!(unsafe { c_bytes_bounded(std::ptr::null(), Some(8)) }, None);
    }

    #[test]
    fn null_is_handled() {
        assert_eq!(unsafe { c_bytes_opt(std::ptr::null()) }, None);
        assert_eq!(unsafe { c_bytes(std::ptr::null()) }, b"");
        assert_eq!(unsafe { c_str_lossy(std::ptr::null()) }, "(null)");
        assert_eq!(unsafe { c_str_lossy(c"doom".as_ptr()) }, "doom");
    }
}
