//! Byte-string primitives behind the provided `<string.h>` symbols.
//!
//! Inputs are C strings without their terminator. C locale only.

use std::cmp::Ordering;

fn sign(ord: Ordering) -> i32 {
    match ord {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// `strcmp`: negative, zero or positive as `a` sorts before, equal to or
/// after `b`, comparing bytes as unsigned.
#[must_use]
pub fn compare(a: &[u8], b: &[u8]) -> i32 {
    sign(a.cmp(b))
}

/// `strcasecmp`: like [`compare`] after folding ASCII letters to lowercase.
#[must_use]
pub fn compare_ignore_ascii_case(a: &[u8], b: &[u8]) -> i32 {
    let lhs = a.iter().map(u8::to_ascii_lowercase);
    let rhs = b.iter().map(u8::to_ascii_lowercase);
    sign(lhs.cmp(rhs))
}

/// `strncpy`: copy at most `dst.len()` bytes of `src`, then fill the rest of
/// `dst` with NUL. Returns the number of bytes taken from `src`. When `src`
/// is at least as long as `dst`, `dst` is left unterminated.
pub fn copy_padded(dst: &mut [u8], src: &[u8]) -> usize {
    let n = dst.len().min(src.len());
    dst[..n].copy_from_slice(&src[..n]);
    dst[n..].fill(0);
    n
}

/// `strrchr`: offset of the last `c` in `s`. Searching for NUL finds the
/// terminator at `s.len()`.
#[must_use]
pub fn last_index_of(s: &[u8], c: u8) -> Option<usize> {
    if c == 0 {
        return Some(s.len());
    }
    s.iter().rposition(|&b| b == c)
}
