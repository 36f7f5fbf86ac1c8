//! Process-wide context: standard stream identities and the error status cell.
//!
//! The hosted program reads `stdin`/`stdout`/`stderr` and reads and writes
//! `errno` directly, so both have to be plain data symbols. This module gives
//! them types with the same layout as the C declarations (`FILE *` and
//! `int`) instead of bare mutable globals.

use std::ffi::c_int;
use std::sync::atomic::{AtomicI32, Ordering};

/// Data symbols the ABI crate exports besides the capability functions.
pub const GLOBAL_SYMBOLS: &[&str] = &["errno", "stdin", "stdout", "stderr"];

/// Opaque `FILE *` value handed to C for a standard stream.
///
/// Identity is the descriptor number of the stream. Nothing behind the
/// pointer is ever dereferenced.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(usize);

impl StreamHandle {
    pub const STDIN: Self = Self(0);
    pub const STDOUT: Self = Self(1);
    pub const STDERR: Self = Self(2);

    #[must_use]
    pub const fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn as_raw(self) -> usize {
        self.0
    }
}

/// The three standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamId {
    Stdin,
    Stdout,
    Stderr,
}

impl StreamId {
    pub const ALL: [StreamId; 3] = [Self::Stdin, Self::Stdout, Self::Stderr];

    #[must_use]
    pub const fn handle(self) -> StreamHandle {
        match self {
            Self::Stdin => StreamHandle::STDIN,
            Self::Stdout => StreamHandle::STDOUT,
            Self::Stderr => StreamHandle::STDERR,
        }
    }

    /// File descriptor backing the stream.
    #[must_use]
    pub const fn fd(self) -> c_int {
        self.handle().as_raw() as c_int
    }

    /// Map a `FILE *` value back to a standard stream, if it is one.
    #[must_use]
    pub const fn from_handle(handle: StreamHandle) -> Option<Self> {
        match handle.as_raw() {
            0 => Some(Self::Stdin),
            1 => Some(Self::Stdout),
            2 => Some(Self::Stderr),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(self, Self::Stdin)
    }
}

/// The `errno` cell: one `int`, readable and writable by anyone.
///
/// Layout-compatible with `int`, so C code that declares `extern int errno`
/// reads and writes it in place. Relaxed atomics keep it a single-writer
/// cell without locking.
#[repr(transparent)]
#[derive(Debug, Default)]
pub struct StatusCell(AtomicI32);

impl StatusCell {
    #[must_use]
    pub const fn new(value: c_int) -> Self {
        Self(AtomicI32::new(value))
    }

    #[must_use]
    pub fn get(&self) -> c_int {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, value: c_int) {
        self.0.store(value, Ordering::Relaxed);
    }

    /// Pointer handed out by `__errno_location`.
    #[must_use]
    pub fn as_ptr(&self) -> *mut c_int {
        self.0.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_handles_are_distinct() {
        let handles: Vec<usize> = StreamId::ALL.iter().map(|s| s.handle().as_raw()).collect();
        assert_eq!(handles, vec![0, 1, 2]);
    }

    #[test]
    fn handles_map_back_to_streams() {
        for id in StreamId::ALL {
            assert_eq!(StreamId::from_handle(id.handle()), Some(id));
        }
        assert_eq!(StreamId::from_handle(StreamHandle::from_raw(3)), None);
        assert_eq!(
            StreamId::from_handle(StreamHandle::from_raw(0x7fff_0000)),
            None
        );
    }

    #[test]
    fn only_stdin_is_read_only() {
        assert!(!StreamId::Stdin.is_writable());
        assert!(StreamId::Stdout.is_writable());
        assert!(StreamId::Stderr.is_writable());
        assert_eq!(StreamId::Stderr.fd(), 2);
    }

    #[test]
    fn status_cell_reads_back_last_write() {
        let cell = StatusCell::new(0);
        assert_eq!(cell.get(), 0);
        cell.set(22);
        assert_eq!(cell.get(), 22);
        assert_eq!(cell.get(), 22);
        cell.set(-1);
        assert_eq!(cell.get(), -1);
    }

    #[test]
    fn status_cell_pointer_aliases_the_value() {
        let cell = StatusCell::new(5);
        assert!(!cell.as_ptr().is_null());
        assert_eq!(cell.as_ptr(), cell.as_ptr());
        assert_eq!(std::mem::size_of::<StatusCell>(), std::mem::size_of::<c_int>());
    }
}
