//! Unbuffered console output.
//!
//! Everything the shim prints goes straight to a descriptor with
//! `write(2)`. There is no stream buffering, so `fflush` has nothing to do.

use std::ffi::c_int;

use doomlibc_core::config;
use doomlibc_core::context::StreamId;
use doomlibc_core::diag::{DiagnosticRecord, DiagnosticSink, emit};

use crate::errno_abi::set_abi_errno;

/// Write all of `bytes` to `fd`.
///
/// Returns the number of bytes written, or -1 with `errno` set when nothing
/// could be written. A short count means the descriptor stopped accepting
/// data part way.
pub fn write_all(fd: c_int, bytes: &[u8]) -> isize {
    let mut done = 0usize;
    while done < bytes.len() {
        let rest = &bytes[done..];
        // SAFETY: `rest` is a live slice for the duration of the call.
        let rc = unsafe { libc::write(fd, rest.as_ptr().cast(), rest.len()) };
        if rc <= 0 {
            if done == 0 {
                set_abi_errno(libc::EIO);
                return -1;
            }
            break;
        }
        done += rc as usize;
    }
    done as isize
}

/// Write to a standard stream. Standard input is not writable.
pub fn write_stream(stream: StreamId, bytes: &[u8]) -> isize {
    if !stream.is_writable() {
        set_abi_errno(libc::EBADF);
        return -1;
    }
    write_all(stream.fd(), bytes)
}

/// Diagnostic sink on file descriptor 2.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn write_line(&mut self, line: &[u8]) {
        // A failed diagnostic write has nowhere left to be reported.
        let _ = write_stream(StreamId::Stderr, line);
    }
}

/// Emit `record` on stderr in the configured log format.
pub fn diagnose(record: &DiagnosticRecord) {
    emit(record, config::log_format(), &mut StderrSink);
}
