//! Stream handles and the error cell.

use std::collections::HashSet;
use std::ffi::c_void;

use doomlibc_abi::errno_abi::{__errno_location, abi_errno, errno, set_abi_errno};
use doomlibc_abi::stdio_abi::{fflush, stderr, stdin, stdout};
use doomlibc_core::context::{StreamHandle, StreamId};

#[test]
fn stream_handles_are_distinct_and_stable() {
    let first: Vec<usize> = [&stdin, &stdout, &stderr]
        .iter()
        .map(|h| h.as_raw())
        .collect();
    let unique: HashSet<usize> = first.iter().copied().collect();
    assert_eq!(unique.len(), 3);

    for _ in 0..100 {
        assert_eq!(stdin.as_raw(), first[0]);
        assert_eq!(stdout.as_raw(), first[1]);
        assert_eq!(stderr.as_raw(), first[2]);
    }
}

#[test]
fn handles_name_their_streams() {
    assert_eq!(StreamId::from_handle(stdin), Some(StreamId::Stdin));
    assert_eq!(StreamId::from_handle(stdout), Some(StreamId::Stdout));
    assert_eq!(StreamId::from_handle(stderr), Some(StreamId::Stderr));
    assert_eq!(StreamId::from_handle(StreamHandle::from_raw(7)), None);
}

#[test]
fn flushing_standard_streams_is_a_no_op() {
    for handle in [stdin, stdout, stderr] {
        assert_eq!(unsafe { fflush(handle.as_raw() as *mut c_void) }, 0);
    }
    assert_eq!(unsafe { fflush(std::ptr::null_mut()) }, 0);
}

#[test]
fn errno_reads_back_last_write() {
    let loc = unsafe { __errno_location() };
    assert!(!loc.is_null());
    assert_eq!(loc, unsafe { __errno_location() });

    for value in [libc::ENOENT, 0, libc::ENOMEM, -1, i32::MAX] {
        unsafe { *loc = value };
        assert_eq!(abi_errno(), value);
        assert_eq!(errno.get(), value);
        assert_eq!(abi_errno(), value, "reading must not change the cell");
    }

    set_abi_errno(libc::EBADF);
    assert_eq!(unsafe { *loc }, libc::EBADF);
}
