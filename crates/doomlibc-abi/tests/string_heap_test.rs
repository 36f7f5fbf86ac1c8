//! Provided string and heap bodies, called through the C signatures.

use std::ffi::{CStr, c_char, c_void};
use std::ptr;

use doomlibc_abi::errno_abi::abi_errno;
use doomlibc_abi::malloc_abi::{calloc, free, malloc, realloc};
use doomlibc_abi::string_abi::{strcasecmp, strcmp, strncpy, strrchr};

#[test]
fn strcmp_orders_lump_names() {
    unsafe {
        assert_eq!(strcmp(c"PLAYPAL".as_ptr(), c"PLAYPAL".as_ptr()), 0);
        assert!(strcmp(c"E1M1".as_ptr(), c"E1M2".as_ptr()) < 0);
        assert!(strcmp(c"MAP10".as_ptr(), c"MAP1".as_ptr()) > 0);
        assert_eq!(strcasecmp(c"doom1.wad".as_ptr(), c"DOOM1.WAD".as_ptr()), 0);
        assert!(strcasecmp(c"a".as_ptr(), c"B".as_ptr()) < 0);
    }
}

#[test]
fn strncpy_pads_and_truncates() {
    let mut buf = [0x55 as c_char; 8];
    let ret = unsafe { strncpy(buf.as_mut_ptr(), c"MAP01".as_ptr(), buf.len()) };
    assert_eq!(ret, buf.as_mut_ptr());
    let bytes: Vec<u8> = buf.iter().map(|&c| c as u8).collect();
    assert_eq!(bytes, b"MAP01\0\0\0");

    let mut short = [0x55 as c_char; 4];
    unsafe { strncpy(short.as_mut_ptr(), c"TEXTURE1".as_ptr(), short.len()) };
    let bytes: Vec<u8> = short.iter().map(|&c| c as u8).collect();
    assert_eq!(bytes, b"TEXT");
}

#[test]
fn strrchr_finds_last_separator() {
    let path = c"/usr/share/games/doom/doom1.wad";
    let base = path.as_ptr();
    unsafe {
        let hit = strrchr(base, i32::from(b'/'));
        assert_eq!(CStr::from_ptr(hit), c"/doom1.wad");

        let end = strrchr(base, 0);
        assert_eq!(end.cast_const(), base.add(path.to_bytes().len()));

        assert!(strrchr(base, i32::from(b'!')).is_null());
    }
}

#[test]
fn heap_round_trip() {
    unsafe {
        let p = malloc(64).cast::<u8>();
        assert!(!p.is_null());
        p.write_bytes(0xAB, 64);

        let q = realloc(p.cast::<c_void>(), 4096).cast::<u8>();
        assert!(!q.is_null());
        assert_eq!(*q, 0xAB);
        assert_eq!(*q.add(63), 0xAB);

        free(q.cast());
        free(ptr::null_mut());
    }
}

#[test]
fn calloc_zeroes_and_checks_overflow() {
    unsafe {
        let p = calloc(16, 8).cast::<u8>();
        assert!(!p.is_null());
        assert!(std::slice::from_raw_parts(p, 128).iter().all(|&b| b == 0));
        free(p.cast());

        assert!(calloc(usize::MAX, 2).is_null());
        assert_eq!(abi_errno(), libc::ENOMEM);
    }
}

#[test]
fn realloc_edges() {
    unsafe {
        let p = realloc(ptr::null_mut(), 32);
        assert!(!p.is_null());
        assert!(realloc(p, 0).is_null());
    }
}
