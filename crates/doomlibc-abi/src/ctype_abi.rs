//! ABI layer for `<ctype.h>`. Classification is not provided.

use std::ffi::c_int;

trap_fn! {
    /// C `isspace`.
    fn isspace(c: c_int) -> c_int => Isspace;
}

trap_fn! {
    /// C `toupper`.
    fn toupper(c: c_int) -> c_int => Toupper;
}
