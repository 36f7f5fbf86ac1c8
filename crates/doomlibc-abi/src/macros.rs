//! Helper macros for ABI function generation.
//!
//! - `trap_fn!` generates an exported `extern "C"` stub whose whole body is a
//!   trap through the failure reporter.
//! - `collect_va_args!` drains a C argument list into typed `VaArg`s.

/// Generate an exported stub that traps as the given capability.
///
/// ```ignore
/// trap_fn! {
///     /// C `strdup`.
///     fn strdup(s: *const c_char) -> *mut c_char => Strdup;
/// }
/// ```
///
/// Ending the parameter list with `; ...` makes the stub C-variadic. The
/// arguments are never read.
macro_rules! trap_fn {
    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty => $cap:ident;
    ) => {
        $(#[$meta])*
        #[allow(unused_variables)]
        #[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret {
            $crate::trap_abi::trap(::doomlibc_core::Capability::$cap)
        }
    };

    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),+ ; ... ) -> $ret:ty => $cap:ident;
    ) => {
        $(#[$meta])*
        #[allow(unused_variables)]
        #[cfg_attr(not(debug_assertions), unsafe(no_mangle))]
        pub unsafe extern "C" fn $name( $($arg : $argty),+ , _: ... ) -> $ret {
            $crate::trap_abi::trap(::doomlibc_core::Capability::$cap)
        }
    };
}

/// Drain one C argument per entry of `$slots` from `$args` (a `...`
/// parameter or a `VaList`) into a `Vec<VaArg>`.
///
/// A macro so the same code serves both argument-list types. Integers are
/// fetched at full register width and narrowed later by the format engine.
/// A string with a precision is read no further than that many bytes, since
/// C allows `%.8s` on an unterminated array.
macro_rules! collect_va_args {
    ($slots:expr, $args:expr) => {{
        use ::doomlibc_core::stdio::ArgSlot;
        use ::doomlibc_core::va::VaArg;
        let slots: &[ArgSlot] = $slots;
        let mut collected: Vec<VaArg<'_>> = Vec::with_capacity(slots.len());
        for slot in slots {
            let arg = match *slot {
                ArgSlot::Int => VaArg::Int(unsafe { $args.next_arg::<i64>() }),
                ArgSlot::Uint => VaArg::Uint(unsafe { $args.next_arg::<u64>() }),
                ArgSlot::Double => VaArg::Double(unsafe { $args.next_arg::<f64>() }),
                ArgSlot::Ptr => VaArg::Ptr(unsafe { $args.next_arg::<usize>() }),
                ArgSlot::Str(limit) => {
                    let bound = limit.bound(collected.last());
                    let ptr = unsafe { $args.next_arg::<*const ::std::ffi::c_char>() };
                    VaArg::Str(unsafe { $crate::util::c_bytes_bounded(ptr, bound) })
                }
            };
            collected.push(arg);
        }
        collected
    }};
}
