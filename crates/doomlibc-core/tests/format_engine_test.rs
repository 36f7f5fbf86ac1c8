//! End-to-end checks of the format engine against lines the game prints.

use doomlibc_core::ShimError;
use doomlibc_core::config::LogFormat;
use doomlibc_core::diag::DiagnosticRecord;
use doomlibc_core::stdio::{ArgSlot, StrLimit, arg_slots, parse_format_string, render_to_vec};
use doomlibc_core::va::{ArgCursor, ArgError, ArgKind, VaArg};

#[test]
fn startup_banner_lines() {
    let out = render_to_vec(
        b"Z_Init: Init zone memory allocation daemon. \nzone memory: %p, %x allocated for zone\n",
        &[VaArg::Ptr(0x1000), VaArg::Uint(0x600000)],
    )
    .unwrap();
    assert_eq!(
        String::from_utf8(out.bytes).unwrap(),
        "Z_Init: Init zone memory allocation daemon. \nzone memory: 0x1000, 600000 allocated for zone\n"
    );
    assert!(out.unsupported.is_empty());
}

#[test]
fn lump_names_are_clipped_to_eight() {
    let out = render_to_vec(
        b"W_GetNumForName: %.8s not found!",
        &[VaArg::Str(Some(b"DEMO1234extra"))],
    )
    .unwrap();
    assert_eq!(out.bytes, b"W_GetNumForName: DEMO1234 not found!");
}

#[test]
fn slots_drive_argument_collection() {
    let segments = parse_format_string(b"%s: %d%% of %*u (%f)");
    let slots = arg_slots(&segments).unwrap();
    assert_eq!(slots[0], ArgSlot::Str(StrLimit::Terminated));
    let kinds: Vec<ArgKind> = slots.into_iter().map(ArgSlot::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ArgKind::Str,
            ArgKind::Int,
            ArgKind::Int,
            ArgKind::Uint,
            ArgKind::Double
        ]
    );

    let args = [
        VaArg::Str(Some(b"load")),
        VaArg::Int(50),
        VaArg::Int(3),
        VaArg::Uint(7),
        VaArg::Double(0.25),
    ];
    let out = render_to_vec(b"%s: %d%% of %*u (%f)", &args).unwrap();
    assert_eq!(out.bytes, b"load: 50% of   7 ()");
    assert_eq!(out.unsupported, b"f");

    let line = DiagnosticRecord::unknown_specifier(out.unsupported[0]).render(LogFormat::Text);
    assert_eq!(line, b"unknown format specifier: f\n");
}

#[test]
fn lump_name_slots_never_read_past_eight_bytes() {
    let segments = parse_format_string(b"R_TextureNumForName: %.8s not found");
    assert_eq!(
        arg_slots(&segments).unwrap(),
        vec![ArgSlot::Str(StrLimit::Bytes(8))]
    );
}

#[test]
fn cursor_leftovers_are_visible() {
    let args = [VaArg::Int(1), VaArg::Int(2)];
    let mut cursor = ArgCursor::new(&args);
    assert_eq!(cursor.next_int(), Ok(1));
    assert_eq!(cursor.finish(), 1);
}

#[test]
fn short_argument_lists_fail_cleanly() {
    assert_eq!(
        render_to_vec(b"%s %s", &[VaArg::Str(None)]),
        Err(ShimError::Argument(ArgError::Exhausted {
            index: 1,
            available: 1
        }))
    );
}
