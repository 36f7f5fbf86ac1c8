//! GNU ld version script for the `cdylib`.
//!
//! Lists every capability symbol and every global, and hides everything
//! else, so Rust internals never leak into the dynamic symbol table.

use doomlibc_core::Capability;
use doomlibc_core::context::GLOBAL_SYMBOLS;

/// Version node name.
pub const VERSION_NODE: &str = "DOOMLIBC_1.0";

/// Exported symbols in script order: capabilities, then globals.
#[must_use]
pub fn exported_symbols() -> Vec<&'static str> {
    Capability::ALL
        .iter()
        .map(|cap| cap.symbol())
        .chain(GLOBAL_SYMBOLS.iter().copied())
        .collect()
}

#[must_use]
pub fn render() -> String {
    let mut out = String::from("# Generated by `harness version-script`. Do not edit.\n");
    out.push_str(VERSION_NODE);
    out.push_str(" {\n  global:\n");
    for symbol in exported_symbols() {
        out.push_str("    ");
        out.push_str(symbol);
        out.push_str(";\n");
    }
    out.push_str("  local:\n    *;\n};\n");
    out
}
