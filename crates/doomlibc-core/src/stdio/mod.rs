//! Standard I/O helpers.

pub mod format;

pub use format::{
    ArgSlot, FormatError, FormatSegment, FormatSpec, Rendered, StrLimit, arg_slots,
    parse_format_string, render, render_to_vec,
};
