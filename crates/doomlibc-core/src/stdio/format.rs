//! Minimal printf engine.
//!
//! Parses the full directive grammar (flags, width, precision, length) so
//! every directive consumes the right number and kind of arguments, but only
//! renders the conversions the hosted game actually prints:
//! `d i u x X c s p` and `%%`. Floating-point, `o` and `n` conversions are
//! recognised, their argument is consumed, and they are reported back as
//! unsupported instead of rendered.
//!
//! Long double conversions (`%Lf` and friends) are rejected outright: their
//! argument cannot be fetched through a C argument list, and skipping it would
//! shift every later argument.

use thiserror::Error;

use crate::error::ShimError;
use crate::va::{ArgCursor, ArgError, ArgKind, VaArg};

/// Largest field width or precision, C's `INT_MAX`.
pub const MAX_FIELD: usize = i32::MAX as usize;

/// Errors from rendering a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error(transparent)]
    Argument(#[from] ArgError),
    #[error("field width or precision {0} exceeds INT_MAX")]
    FieldOverflow(usize),
    #[error("long double conversion %L{0} is not supported")]
    LongDouble(char),
}

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    Hh,
    H,
    L,
    Ll,
    /// `L`: long double for floats, same as `ll` for integers.
    BigL,
    Z,
    J,
    T,
}

/// One parsed `%` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: u8,
}

impl FormatSpec {
    /// Kind of the argument the conversion itself consumes.
    #[must_use]
    pub fn arg_kind(&self) -> ArgKind {
        match self.conversion {
            b'd' | b'i' | b'c' => ArgKind::Int,
            b'u' | b'x' | b'X' | b'o' => ArgKind::Uint,
            b's' => ArgKind::Str,
            b'p' | b'n' => ArgKind::Ptr,
            _ => ArgKind::Double,
        }
    }

    /// `%Lf`, `%Lg` and the other long double conversions.
    #[must_use]
    pub fn is_long_double(&self) -> bool {
        self.length == LengthMod::BigL && self.arg_kind() == ArgKind::Double
    }
}

/// A piece of a parsed format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment<'a> {
    Literal(&'a [u8]),
    /// `%%`.
    Percent,
    Spec(FormatSpec),
}

fn parse_decimal(digits: &[u8]) -> usize {
    digits.iter().fold(0usize, |acc, &d| {
        acc.saturating_mul(10).saturating_add(usize::from(d - b'0'))
    })
}

/// Parse one directive. `fmt` starts right after the `%`.
///
/// Returns the spec and the number of bytes consumed, or `None` when the
/// directive is malformed.
#[must_use]
pub fn parse_format_spec(fmt: &[u8]) -> Option<(FormatSpec, usize)> {
    let mut pos = 0;
    let len = fmt.len();

    let mut flags = FormatFlags::default();
    while pos < len {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'+' => flags.force_sign = true,
            b' ' => flags.space_sign = true,
            b'#' => flags.alt_form = true,
            b'0' => flags.zero_pad = true,
            _ => break,
        }
        pos += 1;
    }
    if flags.force_sign {
        flags.space_sign = false;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    let width = if pos < len && fmt[pos] == b'*' {
        pos += 1;
        Width::FromArg
    } else {
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > start {
            Width::Fixed(parse_decimal(&fmt[start..pos]))
        } else {
            Width::None
        }
    };

    let precision = if pos < len && fmt[pos] == b'.' {
        pos += 1;
        if pos < len && fmt[pos] == b'*' {
            pos += 1;
            Precision::FromArg
        } else {
            let start = pos;
            while pos < len && fmt[pos].is_ascii_digit() {
                pos += 1;
            }
            Precision::Fixed(parse_decimal(&fmt[start..pos]))
        }
    } else {
        Precision::None
    };

    let length = match fmt.get(pos) {
        Some(b'h') if fmt.get(pos + 1) == Some(&b'h') => {
            pos += 2;
            LengthMod::Hh
        }
        Some(b'h') => {
            pos += 1;
            LengthMod::H
        }
        Some(b'l') if fmt.get(pos + 1) == Some(&b'l') => {
            pos += 2;
            LengthMod::Ll
        }
        Some(b'l') => {
            pos += 1;
            LengthMod::L
        }
        Some(b'z') => {
            pos += 1;
            LengthMod::Z
        }
        Some(b'L') => {
            pos += 1;
            LengthMod::BigL
        }
        Some(b'j') => {
            pos += 1;
            LengthMod::J
        }
        Some(b't') => {
            pos += 1;
            LengthMod::T
        }
        _ => LengthMod::None,
    };

    let conversion = *fmt.get(pos)?;
    pos += 1;
    match conversion {
        b'd' | b'i' | b'u' | b'x' | b'X' | b'o' | b's' | b'c' | b'p' | b'n' | b'f' | b'F'
        | b'e' | b'E' | b'g' | b'G' | b'a' | b'A' => {}
        _ => return None,
    }

    Some((
        FormatSpec {
            flags,
            width,
            precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Split a format string into literal runs and directives.
///
/// A malformed directive, or a trailing lone `%`, is kept as a literal `%`
/// and parsing resumes right after it.
#[must_use]
pub fn parse_format_string(fmt: &[u8]) -> Vec<FormatSegment<'_>> {
    let mut segments = Vec::new();
    let mut pos = 0;
    let len = fmt.len();

    while pos < len {
        let start = pos;
        while pos < len && fmt[pos] != b'%' {
            pos += 1;
        }
        if pos > start {
            segments.push(FormatSegment::Literal(&fmt[start..pos]));
        }
        if pos >= len {
            break;
        }
        pos += 1;
        if pos >= len {
            segments.push(FormatSegment::Literal(&fmt[pos - 1..pos]));
            break;
        }
        if fmt[pos] == b'%' {
            segments.push(FormatSegment::Percent);
            pos += 1;
            continue;
        }
        match parse_format_spec(&fmt[pos..]) {
            Some((spec, consumed)) => {
                pos += consumed;
                segments.push(FormatSegment::Spec(spec));
            }
            None => segments.push(FormatSegment::Literal(&fmt[pos - 1..pos])),
        }
    }
    segments
}

/// How many bytes of a `%s` argument may be read.
///
/// With a precision the argument may be an unterminated array, so it must
/// not be scanned past that many bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrLimit {
    /// Up to the terminating NUL.
    Terminated,
    Bytes(usize),
    /// Bounded by the `.*` argument drained right before the string.
    PreviousArg,
}

impl StrLimit {
    /// The byte bound, given the argument collected just before the string.
    /// A negative `.*` precision counts as no precision.
    #[must_use]
    pub fn bound(self, previous: Option<&VaArg<'_>>) -> Option<usize> {
        match self {
            StrLimit::Terminated => None,
            StrLimit::Bytes(n) => Some(n),
            StrLimit::PreviousArg => match previous {
                Some(VaArg::Int(p)) => usize::try_from(*p as i32).ok(),
                _ => None,
            },
        }
    }
}

/// One trailing argument a format string consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSlot {
    Int,
    Uint,
    Double,
    Ptr,
    Str(StrLimit),
}

impl ArgSlot {
    #[must_use]
    pub fn kind(self) -> ArgKind {
        match self {
            ArgSlot::Int => ArgKind::Int,
            ArgSlot::Uint => ArgKind::Uint,
            ArgSlot::Double => ArgKind::Double,
            ArgSlot::Ptr => ArgKind::Ptr,
            ArgSlot::Str(_) => ArgKind::Str,
        }
    }
}

/// The trailing arguments `segments` consume, in order.
///
/// This is what the ABI layer uses to drain a C argument list. Fails before
/// anything is drained if a directive needs a long double.
pub fn arg_slots(segments: &[FormatSegment<'_>]) -> Result<Vec<ArgSlot>, FormatError> {
    let mut slots = Vec::new();
    for seg in segments {
        let FormatSegment::Spec(spec) = seg else {
            continue;
        };
        if spec.is_long_double() {
            return Err(FormatError::LongDouble(char::from(spec.conversion)));
        }
        if spec.width == Width::FromArg {
            slots.push(ArgSlot::Int);
        }
        if spec.precision == Precision::FromArg {
            slots.push(ArgSlot::Int);
        }
        slots.push(match spec.arg_kind() {
            ArgKind::Int => ArgSlot::Int,
            ArgKind::Uint => ArgSlot::Uint,
            ArgKind::Double => ArgSlot::Double,
            ArgKind::Ptr => ArgSlot::Ptr,
            ArgKind::Str => ArgSlot::Str(match spec.precision {
                Precision::None => StrLimit::Terminated,
                Precision::Fixed(p) => StrLimit::Bytes(p),
                Precision::FromArg => StrLimit::PreviousArg,
            }),
        });
    }
    Ok(slots)
}

/// Width and precision after `*` arguments have been applied.
struct Resolved {
    flags: FormatFlags,
    width: usize,
    precision: Option<usize>,
}

fn check_field(value: usize) -> Result<usize, FormatError> {
    if value > MAX_FIELD {
        Err(FormatError::FieldOverflow(value))
    } else {
        Ok(value)
    }
}

fn resolve(spec: &FormatSpec, cursor: &mut ArgCursor<'_, '_>) -> Result<Resolved, FormatError> {
    let mut flags = spec.flags;
    let width = match spec.width {
        Width::None => 0,
        Width::Fixed(w) => w,
        Width::FromArg => {
            let w = cursor.next_int()? as i32;
            if w < 0 {
                flags.left_justify = true;
                flags.zero_pad = false;
            }
            w.unsigned_abs() as usize
        }
    };
    let precision = match spec.precision {
        Precision::None => None,
        Precision::Fixed(p) => Some(p),
        Precision::FromArg => {
            let p = cursor.next_int()? as i32;
            usize::try_from(p).ok()
        }
    };
    Ok(Resolved {
        flags,
        width: check_field(width)?,
        precision: precision.map(check_field).transpose()?,
    })
}

fn pad(out: &mut Vec<u8>, byte: u8, count: usize) {
    out.extend(std::iter::repeat_n(byte, count));
}

/// Emit `body` padded to the resolved width with spaces.
fn emit_padded(body: &[u8], r: &Resolved, out: &mut Vec<u8>) {
    let fill = r.width.saturating_sub(body.len());
    if r.flags.left_justify {
        out.extend_from_slice(body);
        pad(out, b' ', fill);
    } else {
        pad(out, b' ', fill);
        out.extend_from_slice(body);
    }
}

/// Emit a number made of `sign`, `prefix` and `digits`, honoring precision,
/// zero padding and justification.
fn emit_number(sign: &[u8], prefix: &[u8], digits: &[u8], r: &Resolved, out: &mut Vec<u8>) {
    let digits: &[u8] = if r.precision == Some(0) && digits == b"0" {
        b""
    } else {
        digits
    };
    let min_digits = r.precision.unwrap_or(0).max(digits.len());
    let body_len = sign.len().saturating_add(prefix.len()).saturating_add(min_digits);
    let fill = r.width.saturating_sub(body_len);

    if r.flags.left_justify {
        out.extend_from_slice(sign);
        out.extend_from_slice(prefix);
        pad(out, b'0', min_digits - digits.len());
        out.extend_from_slice(digits);
        pad(out, b' ', fill);
    } else if r.flags.zero_pad && r.precision.is_none() {
        out.extend_from_slice(sign);
        out.extend_from_slice(prefix);
        pad(out, b'0', fill + min_digits - digits.len());
        out.extend_from_slice(digits);
    } else {
        pad(out, b' ', fill);
        out.extend_from_slice(sign);
        out.extend_from_slice(prefix);
        pad(out, b'0', min_digits - digits.len());
        out.extend_from_slice(digits);
    }
}

fn narrow_signed(value: i64, length: LengthMod) -> i64 {
    match length {
        LengthMod::Hh => i64::from(value as i8),
        LengthMod::H => i64::from(value as i16),
        LengthMod::None => i64::from(value as i32),
        _ => value,
    }
}

fn narrow_unsigned(value: u64, length: LengthMod) -> u64 {
    match length {
        LengthMod::Hh => u64::from(value as u8),
        LengthMod::H => u64::from(value as u16),
        LengthMod::None => u64::from(value as u32),
        _ => value,
    }
}

fn render_spec(
    spec: &FormatSpec,
    cursor: &mut ArgCursor<'_, '_>,
    out: &mut Vec<u8>,
) -> Result<bool, FormatError> {
    let r = resolve(spec, cursor)?;
    match spec.conversion {
        b'd' | b'i' => {
            let value = narrow_signed(cursor.next_int()?, spec.length);
            let sign: &[u8] = if value < 0 {
                b"-"
            } else if r.flags.force_sign {
                b"+"
            } else if r.flags.space_sign {
                b" "
            } else {
                b""
            };
            let digits = value.unsigned_abs().to_string();
            emit_number(sign, b"", digits.as_bytes(), &r, out);
        }
        b'u' | b'x' | b'X' => {
            let value = narrow_unsigned(cursor.next_uint()?, spec.length);
            let digits = match spec.conversion {
                b'x' => format!("{value:x}"),
                b'X' => format!("{value:X}"),
                _ => value.to_string(),
            };
            let prefix: &[u8] = match spec.conversion {
                b'x' if r.flags.alt_form && value != 0 => b"0x",
                b'X' if r.flags.alt_form && value != 0 => b"0X",
                _ => b"",
            };
            emit_number(b"", prefix, digits.as_bytes(), &r, out);
        }
        b'c' => {
            let byte = cursor.next_int()? as u8;
            emit_padded(&[byte], &r, out);
        }
        b's' => {
            let bytes = cursor.next_str()?.unwrap_or(b"(null)");
            let shown = match r.precision {
                Some(p) => &bytes[..p.min(bytes.len())],
                None => bytes,
            };
            emit_padded(shown, &r, out);
        }
        b'p' => {
            let addr = cursor.next_ptr()?;
            emit_padded(format!("{addr:#x}").as_bytes(), &r, out);
        }
        _ => {
            if spec.is_long_double() {
                return Err(FormatError::LongDouble(char::from(spec.conversion)));
            }
            match spec.arg_kind() {
                ArgKind::Ptr => cursor.next_ptr().map(drop)?,
                ArgKind::Uint => cursor.next_uint().map(drop)?,
                _ => cursor.next_double().map(drop)?,
            }
            return Ok(false);
        }
    }
    Ok(true)
}

/// Render `segments` into `out`, fetching arguments from `cursor`.
///
/// Returns the conversion characters that were consumed but not rendered.
pub fn render(
    segments: &[FormatSegment<'_>],
    cursor: &mut ArgCursor<'_, '_>,
    out: &mut Vec<u8>,
) -> Result<Vec<u8>, FormatError> {
    let mut unsupported = Vec::new();
    for seg in segments {
        match seg {
            FormatSegment::Literal(lit) => out.extend_from_slice(lit),
            FormatSegment::Percent => out.push(b'%'),
            FormatSegment::Spec(spec) => {
                if !render_spec(spec, cursor, out)? {
                    unsupported.push(spec.conversion);
                }
            }
        }
    }
    Ok(unsupported)
}

/// Output of [`render_to_vec`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    /// Conversions that were skipped, in order of appearance.
    pub unsupported: Vec<u8>,
}

/// Parse `fmt` and render it against an explicit argument sequence.
pub fn render_to_vec(fmt: &[u8], args: &[VaArg<'_>]) -> Result<Rendered, ShimError> {
    let segments = parse_format_string(fmt);
    let mut cursor = ArgCursor::new(args);
    let mut bytes = Vec::with_capacity(fmt.len() + 16);
    let unsupported = render(&segments, &mut cursor, &mut bytes)?;
    Ok(Rendered { bytes, unsupported })
}
