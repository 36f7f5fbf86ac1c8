//! Typed variadic arguments.
//!
//! C passes trailing arguments through an untyped cursor whose count and
//! types are only known by convention. The ABI layer drains that cursor once,
//! guided by the format string, into an ordered `&[VaArg]`. Everything after
//! that point walks the slice with an [`ArgCursor`], which checks both the
//! count and the kind of every fetch.

use thiserror::Error;

/// One trailing argument, already fetched from the C argument list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VaArg<'a> {
    /// Signed integer, widened to 64 bits.
    Int(i64),
    /// Unsigned integer, widened to 64 bits.
    Uint(u64),
    Double(f64),
    /// Pointer value, not dereferenced.
    Ptr(usize),
    /// Bytes of a C string (without the terminator); `None` for NULL.
    Str(Option<&'a [u8]>),
}

/// Kind tag of a [`VaArg`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Int,
    Uint,
    Double,
    Ptr,
    Str,
}

impl VaArg<'_> {
    #[must_use]
    pub const fn kind(&self) -> ArgKind {
        match self {
            Self::Int(_) => ArgKind::Int,
            Self::Uint(_) => ArgKind::Uint,
            Self::Double(_) => ArgKind::Double,
            Self::Ptr(_) => ArgKind::Ptr,
            Self::Str(_) => ArgKind::Str,
        }
    }
}

/// Cursor misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("variadic argument {index} requested but only {available} supplied")]
    Exhausted { index: usize, available: usize },
    #[error("variadic argument {index} is {found:?}, expected {expected:?}")]
    KindMismatch {
        index: usize,
        expected: ArgKind,
        found: ArgKind,
    },
}

/// Position within a typed argument sequence.
///
/// `ArgCursor::new` begins iteration, the `next_*` methods fetch, and
/// [`ArgCursor::finish`] ends it. The cursor borrows the sequence, so it
/// cannot outlive the call that owns the arguments.
#[derive(Debug, Clone)]
pub struct ArgCursor<'s, 'a> {
    args: &'s [VaArg<'a>],
    pos: usize,
}

impl<'s, 'a> ArgCursor<'s, 'a> {
    #[must_use]
    pub const fn new(args: &'s [VaArg<'a>]) -> Self {
        Self { args, pos: 0 }
    }

    /// Number of arguments fetched so far.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.args.len() - self.pos
    }

    fn take(&mut self) -> Result<(usize, VaArg<'a>), ArgError> {
        let index = self.pos;
        let arg = *self.args.get(index).ok_or(ArgError::Exhausted {
            index,
            available: self.args.len(),
        })?;
        self.pos += 1;
        Ok((index, arg))
    }

    fn mismatch(index: usize, expected: ArgKind, found: &VaArg<'_>) -> ArgError {
        ArgError::KindMismatch {
            index,
            expected,
            found: found.kind(),
        }
    }

    /// Fetch the next argument whatever its kind.
    pub fn next_any(&mut self) -> Result<VaArg<'a>, ArgError> {
        self.take().map(|(_, arg)| arg)
    }

    /// Fetch a signed integer. Unsigned values are reinterpreted, as C's
    /// `va_arg` does for same-width integer types.
    pub fn next_int(&mut self) -> Result<i64, ArgError> {
        match self.take()? {
            (_, VaArg::Int(v)) => Ok(v),
            (_, VaArg::Uint(v)) => Ok(v as i64),
            (index, other) => Err(Self::mismatch(index, ArgKind::Int, &other)),
        }
    }

    pub fn next_uint(&mut self) -> Result<u64, ArgError> {
        match self.take()? {
            (_, VaArg::Uint(v)) => Ok(v),
            (_, VaArg::Int(v)) => Ok(v as u64),
            (index, other) => Err(Self::mismatch(index, ArgKind::Uint, &other)),
        }
    }

    pub fn next_double(&mut self) -> Result<f64, ArgError> {
        match self.take()? {
            (_, VaArg::Double(v)) => Ok(v),
            (index, other) => Err(Self::mismatch(index, ArgKind::Double, &other)),
        }
    }

    pub fn next_ptr(&mut self) -> Result<usize, ArgError> {
        match self.take()? {
            (_, VaArg::Ptr(v)) => Ok(v),
            (index, other) => Err(Self::mismatch(index, ArgKind::Ptr, &other)),
        }
    }

    pub fn next_str(&mut self) -> Result<Option<&'a [u8]>, ArgError> {
        match self.take()? {
            (_, VaArg::Str(v)) => Ok(v),
            (index, other) => Err(Self::mismatch(index, ArgKind::Str, &other)),
        }
    }

    /// End iteration, returning how many arguments were never fetched.
    #[must_use]
    pub fn finish(self) -> usize {
        self.remaining()
    }
}
