//! Error types for the safe core.

use thiserror::Error;

use crate::stdio::FormatError;
use crate::va::ArgError;

/// Errors raised by the safe core.
///
/// At the C boundary only `NotImplemented` is ever observable, and only as a
/// trap: the ABI layer turns it into a halt instead of returning it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShimError {
    #[error("capability not implemented: {symbol}")]
    NotImplemented { symbol: &'static str },
    #[error("unknown shim symbol: {0}")]
    UnknownSymbol(String),
    #[error(transparent)]
    Argument(#[from] ArgError),
    #[error(transparent)]
    Format(FormatError),
}

impl From<FormatError> for ShimError {
    fn from(err: FormatError) -> Self {
        match err {
            FormatError::Argument(arg) => ShimError::Argument(arg),
            other => ShimError::Format(other),
        }
    }
}
