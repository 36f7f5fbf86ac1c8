//! Directory-creation placeholder.
//!
//! `mkdir` never touches the filesystem and always reports success. The
//! configured [`MkdirPolicy`] only decides whether that is announced.

use crate::capability::Capability;
use crate::config::MkdirPolicy;
use crate::diag::DiagnosticRecord;

/// What the `mkdir` stub does for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MkdirPlan {
    /// Value returned to C. Always 0.
    pub status: i32,
    pub notice: Option<DiagnosticRecord>,
}

/// Plan a `mkdir` call. `path` is `None` for a NULL pointer and is never
/// validated; the mode is not even looked at.
#[must_use]
pub fn plan_mkdir(path: Option<&[u8]>, policy: MkdirPolicy) -> MkdirPlan {
    let notice = match policy {
        MkdirPolicy::Silent => None,
        MkdirPolicy::Notice => {
            let shown = path.map_or_else(
                || "(null)".to_owned(),
                |p| String::from_utf8_lossy(p).into_owned(),
            );
            Some(DiagnosticRecord::skipped(Capability::Mkdir, shown))
        }
    };
    MkdirPlan { status: 0, notice }
}
