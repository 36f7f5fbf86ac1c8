//! Validation of JSONL diagnostic logs (`DOOMLIBC_LOG=jsonl`).
//!
//! A valid line is one JSON object that deserializes as a
//! [`DiagnosticRecord`]. Beyond the schema, a few field combinations must
//! hold: trap lines name a symbol, skip and request lines carry a detail, and
//! a known symbol's family matches the capability table.

use std::path::Path;

use doomlibc_core::Capability;
use doomlibc_core::diag::{DiagEvent, DiagnosticRecord};

use crate::HarnessError;

/// Validation error for a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for LogValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Result of validating a whole log.
#[derive(Debug, Default)]
pub struct LogReport {
    pub lines: usize,
    pub records: Vec<DiagnosticRecord>,
    pub errors: Vec<LogValidationError>,
}

impl LogReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Symbols that trapped, in log order.
    #[must_use]
    pub fn trapped_symbols(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.event == DiagEvent::Unimplemented)
            .filter_map(|r| r.symbol.as_deref())
            .collect()
    }
}

/// Validate one JSONL line.
pub fn validate_log_line(
    line: &str,
    line_number: usize,
) -> Result<DiagnosticRecord, Vec<LogValidationError>> {
    let error = |field: &str, message: String| LogValidationError {
        line_number,
        field: field.to_owned(),
        message,
    };

    let record: DiagnosticRecord = match serde_json::from_str(line) {
        Ok(record) => record,
        Err(e) => return Err(vec![error("<json>", format!("invalid record: {e}"))]),
    };

    let mut errors = Vec::new();
    let needs_symbol = matches!(
        record.event,
        DiagEvent::Unimplemented
            | DiagEvent::Skipped
            | DiagEvent::ExitRequested
            | DiagEvent::CommandRequested
    );
    if needs_symbol && record.symbol.as_deref().is_none_or(str::is_empty) {
        errors.push(error("symbol", "required for this event".to_owned()));
    }

    let needs_detail = matches!(
        record.event,
        DiagEvent::ExitRequested | DiagEvent::CommandRequested | DiagEvent::UnknownFormatSpecifier
    );
    if needs_detail && record.detail.is_none() {
        errors.push(error("detail", "required for this event".to_owned()));
    }

    if let Some(cap) = record.symbol.as_deref().and_then(Capability::from_symbol)
        && let Some(family) = record.api_family
        && family != cap.family()
    {
        errors.push(error(
            "api_family",
            format!("{family:?} does not match {} ({:?})", cap.symbol(), cap.family()),
        ));
    }

    if errors.is_empty() {
        Ok(record)
    } else {
        Err(errors)
    }
}

/// Validate log text. Blank lines and lines not starting with `{` (plain
/// console output interleaved with the log) are skipped.
#[must_use]
pub fn validate_log_text(content: &str) -> LogReport {
    let mut report = LogReport::default();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if !line.starts_with('{') {
            continue;
        }
        report.lines += 1;
        match validate_log_line(line, i + 1) {
            Ok(record) => report.records.push(record),
            Err(errs) => report.errors.extend(errs),
        }
    }
    report
}

pub fn validate_log_file(path: &Path) -> Result<LogReport, HarnessError> {
    let content = std::fs::read_to_string(path).map_err(|source| HarnessError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(validate_log_text(&content))
}
