//! Diagnostic records.
//!
//! The shim cannot lean on a logging framework that itself calls back into
//! libc, so every diagnostic is one self-contained line handed to a
//! [`DiagnosticSink`]. In `text` format the line is what a developer expects
//! on the console (`unimplemented: strdup`); in `jsonl` format it is the
//! serialized [`DiagnosticRecord`].

use serde::{Deserialize, Serialize};

use crate::capability::{ApiFamily, Capability};
use crate::config::LogFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Fatal,
}

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagEvent {
    /// A trapped capability was called.
    Unimplemented,
    /// A placeholder skipped its real effect (`mkdir`).
    Skipped,
    /// `exit` was called with a status.
    ExitRequested,
    /// `system` was called with a command.
    CommandRequested,
    /// The format engine met a conversion it does not render.
    UnknownFormatSpecifier,
}

/// One diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    pub level: Level,
    pub event: DiagEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_family: Option<ApiFamily>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DiagnosticRecord {
    #[must_use]
    pub fn new(level: Level, event: DiagEvent) -> Self {
        Self {
            level,
            event,
            symbol: None,
            api_family: None,
            detail: None,
        }
    }

    /// Record for a trapped call. `family` is `None` when C code trapped
    /// with a label the capability table does not know.
    #[must_use]
    pub fn unimplemented(label: &str) -> Self {
        let record = Self::new(Level::Fatal, DiagEvent::Unimplemented).with_symbol(label);
        match Capability::from_symbol(label) {
            Some(cap) => record.with_family(cap.family()),
            None => record,
        }
    }

    #[must_use]
    pub fn skipped(cap: Capability, detail: impl Into<String>) -> Self {
        Self::new(Level::Warn, DiagEvent::Skipped)
            .with_symbol(cap.symbol())
            .with_family(cap.family())
            .with_detail(detail)
    }

    #[must_use]
    pub fn unknown_specifier(conversion: u8) -> Self {
        Self::new(Level::Warn, DiagEvent::UnknownFormatSpecifier)
            .with_family(ApiFamily::Stdio)
            .with_detail(char::from(conversion).to_string())
    }

    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    #[must_use]
    pub fn with_family(mut self, family: ApiFamily) -> Self {
        self.api_family = Some(family);
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    fn text(&self) -> String {
        let symbol = self.symbol.as_deref().unwrap_or("?");
        let detail = self.detail.as_deref().unwrap_or("");
        match self.event {
            DiagEvent::Unimplemented => format!("unimplemented: {symbol}"),
            DiagEvent::Skipped if detail.is_empty() => format!("TODO: {symbol}"),
            DiagEvent::Skipped => format!("TODO: {symbol} {detail}"),
            DiagEvent::ExitRequested => format!("exit: {detail}"),
            DiagEvent::CommandRequested => format!("system: {detail}"),
            DiagEvent::UnknownFormatSpecifier => format!("unknown format specifier: {detail}"),
        }
    }

    /// Render as one newline-terminated line.
    #[must_use]
    pub fn render(&self, format: LogFormat) -> Vec<u8> {
        let mut line = match format {
            LogFormat::Text => self.text().into_bytes(),
            LogFormat::Jsonl => {
                serde_json::to_vec(self).unwrap_or_else(|_| self.text().into_bytes())
            }
        };
        line.push(b'\n');
        line
    }
}

/// Destination for rendered diagnostic lines.
pub trait DiagnosticSink {
    fn write_line(&mut self, line: &[u8]);
}

impl DiagnosticSink for Vec<u8> {
    fn write_line(&mut self, line: &[u8]) {
        self.extend_from_slice(line);
    }
}

/// Render `record` and hand it to `sink`.
pub fn emit(record: &DiagnosticRecord, format: LogFormat, sink: &mut dyn DiagnosticSink) {
    sink.write_line(&record.render(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_lines() {
        let line = DiagnosticRecord::unimplemented("strdup").render(LogFormat::Text);
        assert_eq!(line, b"unimplemented: strdup\n");

        let line = DiagnosticRecord::skipped(Capability::Mkdir, "/tmp/x").render(LogFormat::Text);
        assert_eq!(line, b"TODO: mkdir /tmp/x\n");

        let line = DiagnosticRecord::skipped(Capability::Mkdir, "").render(LogFormat::Text);
        assert_eq!(line, b"TODO: mkdir\n");

        let line = DiagnosticRecord::unknown_specifier(b'f').render(LogFormat::Text);
        assert_eq!(line, b"unknown format specifier: f\n");
    }

    #[test]
    fn unimplemented_record_carries_family_when_known() {
        let record = DiagnosticRecord::unimplemented("fabs");
        assert_eq!(record.api_family, Some(ApiFamily::Math));
        assert_eq!(record.level, Level::Fatal);

        let record = DiagnosticRecord::unimplemented("DG_DrawFrame");
        assert_eq!(record.api_family, None);
        assert_eq!(record.symbol.as_deref(), Some("DG_DrawFrame"));
    }

    #[test]
    fn jsonl_line_parses_back() {
        let record = DiagnosticRecord::unimplemented("strstr");
        let line = record.render(LogFormat::Jsonl);
        assert_eq!(line.last(), Some(&b'\n'));
        let parsed: DiagnosticRecord = serde_json::from_slice(&line[..line.len() - 1]).unwrap();
        assert_eq!(parsed, record);

        let value: serde_json::Value = serde_json::from_slice(&line).unwrap();
        assert_eq!(value["event"], "unimplemented");
        assert_eq!(value["api_family"], "string");
        assert!(value.get("detail").is_none());
    }

    #[test]
    fn emit_appends_to_sink() {
        let mut sink = Vec::new();
        emit(
            &DiagnosticRecord::new(Level::Info, DiagEvent::ExitRequested).with_detail("3"),
            LogFormat::Text,
            &mut sink,
        );
        emit(
            &DiagnosticRecord::new(Level::Info, DiagEvent::CommandRequested).with_detail("ls"),
            LogFormat::Text,
            &mut sink,
        );
        assert_eq!(sink, b"exit: 3\nsystem: ls\n");
    }
}
