//! Failure reporter.
//!
//! Every trapped capability funnels into [`report_unimplemented`]: emit the
//! label, record it in the ledger, halt. The halt is final; nothing here
//! returns to the caller.

use parking_lot::Mutex;

use crate::capability::{ApiFamily, Capability};
use crate::config::{LogFormat, TrapMode};
use crate::diag::{DiagnosticRecord, DiagnosticSink, emit};

/// Exit status used by [`TrapMode::Exit`] (128 + SIGABRT).
pub const TRAP_EXIT_STATUS: i32 = 134;

/// One trapped call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrapEvent {
    pub label: String,
    pub family: Option<ApiFamily>,
}

/// Ends the process after a trap has been reported.
pub trait Terminator {
    fn halt(&self, event: &TrapEvent) -> !;
}

impl Terminator for TrapMode {
    fn halt(&self, _event: &TrapEvent) -> ! {
        match self {
            TrapMode::Abort => std::process::abort(),
            TrapMode::Exit => std::process::exit(TRAP_EXIT_STATUS),
        }
    }
}

static LEDGER: Mutex<Vec<TrapEvent>> = parking_lot::const_mutex(Vec::new());

/// Trapped calls observed by this process, oldest first.
#[must_use]
pub fn history() -> Vec<TrapEvent> {
    LEDGER.lock().clone()
}

/// How many times `label` has trapped in this process.
#[must_use]
pub fn count(label: &str) -> usize {
    LEDGER.lock().iter().filter(|e| e.label == label).count()
}

/// Report a missing capability by label and halt.
pub fn report_unimplemented(
    label: &str,
    format: LogFormat,
    sink: &mut dyn DiagnosticSink,
    terminator: &dyn Terminator,
) -> ! {
    let record = DiagnosticRecord::unimplemented(label);
    emit(&record, format, sink);

    let event = TrapEvent {
        label: label.to_owned(),
        family: record.api_family,
    };
    LEDGER.lock().push(event.clone());
    terminator.halt(&event)
}

impl Capability {
    /// Report this capability as missing and halt.
    pub fn trap(
        self,
        format: LogFormat,
        sink: &mut dyn DiagnosticSink,
        terminator: &dyn Terminator,
    ) -> ! {
        report_unimplemented(self.symbol(), format, sink, terminator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    /// Unwinds instead of ending the process, carrying the event.
    struct Unwind;

    impl Terminator for Unwind {
        fn halt(&self, event: &TrapEvent) -> ! {
            std::panic::panic_any(event.clone())
        }
    }

    fn trap_and_catch(f: impl FnOnce(&mut Vec<u8>)) -> (TrapEvent, Vec<u8>) {
        let mut sink = Vec::new();
        let payload = catch_unwind(AssertUnwindSafe(|| f(&mut sink))).unwrap_err();
        let event = *payload.downcast::<TrapEvent>().unwrap();
        (event, sink)
    }

    #[test]
    fn trap_emits_label_once_and_never_returns() {
        let before = count("strdup");
        let (event, sink) =
            trap_and_catch(|sink| Capability::Strdup.trap(LogFormat::Text, sink, &Unwind));
        assert_eq!(event.label, "strdup");
        assert_eq!(event.family, Some(ApiFamily::String));
        assert_eq!(sink, b"unimplemented: strdup\n");
        assert_eq!(count("strdup"), before + 1);
    }

    #[test]
    fn every_trap_capability_reports_its_own_name() {
        for cap in Capability::traps() {
            let (event, sink) = trap_and_catch(|sink| cap.trap(LogFormat::Text, sink, &Unwind));
            assert_eq!(event.label, cap.symbol());
            let line = String::from_utf8(sink).unwrap();
            assert_eq!(line.matches(cap.symbol()).count(), 1, "{line}");
        }
    }

    #[test]
    fn unknown_labels_are_reported_verbatim() {
        let (event, sink) = trap_and_catch(|sink| {
            report_unimplemented("DG_SleepMs", LogFormat::Text, sink, &Unwind)
        });
        assert_eq!(event.family, None);
        assert_eq!(sink, b"unimplemented: DG_SleepMs\n");
        assert!(history().iter().any(|e| e.label == "DG_SleepMs"));
    }

    #[test]
    fn jsonl_trap_line() {
        let (_, sink) =
            trap_and_catch(|sink| Capability::Fseek.trap(LogFormat::Jsonl, sink, &Unwind));
        let value: serde_json::Value = serde_json::from_slice(&sink).unwrap();
        assert_eq!(value["level"], "fatal");
        assert_eq!(value["symbol"], "fseek");
        assert_eq!(value["api_family"], "stdio");
    }
}
