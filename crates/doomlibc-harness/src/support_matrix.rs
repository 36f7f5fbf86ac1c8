//! Support matrix: every exported symbol with its family and disposition.

use std::fmt::Write as _;

use doomlibc_core::context::GLOBAL_SYMBOLS;
use doomlibc_core::{ApiFamily, Capability, Disposition};
use serde::{Deserialize, Serialize};

use crate::HarnessError;

/// Output format of `harness support-matrix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MatrixFormat {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportEntry {
    pub symbol: String,
    pub family: ApiFamily,
    pub header: String,
    pub disposition: Disposition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SupportSummary {
    pub total: usize,
    pub provided: usize,
    pub trapped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportMatrix {
    pub symbols: Vec<SupportEntry>,
    /// Data symbols (`errno`, standard streams).
    pub globals: Vec<String>,
    pub summary: SupportSummary,
}

impl SupportMatrix {
    /// Build the matrix from the capability table.
    #[must_use]
    pub fn build() -> Self {
        let symbols: Vec<SupportEntry> = Capability::ALL
            .iter()
            .map(|cap| SupportEntry {
                symbol: cap.symbol().to_owned(),
                family: cap.family(),
                header: cap.family().header().to_owned(),
                disposition: cap.disposition(),
            })
            .collect();
        let trapped = symbols
            .iter()
            .filter(|e| e.disposition == Disposition::Trap)
            .count();
        let summary = SupportSummary {
            total: symbols.len(),
            provided: symbols.len() - trapped,
            trapped,
        };
        Self {
            symbols,
            globals: GLOBAL_SYMBOLS.iter().map(|s| (*s).to_owned()).collect(),
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String, HarnessError> {
        let mut out = serde_json::to_string_pretty(self)?;
        out.push('\n');
        Ok(out)
    }

    /// Markdown table grouped in table order.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# doomlibc support matrix\n");
        let _ = writeln!(
            out,
            "{} symbols: {} provided, {} trapped.\n",
            self.summary.total, self.summary.provided, self.summary.trapped
        );
        let _ = writeln!(out, "| symbol | header | disposition |");
        let _ = writeln!(out, "|---|---|---|");
        for entry in &self.symbols {
            let disposition = match entry.disposition {
                Disposition::Trap => "trap",
                Disposition::Provided => "provided",
            };
            let _ = writeln!(
                out,
                "| `{}` | `<{}>` | {disposition} |",
                entry.symbol, entry.header
            );
        }
        let _ = writeln!(out, "\nGlobals: {}", self.globals.join(", "));
        out
    }

    pub fn render(&self, format: MatrixFormat) -> Result<String, HarnessError> {
        match format {
            MatrixFormat::Json => self.to_json(),
            MatrixFormat::Markdown => Ok(self.to_markdown()),
        }
    }
}
