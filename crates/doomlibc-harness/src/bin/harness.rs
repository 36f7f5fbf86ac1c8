//! CLI entrypoint for the doomlibc tooling.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use doomlibc_core::config::ShimConfig;
use doomlibc_harness::error::write_output;
use doomlibc_harness::log_check::validate_log_file;
use doomlibc_harness::{HarnessError, MatrixFormat, SupportMatrix, version_script};

/// Tooling for the doomlibc compatibility shim.
#[derive(Debug, Parser)]
#[command(name = "doomlibc-harness")]
#[command(about = "Support matrix, version script, config and log checks for doomlibc")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print which symbols are provided and which trap.
    SupportMatrix {
        /// Output format.
        #[arg(long, value_enum, default_value_t = MatrixFormat::Json)]
        format: MatrixFormat,
        /// Output path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate the linker version script for the shared library.
    VersionScript {
        /// Output path (if omitted, prints to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print, as JSON, the trap, mkdir and log settings the environment selects.
    Config,
    /// Validate a JSONL diagnostic log captured with `DOOMLIBC_LOG=jsonl`.
    ValidateLog {
        /// Log file path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), HarnessError> {
    match cli.command {
        Command::SupportMatrix { format, output } => {
            let rendered = SupportMatrix::build().render(format)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Command::VersionScript { output } => {
            write_output(output.as_deref(), &version_script::render())?;
        }
        Command::Config => {
            let config = serde_json::to_string_pretty(&ShimConfig::current())?;
            println!("{config}");
        }
        Command::ValidateLog { log } => {
            let report = validate_log_file(&log)?;
            for err in &report.errors {
                eprintln!("{err}");
            }
            let trapped = report.trapped_symbols();
            if !trapped.is_empty() {
                eprintln!("trapped: {}", trapped.join(", "));
            }
            if !report.is_clean() {
                return Err(HarnessError::InvalidLog {
                    invalid: report.lines - report.records.len(),
                    total: report.lines,
                });
            }
            eprintln!("{}: {} records ok", log.display(), report.lines);
        }
    }
    Ok(())
}
