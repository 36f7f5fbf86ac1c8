//! Runtime configuration.
//!
//! Three knobs, each read from the environment on first use and cached for
//! the life of the process:
//! - `DOOMLIBC_TRAP`: `abort` (default) or `exit`. How a trapped call halts.
//! - `DOOMLIBC_MKDIR`: `notice` (default) or `silent`. Whether the `mkdir`
//!   stub prints a `TODO: mkdir` line.
//! - `DOOMLIBC_LOG`: `text` (default) or `jsonl`. Diagnostic line format.
//!
//! Unknown values fall back to the default.

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// How the failure reporter ends the process.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrapMode {
    /// `abort()`: SIGABRT, core dump where enabled.
    #[default]
    Abort,
    /// `exit(TRAP_EXIT_STATUS)` without unwinding.
    Exit,
}

/// Behavior of the `mkdir` stub. Both variants create nothing and return 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MkdirPolicy {
    Silent,
    /// Also print `TODO: mkdir <path>`.
    #[default]
    Notice,
}

/// Diagnostic line format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Jsonl,
}

/// An environment-backed setting that fits in one byte.
pub trait Knob: Copy + Default {
    const VAR: &'static str;

    /// Parse a raw value; `None` means "use the default".
    fn parse(raw: &str) -> Option<Self>;

    /// Encoding in `1..=254`. 0 and 255 are reserved by [`KnobCache`].
    fn encode(self) -> u8;

    fn decode(value: u8) -> Self;
}

impl Knob for TrapMode {
    const VAR: &'static str = "DOOMLIBC_TRAP";

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "abort" | "default" => Some(Self::Abort),
            "exit" => Some(Self::Exit),
            _ => None,
        }
    }

    fn encode(self) -> u8 {
        match self {
            Self::Abort => 1,
            Self::Exit => 2,
        }
    }

    fn decode(value: u8) -> Self {
        match value {
            2 => Self::Exit,
            _ => Self::Abort,
        }
    }
}

impl Knob for MkdirPolicy {
    const VAR: &'static str = "DOOMLIBC_MKDIR";

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "silent" | "noop" | "quiet" => Some(Self::Silent),
            "notice" | "todo" | "warn" => Some(Self::Notice),
            _ => None,
        }
    }

    fn encode(self) -> u8 {
        match self {
            Self::Silent => 1,
            Self::Notice => 2,
        }
    }

    fn decode(value: u8) -> Self {
        match value {
            1 => Self::Silent,
            _ => Self::Notice,
        }
    }
}

impl Knob for LogFormat {
    const VAR: &'static str = "DOOMLIBC_LOG";

    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Some(Self::Text),
            "jsonl" | "json" => Some(Self::Jsonl),
            _ => None,
        }
    }

    fn encode(self) -> u8 {
        match self {
            Self::Text => 1,
            Self::Jsonl => 2,
        }
    }

    fn decode(value: u8) -> Self {
        match value {
            2 => Self::Jsonl,
            _ => Self::Text,
        }
    }
}

const UNRESOLVED: u8 = 0;
const RESOLVING: u8 = 255;

/// Atomic cache for one [`Knob`].
///
/// A non-blocking state machine rather than `OnceLock`: reading the
/// environment may call back into shim symbols, and a reentrant call that
/// finds the cache mid-resolution gets the default instead of waiting on
/// itself.
#[derive(Debug)]
pub struct KnobCache {
    state: AtomicU8,
}

impl KnobCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(UNRESOLVED),
        }
    }

    pub fn get<K: Knob>(&self) -> K {
        self.get_with(|| std::env::var(K::VAR).ok())
    }

    /// Resolve through `read` instead of the process environment.
    pub fn get_with<K: Knob>(&self, read: impl FnOnce() -> Option<String>) -> K {
        let cached = self.state.load(Ordering::Acquire);
        match cached {
            RESOLVING => return K::default(),
            UNRESOLVED => {}
            value => return K::decode(value),
        }

        if self
            .state
            .compare_exchange(UNRESOLVED, RESOLVING, Ordering::SeqCst, Ordering::Relaxed)
            .is_err()
        {
            let value = self.state.load(Ordering::Acquire);
            return if value == UNRESOLVED || value == RESOLVING {
                K::default()
            } else {
                K::decode(value)
            };
        }

        let knob = read().and_then(|raw| K::parse(&raw)).unwrap_or_default();
        self.state.store(knob.encode(), Ordering::Release);
        knob
    }

}

impl Default for KnobCache {
    fn default() -> Self {
        Self::new()
    }
}

static TRAP_MODE: KnobCache = KnobCache::new();
static MKDIR_POLICY: KnobCache = KnobCache::new();
static LOG_FORMAT: KnobCache = KnobCache::new();

#[must_use]
pub fn trap_mode() -> TrapMode {
    TRAP_MODE.get()
}

#[must_use]
pub fn mkdir_policy() -> MkdirPolicy {
    MKDIR_POLICY.get()
}

#[must_use]
pub fn log_format() -> LogFormat {
    LOG_FORMAT.get()
}

/// All knobs at once, as the harness `config` command reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShimConfig {
    pub trap: TrapMode,
    pub mkdir: MkdirPolicy,
    pub log: LogFormat,
}

impl ShimConfig {
    #[must_use]
    pub fn current() -> Self {
        Self {
            trap: trap_mode(),
            mkdir: mkdir_policy(),
            log: log_format(),
        }
    }
}
