//! Capability table.
//!
//! Every C symbol the shim defines is one [`Capability`]. A capability is
//! either [`Disposition::Trap`] (the ABI body reports it through the failure
//! reporter and never returns) or [`Disposition::Provided`] (the ABI body does
//! real, if minimal, work). Giving a trapped symbol a real body means flipping
//! its row here and replacing its ABI stub.

use serde::{Deserialize, Serialize, Serializer};

use crate::error::ShimError;

/// Header family a capability belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFamily {
    String,
    Stdio,
    Stdlib,
    Ctype,
    Math,
    Process,
    Fs,
    Malloc,
    Errno,
}

impl ApiFamily {
    /// C header that declares the family's symbols.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::String => "string.h",
            Self::Stdio => "stdio.h",
            Self::Stdlib | Self::Process | Self::Malloc => "stdlib.h",
            Self::Ctype => "ctype.h",
            Self::Math => "math.h",
            Self::Fs => "sys/stat.h",
            Self::Errno => "errno.h",
        }
    }
}

/// Whether the shim implements a capability or traps on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    Trap,
    Provided,
}

macro_rules! capabilities {
    (
        $( $variant:ident => $symbol:literal, $family:ident, $disposition:ident; )*
    ) => {
        /// One shim symbol.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Capability {
            $( $variant, )*
        }

        impl Capability {
            /// Every capability, in table order.
            pub const ALL: &'static [Capability] = &[ $( Capability::$variant, )* ];

            /// The C symbol name.
            #[must_use]
            pub const fn symbol(self) -> &'static str {
                match self {
                    $( Capability::$variant => $symbol, )*
                }
            }

            #[must_use]
            pub const fn family(self) -> ApiFamily {
                match self {
                    $( Capability::$variant => ApiFamily::$family, )*
                }
            }

            #[must_use]
            pub const fn disposition(self) -> Disposition {
                match self {
                    $( Capability::$variant => Disposition::$disposition, )*
                }
            }
        }
    };
}

capabilities! {
    // string.h
    Strncasecmp => "strncasecmp", String, Trap;
    Strdup => "strdup", String, Trap;
    Strstr => "strstr", String, Trap;
    Strchr => "strchr", String, Trap;
    Strncmp => "strncmp", String, Trap;
    Strcmp => "strcmp", String, Provided;
    Strcasecmp => "strcasecmp", String, Provided;
    Strncpy => "strncpy", String, Provided;
    Strrchr => "strrchr", String, Provided;

    // stdio.h
    Fprintf => "fprintf", Stdio, Trap;
    Snprintf => "snprintf", Stdio, Trap;
    Sscanf => "sscanf", Stdio, Trap;
    Fopen => "fopen", Stdio, Trap;
    Fclose => "fclose", Stdio, Trap;
    Fread => "fread", Stdio, Trap;
    Fseek => "fseek", Stdio, Trap;
    Ftell => "ftell", Stdio, Trap;
    Fwrite => "fwrite", Stdio, Provided;
    Fflush => "fflush", Stdio, Provided;
    Putchar => "putchar", Stdio, Provided;
    Puts => "puts", Stdio, Provided;
    Printf => "printf", Stdio, Provided;
    Vfprintf => "vfprintf", Stdio, Provided;
    Vsnprintf => "vsnprintf", Stdio, Provided;

    // stdlib.h
    Atoi => "atoi", Stdlib, Trap;
    Atof => "atof", Stdlib, Trap;
    Abs => "abs", Stdlib, Trap;
    Exit => "exit", Process, Trap;
    System => "system", Process, Trap;
    Unimplemented => "unimplemented", Process, Provided;
    Malloc => "malloc", Malloc, Provided;
    Calloc => "calloc", Malloc, Provided;
    Realloc => "realloc", Malloc, Provided;
    Free => "free", Malloc, Provided;

    // ctype.h
    Isspace => "isspace", Ctype, Trap;
    Toupper => "toupper", Ctype, Trap;

    // math.h
    Fabs => "fabs", Math, Trap;

    // filesystem
    Mkdir => "mkdir", Fs, Provided;
    Rename => "rename", Fs, Trap;
    Remove => "remove", Fs, Trap;

    // errno.h
    ErrnoLocation => "__errno_location", Errno, Provided;
}

impl Capability {
    /// Look a capability up by its C symbol name.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|cap| cap.symbol() == symbol)
    }

    /// Like [`Capability::from_symbol`], for callers that propagate errors.
    pub fn lookup(symbol: &str) -> Result<Self, ShimError> {
        Self::from_symbol(symbol).ok_or_else(|| ShimError::UnknownSymbol(symbol.to_owned()))
    }

    #[must_use]
    pub const fn is_trap(self) -> bool {
        matches!(self.disposition(), Disposition::Trap)
    }

    /// `Ok(())` for provided capabilities, `NotImplemented` for traps.
    pub fn ensure_provided(self) -> Result<(), ShimError> {
        if self.is_trap() {
            Err(ShimError::NotImplemented {
                symbol: self.symbol(),
            })
        } else {
            Ok(())
        }
    }

    /// Capabilities currently trapped, in table order.
    pub fn traps() -> impl Iterator<Item = Capability> {
        Self::ALL.iter().copied().filter(|cap| cap.is_trap())
    }
}

impl Serialize for Capability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}
