//! Error types for the protodoc-prune crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for reference resolution and pruning.
///
/// Resolution failures abort the whole run: the pruner never produces a
/// partially pruned package set.
#[derive(Debug)]
pub struct PruneError {
    kind: PruneErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum PruneErrorKind {
    /// No package holds the referenced name.
    UnresolvedRef { name: String },
    /// The reference names something other than a message or enum.
    InvalidRefTarget { name: String, kind: &'static str },
    /// Failed to deserialize input JSON.
    Deserialization(serde_json::Error),
    /// Failed to serialize output to JSON.
    Serialization(serde_json::Error),
    /// I/O error when reading input or writing output.
    Io(std::io::Error),
}

impl PruneError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: PruneErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true if a reference did not resolve to any declaration.
    pub fn is_unresolved_ref(&self) -> bool {
        matches!(self.kind, PruneErrorKind::UnresolvedRef { .. })
    }

    /// Returns true if a reference resolved to a non-declaration type.
    pub fn is_invalid_ref_target(&self) -> bool {
        matches!(self.kind, PruneErrorKind::InvalidRefTarget { .. })
    }

    /// Returns true if this error is due to deserialization failure.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, PruneErrorKind::Deserialization(_))
    }

    /// Returns true if this error is due to serialization failure.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, PruneErrorKind::Serialization(_))
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, PruneErrorKind::Io(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for PruneErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PruneErrorKind::UnresolvedRef { name } => {
                write!(f, "ref type not found: {name}")
            }
            PruneErrorKind::InvalidRefTarget { name, kind } => {
                write!(f, "ref `{name}` points at a {kind}, not a declaration")
            }
            PruneErrorKind::Deserialization(err) => {
                write!(f, "failed to deserialize input: {err}")
            }
            PruneErrorKind::Serialization(err) => {
                write!(f, "failed to serialize output: {err}")
            }
            PruneErrorKind::Io(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl fmt::Display for PruneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;

        // Empty unless RUST_BACKTRACE is set.
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for PruneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            PruneErrorKind::Deserialization(err)
            | PruneErrorKind::Serialization(err) => Some(err),
            PruneErrorKind::Io(err) => Some(err),
            PruneErrorKind::UnresolvedRef { .. }
            | PruneErrorKind::InvalidRefTarget { .. } => None,
        }
    }
}

impl From<std::io::Error> for PruneError {
    fn from(err: std::io::Error) -> Self {
        Self::new(PruneErrorKind::Io(err))
    }
}
