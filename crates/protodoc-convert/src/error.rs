//! Error types for the protodoc-convert crate.

use std::backtrace::Backtrace;
use std::fmt;

/// Error type for schema conversion.
///
/// Every variant aborts the conversion; no partial package list is
/// produced. Use the `is_xxx()` helpers to classify a failure.
#[derive(Debug)]
pub struct ConvertError {
    kind: ConvertErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum ConvertErrorKind {
    /// A field uses a kind with no documentation mapping (e.g. `group`).
    UnsupportedFieldKind { field: String, kind: String },
    /// Two declarations of one unit flatten to the same local name.
    DuplicateType { package: String, name: String },
    /// A map field's entry message is absent or has fewer than two fields.
    MalformedMapEntry { field: String, entry: String },
    /// A message needed during conversion is not declared anywhere.
    UnknownMessage { name: String },
    /// An HTTP binding carries no verb/path pattern.
    UnknownHttpRule { method: String },
    /// An HTTP binding names a body field the request does not declare.
    MissingBodyField { field: String, method: String },
    /// Failed to deserialize input JSON.
    Deserialization(serde_json::Error),
    /// Failed to serialize output to JSON.
    Serialization(serde_json::Error),
    /// I/O error when reading input or writing output.
    Io(std::io::Error),
}

impl ConvertError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: ConvertErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true if a field kind has no documentation mapping.
    pub fn is_unsupported_field_kind(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::UnsupportedFieldKind { .. })
    }

    /// Returns true if two declarations collided on one local name.
    pub fn is_duplicate_type(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::DuplicateType { .. })
    }

    /// Returns true if a map field's entry message was unusable.
    pub fn is_malformed_map_entry(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::MalformedMapEntry { .. })
    }

    /// Returns true if a referenced message is not declared.
    pub fn is_unknown_message(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::UnknownMessage { .. })
    }

    /// Returns true if an HTTP binding had no pattern.
    pub fn is_unknown_http_rule(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::UnknownHttpRule { .. })
    }

    /// Returns true if an HTTP body field could not be found.
    pub fn is_missing_body_field(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::MissingBodyField { .. })
    }

    /// Returns true if this error is due to deserialization failure.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::Deserialization(_))
    }

    /// Returns true if this error is due to serialization failure.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::Serialization(_))
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, ConvertErrorKind::Io(_))
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for ConvertErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertErrorKind::UnsupportedFieldKind { field, kind } => {
                write!(f, "field `{field}` has unsupported kind `{kind}`")
            }
            ConvertErrorKind::DuplicateType { package, name } => {
                write!(f, "package `{package}` declares `{name}` twice")
            }
            ConvertErrorKind::MalformedMapEntry { field, entry } => {
                write!(
                    f,
                    "map field `{field}` has malformed entry message `{entry}`"
                )
            }
            ConvertErrorKind::UnknownMessage { name } => {
                write!(f, "unknown message `{name}`")
            }
            ConvertErrorKind::UnknownHttpRule { method } => {
                write!(f, "method `{method}` has an HTTP rule without pattern")
            }
            ConvertErrorKind::MissingBodyField { field, method } => {
                write!(
                    f,
                    "cannot find body field `{field}` for method `{method}`"
                )
            }
            ConvertErrorKind::Deserialization(err) => {
                write!(f, "failed to deserialize input: {err}")
            }
            ConvertErrorKind::Serialization(err) => {
                write!(f, "failed to serialize output: {err}")
            }
            ConvertErrorKind::Io(err) => {
                write!(f, "I/O error: {err}")
            }
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;

        // Empty unless RUST_BACKTRACE is set.
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ConvertErrorKind::Deserialization(err)
            | ConvertErrorKind::Serialization(err) => Some(err),
            ConvertErrorKind::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ConvertErrorKind::Io(err))
    }
}
