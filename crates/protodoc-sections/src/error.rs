//! Error types for the protodoc-sections crate.

use std::backtrace::Backtrace;
use std::fmt;
use std::path::PathBuf;

/// Error type for section configuration loading and package grouping.
#[derive(Debug)]
pub struct SectionError {
    kind: SectionErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum SectionErrorKind {
    /// A section key cannot name an output file.
    InvalidSectionName { section: String },
    /// A section carries a key the configuration does not know.
    UnknownKey { section: String, key: String },
    /// The `default` section lists members; it only takes leftovers.
    DefaultHasPackages,
    /// A section's weight is not an integer.
    InvalidWeight { section: String },
    /// A value has the wrong TOML type.
    InvalidValue {
        section: String,
        key: Option<String>,
        expected: &'static str,
    },
    /// A preamble file could not be read.
    Preamble {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configuration is not valid TOML.
    Parse(toml::de::Error),
    /// The configuration file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A section member matches no package.
    UnmatchedMember { member: String, section: String },
    /// A package was claimed by more than one member.
    DuplicateMember {
        package: String,
        first: String,
        second: String,
    },
}

impl SectionError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: SectionErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true if a section key is not usable as a file name.
    pub fn is_invalid_section_name(&self) -> bool {
        matches!(self.kind, SectionErrorKind::InvalidSectionName { .. })
    }

    /// Returns true if a section carries an unrecognized key.
    pub fn is_unknown_key(&self) -> bool {
        matches!(self.kind, SectionErrorKind::UnknownKey { .. })
    }

    /// Returns true if the `default` section lists packages.
    pub fn is_default_has_packages(&self) -> bool {
        matches!(self.kind, SectionErrorKind::DefaultHasPackages)
    }

    /// Returns true if a weight is not an integer.
    pub fn is_invalid_weight(&self) -> bool {
        matches!(self.kind, SectionErrorKind::InvalidWeight { .. })
    }

    /// Returns true if a value has the wrong type.
    pub fn is_invalid_value(&self) -> bool {
        matches!(self.kind, SectionErrorKind::InvalidValue { .. })
    }

    /// Returns true if a preamble file could not be read.
    pub fn is_preamble(&self) -> bool {
        matches!(self.kind, SectionErrorKind::Preamble { .. })
    }

    /// Returns true if the configuration is not valid TOML.
    pub fn is_parse(&self) -> bool {
        matches!(self.kind, SectionErrorKind::Parse(_))
    }

    /// Returns true if the configuration file could not be read.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, SectionErrorKind::Io { .. })
    }

    /// Returns true if a member matched no package.
    pub fn is_unmatched_member(&self) -> bool {
        matches!(self.kind, SectionErrorKind::UnmatchedMember { .. })
    }

    /// Returns true if a package was claimed twice.
    pub fn is_duplicate_member(&self) -> bool {
        matches!(self.kind, SectionErrorKind::DuplicateMember { .. })
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for SectionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionErrorKind::InvalidSectionName { section } => {
                write!(f, "section name `{section}` is not a valid file name")
            }
            SectionErrorKind::UnknownKey { section, key } => {
                write!(f, "unknown key `{key}` in section `{section}`")
            }
            SectionErrorKind::DefaultHasPackages => {
                write!(f, "default section may not specify packages")
            }
            SectionErrorKind::InvalidWeight { section } => {
                write!(f, "weight not a number in section `{section}`")
            }
            SectionErrorKind::InvalidValue {
                section,
                key: Some(key),
                expected,
            } => {
                write!(f, "`{key}` in section `{section}` must be {expected}")
            }
            SectionErrorKind::InvalidValue {
                section,
                key: None,
                expected,
            } => {
                write!(f, "section `{section}` must be {expected}")
            }
            SectionErrorKind::Preamble { path, source } => {
                write!(
                    f,
                    "cannot read preamble file {}: {source}",
                    path.display()
                )
            }
            SectionErrorKind::Parse(err) => {
                write!(f, "invalid section configuration: {err}")
            }
            SectionErrorKind::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            SectionErrorKind::UnmatchedMember { member, section } => {
                write!(
                    f,
                    "package `{member}` in section `{section}` not found"
                )
            }
            SectionErrorKind::DuplicateMember {
                package,
                first,
                second,
            } => {
                write!(
                    f,
                    "package `{package}` claimed by section `{first}` and \
                     again by section `{second}`"
                )
            }
        }
    }
}

impl fmt::Display for SectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;

        // Empty unless RUST_BACKTRACE is set.
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for SectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            SectionErrorKind::Preamble { source, .. }
            | SectionErrorKind::Io { source, .. } => Some(source),
            SectionErrorKind::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_unknown_key() {
        let err = SectionError::new(SectionErrorKind::UnknownKey {
            section: "billing".to_string(),
            key: "colour".to_string(),
        });

        assert!(err.is_unknown_key());
        assert!(!err.is_invalid_value());
        let message = err.to_string();
        assert!(message.contains("colour"));
        assert!(message.contains("billing"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_invalid_section_name() {
        let err = SectionError::new(SectionErrorKind::InvalidSectionName {
            section: "../x".to_string(),
        });

        assert!(err.is_invalid_section_name());
        assert!(!err.is_unknown_key());
        assert!(err.to_string().contains("../x"));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_preamble_chains_io_error() {
        let err = SectionError::new(SectionErrorKind::Preamble {
            path: PathBuf::from("intro.md"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });

        assert!(err.is_preamble());
        assert!(!err.is_io());
        assert!(err.to_string().contains("intro.md"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_parse() {
        let toml_err = "[unclosed".parse::<toml::Table>().unwrap_err();
        let err = SectionError::new(SectionErrorKind::Parse(toml_err));

        assert!(err.is_parse());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_duplicate_member() {
        let err = SectionError::new(SectionErrorKind::DuplicateMember {
            package: "acme.billing.v1".to_string(),
            first: "billing".to_string(),
            second: "money".to_string(),
        });

        assert!(err.is_duplicate_member());
        let message = err.to_string();
        assert!(message.contains("acme.billing.v1"));
        assert!(message.contains("money"));
    }

    #[test]
    fn test_backtrace_and_debug() {
        let err = SectionError::new(SectionErrorKind::DefaultHasPackages);

        let _ = err.backtrace();
        assert!(format!("{err:?}").contains("DefaultHasPackages"));
    }
}
