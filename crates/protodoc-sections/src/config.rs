//! Section configuration file.
//!
//! The configuration is a TOML document with one table per section:
//!
//! ```toml
//! [billing]
//! name = "Billing"
//! packages = "acme.billing.v1, invoices"
//! preamble = "billing.md"
//! weight = 10
//!
//! [default]
//! name = "Everything else"
//! weight = 100
//! ```
//!
//! `preamble` paths are relative to the directory holding the
//! configuration file; their content is inlined at load time. Section keys
//! name the generated `<key>.json` files, so they must be plain file names.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use toml::{Table, Value};
use tracing::{debug, instrument};

use crate::error::{SectionError, SectionErrorKind};

/// Key of the section that receives every unclaimed package.
pub const DEFAULT_SECTION: &str = "default";

/// Loaded section configuration, keyed by section name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub sections: BTreeMap<String, Section>,
}

/// One configured section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    /// Display name. Defaults to the section key.
    pub name: String,
    /// Members, matched against package identifiers and names.
    pub packages: Vec<String>,
    /// Preamble file content.
    pub preamble: String,
    pub weight: i64,
}

impl Config {
    /// Loads the configuration at `path`.
    ///
    /// # Errors
    ///
    /// [`SectionError::is_io`] if the file cannot be read, otherwise see
    /// [`Config::load`].
    #[instrument]
    pub fn load_file(path: &Path) -> Result<Self, SectionError> {
        let text = fs::read_to_string(path).map_err(|source| {
            SectionError::new(SectionErrorKind::Io {
                path: path.to_owned(),
                source,
            })
        })?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::load(dir, &text)
    }

    /// Parses configuration text, resolving preamble paths against `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError`] for invalid TOML, section keys that are not
    /// plain file names, unknown keys, a `default` section with members,
    /// non-integer weights, values of the wrong type and unreadable preamble
    /// files.
    pub fn load(dir: &Path, text: &str) -> Result<Self, SectionError> {
        let table: Table = text
            .parse()
            .map_err(|e| SectionError::new(SectionErrorKind::Parse(e)))?;

        let mut sections = BTreeMap::new();
        for (key, value) in &table {
            if !is_file_name(key) {
                return Err(SectionError::new(
                    SectionErrorKind::InvalidSectionName {
                        section: key.clone(),
                    },
                ));
            }
            let Value::Table(entries) = value else {
                return Err(SectionError::new(SectionErrorKind::InvalidValue {
                    section: key.clone(),
                    key: None,
                    expected: "a table",
                }));
            };
            sections.insert(key.clone(), load_section(dir, key, entries)?);
        }

        debug!(sections = sections.len(), "Loaded section configuration");
        Ok(Self { sections })
    }
}

fn load_section(
    dir: &Path,
    section: &str,
    entries: &Table,
) -> Result<Section, SectionError> {
    let mut loaded = Section {
        name: section.to_owned(),
        ..Section::default()
    };

    for (key, value) in entries {
        match key.as_str() {
            "name" => loaded.name = string(section, key, value)?.to_owned(),
            "packages" => {
                if section == DEFAULT_SECTION {
                    return Err(SectionError::new(
                        SectionErrorKind::DefaultHasPackages,
                    ));
                }
                loaded.packages = string(section, key, value)?
                    .split(',')
                    .map(str::trim)
                    .filter(|member| !member.is_empty())
                    .map(str::to_owned)
                    .collect();
            }
            "preamble" => {
                let path = dir.join(string(section, key, value)?);
                loaded.preamble =
                    fs::read_to_string(&path).map_err(|source| {
                        SectionError::new(SectionErrorKind::Preamble {
                            path,
                            source,
                        })
                    })?;
            }
            "weight" => loaded.weight = weight(section, value)?,
            _ => {
                return Err(SectionError::new(SectionErrorKind::UnknownKey {
                    section: section.to_owned(),
                    key: key.clone(),
                }));
            }
        }
    }
    Ok(loaded)
}

/// A section key must stay inside the output directory: one non-empty path
/// component, not `.` or `..`.
fn is_file_name(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && !key.contains(['/', '\\', '\0'])
}

fn string<'v>(
    section: &str,
    key: &str,
    value: &'v Value,
) -> Result<&'v str, SectionError> {
    value.as_str().ok_or_else(|| {
        SectionError::new(SectionErrorKind::InvalidValue {
            section: section.to_owned(),
            key: Some(key.to_owned()),
            expected: "a string",
        })
    })
}

/// Weights are integers; a string holding an integer is accepted too.
fn weight(section: &str, value: &Value) -> Result<i64, SectionError> {
    let parsed = match value {
        Value::Integer(weight) => Some(*weight),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        SectionError::new(SectionErrorKind::InvalidWeight {
            section: section.to_owned(),
        })
    })
}
