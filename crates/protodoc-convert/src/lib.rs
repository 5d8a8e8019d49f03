//! Schema conversion: declaration graph to documentation packages.
//!
//! This is the first phase of the protodoc pipeline. It reads the
//! declaration graph exported by the schema toolchain and produces one
//! [`Package`] per compilation unit: services with their HTTP-bound
//! endpoints, and a flat map of every enum and message the unit declares.
//!
//! ## Type descriptors
//!
//! Scalar fields become [`Type::Basic`] with a fixed display name
//! (`int64` → `Integer(64)`, `bytes` → `Bytes`, ...). Enum and message
//! fields become [`Type::Ref`] carrying the flattened reference name
//! `<package>.<local name>`, except a fixed set of well-known messages
//! (`google.protobuf.Timestamp`, `google.protobuf.Struct`, ...) rendered as
//! basics. Repeated fields are wrapped in [`Type::Array`]; map fields
//! become [`Type::Map`] built from their synthetic entry message.
//!
//! ## Usage
//!
//! ```no_run
//! use protodoc_convert::run;
//!
//! let input = std::io::stdin().lock();
//! let mut output = Vec::new();
//! run(input, &mut output).unwrap();
//! ```
//!
//! [`Type::Basic`]: protodoc_schemas::Type::Basic
//! [`Type::Ref`]: protodoc_schemas::Type::Ref
//! [`Type::Array`]: protodoc_schemas::Type::Array
//! [`Type::Map`]: protodoc_schemas::Type::Map

mod convert;
mod desc;
mod error;
mod field_type;

use std::io::{Read, Write};

use protodoc_schemas::DeclarationSet;
#[doc(inline)]
pub use protodoc_schemas::Package;
use tracing::debug_span;

#[doc(inline)]
pub use crate::convert::Converter;
#[doc(inline)]
pub use crate::desc::{Description, clean};
#[doc(inline)]
pub use crate::error::ConvertError;
use crate::error::ConvertErrorKind;

/// Converts every unit of a declaration set, ordered by file name.
///
/// # Errors
///
/// Returns [`ConvertError`] on the first declaration that cannot be
/// documented; see [`Converter::convert_file`].
pub fn convert(set: &DeclarationSet) -> Result<Vec<Package>, ConvertError> {
    Converter::new(set)?.convert_all()
}

/// Run the conversion phase.
///
/// Reads a [`DeclarationSet`] as JSON from the input and writes the
/// converted package list as JSON to the output.
///
/// # Errors
///
/// Returns [`ConvertError`] if:
/// - Reading from input fails ([`ConvertError::is_io`])
/// - The input is not a valid declaration set
///   ([`ConvertError::is_deserialization`])
/// - A declaration cannot be documented (unsupported field kind, duplicate
///   flattened name, malformed map entry, bad HTTP binding)
/// - Writing to output fails ([`ConvertError::is_io`])
pub fn run(
    mut input: impl Read,
    mut output: impl Write,
) -> Result<(), ConvertError> {
    let _span = debug_span!("run").entered();

    let mut json = String::new();
    input.read_to_string(&mut json)?;
    let set: DeclarationSet = serde_json::from_str(&json).map_err(|e| {
        ConvertError::new(ConvertErrorKind::Deserialization(e))
    })?;

    let packages = convert(&set)?;

    serde_json::to_writer_pretty(&mut output, &packages)
        .map_err(|e| ConvertError::new(ConvertErrorKind::Serialization(e)))?;
    writeln!(output)?;

    Ok(())
}
