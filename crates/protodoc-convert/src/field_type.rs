//! Fixed mapping from field kinds and well-known messages to basic types.

use protodoc_schemas::descriptor::FieldKind;

/// Messages rendered as primitives instead of references.
const WELL_KNOWN_TYPES: &[(&str, &str)] = &[
    ("google.protobuf.Any", "Any"),
    ("google.protobuf.Duration", "Duration"),
    ("google.protobuf.Empty", "Empty"),
    ("google.protobuf.Value", "JSON"),
    ("google.protobuf.ListValue", "JSON List"),
    ("google.protobuf.Struct", "JSON Struct"),
    ("google.protobuf.Timestamp", "Timestamp"),
];

/// Returns the basic type name of a well-known message, if it is one.
pub(crate) fn well_known(full_name: &str) -> Option<&'static str> {
    WELL_KNOWN_TYPES
        .iter()
        .find(|(name, _)| *name == full_name)
        .map(|(_, basic)| *basic)
}

/// Returns the basic type name of a scalar kind.
///
/// `None` for kinds that name another declaration (`enum`, `message`) and
/// for kinds without a mapping (`group`, unknown).
pub(crate) fn scalar_name(kind: FieldKind) -> Option<&'static str> {
    let name = match kind {
        FieldKind::Bool => "Boolean",
        FieldKind::Int32
        | FieldKind::Sint32
        | FieldKind::Sfixed32
        | FieldKind::Fixed32 => "Integer",
        FieldKind::Uint32 => "Unsigned Integer",
        FieldKind::Int64
        | FieldKind::Sint64
        | FieldKind::Sfixed64
        | FieldKind::Fixed64 => "Integer(64)",
        FieldKind::Uint64 => "Unsigned Integer(64)",
        FieldKind::Float => "Float(32)",
        FieldKind::Double => "Float(64)",
        FieldKind::String => "String",
        FieldKind::Bytes => "Bytes",
        FieldKind::Enum
        | FieldKind::Message
        | FieldKind::Group
        | FieldKind::Unknown => return None,
    };
    Some(name)
}
