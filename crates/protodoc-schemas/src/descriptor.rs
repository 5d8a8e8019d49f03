//! Declaration graph handed over by the host schema toolchain.
//!
//! This is the already-parsed form of an interface schema: one [`FileDecl`]
//! per compilation unit with its enums, (possibly nested) messages and
//! services. The converter only reads it; nothing here is produced by the
//! pipeline.
//!
//! Type references inside the graph (`type_name`, `input_type`,
//! `output_type`) are fully-qualified schema names without a leading dot,
//! e.g. `"acme.billing.v1.Invoice.Line"`.

use serde::{Deserialize, Serialize};

/// Every compilation unit of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSet {
    pub files: Vec<FileDecl>,
}

/// One compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDecl {
    /// Source file path, used for ordering.
    pub name: String,
    /// Dotted package identifier.
    pub package: String,
    /// Display name of the package. Defaults to the last segment of
    /// `package`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Leading comment of the package statement.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    #[serde(default)]
    pub messages: Vec<MessageDecl>,
    #[serde(default)]
    pub services: Vec<ServiceDecl>,
    /// Whether documentation is emitted for this unit. Dependency-only
    /// units (`false`) still take part in resolution and pruning.
    #[serde(default = "default_generate")]
    pub generate: bool,
}

fn default_generate() -> bool {
    true
}

impl FileDecl {
    /// Returns the display name, falling back to the last package segment.
    pub fn display_name(&self) -> &str {
        match &self.display_name {
            Some(name) => name,
            None => self.package.rsplit('.').next().unwrap_or_default(),
        }
    }
}

/// A message declaration, possibly nesting further declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDecl {
    /// Unqualified name.
    pub name: String,
    /// Fully-qualified name, including enclosing messages.
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    /// Messages declared inside this one.
    #[serde(default)]
    pub messages: Vec<MessageDecl>,
    /// Enums declared inside this one.
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    /// Synthetic entry message generated for a map field.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub map_entry: bool,
}

/// A field of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Declared name (`snake_case` in most schemas).
    pub name: String,
    /// Wire (JSON) name. Derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub kind: FieldKind,
    #[serde(default)]
    pub cardinality: Cardinality,
    /// Fully-qualified target for `enum` and `message` kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// The field is a map; `type_name` names its synthetic entry message.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub map: bool,
}

impl FieldDecl {
    /// Returns the wire name of the field.
    pub fn json_name(&self) -> String {
        match &self.json_name {
            Some(name) => name.clone(),
            None => to_json_name(&self.name),
        }
    }

    /// Returns true for `repeated` fields (maps included).
    pub fn is_repeated(&self) -> bool {
        self.cardinality == Cardinality::Repeated
    }
}

/// Derives the default wire name: underscores are dropped and the letter
/// following each underscore is upper-cased (`foo_bar_baz` → `fooBarBaz`).
pub fn to_json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut capitalize_next = false;
    for c in name.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Wire kind of a field, as reported by the schema compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    /// Any kind this version does not know about.
    #[serde(other)]
    Unknown,
}

impl FieldKind {
    /// Returns the schema keyword for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Double => "double",
            FieldKind::Float => "float",
            FieldKind::Int64 => "int64",
            FieldKind::Uint64 => "uint64",
            FieldKind::Int32 => "int32",
            FieldKind::Fixed64 => "fixed64",
            FieldKind::Fixed32 => "fixed32",
            FieldKind::Bool => "bool",
            FieldKind::String => "string",
            FieldKind::Group => "group",
            FieldKind::Message => "message",
            FieldKind::Bytes => "bytes",
            FieldKind::Uint32 => "uint32",
            FieldKind::Enum => "enum",
            FieldKind::Sfixed32 => "sfixed32",
            FieldKind::Sfixed64 => "sfixed64",
            FieldKind::Sint32 => "sint32",
            FieldKind::Sint64 => "sint64",
            FieldKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    #[default]
    Optional,
    Required,
    Repeated,
}

/// An enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values: Vec<EnumValueDecl>,
}

/// One value of an enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueDecl {
    pub name: String,
    #[serde(default)]
    pub number: i32,
    #[serde(default)]
    pub description: String,
}

/// A service declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDecl {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// A service method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Fully-qualified request message.
    pub input_type: String,
    /// Fully-qualified response message.
    pub output_type: String,
    #[serde(default)]
    pub client_streaming: bool,
    #[serde(default)]
    pub server_streaming: bool,
    /// HTTP binding annotation. Methods without one are not documented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpRule>,
}

/// HTTP binding of a method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRule {
    /// Verb and path. A rule without a pattern cannot be documented.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<HttpPattern>,
    /// Declared name of the request field carrying the body, or `"*"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Verb and path template of an HTTP binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpPattern {
    Get(String),
    Put(String),
    Post(String),
    Delete(String),
    Patch(String),
    Custom { kind: String, path: String },
}

impl HttpPattern {
    /// Returns the HTTP verb.
    pub fn verb(&self) -> &str {
        match self {
            HttpPattern::Get(_) => "GET",
            HttpPattern::Put(_) => "PUT",
            HttpPattern::Post(_) => "POST",
            HttpPattern::Delete(_) => "DELETE",
            HttpPattern::Patch(_) => "PATCH",
            HttpPattern::Custom { kind, .. } => kind,
        }
    }

    /// Returns the path template.
    pub fn path(&self) -> &str {
        match self {
            HttpPattern::Get(path)
            | HttpPattern::Put(path)
            | HttpPattern::Post(path)
            | HttpPattern::Delete(path)
            | HttpPattern::Patch(path)
            | HttpPattern::Custom { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_name_from_snake_case() {
        assert_eq!(to_json_name("foo_bar_baz"), "fooBarBaz");
        assert_eq!(to_json_name("id"), "id");
        assert_eq!(to_json_name("page_size2"), "pageSize2");
    }

    #[test]
    fn explicit_json_name_wins() {
        let field: FieldDecl = serde_json::from_value(json!({
            "name": "display_name",
            "json_name": "label",
            "kind": "string",
        }))
        .unwrap();
        assert_eq!(field.json_name(), "label");
        assert_eq!(field.cardinality, Cardinality::Optional);
    }

    #[test]
    fn unknown_field_kind_deserializes_as_unknown() {
        let field: FieldDecl = serde_json::from_value(json!({
            "name": "x",
            "kind": "decimal128",
        }))
        .unwrap();
        assert_eq!(field.kind, FieldKind::Unknown);
    }

    #[test]
    fn display_name_defaults_to_last_segment() {
        let file = FileDecl {
            package: "acme.billing.v1".to_string(),
            ..FileDecl::default()
        };
        assert_eq!(file.display_name(), "v1");

        let named = FileDecl {
            display_name: Some("billing".to_string()),
            ..file
        };
        assert_eq!(named.display_name(), "billing");
    }

    #[test]
    fn generate_defaults_to_true() {
        let file: FileDecl = serde_json::from_value(json!({
            "name": "a.proto",
            "package": "pkg.a",
        }))
        .unwrap();
        assert!(file.generate);
    }

    #[test]
    fn http_pattern_shapes() {
        let rule: HttpRule = serde_json::from_value(json!({
            "pattern": {"post": "/v1/things"},
            "body": "thing",
        }))
        .unwrap();
        let pattern = rule.pattern.unwrap();
        assert_eq!(pattern.verb(), "POST");
        assert_eq!(pattern.path(), "/v1/things");

        let custom: HttpPattern = serde_json::from_value(json!({
            "custom": {"kind": "HEAD", "path": "/v1/ping"},
        }))
        .unwrap();
        assert_eq!(custom.verb(), "HEAD");
        assert_eq!(custom.path(), "/v1/ping");
    }
}
