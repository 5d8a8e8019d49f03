//! Documentation tree emitted by the generator.
//!
//! The tree is organised as sections ([`Tag`]) holding packages, each
//! package holding its services and a flat map of the data types it
//! declares. Types are a closed sum ([`Type`]); every consumer matches on
//! all six variants.
//!
//! ## Terminology
//!
//! - **Named type**: a [`Type`] that carries its own name (message, enum,
//!   ref, basic). Only named types take part in reachability bookkeeping.
//! - **Structural type**: a [`Type`] purely derived from other types
//!   (array, map).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named output section grouping packages for documentation rendering.
///
/// Sections are emitted unordered; renderers sort them by `weight`, lower
/// weights first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Display name of the section.
    pub name: String,
    /// Text shown before the section's packages, inlined verbatim.
    pub preamble: String,
    /// Sort key among sections.
    pub weight: i64,
    /// Packages of this section, in configuration order.
    pub packages: Vec<Package>,
}

/// Documentation for one schema compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Display name. Not necessarily unique.
    pub name: String,
    /// Dotted package identifier, unique across the package set.
    pub id: String,
    /// Package-level description.
    pub description: String,
    /// Services declared by the unit, in declaration order.
    pub services: Vec<Service>,
    /// Every data type declared anywhere in the unit, keyed by local name.
    ///
    /// Nested declarations are flattened into this map. The pruner removes
    /// entries that no endpoint can reach; nothing ever adds entries after
    /// conversion.
    pub types: BTreeMap<String, Type>,
}

impl Package {
    /// Returns the fully-qualified name of a local type key.
    pub fn qualify(&self, local: &str) -> String {
        crate::qualify(&self.id, local)
    }

    /// Calls `f` for every [`Ref`] held by this package: inside its type
    /// declarations and inside every endpoint's request and response.
    pub fn for_each_ref<'a>(&'a self, f: &mut impl FnMut(&'a Ref)) {
        for ty in self.types.values() {
            ty.for_each_ref(f);
        }
        for endpoint in self.services.iter().flat_map(|s| &s.endpoints) {
            endpoint.request.for_each_ref(f);
            endpoint.response.for_each_ref(f);
        }
    }
}

/// Documentation for a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    pub description: String,
    /// HTTP-bound methods of the service. Methods without a binding are not
    /// documented and do not appear here.
    pub endpoints: Vec<Endpoint>,
}

/// Documentation for an HTTP-bound service method.
///
/// Endpoints are the roots of the reachability graph: every type kept after
/// pruning is reachable from some endpoint's request or response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub description: String,
    /// HTTP verb (`GET`, `POST`, ... or a custom verb).
    pub method: String,
    /// HTTP path template.
    pub path: String,
    /// Wire name of the request field carrying the body, `"*"` when the
    /// whole request is the body, `None` when there is no body.
    #[serde(default)]
    pub body_field: Option<String>,
    pub request: Type,
    pub response: Type,
    pub streaming_request: bool,
    pub streaming_response: bool,
}

/// A documented data type.
///
/// Serialized internally tagged: `{"type": "message", "name": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Type {
    Message(Message),
    Enum(Enum),
    /// Symbolic pointer to a message or enum declared in some package.
    Ref(Ref),
    Map(Map),
    Array(Array),
    Basic(Basic),
}

impl Type {
    /// Creates a [`Type::Basic`] without an example value.
    pub fn basic(name: impl Into<String>) -> Self {
        Type::Basic(Basic {
            name: name.into(),
            example: String::new(),
        })
    }

    /// Creates a [`Type::Ref`] to a fully-qualified name.
    pub fn reference(name: impl Into<String>) -> Self {
        Type::Ref(Ref { name: name.into() })
    }

    /// Wraps `value` in a [`Type::Array`].
    pub fn array(value: Type) -> Self {
        Type::Array(Array {
            value: Box::new(value),
        })
    }

    /// Creates a [`Type::Map`] from key and value types.
    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Map {
            key: Box::new(key),
            value: Box::new(value),
        })
    }

    /// Returns the serialized discriminator of this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Type::Message(_) => "message",
            Type::Enum(_) => "enum",
            Type::Ref(_) => "ref",
            Type::Map(_) => "map",
            Type::Array(_) => "array",
            Type::Basic(_) => "basic",
        }
    }

    /// Returns the name of a named type, `None` for arrays and maps.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Type::Message(m) => Some(&m.name),
            Type::Enum(e) => Some(&e.name),
            Type::Ref(r) => Some(&r.name),
            Type::Basic(b) => Some(&b.name),
            Type::Map(_) | Type::Array(_) => None,
        }
    }

    /// Calls `f` for every [`Ref`] structurally contained in this type.
    ///
    /// The walk does not follow references; it only visits what is written
    /// inline (array elements, map keys and values, message fields).
    pub fn for_each_ref<'a>(&'a self, f: &mut impl FnMut(&'a Ref)) {
        match self {
            Type::Ref(r) => f(r),
            Type::Array(a) => a.value.for_each_ref(f),
            Type::Map(m) => {
                m.key.for_each_ref(f);
                m.value.for_each_ref(f);
            }
            Type::Message(m) => {
                for field in &m.fields {
                    field.ty.for_each_ref(f);
                }
            }
            Type::Enum(_) | Type::Basic(_) => {}
        }
    }
}

/// Documentation for a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    pub description: String,
    pub fields: Vec<Field>,
}

/// A field of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Wire (JSON) name of the field.
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

/// Documentation for an enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub description: String,
    pub values: Vec<EnumValue>,
}

/// One value of an enum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub value: String,
    pub description: String,
}

/// Reference to a message or enum by fully-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    pub name: String,
}

/// A map from `key` to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Map {
    pub key: Box<Type>,
    pub value: Box<Type>,
}

/// A list of `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Array {
    pub value: Box<Type>,
}

/// A primitive or well-known type such as `String` or `Timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Basic {
    pub name: String,
    /// Example value, empty when none is known.
    #[serde(default)]
    pub example: String,
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::testutil::arb_type;

    fn message(name: &str, fields: Vec<(&str, Type)>) -> Type {
        Type::Message(Message {
            name: name.to_string(),
            description: String::new(),
            fields: fields
                .into_iter()
                .map(|(name, ty)| Field {
                    name: name.to_string(),
                    description: String::new(),
                    ty,
                })
                .collect(),
        })
    }

    #[test]
    fn basic_serializes_with_discriminator() {
        let value = serde_json::to_value(Type::basic("String")).unwrap();
        assert_eq!(
            value,
            json!({"type": "basic", "name": "String", "example": ""})
        );
    }

    #[test]
    fn nested_structural_types_serialize_with_discriminators() {
        let ty = Type::map(
            Type::basic("String"),
            Type::array(Type::reference("pkg.Foo")),
        );
        let value = serde_json::to_value(&ty).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "map",
                "key": {"type": "basic", "name": "String", "example": ""},
                "value": {
                    "type": "array",
                    "value": {"type": "ref", "name": "pkg.Foo"},
                },
            })
        );
    }

    #[test]
    fn field_type_is_serialized_under_type_key() {
        let ty = message("Foo", vec![("id", Type::basic("Integer"))]);
        let value = serde_json::to_value(&ty).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["fields"][0]["type"]["type"], "basic");
        assert_eq!(value["fields"][0]["type"]["name"], "Integer");
    }

    #[test]
    fn basic_example_defaults_when_missing() {
        let ty: Type =
            serde_json::from_value(json!({"type": "basic", "name": "Bytes"}))
                .unwrap();
        assert_eq!(ty, Type::basic("Bytes"));
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        let result: Result<Type, _> =
            serde_json::from_value(json!({"type": "tuple", "name": "X"}));
        assert!(result.is_err());
    }

    #[test]
    fn type_name_only_for_named_types() {
        assert_eq!(Type::basic("String").type_name(), Some("String"));
        assert_eq!(Type::reference("a.B").type_name(), Some("a.B"));
        assert_eq!(message("Foo", vec![]).type_name(), Some("Foo"));
        assert_eq!(Type::array(Type::basic("String")).type_name(), None);
        assert_eq!(
            Type::map(Type::basic("String"), Type::basic("String"))
                .type_name(),
            None
        );
    }

    #[test]
    fn for_each_ref_visits_inline_refs_only() {
        let ty = message(
            "Foo",
            vec![
                ("a", Type::reference("pkg.A")),
                ("b", Type::array(Type::reference("pkg.B"))),
                (
                    "c",
                    Type::map(Type::basic("String"), Type::reference("pkg.C")),
                ),
                ("d", Type::basic("Boolean")),
            ],
        );
        let mut seen = Vec::new();
        ty.for_each_ref(&mut |r| seen.push(r.name.as_str()));
        assert_eq!(seen, vec!["pkg.A", "pkg.B", "pkg.C"]);
    }

    #[test]
    fn package_for_each_ref_includes_endpoints() {
        let mut package = Package {
            id: "pkg".to_string(),
            ..Package::default()
        };
        package.types.insert(
            "Foo".to_string(),
            message("Foo", vec![("bar", Type::reference("pkg.Bar"))]),
        );
        package.services.push(Service {
            name: "Svc".to_string(),
            description: String::new(),
            endpoints: vec![Endpoint {
                name: "Get".to_string(),
                description: String::new(),
                method: "GET".to_string(),
                path: "/foo".to_string(),
                body_field: None,
                request: Type::reference("pkg.Foo"),
                response: Type::basic("Empty"),
                streaming_request: false,
                streaming_response: false,
            }],
        });

        let mut seen = Vec::new();
        package.for_each_ref(&mut |r| seen.push(r.name.clone()));
        seen.sort();
        assert_eq!(seen, vec!["pkg.Bar", "pkg.Foo"]);
    }

    #[test]
    fn package_qualify() {
        let package = Package {
            id: "svc.a".to_string(),
            ..Package::default()
        };
        assert_eq!(package.qualify("Foo"), "svc.a.Foo");
    }

    proptest! {
        /// The serialized `type` field always names the variant.
        #[test]
        fn discriminator_matches_kind(ty in arb_type()) {
            let value = serde_json::to_value(&ty).expect("serialize");
            prop_assert_eq!(value["type"].as_str(), Some(ty.kind()));
        }
    }
}
