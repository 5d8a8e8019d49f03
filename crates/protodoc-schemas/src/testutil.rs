//! Shared proptest strategies for schema tests.

use proptest::prelude::*;

use crate::{EnumValue, Field, Type};

/// Strategy for generating arbitrary identifier-like names.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,11}"
}

/// Strategy for generating dotted fully-qualified names (`pkg.Name`).
pub fn arb_path() -> impl Strategy<Value = String> {
    (arb_name(), arb_name()).prop_map(|(pkg, name)| format!("{pkg}.{name}"))
}

/// Strategy for generating bounded, arbitrarily nested types.
pub fn arb_type() -> impl Strategy<Value = Type> {
    let leaf = prop_oneof![
        arb_name().prop_map(Type::basic),
        arb_path().prop_map(Type::reference),
        (arb_name(), proptest::collection::vec(arb_name(), 0..3)).prop_map(
            |(name, values)| {
                Type::Enum(crate::Enum {
                    name,
                    description: String::new(),
                    values: values
                        .into_iter()
                        .map(|value| EnumValue {
                            value,
                            description: String::new(),
                        })
                        .collect(),
                })
            }
        ),
    ];
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Type::array),
            (inner.clone(), inner.clone())
                .prop_map(|(key, value)| Type::map(key, value)),
            (
                arb_name(),
                proptest::collection::vec((arb_name(), inner), 0..3)
            )
                .prop_map(|(name, fields)| {
                    Type::Message(crate::Message {
                        name,
                        description: String::new(),
                        fields: fields
                            .into_iter()
                            .map(|(name, ty)| Field {
                                name,
                                description: String::new(),
                                ty,
                            })
                            .collect(),
                    })
                }),
        ]
    })
}
