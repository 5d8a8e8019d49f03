//! Cross-package symbol table and reference resolution.

use protodoc_schemas::{Package, Type, qualify, strip_package};
use tracing::debug;

use crate::error::{PruneError, PruneErrorKind};

/// A declaration a reference resolved to.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Package holding the declaration.
    pub package: &'a Package,
    /// Key of the declaration in the package's type map.
    pub key: &'a str,
    /// The declaration itself, always a message or an enum.
    pub ty: &'a Type,
}

impl Resolved<'_> {
    /// Returns the fully-qualified name of the declaration.
    pub fn full_name(&self) -> String {
        qualify(&self.package.id, self.key)
    }
}

/// Two-level lookup from package identifier and local name to declaration.
///
/// Built once over the complete package set and never mutated; pruning
/// happens only after every lookup is done.
#[derive(Debug)]
pub struct SymbolTable<'a> {
    /// Packages in input order, for walking endpoints.
    packages: &'a [Package],
    /// Packages ordered by identifier length, longest first. A reference
    /// `a.b.C` is tried against `a.b` before `a`.
    by_prefix: Vec<&'a Package>,
}

impl<'a> SymbolTable<'a> {
    /// Builds the table over every package.
    pub fn build(packages: &'a [Package]) -> Self {
        let mut by_prefix: Vec<&Package> = packages.iter().collect();
        by_prefix.sort_by(|a, b| b.id.len().cmp(&a.id.len()));
        debug!(packages = packages.len(), "Built symbol table");

        Self {
            packages,
            by_prefix,
        }
    }

    /// Returns the packages the table was built over, in input order.
    pub fn packages(&self) -> &'a [Package] {
        self.packages
    }

    /// Resolves a fully-qualified reference name.
    ///
    /// Every package whose identifier is a dotted prefix of `name` is a
    /// candidate; the remainder is looked up as an exact key in the
    /// candidate's type map.
    ///
    /// # Errors
    ///
    /// [`PruneError::is_unresolved_ref`] if no candidate holds the
    /// remainder, [`PruneError::is_invalid_ref_target`] if the declaration
    /// found is not a message or enum.
    pub fn resolve(&self, name: &str) -> Result<Resolved<'a>, PruneError> {
        for &package in &self.by_prefix {
            let Some(local) = strip_package(&package.id, name) else {
                continue;
            };
            let Some((key, ty)) = package.types.get_key_value(local) else {
                continue;
            };
            return match ty {
                Type::Message(_) | Type::Enum(_) => Ok(Resolved {
                    package,
                    key,
                    ty,
                }),
                other => {
                    Err(PruneError::new(PruneErrorKind::InvalidRefTarget {
                        name: name.to_owned(),
                        kind: other.kind(),
                    }))
                }
            };
        }

        Err(PruneError::new(PruneErrorKind::UnresolvedRef {
            name: name.to_owned(),
        }))
    }

    /// Resolves every reference held anywhere in the package set, in type
    /// declarations and endpoints alike, whether reachable or not.
    ///
    /// # Errors
    ///
    /// Returns the first resolution failure.
    pub fn check_references(&self) -> Result<(), PruneError> {
        let mut checked = 0_usize;
        let mut result = Ok(());
        for package in self.packages {
            package.for_each_ref(&mut |r| {
                if result.is_ok() {
                    checked += 1;
                    result = self.resolve(&r.name).map(|_| ());
                }
            });
            if result.is_err() {
                break;
            }
        }
        debug!(refs = checked, "Checked references");
        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use protodoc_schemas::{Enum, Message};

    use super::*;

    fn message(name: &str) -> Type {
        Type::Message(Message {
            name: name.to_string(),
            ..Message::default()
        })
    }

    fn package(id: &str, types: Vec<(&str, Type)>) -> Package {
        Package {
            name: id.rsplit('.').next().unwrap().to_string(),
            id: id.to_string(),
            types: types
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect::<BTreeMap<_, _>>(),
            ..Package::default()
        }
    }

    #[test]
    fn resolves_exact_key_in_prefix_package() {
        let packages = vec![
            package("pkg.a", vec![("Foo", message("Foo"))]),
            package("pkg.b", vec![("Foo", message("Foo"))]),
        ];
        let table = SymbolTable::build(&packages);

        let resolved = table.resolve("pkg.b.Foo").unwrap();
        assert_eq!(resolved.package.id, "pkg.b");
        assert_eq!(resolved.key, "Foo");
        assert_eq!(resolved.full_name(), "pkg.b.Foo");
    }

    #[test]
    fn longer_prefix_wins() {
        let packages = vec![
            package("pkg", vec![("a.Foo", message("outer"))]),
            package("pkg.a", vec![("Foo", message("inner"))]),
        ];
        let table = SymbolTable::build(&packages);

        let resolved = table.resolve("pkg.a.Foo").unwrap();
        assert_eq!(resolved.package.id, "pkg.a");
    }

    #[test]
    fn falls_back_to_shorter_prefix() {
        let packages = vec![
            package("pkg", vec![("a.Bar", message("Bar"))]),
            package("pkg.a", vec![("Foo", message("Foo"))]),
        ];
        let table = SymbolTable::build(&packages);

        let resolved = table.resolve("pkg.a.Bar").unwrap();
        assert_eq!(resolved.package.id, "pkg");
        assert_eq!(resolved.key, "a.Bar");
    }

    #[test]
    fn prefix_must_end_on_segment_boundary() {
        let packages = vec![package("pkg.a", vec![("Foo", message("Foo"))])];
        let table = SymbolTable::build(&packages);

        let err = table.resolve("pkg.ab.Foo").unwrap_err();
        assert!(err.is_unresolved_ref());
        assert!(err.to_string().contains("pkg.ab.Foo"));
    }

    #[test]
    fn missing_key_is_unresolved() {
        let packages = vec![package("pkg.a", vec![("Foo", message("Foo"))])];
        let table = SymbolTable::build(&packages);

        assert!(table.resolve("pkg.a.Bar").unwrap_err().is_unresolved_ref());
    }

    #[test]
    fn enum_is_a_valid_target() {
        let packages = vec![package(
            "pkg.a",
            vec![("Color", Type::Enum(Enum::default()))],
        )];
        let table = SymbolTable::build(&packages);

        assert!(table.resolve("pkg.a.Color").is_ok());
    }

    #[test]
    fn basic_is_an_invalid_target() {
        let packages =
            vec![package("pkg.a", vec![("Alias", Type::basic("String"))])];
        let table = SymbolTable::build(&packages);

        let err = table.resolve("pkg.a.Alias").unwrap_err();
        assert!(err.is_invalid_ref_target());
    }

    #[test]
    fn check_references_covers_unreachable_types() {
        let packages = vec![package(
            "pkg.a",
            vec![(
                "Orphan",
                Type::Message(Message {
                    name: "Orphan".to_string(),
                    description: String::new(),
                    fields: vec![protodoc_schemas::Field {
                        name: "ghost".to_string(),
                        description: String::new(),
                        ty: Type::reference("pkg.a.Ghost"),
                    }],
                }),
            )],
        )];
        let table = SymbolTable::build(&packages);

        let err = table.check_references().unwrap_err();
        assert!(err.is_unresolved_ref());
        assert!(err.to_string().contains("pkg.a.Ghost"));
    }
}
