//! Declaration graph to documentation package conversion.

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;

use indexmap::IndexMap;
use protodoc_schemas::descriptor::{
    DeclarationSet, EnumDecl, FieldDecl, FieldKind, FileDecl, HttpRule,
    MessageDecl, MethodDecl, ServiceDecl,
};
use protodoc_schemas::{
    Endpoint, Enum, EnumValue, Field, Message, Package, Service, Type, qualify,
};
use tracing::{debug, info, instrument};

use crate::desc::Description;
use crate::error::{ConvertError, ConvertErrorKind};
use crate::field_type::{scalar_name, well_known};

/// A message or enum declaration found in the declaration graph.
#[derive(Debug, Clone, Copy)]
enum Decl<'a> {
    Message(&'a MessageDecl),
    Enum(&'a EnumDecl),
}

/// An indexed declaration together with the package of its home unit.
#[derive(Debug, Clone, Copy)]
struct Indexed<'a> {
    package: &'a str,
    decl: Decl<'a>,
}

impl Indexed<'_> {
    /// Flattened reference name: `<package>.<local name>`.
    fn reference_name(&self) -> String {
        let local = match self.decl {
            Decl::Message(m) => &m.name,
            Decl::Enum(e) => &e.name,
        };
        qualify(self.package, local)
    }
}

/// Converts the units of one [`DeclarationSet`] into [`Package`]s.
///
/// Construction indexes every message and enum of every unit by
/// fully-qualified name, so fields and methods can point at declarations in
/// other units (or at synthetic map entries) while converting one unit.
#[derive(Debug)]
pub struct Converter<'a> {
    files: &'a [FileDecl],
    index: IndexMap<&'a str, Indexed<'a>>,
}

impl<'a> Converter<'a> {
    /// Builds the declaration index over every unit of `set`.
    ///
    /// Units sharing a package identifier share one flattened namespace:
    /// their nested declarations all become `<package>.<local name>`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::is_duplicate_type`] if two declarations of one
    /// package, in the same unit or in two, flatten to the same local name.
    pub fn new(set: &'a DeclarationSet) -> Result<Self, ConvertError> {
        let mut index = IndexMap::new();
        let mut names = BTreeSet::new();
        for file in &set.files {
            for decl in &file.enums {
                claim(&mut names, &file.package, &decl.name)?;
                index.insert(
                    decl.full_name.as_str(),
                    Indexed {
                        package: &file.package,
                        decl: Decl::Enum(decl),
                    },
                );
            }
            for decl in &file.messages {
                index_message(&mut index, &mut names, &file.package, decl)?;
            }
        }
        debug!(declarations = index.len(), "Built declaration index");

        Ok(Self {
            files: &set.files,
            index,
        })
    }

    /// Returns the units in conversion order, sorted by file name.
    pub fn units(&self) -> Vec<&'a FileDecl> {
        let mut files: Vec<&FileDecl> = self.files.iter().collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }

    /// Converts every unit, in [`Converter::units`] order.
    pub fn convert_all(&self) -> Result<Vec<Package>, ConvertError> {
        let packages = self
            .units()
            .into_iter()
            .map(|file| self.convert_file(file))
            .collect::<Result<Vec<_>, _>>()?;
        info!(packages = packages.len(), "convert.complete");
        Ok(packages)
    }

    /// Converts one unit into a [`Package`].
    ///
    /// Every enum and message of the unit, nested ones included, lands in
    /// the package's type map under its own unqualified name. Synthetic map
    /// entries are skipped; they surface as [`Type::Map`] on their field.
    #[instrument(skip_all, fields(file = %file.name))]
    pub fn convert_file(
        &self,
        file: &FileDecl,
    ) -> Result<Package, ConvertError> {
        let mut types = BTreeMap::new();
        for decl in &file.enums {
            register(&mut types, &file.package, convert_enum(decl))?;
        }
        for decl in &file.messages {
            self.convert_message(&file.package, decl, &mut types)?;
        }

        let services = file
            .services
            .iter()
            .map(|service| self.convert_service(service))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            types = types.len(),
            services = services.len(),
            "Converted file"
        );
        Ok(Package {
            name: file.display_name().to_owned(),
            id: file.package.clone(),
            description: Description::parse(&file.description)
                .text()
                .to_owned(),
            services,
            types,
        })
    }

    fn convert_message(
        &self,
        package: &str,
        decl: &MessageDecl,
        types: &mut BTreeMap<String, Type>,
    ) -> Result<(), ConvertError> {
        if decl.map_entry {
            return Ok(());
        }

        let fields = decl
            .fields
            .iter()
            .map(|field| self.convert_field(field))
            .collect::<Result<Vec<_>, _>>()?;
        let message = Message {
            name: decl.name.clone(),
            description: Description::parse(&decl.description)
                .long(&decl.name),
            fields,
        };
        register(types, package, Type::Message(message))?;

        for nested in &decl.enums {
            register(types, package, convert_enum(nested))?;
        }
        for nested in &decl.messages {
            self.convert_message(package, nested, types)?;
        }
        Ok(())
    }

    fn convert_field(&self, field: &FieldDecl) -> Result<Field, ConvertError> {
        Ok(Field {
            name: field.json_name(),
            description: Description::parse(&field.description)
                .short(&field.name),
            ty: self.field_type(field)?,
        })
    }

    /// Builds the type descriptor of a field.
    fn field_type(&self, field: &FieldDecl) -> Result<Type, ConvertError> {
        let target = field.type_name.as_deref().unwrap_or_default();

        if field.map {
            let malformed = || {
                ConvertError::new(ConvertErrorKind::MalformedMapEntry {
                    field: field.name.clone(),
                    entry: target.to_owned(),
                })
            };
            let Some(Indexed {
                decl: Decl::Message(entry),
                ..
            }) = self.index.get(target)
            else {
                return Err(malformed());
            };
            let [key, value, ..] = entry.fields.as_slice() else {
                return Err(malformed());
            };
            return Ok(Type::map(
                self.field_type(key)?,
                self.field_type(value)?,
            ));
        }

        let element = match field.kind {
            FieldKind::Enum => Type::reference(self.reference_name(target)),
            FieldKind::Message => self.message_type(target),
            kind => match scalar_name(kind) {
                Some(name) => Type::basic(name),
                None => {
                    return Err(ConvertError::new(
                        ConvertErrorKind::UnsupportedFieldKind {
                            field: field.name.clone(),
                            kind: kind.to_string(),
                        },
                    ));
                }
            },
        };

        if field.is_repeated() {
            Ok(Type::array(element))
        } else {
            Ok(element)
        }
    }

    /// Type of a message used as a field, request or response.
    fn message_type(&self, full_name: &str) -> Type {
        match well_known(full_name) {
            Some(name) => Type::basic(name),
            None => Type::reference(self.reference_name(full_name)),
        }
    }

    /// Maps a fully-qualified declaration name to its flattened reference
    /// name. Undeclared names pass through unchanged.
    fn reference_name(&self, full_name: &str) -> String {
        match self.index.get(full_name) {
            Some(indexed) => indexed.reference_name(),
            None => full_name.to_owned(),
        }
    }

    fn convert_service(
        &self,
        service: &ServiceDecl,
    ) -> Result<Service, ConvertError> {
        let mut endpoints = Vec::with_capacity(service.methods.len());
        for method in &service.methods {
            let Some(rule) = &method.http else {
                debug!(
                    service = %service.name,
                    method = %method.name,
                    "Skipping method without HTTP binding"
                );
                continue;
            };
            endpoints.push(self.convert_method(service, method, rule)?);
        }

        Ok(Service {
            name: service.name.clone(),
            description: Description::parse(&service.description)
                .long(&service.name),
            endpoints,
        })
    }

    fn convert_method(
        &self,
        service: &ServiceDecl,
        method: &MethodDecl,
        rule: &HttpRule,
    ) -> Result<Endpoint, ConvertError> {
        let qualified = format!("{}.{}", service.name, method.name);
        let Some(pattern) = &rule.pattern else {
            return Err(ConvertError::new(ConvertErrorKind::UnknownHttpRule {
                method: qualified,
            }));
        };

        let body_field = match rule.body.as_deref() {
            None | Some("") => None,
            Some("*") => Some("*".to_owned()),
            Some(body) => {
                Some(self.body_field(&method.input_type, body, &qualified)?)
            }
        };

        Ok(Endpoint {
            name: method.name.clone(),
            description: Description::parse(&method.description)
                .long(&method.name),
            method: pattern.verb().to_owned(),
            path: pattern.path().to_owned(),
            body_field,
            request: self.message_type(&method.input_type),
            response: self.message_type(&method.output_type),
            streaming_request: method.client_streaming,
            streaming_response: method.server_streaming,
        })
    }

    /// Finds the request field named by an HTTP body binding and returns
    /// its wire name.
    fn body_field(
        &self,
        input_type: &str,
        body: &str,
        method: &str,
    ) -> Result<String, ConvertError> {
        let Some(Indexed {
            decl: Decl::Message(input),
            ..
        }) = self.index.get(input_type)
        else {
            return Err(ConvertError::new(ConvertErrorKind::UnknownMessage {
                name: input_type.to_owned(),
            }));
        };

        input
            .fields
            .iter()
            .find(|field| field.name == body)
            .map(FieldDecl::json_name)
            .ok_or_else(|| {
                ConvertError::new(ConvertErrorKind::MissingBodyField {
                    field: body.to_owned(),
                    method: method.to_owned(),
                })
            })
    }
}

fn index_message<'a>(
    index: &mut IndexMap<&'a str, Indexed<'a>>,
    names: &mut BTreeSet<(&'a str, &'a str)>,
    package: &'a str,
    decl: &'a MessageDecl,
) -> Result<(), ConvertError> {
    if !decl.map_entry {
        claim(names, package, &decl.name)?;
    }
    index.insert(
        decl.full_name.as_str(),
        Indexed {
            package,
            decl: Decl::Message(decl),
        },
    );
    for nested in &decl.enums {
        claim(names, package, &nested.name)?;
        index.insert(
            nested.full_name.as_str(),
            Indexed {
                package,
                decl: Decl::Enum(nested),
            },
        );
    }
    for nested in &decl.messages {
        index_message(index, names, package, nested)?;
    }
    Ok(())
}

/// Records the flattened name `(package, local name)`, rejecting a second
/// declaration under it.
fn claim<'a>(
    names: &mut BTreeSet<(&'a str, &'a str)>,
    package: &'a str,
    name: &'a str,
) -> Result<(), ConvertError> {
    if names.insert((package, name)) {
        Ok(())
    } else {
        Err(ConvertError::new(ConvertErrorKind::DuplicateType {
            package: package.to_owned(),
            name: name.to_owned(),
        }))
    }
}

fn convert_enum(decl: &EnumDecl) -> Type {
    Type::Enum(Enum {
        name: decl.name.clone(),
        description: Description::parse(&decl.description).long(&decl.name),
        values: decl
            .values
            .iter()
            .map(|value| EnumValue {
                value: value.name.clone(),
                description: Description::parse(&value.description)
                    .short(&value.name),
            })
            .collect(),
    })
}

/// Adds a named declaration to a package's type map, rejecting a second
/// declaration under the same local name.
fn register(
    types: &mut BTreeMap<String, Type>,
    package: &str,
    ty: Type,
) -> Result<(), ConvertError> {
    let name = ty.type_name().unwrap_or_default().to_owned();
    match types.entry(name) {
        Entry::Occupied(entry) => {
            Err(ConvertError::new(ConvertErrorKind::DuplicateType {
                package: package.to_owned(),
                name: entry.key().clone(),
            }))
        }
        Entry::Vacant(entry) => {
            entry.insert(ty);
            Ok(())
        }
    }
}
