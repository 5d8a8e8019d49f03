//! Reachability walk from endpoints through resolved references.
//!
//! Every endpoint's request and response is a root. The walk descends
//! through arrays, maps and message fields; a [`Ref`] is resolved and its
//! declaration entered one level below it. Declarations are recorded in
//! [`UsedTypes`] by fully-qualified name, and a recorded name is never
//! entered twice, so recursive messages terminate.
//!
//! [`Ref`]: protodoc_schemas::Ref

use std::collections::BTreeSet;

use protodoc_schemas::Type;
use tracing::{debug, instrument};

use crate::error::PruneError;
use crate::symbols::SymbolTable;

/// Fully-qualified names of the declarations reachable from some endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedTypes {
    names: BTreeSet<String>,
}

impl UsedTypes {
    /// Records a name. Returns true if it was not recorded before.
    pub fn insert(&mut self, name: String) -> bool {
        self.names.insert(name)
    }

    /// Returns true if the name was recorded.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over recorded names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<'a> SymbolTable<'a> {
    /// Walks every endpoint of every package and returns the declarations
    /// it reaches.
    ///
    /// # Errors
    ///
    /// Returns the first reference that fails to resolve.
    #[instrument(skip_all)]
    pub fn mark_reachable(&self) -> Result<UsedTypes, PruneError> {
        let mut used = UsedTypes::default();
        for package in self.packages() {
            for endpoint in package.services.iter().flat_map(|s| &s.endpoints)
            {
                self.mark(&endpoint.request, &mut used)?;
                self.mark(&endpoint.response, &mut used)?;
            }
        }
        debug!(used = used.len(), "Marked reachable types");
        Ok(used)
    }

    fn mark(
        &self,
        ty: &'a Type,
        used: &mut UsedTypes,
    ) -> Result<(), PruneError> {
        match ty {
            Type::Enum(_) | Type::Basic(_) => Ok(()),
            Type::Array(array) => self.mark(&array.value, used),
            Type::Map(map) => {
                self.mark(&map.key, used)?;
                self.mark(&map.value, used)
            }
            Type::Message(message) => {
                for field in &message.fields {
                    self.mark(&field.ty, used)?;
                }
                Ok(())
            }
            Type::Ref(reference) => {
                let resolved = self.resolve(&reference.name)?;
                if used.insert(resolved.full_name()) {
                    self.mark(resolved.ty, used)
                } else {
                    Ok(())
                }
            }
        }
    }
}
