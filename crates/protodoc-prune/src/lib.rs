//! Reference resolution and reachability pruning.
//!
//! This is the second phase of the protodoc pipeline. Conversion registers
//! every enum and message a unit declares; most of them are never exposed
//! through an HTTP endpoint. This crate keeps only what the public surface
//! can reach.
//!
//! ## Algorithm
//!
//! 1. Build a [`SymbolTable`] over the complete package set
//! 2. Resolve every reference, reachable or not, so dangling references
//!    fail the run instead of disappearing with the pruned types
//! 3. Walk every endpoint's request and response, recording each
//!    declaration reached through a reference ([`UsedTypes`])
//! 4. Retain, per package, the type map entries whose fully-qualified name
//!    was recorded
//!
//! Steps 1 to 3 borrow the packages immutably; step 4 is the only mutation.

mod error;
mod reach;
mod symbols;

use std::io::{Read, Write};

use protodoc_schemas::{Package, qualify};
use tracing::{debug_span, info, instrument};

#[doc(inline)]
pub use crate::error::PruneError;
use crate::error::PruneErrorKind;
#[doc(inline)]
pub use crate::reach::UsedTypes;
#[doc(inline)]
pub use crate::symbols::{Resolved, SymbolTable};

/// Removes every type no endpoint can reach.
///
/// Returns the fully-qualified names that were kept. On error no package
/// is modified.
///
/// # Errors
///
/// Returns [`PruneError`] if any reference in any package fails to
/// resolve ([`PruneError::is_unresolved_ref`]) or resolves to something
/// other than a message or enum ([`PruneError::is_invalid_ref_target`]).
#[instrument(skip_all, fields(packages = packages.len()))]
pub fn prune_types(packages: &mut [Package]) -> Result<UsedTypes, PruneError> {
    let used = {
        let table = SymbolTable::build(packages);
        table.check_references()?;
        table.mark_reachable()?
    };

    let mut removed = 0_usize;
    for package in packages.iter_mut() {
        let before = package.types.len();
        package
            .types
            .retain(|key, _| used.contains(&qualify(&package.id, key)));
        removed += before - package.types.len();
    }

    info!(kept = used.len(), removed, "prune.complete");
    Ok(used)
}

/// Run the pruning phase.
///
/// Reads a package list as JSON from the input, prunes unreachable types
/// and writes the pruned package list as JSON to the output.
///
/// # Errors
///
/// Returns [`PruneError`] if:
/// - Reading from input fails ([`PruneError::is_io`])
/// - The input is not a valid package list
///   ([`PruneError::is_deserialization`])
/// - Resolution fails (see [`prune_types`])
/// - Writing to output fails ([`PruneError::is_io`])
pub fn run(
    mut input: impl Read,
    mut output: impl Write,
) -> Result<(), PruneError> {
    let _span = debug_span!("run").entered();

    let mut json = String::new();
    input.read_to_string(&mut json)?;
    let mut packages: Vec<Package> = serde_json::from_str(&json)
        .map_err(|e| PruneError::new(PruneErrorKind::Deserialization(e)))?;

    prune_types(&mut packages)?;

    serde_json::to_writer_pretty(&mut output, &packages)
        .map_err(|e| PruneError::new(PruneErrorKind::Serialization(e)))?;
    writeln!(output)?;

    Ok(())
}
