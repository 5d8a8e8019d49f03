//! Schema definitions shared by every protodoc phase.
//!
//! Two families of types live here:
//! - [`descriptor`]: the declaration graph handed over by the host schema
//!   toolchain (files, messages, fields, enums, services, HTTP bindings).
//! - [`doc`]: the documentation tree the pipeline produces (packages,
//!   services, endpoints, the polymorphic [`Type`] and section [`Tag`]s).
//!
//! All of them are plain serde types so each phase can be run on its own
//! and its JSON output fed to the next one.

pub mod descriptor;
mod doc;
#[cfg(test)]
mod testutil;

#[doc(inline)]
pub use descriptor::DeclarationSet;
#[doc(inline)]
pub use doc::*;

/// Builds the fully-qualified name of `local` inside `package`.
///
/// Units without a package declaration (empty identifier) keep the bare
/// local name, matching how the schema compiler names their declarations.
pub fn qualify(package: &str, local: &str) -> String {
    if package.is_empty() {
        local.to_owned()
    } else {
        format!("{package}.{local}")
    }
}

/// Strips `package` used as a dotted prefix from a fully-qualified `name`.
///
/// Returns `None` when `package` is not a prefix of `name` on a segment
/// boundary (`"pkg.a"` is not a prefix of `"pkg.ab.Foo"`).
pub fn strip_package<'a>(package: &str, name: &'a str) -> Option<&'a str> {
    if package.is_empty() {
        return Some(name);
    }
    name.strip_prefix(package)?.strip_prefix('.')
}
