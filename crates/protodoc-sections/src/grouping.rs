//! Assignment of packages to sections.

use std::collections::BTreeMap;

use protodoc_schemas::{Package, Tag};
use tracing::{debug, instrument};

use crate::config::{Config, DEFAULT_SECTION};
use crate::error::{SectionError, SectionErrorKind};

/// Groups packages into one [`Tag`] per configured section plus the
/// `default` tag.
///
/// Members of each section are matched in order (see [`find_package`]).
/// Every package not claimed by a member lands in the `default` tag, in
/// input order; that tag takes its name, preamble and weight from a
/// configured `default` section when there is one. Sections are processed
/// in name order.
///
/// # Errors
///
/// [`SectionError::is_unmatched_member`] if a member matches no package,
/// [`SectionError::is_duplicate_member`] if two members (of one section or
/// of two) resolve to the same package.
#[instrument(skip_all, fields(packages = packages.len()))]
pub fn group_packages(
    config: &Config,
    packages: Vec<Package>,
) -> Result<BTreeMap<String, Tag>, SectionError> {
    let mut claimed: Vec<Option<&str>> = vec![None; packages.len()];
    let mut members: Vec<(&str, Vec<usize>)> = Vec::new();

    for (key, section) in &config.sections {
        if key == DEFAULT_SECTION {
            continue;
        }
        let mut indices = Vec::with_capacity(section.packages.len());
        for member in &section.packages {
            let Some(index) = find_package(&packages, member) else {
                return Err(SectionError::new(
                    SectionErrorKind::UnmatchedMember {
                        member: member.clone(),
                        section: key.clone(),
                    },
                ));
            };
            if let Some(first) = claimed[index] {
                return Err(SectionError::new(
                    SectionErrorKind::DuplicateMember {
                        package: packages[index].id.clone(),
                        first: first.to_owned(),
                        second: key.clone(),
                    },
                ));
            }
            claimed[index] = Some(key.as_str());
            indices.push(index);
        }
        members.push((key.as_str(), indices));
    }

    let mut slots: Vec<Option<Package>> =
        packages.into_iter().map(Some).collect();
    let mut tags = BTreeMap::new();
    for (key, indices) in members {
        let section = &config.sections[key];
        let packages: Vec<Package> = indices
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();
        debug!(section = key, packages = packages.len(), "Grouped section");
        tags.insert(
            key.to_owned(),
            Tag {
                name: section.name.clone(),
                preamble: section.preamble.clone(),
                weight: section.weight,
                packages,
            },
        );
    }

    let leftovers: Vec<Package> = slots.into_iter().flatten().collect();
    debug!(packages = leftovers.len(), "Grouped default section");
    let default = match config.sections.get(DEFAULT_SECTION) {
        Some(section) => Tag {
            name: section.name.clone(),
            preamble: section.preamble.clone(),
            weight: section.weight,
            packages: leftovers,
        },
        None => Tag {
            name: DEFAULT_SECTION.to_owned(),
            packages: leftovers,
            ..Tag::default()
        },
    };
    tags.insert(DEFAULT_SECTION.to_owned(), default);

    Ok(tags)
}

/// Finds the package a section member refers to.
///
/// Priority: exact identifier, then exact display name, then identifier
/// ending in `"." + member`. Within one tier the first package in input
/// order wins.
pub fn find_package(packages: &[Package], member: &str) -> Option<usize> {
    packages
        .iter()
        .position(|p| p.id == member)
        .or_else(|| packages.iter().position(|p| p.name == member))
        .or_else(|| {
            let suffix = format!(".{member}");
            packages.iter().position(|p| p.id.ends_with(&suffix))
        })
}
