//! Section configuration and package grouping.
//!
//! This is the last phase of the protodoc pipeline. A TOML [`Config`]
//! names output sections and their members; [`group_packages`] partitions
//! the pruned packages into one [`Tag`] per section, sending every
//! unclaimed package to the `default` tag.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use protodoc_sections::{Config, group_packages};
//!
//! let config = Config::load_file(Path::new("sections.toml")).unwrap();
//! let tags = group_packages(&config, Vec::new()).unwrap();
//! assert!(tags.contains_key("default"));
//! ```
//!
//! [`Tag`]: protodoc_schemas::Tag

mod config;
mod error;
mod grouping;

#[doc(inline)]
pub use crate::config::{Config, DEFAULT_SECTION, Section};
#[doc(inline)]
pub use crate::error::SectionError;
#[doc(inline)]
pub use crate::grouping::{find_package, group_packages};
