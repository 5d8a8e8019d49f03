//! Full pipeline: convert, prune, group, write.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use protodoc_convert::Converter;
use protodoc_schemas::DeclarationSet;
use protodoc_sections::{Config, group_packages};
use tracing::{debug, debug_span};

/// Runs every phase over a declaration set and writes one
/// `<section>.json` per section into `out_dir`.
///
/// Every unit takes part in resolution and pruning; only units marked for
/// generation are grouped and written. Nothing is written unless every
/// phase succeeds. Returns the paths written, in section name order.
pub fn generate(
    mut input: impl Read,
    config: &Config,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let _span = debug_span!("generate").entered();

    let mut json = String::new();
    input.read_to_string(&mut json)?;
    let set: DeclarationSet = serde_json::from_str(&json)
        .context("failed to parse declaration set")?;

    let converter = Converter::new(&set)?;
    let mut packages = converter.convert_all()?;
    let emit = converter.units().into_iter().map(|unit| unit.generate);

    protodoc_prune::prune_types(&mut packages)?;

    let emitted = packages
        .into_iter()
        .zip(emit)
        .filter_map(|(package, emit)| emit.then_some(package))
        .collect_vec();
    debug!(packages = emitted.len(), "Selected packages to emit");
    let tags = group_packages(config, emitted)?;

    fs::create_dir_all(out_dir).with_context(|| {
        format!("failed to create {}", out_dir.display())
    })?;
    let mut written = Vec::with_capacity(tags.len());
    for (key, tag) in &tags {
        let path = out_dir.join(format!("{key}.json"));
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tag).with_context(|| {
            format!("failed to write {}", path.display())
        })?;
        writeln!(writer)?;
        writer.flush()?;
        debug!(path = %path.display(), "Wrote section");
        written.push(path);
    }
    Ok(written)
}
