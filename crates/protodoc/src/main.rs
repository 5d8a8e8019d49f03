mod generate;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use mimalloc::MiMalloc;
use protodoc_sections::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Turn a compiled interface schema into a pruned, sectioned documentation
/// tree for static-site generators.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a declaration set into documentation packages
    ///
    /// Reads the declaration graph exported by the schema toolchain (JSON)
    /// and writes one package per compilation unit, with every declared
    /// type still present.
    Convert {
        /// Declaration set JSON (reads stdin if not specified)
        input: Option<PathBuf>,

        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove types no HTTP endpoint can reach
    ///
    /// Reads a package list produced by `convert`, resolves every type
    /// reference and keeps only the types reachable from some endpoint.
    Prune {
        /// Package list JSON (reads stdin if not specified)
        input: Option<PathBuf>,

        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the whole pipeline and write one JSON file per section
    Generate {
        /// Declaration set JSON
        input: PathBuf,

        /// Section configuration (TOML)
        #[arg(short, long)]
        config: PathBuf,

        /// Directory receiving `<section>.json` files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Output goes to stderr so JSON on stdout stays clean for piping.
    const CRATES: &[&str] = &[
        "protodoc",
        "protodoc_convert",
        "protodoc_prune",
        "protodoc_schemas",
        "protodoc_sections",
    ];
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert { input, output } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let reader = open_input(input, &stdin)?;
            let mut writer = open_output(output, &stdout)?;
            protodoc_convert::run(reader, &mut *writer)?;
            writer.flush()?;
            Ok(())
        }
        Commands::Prune { input, output } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            let reader = open_input(input, &stdin)?;
            let mut writer = open_output(output, &stdout)?;
            protodoc_prune::run(reader, &mut *writer)?;
            writer.flush()?;
            Ok(())
        }
        Commands::Generate {
            input,
            config,
            out_dir,
        } => {
            let config = Config::load_file(&config).with_context(|| {
                format!("failed to load {}", config.display())
            })?;
            let reader = File::open(&input).with_context(|| {
                format!("failed to open {}", input.display())
            })?;
            let written =
                generate::generate(BufReader::new(reader), &config, &out_dir)?;
            info!(sections = written.len(), "generate.complete");
            Ok(())
        }
    }
}

/// Opens the input file, or locks stdin when none is given.
fn open_input<'a>(
    path: Option<PathBuf>,
    stdin: &'a std::io::Stdin,
) -> Result<Box<dyn Read + 'a>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(
            File::open(&path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(stdin.lock()),
    })
}

/// Creates the output file, or locks stdout when none is given.
fn open_output<'a>(
    path: Option<PathBuf>,
    stdout: &'a std::io::Stdout,
) -> Result<Box<dyn Write + 'a>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(&path).with_context(|| {
                format!("failed to create {}", path.display())
            })?,
        )),
        None => Box::new(stdout.lock()),
    })
}
