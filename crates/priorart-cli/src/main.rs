//! priorart - reconstruct USPTO patent documents from bulk archives.
//!
//! Two invocation modes: a publication number resolved through the patent
//! index, or a direct path to an already-extracted schema XML file. Either
//! way the output is a single paginated PDF reproducing the filing's
//! layout conventions.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::info;
use priorart_core::{JsonFileIndex, PatentKey, ReconstructorConfig};
use priorart_pipeline::{
    default_output_for_key, default_output_for_schema, is_schema_path, reconstruct_schema_file,
    Reconstructor,
};
use priorart_xml::parse_schema_file;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "priorart",
    version,
    about = "Reconstruct USPTO patent documents from bulk archives"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reconstruct a patent into a paginated PDF
    Reconstruct {
        /// Publication number (e.g. US20160148332A1) or path to an
        /// extracted schema XML file
        input: String,

        /// Output PDF path; derived from the input when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        settings: Settings,
    },
    /// Show a patent's archive location and inner archive contents
    Inspect {
        /// Publication number
        identifier: String,

        #[command(flatten)]
        settings: Settings,
    },
    /// Parse a patent and print its document model as JSON
    Dump {
        /// Publication number or path to an extracted schema XML file
        input: String,

        #[command(flatten)]
        settings: Settings,
    },
}

/// Shared location settings. Explicit flags win over the TOML config
/// file, which wins over the `PRIORART_*` environment variables.
#[derive(Args)]
struct Settings {
    /// Root of the year-partitioned archive tree
    /// [env: PRIORART_ARCHIVE_ROOT]
    #[arg(long)]
    archive_root: Option<PathBuf>,

    /// Writable root for scratch extraction directories
    /// [env: PRIORART_SCRATCH_ROOT]
    #[arg(long)]
    scratch_root: Option<PathBuf>,

    /// JSON index file mapping publication numbers to archive locators
    /// [env: PRIORART_INDEX]
    #[arg(long)]
    index: Option<PathBuf>,

    /// TOML configuration file providing archive_root and scratch_root
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Settings {
    fn resolve_config(&self) -> Result<ReconstructorConfig> {
        let mut config = match &self.config {
            Some(path) => ReconstructorConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => ReconstructorConfig {
                archive_root: env_path("PRIORART_ARCHIVE_ROOT").unwrap_or_default(),
                scratch_root: env_path("PRIORART_SCRATCH_ROOT")
                    .unwrap_or_else(std::env::temp_dir),
            },
        };

        if let Some(root) = &self.archive_root {
            config.archive_root = root.clone();
        }
        if let Some(root) = &self.scratch_root {
            config.scratch_root = root.clone();
        }

        if config.archive_root.as_os_str().is_empty() {
            bail!(
                "no archive root configured; pass --archive-root, set \
                 PRIORART_ARCHIVE_ROOT, or use --config"
            );
        }
        Ok(config)
    }

    fn load_index(&self) -> Result<JsonFileIndex> {
        let path = self
            .index
            .clone()
            .or_else(|| env_path("PRIORART_INDEX"))
            .context("no patent index configured; pass --index or set PRIORART_INDEX")?;
        Ok(JsonFileIndex::load(&path)?)
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Reconstruct {
            input,
            output,
            settings,
        } => reconstruct(&input, output, &settings),
        Command::Inspect {
            identifier,
            settings,
        } => inspect(&identifier, &settings),
        Command::Dump { input, settings } => dump(&input, &settings),
    }
}

fn reconstruct(input: &str, output: Option<PathBuf>, settings: &Settings) -> Result<()> {
    let (pdf, output_path) = if is_schema_path(input) {
        let schema = Path::new(input);
        info!("direct-file mode: {}", schema.display());
        let pdf = reconstruct_schema_file(schema)?;
        (pdf, output.unwrap_or_else(|| default_output_for_schema(schema)))
    } else {
        let key = PatentKey::normalize(input)?;
        let config = settings.resolve_config()?;
        let index = settings.load_index()?;
        let reconstructor = Reconstructor::new(config, &index);
        let pdf = reconstructor.reconstruct_key(&key)?;
        (pdf, output.unwrap_or_else(|| default_output_for_key(&key)))
    };

    std::fs::write(&output_path, &pdf)
        .with_context(|| format!("writing {}", output_path.display()))?;
    println!("{}", output_path.display());
    Ok(())
}

fn inspect(identifier: &str, settings: &Settings) -> Result<()> {
    let key = PatentKey::normalize(identifier)?;
    let config = settings.resolve_config()?;
    let index = settings.load_index()?;
    let reconstructor = Reconstructor::new(config, &index);

    let (location, files) = reconstructor.list_key(&key)?;
    println!(
        "{} {}",
        "outer archive:".bold(),
        location.outer_archive.display()
    );
    println!("{} {}", "inner member: ".bold(), location.inner_member);
    println!("{}", "files:".bold());
    for file in files {
        println!("  {:>10}  {}", file.size, file.name);
    }
    Ok(())
}

fn dump(input: &str, settings: &Settings) -> Result<()> {
    let model = if is_schema_path(input) {
        parse_schema_file(Path::new(input))?
    } else {
        let key = PatentKey::normalize(input)?;
        let config = settings.resolve_config()?;
        let index = settings.load_index()?;
        Reconstructor::new(config, &index).parse_key(&key)?
    };

    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}
