use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use schemagen_core::config::{SchemagenConfig, SourceKind, DEFAULT_CONFIG_FILE};
use schemagen_core::generator::outcome_json;
use schemagen_core::logging::init_logging;
use schemagen_core::sink::DirectorySink;
use schemagen_core::{GenerateOutcome, GenerateRequest, Generator};

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Config file (defaults to ./schemagen.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// CSV export directory or JSON file with the control tables
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Source format: csv or json
    #[arg(long, value_parser = parse_kind)]
    pub format: Option<SourceKind>,

    /// Output directory for descriptors and migration stubs
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Only generate tables of this project
    #[arg(long)]
    pub project: Option<String>,

    /// Do not write migration stubs
    #[arg(long)]
    pub no_references: bool,

    /// Fixed migration file name prefix, e.g. 2024_01_01_000000
    #[arg(long)]
    pub timestamp: Option<String>,
}

fn parse_kind(value: &str) -> std::result::Result<SourceKind, String> {
    value.parse()
}

/// Resolve configuration: defaults < file < environment < flags
fn resolve_config(args: &GenerateArgs) -> Result<SchemagenConfig> {
    let path = args.config.as_deref().unwrap_or(Path::new(DEFAULT_CONFIG_FILE));
    if args.config.is_some() && !path.exists() {
        anyhow::bail!("config file not found: {}", path.display());
    }

    let mut config = SchemagenConfig::load_from(path)?;
    if let Some(source) = &args.source {
        config.source.path = source.clone();
    }
    if let Some(kind) = args.format {
        config.source.kind = kind;
    }
    if let Some(out) = &args.out {
        config.output.dir = out.clone();
    }
    if let Some(timestamp) = &args.timestamp {
        config.migrations.timestamp = Some(timestamp.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Run one generation and print its outcome: the table map as JSON, or the
/// written migration paths one per line.
pub fn run(args: &GenerateArgs, out: &mut impl Write) -> Result<()> {
    let config = resolve_config(args)?;
    init_logging(&config.logging)?;
    log::info!(
        "Generating from {} into {}",
        config.source.path.display(),
        config.output.dir.display()
    );

    let generator = Generator::new(&config.migrations)?.indent(config.output.indent);
    let source = config
        .source
        .open()
        .with_context(|| format!("Failed to open source {}", config.source.path.display()))?;
    let mut sink = DirectorySink::new(&config.output.dir);

    let request =
        GenerateRequest { project: args.project.clone(), no_references: args.no_references };
    let outcome = generator.generate(source.as_ref(), &mut sink, &request)?;

    match &outcome {
        GenerateOutcome::Tables(_) => {
            writeln!(out, "{}", outcome_json(&outcome, config.output.indent)?)?;
        }
        GenerateOutcome::ReferencesWritten(paths) => {
            for path in paths {
                writeln!(out, "{}", config.output.dir.join(path).display())?;
            }
        }
    }
    Ok(())
}
