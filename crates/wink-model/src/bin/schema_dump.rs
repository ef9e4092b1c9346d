//! Print the model's OpenAPI component schemas.

use std::io::{self, Write};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use utoipa::OpenApi;
use wink_model::ModelDoc;

/// Output encodings supported by the dump.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Format {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

/// Export the Wink model schemas for downstream tooling.
#[derive(Debug, Parser)]
#[command(name = "schema-dump", version)]
struct Cli {
    /// Output encoding.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let doc = ModelDoc::openapi();
    let rendered = match cli.format {
        Format::Json => doc.to_pretty_json().wrap_err("render OpenAPI as JSON")?,
        Format::Yaml => doc.to_yaml().wrap_err("render OpenAPI as YAML")?,
    };

    let schemas = doc.components.as_ref().map_or(0, |c| c.schemas.len());
    info!(format = ?cli.format, schemas, "dumping model schemas");

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}").wrap_err("write schema dump")?;
    Ok(())
}
