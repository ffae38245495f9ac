//! geometry-export - write procedural primitives to Wavefront OBJ
//!
//! Generates one shape from a TOML config (or a kind's defaults) and writes
//! it out for inspection in any model viewer.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use geometry_export::{write_obj, ExportConfig};

#[derive(Parser)]
#[command(name = "geometry-export")]
#[command(about = "Export procedural primitives to OBJ")]
#[command(version)]
struct Cli {
    /// Path to a shape config (TOML)
    #[arg(required_unless_present = "shape")]
    config: Option<PathBuf>,

    /// Export a shape kind with default options instead of a config
    #[arg(short, long, conflicts_with = "config")]
    shape: Option<String>,

    /// Output .obj file (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the resolved config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match (&cli.config, &cli.shape) {
        (Some(path), _) => ExportConfig::load(path)?,
        (None, Some(kind)) => ExportConfig::for_shape(kind)?,
        (None, None) => anyhow::bail!("Pass a config file or --shape <kind>"),
    };

    if cli.print_config {
        let text = toml::to_string_pretty(&config).context("Failed to serialize config")?;
        print!("{text}");
        return Ok(());
    }

    let geometry = config.build()?;
    let output = config.output_path(cli.output.as_deref());
    tracing::info!(
        "Writing {} ({} vertices, {} cells) -> {:?}",
        config.shape.kind(),
        geometry.vertex_count(),
        geometry.cell_count(),
        output
    );

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    write_obj(
        BufWriter::new(file),
        &geometry,
        config.shape.kind(),
        config.output.normals,
        config.output.uvs,
    )
    .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!("Done!");
    Ok(())
}
