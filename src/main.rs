use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapart::models::{AppConfig, ExportFormat, CONFIG_FILE};
use mapart::rendering::decode_png;
use mapart::services::{load_settings, sorted_counts, Pipeline};
use mapart_core::dither::DitherMethod;
use mapart_core::settings::PersistedSettings;

#[derive(Parser)]
#[command(name = "mapart")]
#[command(about = "Quantize images to block palettes and export structure files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that builds a palette
#[derive(clap::Args)]
struct SourceArgs {
    /// Config file (YAML)
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Persisted settings document (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Quantize an image and write an RGBA preview PNG
    Convert {
        /// Input PNG
        input: PathBuf,

        /// Output preview PNG
        #[arg(short, long)]
        output: PathBuf,

        /// Dithering method (overrides the config)
        #[arg(long)]
        method: Option<DitherMethod>,

        /// Print per-block usage counts
        #[arg(long)]
        counts: bool,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// Quantize an image and write structure file(s)
    Export {
        /// Input PNG
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Structure format (overrides the config)
        #[arg(long, value_enum)]
        format: Option<ExportFormat>,

        /// Base file name (overrides the config)
        #[arg(long)]
        name: Option<String>,

        /// Dithering method (overrides the config)
        #[arg(long)]
        method: Option<DitherMethod>,

        #[command(flatten)]
        source: SourceArgs,
    },
    /// List the assembled active palette
    Palette {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write a default config.yaml to the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapart=info,mapart_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            method,
            counts,
            source,
        } => run_convert_command(&input, &output, method, counts, &source),
        Commands::Export {
            input,
            output,
            format,
            name,
            method,
            source,
        } => run_export_command(&input, &output, format, name, method, &source),
        Commands::Palette { source } => run_palette_command(&source),
        Commands::Init { force } => run_init_command(force),
    }
}

fn build_pipeline(source: &SourceArgs, method: Option<DitherMethod>) -> anyhow::Result<Pipeline> {
    let config = AppConfig::load(&source.config);
    let settings = source
        .settings
        .as_deref()
        .map(load_settings)
        .unwrap_or_else(PersistedSettings::default);

    let pipeline = Pipeline::new(&config, &settings).context("Failed to build palette")?;
    Ok(match method {
        Some(method) => pipeline.method(method),
        None => pipeline,
    })
}

fn read_image(path: &Path) -> anyhow::Result<mapart::rendering::DecodedImage> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode_png(&data).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Quantize and write a preview PNG
fn run_convert_command(
    input: &Path,
    output: &Path,
    method: Option<DitherMethod>,
    counts: bool,
    source: &SourceArgs,
) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(source, method)?;
    let image = read_image(input)?;
    let raster = pipeline.convert(&image)?;

    let png_bytes = Pipeline::preview_png(&raster)?;
    std::fs::write(output, &png_bytes).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Converted {} ({} bytes)", output.display(), png_bytes.len());

    if counts {
        println!("\nBlock usage:");
        for count in sorted_counts(&raster) {
            println!("  {:>7}  {:<40} {}", count.count, count.block_id, count.label);
        }
    }

    Ok(())
}

/// Quantize and write structure files
fn run_export_command(
    input: &Path,
    output: &Path,
    format: Option<ExportFormat>,
    name: Option<String>,
    method: Option<DitherMethod>,
    source: &SourceArgs,
) -> anyhow::Result<()> {
    let mut pipeline = build_pipeline(source, method)?;
    if let Some(format) = format {
        pipeline = pipeline.format(format);
    }
    if let Some(name) = name {
        pipeline = pipeline.export_name(name);
    }

    let image = read_image(input)?;
    let raster = pipeline.convert(&image)?;
    let written = pipeline
        .export(&raster, output)
        .with_context(|| format!("Failed to export into {}", output.display()))?;

    println!("Wrote {} files:", written.len());
    for path in &written {
        println!("  + {}", path.display());
    }
    Ok(())
}

/// Print the active palette
fn run_palette_command(source: &SourceArgs) -> anyhow::Result<()> {
    let pipeline = build_pipeline(source, None)?;
    let palette = pipeline.session().palette();
    if palette.used_fallback() {
        println!("No palette source enabled, using the wool set.\n");
    }
    for (i, entry) in palette.entries().iter().enumerate() {
        println!("{i:>4}  {}  {:<40} {}", entry.rgb, entry.block_id, entry.group_key);
    }
    Ok(())
}

/// Write a default config.yaml
fn run_init_command(force: bool) -> anyhow::Result<()> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() && !force {
        println!("{CONFIG_FILE} already exists (use --force to overwrite)");
        return Ok(());
    }
    let yaml = AppConfig::default().to_yaml().context("Failed to serialize default config")?;
    std::fs::write(path, yaml).with_context(|| format!("Failed to write {CONFIG_FILE}"))?;
    println!("Wrote {CONFIG_FILE}");
    Ok(())
}
