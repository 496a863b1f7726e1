//! # vox2sprite
//!
//! Renders every model of a MagicaVoxel `.vox` file from the four cardinal
//! sides and writes the result as one isometric PNG sprite sheet.
//!
//! Set `RUST_LOG=debug` to see decoder and composer events.

mod cli;
mod output;

use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use vox2sprite_core::{render_sprite_sheet, RenderConfig};

use crate::cli::{CliArgs, Parsed};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli::parse(std::env::args().skip(1)) {
        Parsed::Usage => {
            eprintln!("{}", cli::USAGE);
            ExitCode::from(2)
        }
        Parsed::Invalid(message) => {
            eprintln!("error: {message}");
            eprintln!();
            eprintln!("{}", cli::USAGE);
            ExitCode::from(2)
        }
        Parsed::Run(args) => match run(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("error: {err:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    let bytes = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let sheet = render_sprite_sheet(&bytes, &config)
        .with_context(|| format!("failed to render {}", args.input.display()))?;

    output::write_outputs(&args.output, args.manifest.as_deref(), &sheet)?;

    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        frames = sheet.frame_count(),
        width = sheet.width(),
        height = sheet.height(),
        "wrote sprite sheet"
    );
    Ok(())
}
