//! `syncline` renders a JSON timeline document as an aligned text grid.
//!
//! Usage:
//!   syncline timelines.json
//!   cat recordings.json | syncline --contract-after 20

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use syncline_core::input::parse_document;
use syncline_core::{FormatOptions, GridStyle, render_timelines};
use tracing_subscriber::{EnvFilter, fmt};

/// Render synchronized timelines as a text grid.
#[derive(Parser, Debug)]
#[command(name = "syncline")]
#[command(about = "Render synchronized timelines as an aligned text grid")]
struct Args {
    /// Timeline document (JSON); `-` reads stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Grid style (JSON) replacing the document's own style
    #[arg(long)]
    style: Option<PathBuf>,

    /// Contract active gaps longer than this when no width is imposed
    #[arg(long)]
    contract_after: Option<u64>,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the grid.
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    let data = read_input(&args.input)?;
    let doc = parse_document(&data)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let mut style = match &args.style {
        Some(path) => {
            let raw = std::fs::read(path)
                .with_context(|| format!("reading style {}", path.display()))?;
            serde_json::from_slice::<GridStyle>(&raw)
                .with_context(|| format!("parsing style {}", path.display()))?
        }
        None => doc.style.unwrap_or_default(),
    };
    if let Some(threshold) = args.contract_after {
        style.contract_after = threshold;
    }

    tracing::info!(timelines = doc.timelines.len(), "rendering");
    let options = FormatOptions::default().with_style(style);
    let grid = render_timelines(&doc.timelines, &options)?;

    let mut out = std::io::stdout().lock();
    writeln!(out, "{grid}")?;
    Ok(())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .context("reading stdin")?;
        return Ok(data);
    }
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}
