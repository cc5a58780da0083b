// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Folio command-line entry point. Initialises logging, loads a photo, runs the
// page pipeline and prints the located frame as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use folio_core::config::PipelineConfig;
use folio_core::error::Result;
use folio_core::{BinarizationPolicy, FrameStrategy};
use folio_document::{ImageProcessor, PageScanner};
use tracing::{error, info};

/// Locate the page in a document photograph and binarize it.
#[derive(Parser, Debug)]
#[command(name = "folio", version)]
#[command(about = "Page-frame extraction and binarization for photographed documents")]
struct Args {
    /// Photo to process (any format the `image` crate decodes).
    input: PathBuf,

    /// JSON pipeline configuration; missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame strategy: chase, erosion or chase-then-erode.
    #[arg(short, long)]
    strategy: Option<FrameStrategy>,

    /// Override the chase depth in pixels.
    #[arg(long)]
    chase_depth: Option<usize>,

    /// Binarization policy: statistics or filtering.
    #[arg(short, long)]
    binarization: Option<BinarizationPolicy>,

    /// Write the binarized page here.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the cropped, unbinarized page here.
    #[arg(long)]
    crop_output: Option<PathBuf>,

    /// Write the edge mask here.
    #[arg(long)]
    mask_output: Option<PathBuf>,
}

impl Args {
    /// File configuration with command-line overrides applied.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(depth) = self.chase_depth {
            config.frame.chase_depth = depth;
        }
        if let Some(policy) = self.binarization {
            config.binarization = policy;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.pipeline_config()?;
    let scanner = PageScanner::open(&args.input, config)?;

    if let Some(path) = &args.mask_output {
        let mask = scanner.edge_mask()?.into_owned();
        ImageProcessor::from_gray(mask).save(path)?;
        info!(path = %path.display(), "Edge mask written");
    }

    let output = scanner.process()?;
    println!("{}", serde_json::to_string_pretty(&output.frame)?);

    if let Some(path) = &args.crop_output {
        ImageProcessor::from_gray(scanner.crop_to_frame(output.frame.rect)).save(path)?;
        info!(path = %path.display(), "Cropped page written");
    }
    if let Some(path) = &args.output {
        ImageProcessor::from_gray(output.page).save(path)?;
        info!(path = %path.display(), "Binarized page written");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(input = %args.input.display(), "Folio starting");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
