//! plantsearch CLI
//!
//! Entry point for the plant-species visual-search data pipeline: fetch the
//! dataset, run the full processing pipeline, or push a single image through
//! a named backbone.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use plantsearch::dataset::hub::{self, DEFAULT_DATASET_REPO};
use plantsearch::dataset::split::SplitConfig;
use plantsearch::models::{Backend, FeatureExtractor, ModelConfig};
use plantsearch::pipeline::{Pipeline, PipelineConfig};
use plantsearch::utils::logging::{init_logging, LogConfig};

/// Plant Species Visual Search Pipeline
///
/// Loads a plant species image dataset, extracts features through pretrained
/// vision backbones and prepares train/test data for classification.
#[derive(Parser, Debug)]
#[command(name = "plantsearch")]
#[command(version)]
#[command(about = "Plant species feature-extraction pipeline", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, default_value = "false", conflicts_with = "verbose")]
    quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download the plant species dataset from the Hugging Face Hub
    Fetch {
        /// Dataset repository on the Hub
        #[arg(short, long, default_value = DEFAULT_DATASET_REPO)]
        repo: String,

        /// Output directory for the dataset
        #[arg(short, long, default_value = "data/plantspecies")]
        output_dir: PathBuf,
    },

    /// Run the full pipeline: preprocess, extract features, split, save
    Process {
        /// Path to the dataset directory
        #[arg(short, long, default_value = "data/plantspecies")]
        data_dir: PathBuf,

        /// Backbone to extract features with
        #[arg(short, long, default_value = "efficientnet")]
        backend: String,

        /// Local directory with scripted module weights (otherwise the Hub)
        #[arg(long)]
        weights_dir: Option<PathBuf>,

        /// Apply random augmentation (horizontal flip, ±15° rotation)
        #[arg(long, default_value = "false")]
        augment: bool,

        /// Fraction of samples held out for testing
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Random seed for shuffling, augmentation and splitting
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Stratify the split by class
        #[arg(long, default_value = "false")]
        stratified: bool,

        /// MongoDB connection string; omit to skip persistence
        #[arg(long)]
        mongo_uri: Option<String>,

        /// Output path for the processed dataset artifact
        #[arg(short, long, default_value = "processed_dataset.bin")]
        output: PathBuf,
    },

    /// Extract features for a single image and print the output shape
    Extract {
        /// Path to the input image
        #[arg(short, long)]
        input: PathBuf,

        /// Backbone to extract features with
        #[arg(short, long, default_value = "efficientnet")]
        backend: String,

        /// Local directory with scripted module weights (otherwise the Hub)
        #[arg(long)]
        weights_dir: Option<PathBuf>,
    },

    /// List the supported backends
    Backends,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = if cli.quiet {
        LogConfig::quiet()
    } else if cli.verbose {
        LogConfig::verbose()
    } else {
        LogConfig::default()
    };
    init_logging(&log_config).map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Fetch { repo, output_dir } => {
            println!("{}", "Fetching dataset...".green().bold());
            let fetched = hub::fetch_dataset(&repo, &output_dir)?;
            println!(
                "{} {} files into {:?}",
                "Fetched".green(),
                fetched,
                output_dir
            );
        }

        Commands::Process {
            data_dir,
            backend,
            weights_dir,
            augment,
            test_fraction,
            seed,
            stratified,
            mongo_uri,
            output,
        } => {
            let backend = Backend::parse(&backend)?;

            let mut model = ModelConfig::default();
            if let Some(dir) = weights_dir {
                model = model.with_weights_dir(dir);
            }

            let mut split = SplitConfig::new(test_fraction, seed)?;
            if stratified {
                split = split.stratified();
            }

            let config = PipelineConfig {
                data_dir,
                backend,
                model,
                augment,
                split,
                mongo_uri,
                artifact_path: output,
                seed,
            };

            println!(
                "{} (backend: {})",
                "Running pipeline...".green().bold(),
                backend.to_string().cyan()
            );

            let pipeline = Pipeline::new(config)?;
            let report = pipeline.run()?;

            println!("{}", "Pipeline complete".green().bold());
            println!("  Total samples:  {}", report.total);
            println!("  Processed:      {}", report.processed);
            println!("  Skipped:        {}", report.skipped);
            if report.stored > 0 {
                println!("  Stored:         {}", report.stored);
            }
            println!("  Train size:     {}", report.train_size);
            println!("  Test size:      {}", report.test_size);
        }

        Commands::Extract {
            input,
            backend,
            weights_dir,
        } => {
            let mut model = ModelConfig::default();
            if let Some(dir) = weights_dir {
                model = model.with_weights_dir(dir);
            }

            // Name validation happens before any model load
            let extractor = FeatureExtractor::from_name(&backend, &model)?;

            let image = image::open(&input)
                .with_context(|| format!("Failed to open image {:?}", input))?;
            info!("Loaded image {:?} ({}x{})", input, image.width(), image.height());

            let features = extractor.extract_features(&image)?;
            println!(
                "{} backend '{}' produced features with shape {:?}",
                "OK:".green().bold(),
                extractor.backend(),
                features.size()
            );
        }

        Commands::Backends => {
            println!("Supported backends:");
            for backend in Backend::ALL {
                let kind = if backend.is_convolutional() {
                    "convolutional"
                } else {
                    "transformer"
                };
                println!("  {:18} ({})", backend.name().cyan(), kind);
            }
        }
    }

    Ok(())
}
