// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Study clustering tool

Offline steps of the clustering pipeline over a study x term feature file:

  variance  cumulative explained variance per candidate dimensionality
  elbow     wcss / bss table per candidate k (pick k from it)
  assign    cluster every study with the chosen k, write `pmid<TAB>cluster`

Usage:
  cargo run --bin compute_clusters -- elbow features.txt
  cargo run --bin compute_clusters -- assign features.txt --k 40 --out Clusters.txt
*/

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use odyssey::clustering::{ClusteringPipeline, ClusteringSettings, KMeansSettings, TermMatrix};
use odyssey::config::{
    apply_cli_overrides, apply_environment_overrides, load_config, validate_config, ConfigError,
    LogFormat, OdysseyConfig,
};
use odyssey::observability::{self, CrateDebugFlags, LoggingSettings};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Offline study clustering for Brain Odyssey
#[derive(Parser, Debug)]
#[command(name = "compute_clusters", version, long_about = None)]
struct Args {
    /// Configuration file (searched for when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Comma-separated crates to log at debug level, or `all`
    #[arg(long, global = true)]
    debug: Option<String>,

    /// Target dimensionality of the reduction
    #[arg(long, global = true)]
    dims: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Explained variance for candidate dimensionalities
    Variance {
        features: PathBuf,

        /// Comma-separated candidates
        #[arg(long, value_delimiter = ',', default_value = "50,100,200,300,400,500")]
        candidates: Vec<usize>,
    },

    /// Elbow report for candidate cluster counts
    Elbow {
        features: PathBuf,

        /// Comma-separated candidates (defaults to `clustering.k_candidates`)
        #[arg(long, value_delimiter = ',')]
        k: Vec<usize>,
    },

    /// Assign every study with a chosen cluster count
    Assign {
        features: PathBuf,

        #[arg(long)]
        k: usize,

        /// Output file of `pmid<TAB>cluster` lines
        #[arg(long, default_value = "Clusters.txt")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut overrides = HashMap::new();
    if let Some(dims) = args.dims {
        overrides.insert("dims".to_string(), dims.to_string());
    }
    let (config, from_file) = load_or_default(args.config.as_deref(), &overrides)?;
    validate_config(&config).context("Invalid configuration")?;

    let mut debug_flags = CrateDebugFlags::default();
    if let Some(list) = &args.debug {
        debug_flags.merge_list(list);
    }
    if let Ok(list) = std::env::var("ODYSSEY_DEBUG") {
        debug_flags.merge_list(&list);
    }
    let _logging = observability::init_logging(&debug_flags, &logging_settings(&config))?;
    if !from_file {
        warn!(target: "odyssey-tools", "No configuration file found, using defaults");
    }

    let pipeline = ClusteringPipeline::new(clustering_settings(&config));
    match args.command {
        Command::Variance {
            features,
            candidates,
        } => {
            let matrix = load_matrix(&features)?;
            let profile = pipeline.variance_profile(&matrix, &candidates)?;
            println!("{:>6}  {:>10}", "dims", "variance");
            for (dims, variance) in profile {
                println!("{:>6}  {:>9.2}%", dims, variance * 100.0);
            }
        }
        Command::Elbow { features, k } => {
            let matrix = load_matrix(&features)?;
            let k_candidates = if k.is_empty() {
                config.clustering.k_candidates.clone()
            } else {
                k
            };
            let reduction = pipeline.reduce(&matrix)?;
            let report = pipeline.elbow(&reduction, &k_candidates)?;
            print!("{}", report.to_table());
        }
        Command::Assign { features, k, out } => {
            let matrix = load_matrix(&features)?;
            let reduction = pipeline.reduce(&matrix)?;
            let assignment = pipeline.assign(&matrix, &reduction, k)?;
            assignment
                .write(&out)
                .with_context(|| format!("Failed to write {}", out.display()))?;
            info!(
                target: "odyssey-tools",
                "Assigned {} studies to {} clusters -> {}",
                assignment.len(),
                k,
                out.display()
            );
        }
    }
    Ok(())
}

/// Load the configuration; without an explicit path a missing file falls
/// back to defaults with the same overrides applied
fn load_or_default(
    path: Option<&Path>,
    overrides: &HashMap<String, String>,
) -> Result<(OdysseyConfig, bool)> {
    match load_config(path, Some(overrides)) {
        Ok(config) => Ok((config, true)),
        Err(ConfigError::FileNotFound(_)) if path.is_none() => {
            let mut config = OdysseyConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, overrides);
            Ok((config, false))
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

fn load_matrix(path: &Path) -> Result<TermMatrix> {
    let matrix = TermMatrix::load(path)
        .with_context(|| format!("Failed to load feature file {}", path.display()))?;
    info!(
        target: "odyssey-tools",
        "Loaded {} studies x {} terms",
        matrix.rows(),
        matrix.cols()
    );
    Ok(matrix)
}

fn clustering_settings(config: &OdysseyConfig) -> ClusteringSettings {
    ClusteringSettings {
        dims: config.clustering.dims,
        svd_iterations: config.clustering.svd_iterations,
        kmeans: KMeansSettings {
            max_iter: config.clustering.max_iter,
            n_init: config.clustering.n_init,
            tolerance: config.clustering.tolerance,
            seed: config.clustering.seed,
        },
    }
}

fn logging_settings(config: &OdysseyConfig) -> LoggingSettings {
    LoggingSettings {
        level: config.system.log_level.clone(),
        format: match config.logging.format {
            LogFormat::Text => observability::LogFormat::Text,
            LogFormat::Json => observability::LogFormat::Json,
        },
        log_dir: config
            .logging
            .file_logging
            .then(|| config.logging.log_dir.clone()),
        ..LoggingSettings::default()
    }
}
