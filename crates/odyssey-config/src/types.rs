// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `odyssey_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OdysseyConfig {
    pub system: SystemConfig,
    pub spatial: SpatialConfig,
    pub terms: TermsConfig,
    pub topics: TopicsConfig,
    pub tree: TreeConfig,
    pub intensity: IntensityConfig,
    pub clustering: ClusteringConfig,
    pub logging: LoggingConfig,
}

/// System-level configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub log_level: String,
    pub data_dir: PathBuf,
    /// Worker threads for request handling (0 = auto-detect)
    pub workers: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: PathBuf::from(""),
            workers: 0,
        }
    }
}

/// Coordinate search settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Radius used when a request does not name one
    pub default_radius: f64,
    /// Increment applied each time a search comes back empty
    pub radius_step: f64,
    /// Largest radius tried before giving up with an empty-region result
    pub max_radius: f64,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            default_radius: 3.0,
            radius_step: 1.0,
            max_radius: 20.0,
        }
    }
}

/// Term ranking settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TermsConfig {
    pub limit: usize,
    pub freq_threshold: f64,
}

impl Default for TermsConfig {
    fn default() -> Self {
        Self {
            limit: 100,
            freq_threshold: 0.05,
        }
    }
}

/// Topic cluster selection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TopicsConfig {
    pub top_n: usize,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self { top_n: 12 }
    }
}

/// Visualization tree settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Multiplier applied to term frequencies to obtain leaf weights
    pub scale: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { scale: 70_000.0 }
    }
}

/// Intensity map settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IntensityConfig {
    pub vertex_count: usize,
    /// Study-term rows at or below this frequency are ignored
    pub min_frequency: f64,
    pub request_timeout_ms: u64,
    /// Vertices scanned between two cancellation checks
    pub cancel_check_interval: usize,
}

impl Default for IntensityConfig {
    fn default() -> Self {
        Self {
            vertex_count: 81_925,
            min_frequency: 0.05,
            request_timeout_ms: 10_000,
            cancel_check_interval: 4_096,
        }
    }
}

/// Offline clustering pipeline settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Target dimensionality of the reduced representation
    pub dims: usize,
    pub k_candidates: Vec<usize>,
    pub max_iter: usize,
    pub n_init: usize,
    pub tolerance: f64,
    pub svd_iterations: usize,
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            dims: 200,
            k_candidates: vec![1, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100],
            max_iter: 300,
            n_init: 10,
            tolerance: 1e-4,
            svd_iterations: 7,
            seed: 42,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub file_logging: bool,
    pub log_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            file_logging: false,
            log_dir: PathBuf::from("./logs"),
        }
    }
}
