// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within valid ranges and consistent with
//! each other before any component is constructed from them.

use crate::{ConfigError, ConfigResult, OdysseyConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Widening steps allowed from `default_radius` to `max_radius`; the query
/// resolver enforces the same bound at request time
pub const MAX_RADIUS_STEPS: f64 = 1000.0;

fn invalid(errors: &mut Vec<ConfigValidationError>, field: &str, reason: &str) {
    errors.push(ConfigValidationError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    });
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation found
pub fn validate_config(config: &OdysseyConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_spatial(config, &mut errors);
    validate_ranking(config, &mut errors);
    validate_intensity(config, &mut errors);
    validate_clustering(config, &mut errors);

    if config.system.log_level.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "system.log_level".to_string(),
        });
    }

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_spatial(config: &OdysseyConfig, errors: &mut Vec<ConfigValidationError>) {
    let spatial = &config.spatial;
    if !(spatial.default_radius > 0.0) {
        invalid(errors, "spatial.default_radius", "must be positive");
    }
    if !(spatial.radius_step > 0.0) {
        invalid(errors, "spatial.radius_step", "must be positive");
    }
    if !spatial.max_radius.is_finite() || spatial.max_radius < spatial.default_radius {
        invalid(
            errors,
            "spatial.max_radius",
            "must be finite and not smaller than spatial.default_radius",
        );
    } else if spatial.radius_step > 0.0
        && (spatial.max_radius - spatial.default_radius) / spatial.radius_step > MAX_RADIUS_STEPS
    {
        invalid(
            errors,
            "spatial.radius_step",
            "too small: widening to spatial.max_radius exceeds 1000 steps",
        );
    }
}

fn validate_ranking(config: &OdysseyConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.terms.limit == 0 {
        invalid(errors, "terms.limit", "must be at least 1");
    }
    if !(0.0..=1.0).contains(&config.terms.freq_threshold) {
        invalid(errors, "terms.freq_threshold", "must be between 0.0 and 1.0");
    }
    if config.topics.top_n == 0 {
        invalid(errors, "topics.top_n", "must be at least 1");
    }
    if !(config.tree.scale > 0.0) || !config.tree.scale.is_finite() {
        invalid(errors, "tree.scale", "must be positive and finite");
    }
}

fn validate_intensity(config: &OdysseyConfig, errors: &mut Vec<ConfigValidationError>) {
    let intensity = &config.intensity;
    if intensity.vertex_count == 0 {
        invalid(errors, "intensity.vertex_count", "must be at least 1");
    }
    if !(0.0..=1.0).contains(&intensity.min_frequency) {
        invalid(errors, "intensity.min_frequency", "must be between 0.0 and 1.0");
    }
    if intensity.request_timeout_ms == 0 {
        invalid(errors, "intensity.request_timeout_ms", "must be positive");
    }
    if intensity.cancel_check_interval == 0 {
        invalid(errors, "intensity.cancel_check_interval", "must be at least 1");
    }
}

fn validate_clustering(config: &OdysseyConfig, errors: &mut Vec<ConfigValidationError>) {
    let clustering = &config.clustering;
    if clustering.dims == 0 {
        invalid(errors, "clustering.dims", "must be at least 1");
    }
    if clustering.k_candidates.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "clustering.k_candidates".to_string(),
        });
    } else if clustering.k_candidates.contains(&0) {
        invalid(errors, "clustering.k_candidates", "every k must be at least 1");
    }
    if clustering.max_iter == 0 {
        invalid(errors, "clustering.max_iter", "must be at least 1");
    }
    if clustering.n_init == 0 {
        invalid(errors, "clustering.n_init", "must be at least 1");
    }
    if !(clustering.tolerance >= 0.0) {
        invalid(errors, "clustering.tolerance", "must not be negative");
    }
}
