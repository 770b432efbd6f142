// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, OdysseyConfig, CONFIG_FILE_NAME};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Find the configuration file
///
/// Search order:
/// 1. `ODYSSEY_CONFIG_PATH` environment variable
/// 2. Current working directory: `./odyssey_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("ODYSSEY_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by ODYSSEY_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet ODYSSEY_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<OdysseyConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: OdysseyConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

fn parse_into<T: FromStr>(value: &str, target: &mut T) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *target = parsed;
    }
}

fn parse_list(value: &str) -> Option<Vec<usize>> {
    value
        .split(',')
        .map(|part| part.trim().parse::<usize>().ok())
        .collect()
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `ODYSSEY_LOG_LEVEL` -> `system.log_level`
/// - `ODYSSEY_DATA_DIR` -> `system.data_dir`
/// - `ODYSSEY_WORKERS` -> `system.workers`
/// - `ODYSSEY_DEFAULT_RADIUS` -> `spatial.default_radius`
/// - `ODYSSEY_MAX_RADIUS` -> `spatial.max_radius`
/// - `ODYSSEY_TERM_LIMIT` -> `terms.limit`
/// - `ODYSSEY_FREQ_THRESHOLD` -> `terms.freq_threshold`
/// - `ODYSSEY_TOP_CLUSTERS` -> `topics.top_n`
/// - `ODYSSEY_TREE_SCALE` -> `tree.scale`
/// - `ODYSSEY_VERTEX_COUNT` -> `intensity.vertex_count`
/// - `ODYSSEY_REQUEST_TIMEOUT_MS` -> `intensity.request_timeout_ms`
/// - `ODYSSEY_CLUSTER_DIMS` -> `clustering.dims`
/// - `ODYSSEY_K_CANDIDATES` -> `clustering.k_candidates` (comma-separated)
pub fn apply_environment_overrides(config: &mut OdysseyConfig) {
    if let Ok(value) = env::var("ODYSSEY_LOG_LEVEL") {
        config.system.log_level = value;
    }
    if let Ok(value) = env::var("ODYSSEY_DATA_DIR") {
        config.system.data_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("ODYSSEY_WORKERS") {
        parse_into(&value, &mut config.system.workers);
    }

    if let Ok(value) = env::var("ODYSSEY_DEFAULT_RADIUS") {
        parse_into(&value, &mut config.spatial.default_radius);
    }
    if let Ok(value) = env::var("ODYSSEY_MAX_RADIUS") {
        parse_into(&value, &mut config.spatial.max_radius);
    }

    if let Ok(value) = env::var("ODYSSEY_TERM_LIMIT") {
        parse_into(&value, &mut config.terms.limit);
    }
    if let Ok(value) = env::var("ODYSSEY_FREQ_THRESHOLD") {
        parse_into(&value, &mut config.terms.freq_threshold);
    }
    if let Ok(value) = env::var("ODYSSEY_TOP_CLUSTERS") {
        parse_into(&value, &mut config.topics.top_n);
    }
    if let Ok(value) = env::var("ODYSSEY_TREE_SCALE") {
        parse_into(&value, &mut config.tree.scale);
    }

    if let Ok(value) = env::var("ODYSSEY_VERTEX_COUNT") {
        parse_into(&value, &mut config.intensity.vertex_count);
    }
    if let Ok(value) = env::var("ODYSSEY_REQUEST_TIMEOUT_MS") {
        parse_into(&value, &mut config.intensity.request_timeout_ms);
    }

    if let Ok(value) = env::var("ODYSSEY_CLUSTER_DIMS") {
        parse_into(&value, &mut config.clustering.dims);
    }
    if let Ok(value) = env::var("ODYSSEY_K_CANDIDATES") {
        if let Some(list) = parse_list(&value) {
            config.clustering.k_candidates = list;
        }
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"max_radius": "12", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut OdysseyConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("log_level") {
        config.system.log_level = value.clone();
    }
    if let Some(value) = cli_args.get("data_dir") {
        config.system.data_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("workers") {
        parse_into(value, &mut config.system.workers);
    }

    if let Some(value) = cli_args.get("default_radius") {
        parse_into(value, &mut config.spatial.default_radius);
    }
    if let Some(value) = cli_args.get("max_radius") {
        parse_into(value, &mut config.spatial.max_radius);
    }

    if let Some(value) = cli_args.get("term_limit") {
        parse_into(value, &mut config.terms.limit);
    }
    if let Some(value) = cli_args.get("freq_threshold") {
        parse_into(value, &mut config.terms.freq_threshold);
    }
    if let Some(value) = cli_args.get("top_clusters") {
        parse_into(value, &mut config.topics.top_n);
    }
    if let Some(value) = cli_args.get("tree_scale") {
        parse_into(value, &mut config.tree.scale);
    }

    if let Some(value) = cli_args.get("vertex_count") {
        parse_into(value, &mut config.intensity.vertex_count);
    }

    if let Some(value) = cli_args.get("dims") {
        parse_into(value, &mut config.clustering.dims);
    }
    if let Some(value) = cli_args.get("k_candidates") {
        if let Some(list) = parse_list(value) {
            config.clustering.k_candidates = list;
        }
    }
    if let Some(value) = cli_args.get("seed") {
        parse_into(value, &mut config.clustering.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_find_config_file_env_var() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("custom_config.toml");
        File::create(&config_path).unwrap();

        env::set_var("ODYSSEY_CONFIG_PATH", config_path.to_str().unwrap());
        let result = find_config_file();
        env::remove_var("ODYSSEY_CONFIG_PATH");

        assert_eq!(result.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_file_env_var_missing() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::set_var("ODYSSEY_CONFIG_PATH", "/definitely/not/here.toml");
        let result = find_config_file();
        env::remove_var("ODYSSEY_CONFIG_PATH");

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_minimal_config() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        env::remove_var("ODYSSEY_MAX_RADIUS");
        env::remove_var("ODYSSEY_TERM_LIMIT");
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[spatial]").unwrap();
        writeln!(file, "max_radius = 12.0").unwrap();
        writeln!(file, "[terms]").unwrap();
        writeln!(file, "limit = 50").unwrap();

        let config = load_config(Some(&config_path), None).unwrap();

        assert_eq!(config.spatial.max_radius, 12.0);
        assert_eq!(config.terms.limit, 50);
        // Untouched sections keep their defaults
        assert_eq!(config.spatial.default_radius, 3.0);
        assert_eq!(config.topics.top_n, 12);
        assert_eq!(config.intensity.vertex_count, 81_925);
    }

    #[test]
    fn test_environment_overrides() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let mut config = OdysseyConfig::default();

        env::set_var("ODYSSEY_MAX_RADIUS", "9.5");
        env::set_var("ODYSSEY_K_CANDIDATES", "2, 4,8");
        env::set_var("ODYSSEY_TERM_LIMIT", "not-a-number");

        apply_environment_overrides(&mut config);

        env::remove_var("ODYSSEY_MAX_RADIUS");
        env::remove_var("ODYSSEY_K_CANDIDATES");
        env::remove_var("ODYSSEY_TERM_LIMIT");

        assert_eq!(config.spatial.max_radius, 9.5);
        assert_eq!(config.clustering.k_candidates, vec![2, 4, 8]);
        // Unparsable values are ignored
        assert_eq!(config.terms.limit, 100);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = OdysseyConfig::default();
        let mut cli_args = HashMap::new();
        cli_args.insert("top_clusters".to_string(), "5".to_string());
        cli_args.insert("log_level".to_string(), "debug".to_string());

        apply_cli_overrides(&mut config, &cli_args);

        assert_eq!(config.topics.top_n, 5);
        assert_eq!(config.system.log_level, "debug");
    }

    #[test]
    fn test_override_precedence() {
        let _env_lock = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        let mut file = File::create(&config_path).unwrap();
        writeln!(file, "[spatial]").unwrap();
        writeln!(file, "default_radius = 2.0").unwrap();
        writeln!(file, "max_radius = 10.0").unwrap();

        env::set_var("ODYSSEY_DEFAULT_RADIUS", "4.0");
        env::set_var("ODYSSEY_MAX_RADIUS", "30.0");

        let mut cli_args = HashMap::new();
        cli_args.insert("default_radius".to_string(), "5.0".to_string());

        let config = load_config(Some(&config_path), Some(&cli_args)).unwrap();

        env::remove_var("ODYSSEY_DEFAULT_RADIUS");
        env::remove_var("ODYSSEY_MAX_RADIUS");

        // CLI wins for default radius, env wins for max radius (no CLI override)
        assert_eq!(config.spatial.default_radius, 5.0);
        assert_eq!(config.spatial.max_radius, 30.0);
    }
}
