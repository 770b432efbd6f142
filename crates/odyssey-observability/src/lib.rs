// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # odyssey-observability
//!
//! Unified logging bootstrap for Brain Odyssey.
//!
//! Provides consistent logging across all Odyssey crates with per-crate
//! debug flag support. Every crate logs through `tracing` with its crate name
//! as the event target, so `--debug-odyssey-query` narrows debug output to the
//! query layer.
//!
//! ## Features
//! - `file-logging`: daily-rotated JSON log files next to console output

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known Odyssey crate names for debug flags and log targets
pub const KNOWN_CRATES: &[&str] = &[
    "odyssey-config",
    "odyssey-store",
    "odyssey-query",
    "odyssey-clustering",
    "odyssey-services",
    "odyssey-tools",
];
