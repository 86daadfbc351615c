// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal at startup and are reported before any remote call
/// is attempted.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required values are absent (reported together).
    #[error("missing required configuration: {}", .names.join(", "))]
    Missing { names: Vec<String> },

    /// A value is present but cannot be used.
    #[error("invalid value for {name}: {message}")]
    Invalid { name: String, message: String },

    /// The stage plan references outputs no earlier stage produces.
    #[error("invalid stage plan: {message}")]
    InvalidPlan { message: String },

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config file format: {} (expected .yaml, .yml or .toml)", .path.display())]
    UnsupportedFormat { path: PathBuf },
}
