// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration loading.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// Configuration resolved and validated.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ConfigurationLoaded<'a> {
    pub mode: &'a str,
    pub env: &'a str,
    pub file: Option<&'a str>,
}

impl Display for ConfigurationLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.file {
            Some(file) => write!(
                f,
                "Loaded {} configuration for env '{}' from {} and environment",
                self.mode, self.env, file
            ),
            None => write!(
                f,
                "Loaded {} configuration for env '{}' from environment",
                self.mode, self.env
            ),
        }
    }
}

impl StructuredLog for ConfigurationLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            mode = self.mode,
            env = self.env,
            file = self.file,
            "{}", self
        );
    }
}

/// Required configuration values are absent.
///
/// # Log Level
/// `error!` - Fatal at startup
///
/// # Example
/// ```
/// use newsreel::observability::messages::config::ConfigurationMissing;
///
/// let names = vec!["EXECUTOR_URL".to_string(), "REGION".to_string()];
/// let msg = ConfigurationMissing { mode: "workflow", names: &names };
///
/// assert_eq!(
///     msg.to_string(),
///     "workflow mode is missing required configuration: EXECUTOR_URL, REGION"
/// );
/// ```
pub struct ConfigurationMissing<'a> {
    pub mode: &'a str,
    pub names: &'a [String],
}

impl Display for ConfigurationMissing<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} mode is missing required configuration: {}",
            self.mode,
            self.names.join(", ")
        )
    }
}

impl StructuredLog for ConfigurationMissing<'_> {
    fn log(&self) {
        tracing::error!(
            mode = self.mode,
            missing = self.names.join(", "),
            missing_count = self.names.len(),
            "{}", self
        );
    }
}
