// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::ConfigError;
use crate::execution::{ExecutionId, ExecutionState};

/// Identifier of one end-to-end pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Validate a caller-supplied id.
    ///
    /// Run ids name artifacts on disk and in buckets, so they must not carry
    /// path separators or parent references.
    pub fn parse(id: &str) -> Result<Self, ConfigError> {
        if Self::is_path_safe(id) {
            Ok(Self::new(id))
        } else {
            Err(ConfigError::Invalid {
                name: "run id".to_string(),
                message: format!("'{}' must be non-empty and free of '/', '\\' and '..'", id),
            })
        }
    }

    pub fn is_path_safe(id: &str) -> bool {
        !id.is_empty() && !id.contains(['/', '\\', '\0']) && !id.contains("..")
    }

    /// A fresh random id (hyphenless UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub topic: String,
    pub run_id: RunId,
}

impl RunRequest {
    pub fn new(topic: impl Into<String>, run_id: RunId) -> Self {
        Self {
            topic: topic.into(),
            run_id,
        }
    }
}

/// One attempted step of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub step: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_id: Option<ExecutionId>,
    pub state: ExecutionState,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Succeeded,
    Failed,
    Cancelled,
    Unknown,
}

/// Result of a fully successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub topic: String,
    pub status: RunStatus,
    pub output: Value,
    pub trace: Vec<TraceEntry>,
}

impl RunReport {
    pub fn succeeded(request: RunRequest, output: Value, trace: Vec<TraceEntry>) -> Self {
        Self {
            run_id: request.run_id,
            topic: request.topic,
            status: RunStatus::Succeeded,
            output,
            trace,
        }
    }
}
