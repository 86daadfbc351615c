// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for run and stage lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Run start, completion and abort
//! * Per-stage start, completion and failure

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A pipeline run is starting.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunStarted<'a> {
    pub run_id: &'a str,
    pub topic: &'a str,
    pub runner: &'a str,
    pub stage_count: usize,
}

impl Display for RunStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting run '{}' ({} runner, {} stages) for topic \"{}\"",
            self.run_id, self.runner, self.stage_count, self.topic
        )
    }
}

impl StructuredLog for RunStarted<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            topic = self.topic,
            runner = self.runner,
            stage_count = self.stage_count,
            "{}", self
        );
    }
}

impl RunStarted<'_> {
    /// Open a span carrying the identifying fields of this message.
    pub fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "run",
            span_name = name,
            run_id = self.run_id,
            runner = self.runner,
        )
    }
}

/// Every stage of a run succeeded.
///
/// # Log Level
/// `info!` - Important operational event
pub struct RunCompleted<'a> {
    pub run_id: &'a str,
    pub stage_count: usize,
    pub duration: Duration,
}

impl Display for RunCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run '{}' completed: {} stages in {:?}",
            self.run_id, self.stage_count, self.duration
        )
    }
}

impl StructuredLog for RunCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            stage_count = self.stage_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A run stopped at its first fault.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct RunAborted<'a> {
    pub run_id: &'a str,
    pub step: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for RunAborted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Run '{}' aborted at step '{}': {}",
            self.run_id, self.step, self.error
        )
    }
}

impl StructuredLog for RunAborted<'_> {
    fn log(&self) {
        tracing::error!(
            run_id = self.run_id,
            step = self.step,
            error = %self.error,
            "{}", self
        );
    }
}

/// A stage is about to be invoked.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use newsreel::observability::messages::engine::StageStarted;
///
/// let msg = StageStarted {
///     run_id: "4f1c",
///     stage: "narrator",
///     executor: "direct",
///     input_count: 3,
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Stage 'narrator' starting via direct executor (run '4f1c', 3 inputs)"
/// );
/// ```
pub struct StageStarted<'a> {
    pub run_id: &'a str,
    pub stage: &'a str,
    pub executor: &'a str,
    pub input_count: usize,
}

impl Display for StageStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' starting via {} executor (run '{}', {} inputs)",
            self.stage, self.executor, self.run_id, self.input_count
        )
    }
}

impl StructuredLog for StageStarted<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            stage = self.stage,
            executor = self.executor,
            input_count = self.input_count,
            "{}", self
        );
    }
}

impl StageStarted<'_> {
    /// Open a span carrying the identifying fields of this message.
    pub fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "stage",
            span_name = name,
            run_id = self.run_id,
            stage = self.stage,
        )
    }
}

/// A stage succeeded and produced every declared output.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StageCompleted<'a> {
    pub run_id: &'a str,
    pub stage: &'a str,
    pub execution_id: Option<&'a str>,
    pub duration: Duration,
}

impl Display for StageCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.execution_id {
            Some(id) => write!(
                f,
                "Stage '{}' succeeded as execution '{}' in {:?}",
                self.stage, id, self.duration
            ),
            None => write!(f, "Stage '{}' succeeded in {:?}", self.stage, self.duration),
        }
    }
}

impl StructuredLog for StageCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            run_id = self.run_id,
            stage = self.stage,
            execution_id = self.execution_id,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }
}

/// A stage declared success but left out an output that later stages need.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StageContractViolated<'a> {
    pub run_id: &'a str,
    pub stage: &'a str,
    pub field: &'a str,
}

impl Display for StageContractViolated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stage '{}' reported success without output '{}'",
            self.stage, self.field
        )
    }
}

impl StructuredLog for StageContractViolated<'_> {
    fn log(&self) {
        tracing::error!(
            run_id = self.run_id,
            stage = self.stage,
            field = self.field,
            "{}", self
        );
    }
}
