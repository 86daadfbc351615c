// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for remote execution submission and polling.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// The executor accepted a submission.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ExecutionSubmitted<'a> {
    pub target: &'a str,
    pub execution_id: &'a str,
    pub state: &'a str,
}

impl Display for ExecutionSubmitted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Submitted execution '{}' to '{}' (state {})",
            self.execution_id, self.target, self.state
        )
    }
}

impl StructuredLog for ExecutionSubmitted<'_> {
    fn log(&self) {
        tracing::info!(
            target_path = self.target,
            execution_id = self.execution_id,
            state = self.state,
            "{}", self
        );
    }
}

impl ExecutionSubmitted<'_> {
    /// Open a span carrying the identifying fields of this message.
    pub fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "execution",
            span_name = name,
            execution_id = self.execution_id,
        )
    }
}

/// A refresh returned a snapshot.
///
/// # Log Level
/// `debug!` - Emitted once per poll
pub struct ExecutionStateObserved<'a> {
    pub execution_id: &'a str,
    pub state: &'a str,
    pub poll: u32,
}

impl Display for ExecutionStateObserved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Execution '{}' is {} (poll {})",
            self.execution_id, self.state, self.poll
        )
    }
}

impl StructuredLog for ExecutionStateObserved<'_> {
    fn log(&self) {
        tracing::debug!(
            execution_id = self.execution_id,
            state = self.state,
            poll = self.poll,
            "{}", self
        );
    }
}

/// The executor lost track of an execution; its outcome is unknown.
///
/// # Log Level
/// `warn!` - Inconclusive outcome
pub struct ExecutionNotFound<'a> {
    pub execution_id: &'a str,
}

impl Display for ExecutionNotFound<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Execution '{}' is no longer known to the executor; outcome unknown",
            self.execution_id
        )
    }
}

impl StructuredLog for ExecutionNotFound<'_> {
    fn log(&self) {
        tracing::warn!(execution_id = self.execution_id, "{}", self);
    }
}

/// A refresh hit a transport error and will be retried.
///
/// # Log Level
/// `warn!` - Recoverable failure
pub struct RefreshRetrying<'a> {
    pub execution_id: &'a str,
    pub attempt: u32,
    pub max_retries: u32,
    pub error: &'a dyn std::error::Error,
}

impl Display for RefreshRetrying<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Refresh of execution '{}' failed, retry {}/{}: {}",
            self.execution_id, self.attempt, self.max_retries, self.error
        )
    }
}

impl StructuredLog for RefreshRetrying<'_> {
    fn log(&self) {
        tracing::warn!(
            execution_id = self.execution_id,
            attempt = self.attempt,
            max_retries = self.max_retries,
            error = %self.error,
            "{}", self
        );
    }
}

/// The execution reached a terminal state.
///
/// # Log Level
/// `info!` on success, `error!` otherwise
pub struct ExecutionFinished<'a> {
    pub execution_id: &'a str,
    pub state: &'a str,
    pub succeeded: bool,
    pub polls: u32,
}

impl Display for ExecutionFinished<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Execution '{}' finished {} after {} polls",
            self.execution_id, self.state, self.polls
        )
    }
}

impl StructuredLog for ExecutionFinished<'_> {
    fn log(&self) {
        if self.succeeded {
            tracing::info!(
                execution_id = self.execution_id,
                state = self.state,
                polls = self.polls,
                "{}", self
            );
        } else {
            tracing::error!(
                execution_id = self.execution_id,
                state = self.state,
                polls = self.polls,
                "{}", self
            );
        }
    }
}

/// Polling gave up after the configured maximum wait.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct PollingTimedOut<'a> {
    pub execution_id: &'a str,
    pub waited: Duration,
}

impl Display for PollingTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Gave up waiting for execution '{}' after {:?}",
            self.execution_id, self.waited
        )
    }
}

impl StructuredLog for PollingTimedOut<'_> {
    fn log(&self) {
        tracing::error!(
            execution_id = self.execution_id,
            waited_ms = self.waited.as_millis() as u64,
            "{}", self
        );
    }
}

/// Polling stopped because the run was cancelled.
///
/// # Log Level
/// `warn!` - Operator-initiated stop
pub struct PollingCancelled<'a> {
    pub execution_id: &'a str,
}

impl Display for PollingCancelled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stopped polling execution '{}': run cancelled",
            self.execution_id
        )
    }
}

impl StructuredLog for PollingCancelled<'_> {
    fn log(&self) {
        tracing::warn!(execution_id = self.execution_id, "{}", self);
    }
}
