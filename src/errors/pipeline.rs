// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Run-level error taxonomy.
//!
//! Every variant aborts the current run. Nothing is downgraded or swallowed;
//! the only retry anywhere in the core is the opt-in transport retry inside
//! the polling driver.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::errors::{ClientError, ConfigError};
use crate::execution::{ExecutionId, ExecutionState};
use crate::pipeline::{RunId, RunStatus, StageName, TraceEntry};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The executor rejected the request at creation time.
    #[error("submission to '{target}' failed: {message}")]
    Submission { target: String, message: String },

    /// Connectivity failure talking to an executor or stage.
    #[error("transport failure: {message}")]
    Transport { message: String },

    #[error("executor protocol violation: {message}")]
    Protocol { message: String },

    /// The polled execution vanished. Neither success nor failure.
    #[error("outcome of execution '{execution_id}' is unknown: the executor no longer has a record of it")]
    UnknownOutcome { execution_id: ExecutionId },

    /// The executor (or a stage) reported FAILED or CANCELLED.
    #[error("{} finished in state {state}{}", describe_execution(.execution_id), describe_payload(.payload))]
    ExecutionFailed {
        execution_id: Option<ExecutionId>,
        state: ExecutionState,
        payload: Option<Value>,
    },

    /// A stage declared success without an output downstream stages require.
    #[error("stage '{stage}' reported success without required output '{field}'")]
    ContractViolation { stage: StageName, field: String },

    #[error("no stage collaborator registered for '{stage}'")]
    MissingStage { stage: StageName },

    #[error("execution '{execution_id}' did not finish within {waited:?}")]
    TimedOut {
        execution_id: ExecutionId,
        waited: Duration,
    },

    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    /// State recorded in the run trace for the step that raised this error.
    pub fn terminal_state(&self) -> ExecutionState {
        match self {
            PipelineError::ExecutionFailed { state, .. } => *state,
            PipelineError::UnknownOutcome { .. } => ExecutionState::NotFound,
            PipelineError::Cancelled => ExecutionState::Cancelled,
            _ => ExecutionState::Failed,
        }
    }

    pub fn execution_id(&self) -> Option<&ExecutionId> {
        match self {
            PipelineError::UnknownOutcome { execution_id }
            | PipelineError::TimedOut { execution_id, .. } => Some(execution_id),
            PipelineError::ExecutionFailed { execution_id, .. } => execution_id.as_ref(),
            _ => None,
        }
    }

    pub fn status(&self) -> RunStatus {
        match self {
            PipelineError::UnknownOutcome { .. } => RunStatus::Unknown,
            PipelineError::Cancelled => RunStatus::Cancelled,
            _ => RunStatus::Failed,
        }
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Configuration(_) => 2,
            PipelineError::UnknownOutcome { .. } => 3,
            PipelineError::TimedOut { .. } => 4,
            PipelineError::Cancelled => 130,
            _ => 1,
        }
    }
}

impl From<ClientError> for PipelineError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Submission {
                target, message, ..
            } => PipelineError::Submission { target, message },
            ClientError::Transport { message } => PipelineError::Transport { message },
            ClientError::NotFound { execution_id } => PipelineError::UnknownOutcome { execution_id },
            ClientError::Protocol { message } => PipelineError::Protocol { message },
        }
    }
}

fn describe_execution(execution_id: &Option<ExecutionId>) -> String {
    match execution_id {
        Some(id) => format!("execution '{}'", id),
        None => "stage call".to_string(),
    }
}

fn describe_payload(payload: &Option<Value>) -> String {
    match payload {
        Some(Value::String(message)) => format!(": {}", message),
        Some(other) => format!(": {}", other),
        None => String::new(),
    }
}

/// A run that stopped at its first fault.
///
/// Outputs of the stages that did succeed are discarded; only the trace is kept
/// for diagnostics.
#[derive(Debug, Error)]
#[error("run '{run_id}' failed at {step}: {error}")]
pub struct RunFailure {
    pub run_id: RunId,
    pub step: String,
    pub error: PipelineError,
    pub trace: Vec<TraceEntry>,
}

impl RunFailure {
    pub fn status(&self) -> RunStatus {
        self.error.status()
    }
}
