// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by workflow clients and stage collaborators.

use thiserror::Error;

use crate::execution::ExecutionId;

/// Failure of a single remote call. Clients never retry internally; retry
/// policy belongs to the polling driver.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The executor rejected the submission (auth, quota, malformed argument).
    #[error("executor rejected submission to '{target}': {message}")]
    Submission {
        target: String,
        status: Option<u16>,
        message: String,
    },

    /// Network or connectivity failure.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The executor has no record of the execution.
    #[error("execution '{execution_id}' not found")]
    NotFound { execution_id: ExecutionId },

    /// The executor answered with something that breaks the protocol.
    #[error("executor protocol violation: {message}")]
    Protocol { message: String },
}

impl ClientError {
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Protocol {
                message: error.to_string(),
            }
        } else {
            ClientError::Transport {
                message: error.to_string(),
            }
        }
    }
}
