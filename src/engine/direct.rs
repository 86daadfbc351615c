// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::config::StageMap;
use crate::errors::PipelineError;
use crate::execution::ExecutionState;
use crate::pipeline::{Outcome, StageInput, StageName};
use crate::traits::{StageExecutor, StageInvocation};

/// Calls stage collaborators directly, one request per stage.
pub struct DirectExecutor {
    stages: StageMap,
}

impl DirectExecutor {
    pub fn new(stages: StageMap) -> Self {
        Self { stages }
    }
}

#[async_trait]
impl StageExecutor for DirectExecutor {
    async fn invoke(
        &self,
        stage: StageName,
        input: StageInput,
        cancel: &CancellationToken,
    ) -> Result<StageInvocation, PipelineError> {
        let collaborator = self
            .stages
            .get(stage)
            .ok_or(PipelineError::MissingStage { stage })?;

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            response = collaborator.invoke(input) => response?,
        };

        match response.outcome {
            Outcome::Output(output) => Ok(StageInvocation {
                output,
                execution_id: None,
                state: ExecutionState::Succeeded,
            }),
            Outcome::Error(detail) => Err(PipelineError::ExecutionFailed {
                execution_id: None,
                state: ExecutionState::Failed,
                payload: Some(if detail.payload.is_null() {
                    Value::String(detail.message)
                } else {
                    detail.payload
                }),
            }),
        }
    }

    fn kind(&self) -> &'static str {
        "direct"
    }
}
