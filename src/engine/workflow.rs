// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::engine::poller::{Completion, Poller};
use crate::errors::PipelineError;
use crate::execution::ExecutionState;
use crate::pipeline::{Outcome, StageInput, StageName, StageResponse};
use crate::traits::{StageExecutor, StageInvocation, WorkflowClient};

/// Runs every stage as its own remote execution and polls it to completion.
///
/// The stage input is submitted as the execution argument. The execution's
/// result is read back as the stage response, so a result carrying an `error`
/// key fails the stage even though the execution itself SUCCEEDED.
pub struct WorkflowExecutor {
    client: Arc<dyn WorkflowClient>,
    poller: Poller,
    targets: HashMap<StageName, String>,
}

impl WorkflowExecutor {
    pub fn new(
        client: Arc<dyn WorkflowClient>,
        poller: Poller,
        targets: HashMap<StageName, String>,
    ) -> Self {
        Self {
            client,
            poller,
            targets,
        }
    }
}

#[async_trait]
impl StageExecutor for WorkflowExecutor {
    async fn invoke(
        &self,
        stage: StageName,
        input: StageInput,
        cancel: &CancellationToken,
    ) -> Result<StageInvocation, PipelineError> {
        let target = self
            .targets
            .get(&stage)
            .ok_or(PipelineError::MissingStage { stage })?;

        let completion = self
            .poller
            .run(self.client.as_ref(), target, &input.to_json(), cancel)
            .await?;

        let execution = match completion {
            Completion::Succeeded(execution) => execution,
            Completion::Unknown(execution) => {
                return Err(PipelineError::UnknownOutcome {
                    execution_id: execution.id().clone(),
                })
            }
        };

        let result = execution.decoded_result().unwrap_or(Value::Null);
        match StageResponse::from_json(result)?.outcome {
            Outcome::Output(output) => Ok(StageInvocation {
                output,
                execution_id: Some(execution.id().clone()),
                state: ExecutionState::Succeeded,
            }),
            Outcome::Error(detail) => Err(PipelineError::ExecutionFailed {
                execution_id: Some(execution.id().clone()),
                state: ExecutionState::Failed,
                payload: Some(detail.payload),
            }),
        }
    }

    fn kind(&self) -> &'static str {
        "workflow"
    }
}
