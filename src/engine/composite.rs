// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::{StageEndpoints, WorkflowTarget};
use crate::engine::poller::{Completion, Poller};
use crate::errors::{PipelineError, RunFailure};
use crate::execution::{Execution, ExecutionState};
use crate::observability::messages::engine::{RunAborted, RunCompleted, RunStarted};
use crate::observability::messages::polling::ExecutionSubmitted;
use crate::observability::messages::StructuredLog;
use crate::pipeline::{RunReport, RunRequest, TraceEntry};
use crate::traits::{PipelineRunner, WorkflowClient};

/// The whole pipeline as a single remote execution of a deployed workflow.
///
/// The workflow receives the environment name, topic, run id and the URL of
/// every stage service (plus the error handler and logger), calls the stages
/// itself, and returns the final result. Locally this is one submission and
/// one polling loop.
pub struct CompositeWorkflow {
    client: Arc<dyn WorkflowClient>,
    poller: Poller,
    target: WorkflowTarget,
    env: String,
    endpoints: StageEndpoints,
}

impl CompositeWorkflow {
    pub fn new(
        client: Arc<dyn WorkflowClient>,
        poller: Poller,
        target: WorkflowTarget,
        env: impl Into<String>,
        endpoints: StageEndpoints,
    ) -> Self {
        Self {
            client,
            poller,
            target,
            env: env.into(),
            endpoints,
        }
    }

    /// Execution argument for `request`.
    pub fn argument(&self, request: &RunRequest) -> Value {
        let url = |value: &Option<String>| value.clone().unwrap_or_default();
        json!({
            "env": self.env,
            "topic": request.topic,
            "run_id": request.run_id,
            "scriptwriter_url": url(&self.endpoints.scriptwriter),
            "media_sourcing_url": url(&self.endpoints.media_sourcing),
            "narrator_url": url(&self.endpoints.narrator),
            "video_assembly_url": url(&self.endpoints.video_assembly),
            "uploader_url": url(&self.endpoints.uploader),
            "error_handler_url": url(&self.endpoints.error_handler),
            "logger_url": url(&self.endpoints.logger),
        })
    }

    /// Submit the workflow and return without waiting for it.
    pub async fn trigger(&self, request: &RunRequest) -> Result<Execution, PipelineError> {
        let path = self.target.path();
        let execution = self.client.submit(&path, &self.argument(request)).await?;
        ExecutionSubmitted {
            target: &path,
            execution_id: execution.id().as_str(),
            state: execution.state().as_str(),
        }
        .log();
        Ok(execution)
    }

    async fn run_workflow(
        &self,
        request: RunRequest,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunFailure> {
        let started = Instant::now();
        let step = self.target.name.clone();
        let outcome = self
            .poller
            .run(self.client.as_ref(), &self.target.path(), &self.argument(&request), cancel)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let error = match outcome {
            Ok(Completion::Succeeded(execution)) => {
                let trace = vec![TraceEntry {
                    step,
                    execution_id: Some(execution.id().clone()),
                    state: ExecutionState::Succeeded,
                    elapsed_ms,
                }];
                RunCompleted {
                    run_id: request.run_id.as_str(),
                    stage_count: 1,
                    duration: started.elapsed(),
                }
                .log();
                let output = execution.decoded_result().unwrap_or(Value::Null);
                return Ok(RunReport::succeeded(request, output, trace));
            }
            Ok(Completion::Unknown(execution)) => PipelineError::UnknownOutcome {
                execution_id: execution.id().clone(),
            },
            Err(error) => error,
        };

        RunAborted {
            run_id: request.run_id.as_str(),
            step: &step,
            error: &error,
        }
        .log();

        let trace = vec![TraceEntry {
            step: step.clone(),
            execution_id: error.execution_id().cloned(),
            state: error.terminal_state(),
            elapsed_ms,
        }];
        Err(RunFailure {
            run_id: request.run_id,
            step,
            error,
            trace,
        })
    }
}

#[async_trait]
impl PipelineRunner for CompositeWorkflow {
    async fn run(
        &self,
        request: RunRequest,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunFailure> {
        let started = RunStarted {
            run_id: request.run_id.as_str(),
            topic: &request.topic,
            runner: self.kind(),
            stage_count: 1,
        };
        started.log();
        let span = started.span("composite");

        self.run_workflow(request, cancel).instrument(span).await
    }

    fn kind(&self) -> &'static str {
        "composite"
    }
}
