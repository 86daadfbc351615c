// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::errors::{PipelineError, RunFailure};
use crate::execution::{ExecutionId, ExecutionState};
use crate::pipeline::{RunReport, RunRequest, StageInput, StageName, StageOutput};

/// Outcome of one successful stage invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct StageInvocation {
    pub output: StageOutput,
    /// Present when the stage ran as a remote execution.
    pub execution_id: Option<ExecutionId>,
    pub state: ExecutionState,
}

/// Strategy for getting a single stage to run: a direct call, or a remote
/// execution that is polled to completion.
#[async_trait]
pub trait StageExecutor: Send + Sync {
    async fn invoke(
        &self,
        stage: StageName,
        input: StageInput,
        cancel: &CancellationToken,
    ) -> Result<StageInvocation, PipelineError>;

    /// Short label for logs.
    fn kind(&self) -> &'static str;
}

/// Anything that can take a topic all the way to a published video.
#[async_trait]
pub trait PipelineRunner: Send + Sync {
    async fn run(
        &self,
        request: RunRequest,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunFailure>;

    fn kind(&self) -> &'static str;
}
