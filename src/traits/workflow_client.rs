// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::ClientError;
use crate::execution::Execution;

/// Thin boundary to a remote workflow executor.
///
/// Implementations make exactly one remote call per method and never retry.
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    /// Start an execution of `target` with `argument`.
    ///
    /// Fails with `Submission` when the executor refuses the request and with
    /// `Transport` when it cannot be reached.
    async fn submit(&self, target: &str, argument: &Value) -> Result<Execution, ClientError>;

    /// Fetch the current snapshot of an execution.
    ///
    /// Fails with `NotFound` when the executor has no record of the id.
    async fn refresh(&self, execution: &Execution) -> Result<Execution, ClientError>;

    fn name(&self) -> &'static str;
}
