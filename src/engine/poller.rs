// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Polling driver: turns a submitted execution into a terminal outcome.
//!
//! The loop sleeps for the configured interval, refreshes, and applies the new
//! snapshot through [`Execution::advance`] until the state is terminal. Every
//! wait races the run's cancellation token and the optional deadline, so a
//! cancelled or timed-out run never sits in a sleep.
//!
//! `NotFound` from the executor is not a failure and not a success: polling
//! stops and the caller gets [`Completion::Unknown`].

use serde_json::Value;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::PollingOptions;
use crate::errors::{ClientError, PipelineError};
use crate::execution::{Execution, ExecutionState};
use crate::observability::messages::polling::{
    ExecutionFinished, ExecutionNotFound, ExecutionStateObserved, ExecutionSubmitted,
    PollingCancelled, PollingTimedOut, RefreshRetrying,
};
use crate::observability::messages::StructuredLog;
use crate::traits::WorkflowClient;

/// How polling ended when it did not end in an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Succeeded(Execution),
    /// The executor lost the execution. Its real outcome is unknown.
    Unknown(Execution),
}

impl Completion {
    pub fn execution(&self) -> &Execution {
        match self {
            Completion::Succeeded(execution) | Completion::Unknown(execution) => execution,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Poller {
    options: PollingOptions,
}

impl Poller {
    pub fn new(options: PollingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PollingOptions {
        &self.options
    }

    /// Submit `argument` to `target` and wait for the execution to finish.
    pub async fn run(
        &self,
        client: &dyn WorkflowClient,
        target: &str,
        argument: &Value,
        cancel: &CancellationToken,
    ) -> Result<Completion, PipelineError> {
        let execution = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
            submitted = client.submit(target, argument) => submitted?,
        };

        let span = {
            let submitted = ExecutionSubmitted {
                target,
                execution_id: execution.id().as_str(),
                state: execution.state().as_str(),
            };
            submitted.log();
            submitted.span("poll")
        };

        self.await_completion(client, execution, cancel)
            .instrument(span)
            .await
    }

    /// Poll `execution` until it reaches a terminal state.
    ///
    /// # Returns
    /// * `Ok(Completion::Succeeded)` once the executor reports SUCCEEDED
    /// * `Ok(Completion::Unknown)` if the executor no longer knows the execution
    /// * `Err(ExecutionFailed)` for FAILED or CANCELLED, carrying the error payload
    /// * `Err(TimedOut)` / `Err(Cancelled)` when the deadline or token fires first
    /// * transport and protocol errors from the client, after any configured retries
    pub async fn await_completion(
        &self,
        client: &dyn WorkflowClient,
        mut execution: Execution,
        cancel: &CancellationToken,
    ) -> Result<Completion, PipelineError> {
        let started = Instant::now();
        // A wait too long to represent as an instant is no limit at all.
        let deadline = self
            .options
            .max_wait
            .and_then(|max_wait| started.checked_add(max_wait));
        let mut polls: u32 = 0;

        while !execution.state().is_terminal() {
            if execution.state() == ExecutionState::NotFound {
                return Ok(self.not_found(execution));
            }

            self.wait(&execution, started, deadline, cancel).await?;
            polls += 1;

            let mut retries: u32 = 0;
            let refreshed = loop {
                let attempt = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        PollingCancelled { execution_id: execution.id().as_str() }.log();
                        return Err(PipelineError::Cancelled);
                    }
                    refreshed = client.refresh(&execution) => refreshed,
                };

                match attempt {
                    Err(error) if error.is_transport() && retries < self.options.transport_retries => {
                        retries += 1;
                        RefreshRetrying {
                            execution_id: execution.id().as_str(),
                            attempt: retries,
                            max_retries: self.options.transport_retries,
                            error: &error,
                        }
                        .log();
                        self.wait(&execution, started, deadline, cancel).await?;
                    }
                    other => break other,
                }
            };

            match refreshed {
                Ok(snapshot) => execution.advance(snapshot)?,
                Err(ClientError::NotFound { .. }) => {
                    execution.mark_not_found();
                    return Ok(self.not_found(execution));
                }
                Err(error) => return Err(error.into()),
            }

            ExecutionStateObserved {
                execution_id: execution.id().as_str(),
                state: execution.state().as_str(),
                poll: polls,
            }
            .log();
        }

        let succeeded = execution.state() == ExecutionState::Succeeded;
        ExecutionFinished {
            execution_id: execution.id().as_str(),
            state: execution.state().as_str(),
            succeeded,
            polls,
        }
        .log();

        if succeeded {
            Ok(Completion::Succeeded(execution))
        } else {
            Err(PipelineError::ExecutionFailed {
                execution_id: Some(execution.id().clone()),
                state: execution.state(),
                payload: execution.error().map(|error| error.payload.clone()),
            })
        }
    }

    fn not_found(&self, execution: Execution) -> Completion {
        ExecutionNotFound {
            execution_id: execution.id().as_str(),
        }
        .log();
        Completion::Unknown(execution)
    }

    async fn wait(
        &self,
        execution: &Execution,
        started: Instant,
        deadline: Option<Instant>,
        cancel: &CancellationToken,
    ) -> Result<(), PipelineError> {
        let expiry = async {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                PollingCancelled { execution_id: execution.id().as_str() }.log();
                Err(PipelineError::Cancelled)
            }
            _ = expiry => {
                let waited = started.elapsed();
                PollingTimedOut { execution_id: execution.id().as_str(), waited }.log();
                Err(PipelineError::TimedOut {
                    execution_id: execution.id().clone(),
                    waited,
                })
            }
            _ = sleep(self.options.interval) => Ok(()),
        }
    }
}
