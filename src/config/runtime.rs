// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::backends::http::HttpWorkflowClient;
use crate::config::consts::{EXECUTOR_URL, PROJECT_ID, REGION, WORKFLOW_NAME};
use crate::config::{ExecutionMode, PipelineConfig, StageMap};
use crate::engine::{CompositeWorkflow, DirectExecutor, Pipeline, Poller, RunConstants, WorkflowExecutor};
use crate::errors::ConfigError;
use crate::pipeline::{StageName, StagePlan};
use crate::traits::{PipelineRunner, WorkflowClient};

/// Pipeline runtime builder: turns a validated [`PipelineConfig`] into a
/// ready-to-run [`PipelineRunner`] for its execution mode.
///
/// | mode       | runner                                      |
/// |------------|---------------------------------------------|
/// | `workflow` | [`CompositeWorkflow`] over an HTTP executor |
/// | `staged`   | [`Pipeline`] + [`WorkflowExecutor`]         |
/// | `http`     | [`Pipeline`] + [`DirectExecutor`] of HTTP stages |
/// | `local`    | [`Pipeline`] + [`DirectExecutor`] of local stages |
///
/// # Example
/// ```
/// use newsreel::config::{PipelineConfig, RuntimeBuilder};
///
/// let runner = RuntimeBuilder::from_config(&PipelineConfig::local("outputs")).unwrap();
/// assert_eq!(runner.kind(), "sequenced");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the runner, creating an HTTP workflow client when the mode needs one.
    pub fn from_config(cfg: &PipelineConfig) -> Result<Box<dyn PipelineRunner>, ConfigError> {
        match cfg.mode {
            ExecutionMode::Local => Ok(Box::new(Self::sequenced(
                cfg,
                DirectExecutor::new(StageMap::local(&cfg.output_dir)),
            ))),
            ExecutionMode::Http => {
                let stages = StageMap::http(&cfg.endpoints, reqwest::Client::new())?;
                Ok(Box::new(Self::sequenced(cfg, DirectExecutor::new(stages))))
            }
            ExecutionMode::Workflow | ExecutionMode::Staged => {
                Self::with_client(cfg, Self::workflow_client(cfg)?)
            }
        }
    }

    /// Build the runner around an existing workflow client.
    ///
    /// Modes that never talk to an executor ignore `client`.
    pub fn with_client(
        cfg: &PipelineConfig,
        client: Arc<dyn WorkflowClient>,
    ) -> Result<Box<dyn PipelineRunner>, ConfigError> {
        match cfg.mode {
            ExecutionMode::Workflow => Ok(Box::new(Self::composite(cfg, client)?)),
            ExecutionMode::Staged => {
                let mut targets = HashMap::new();
                let mut missing = Vec::new();
                for name in StageName::ALL {
                    match cfg.endpoints.stage_url(name) {
                        Some(target) => {
                            targets.insert(name, target.to_string());
                        }
                        None => missing.push(format!("{} endpoint", name)),
                    }
                }
                if !missing.is_empty() {
                    return Err(ConfigError::Missing { names: missing });
                }

                let executor =
                    WorkflowExecutor::new(client, Poller::new(cfg.polling), targets);
                Ok(Box::new(Self::sequenced(cfg, executor)))
            }
            ExecutionMode::Local | ExecutionMode::Http => Self::from_config(cfg),
        }
    }

    /// The composite workflow runner, also used for fire-and-forget triggers.
    pub fn composite(
        cfg: &PipelineConfig,
        client: Arc<dyn WorkflowClient>,
    ) -> Result<CompositeWorkflow, ConfigError> {
        let target = cfg.workflow.clone().ok_or_else(|| ConfigError::Missing {
            names: vec![
                PROJECT_ID.to_string(),
                REGION.to_string(),
                WORKFLOW_NAME.to_string(),
            ],
        })?;

        Ok(CompositeWorkflow::new(
            client,
            Poller::new(cfg.polling),
            target,
            cfg.env.clone(),
            cfg.endpoints.clone(),
        ))
    }

    pub fn workflow_client(cfg: &PipelineConfig) -> Result<Arc<dyn WorkflowClient>, ConfigError> {
        let executor = cfg.executor.as_ref().ok_or_else(|| ConfigError::Missing {
            names: vec![EXECUTOR_URL.to_string()],
        })?;
        Ok(Arc::new(HttpWorkflowClient::new(
            executor.url.clone(),
            executor.token.clone(),
        )))
    }

    fn sequenced<E>(cfg: &PipelineConfig, executor: E) -> Pipeline
    where
        E: crate::traits::StageExecutor + 'static,
    {
        Pipeline::new(
            StagePlan::standard(),
            Box::new(executor),
            RunConstants {
                bucket: cfg.bucket.clone(),
                project_id: cfg.project_id.clone().unwrap_or_default(),
                region: cfg.region.clone().unwrap_or_default(),
            },
        )
    }
}
