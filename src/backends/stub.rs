// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ClientError;
use crate::execution::{ErrorPayload, Execution, ExecutionId, ExecutionState};
use crate::pipeline::{StageInput, StageName, StageOutput, StageResponse};
use crate::traits::{Stage, WorkflowClient};

/// One scripted answer to a `refresh` call.
#[derive(Debug, Clone)]
pub enum Step {
    State(ExecutionState),
    Succeeded(Value),
    Failed(Value),
    NotFound,
    Transport,
}

/// A workflow client that replays scripted refresh answers.
///
/// Every submission gets the script registered for its target (or the default
/// script) and a fresh id `exec-N`. Once a script runs dry the execution stays
/// RUNNING.
pub struct ScriptedWorkflowClient {
    default_script: Vec<Step>,
    target_scripts: HashMap<String, Vec<Step>>,
    live: Mutex<HashMap<ExecutionId, VecDeque<Step>>>,
    submissions: Mutex<Vec<(String, Value)>>,
    submits: AtomicUsize,
    refreshes: AtomicUsize,
    reject_submissions: bool,
}

impl ScriptedWorkflowClient {
    pub fn new(default_script: Vec<Step>) -> Self {
        Self {
            default_script,
            target_scripts: HashMap::new(),
            live: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            submits: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            reject_submissions: false,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>, script: Vec<Step>) -> Self {
        self.target_scripts.insert(target.into(), script);
        self
    }

    pub fn rejecting_submissions(mut self) -> Self {
        self.reject_submissions = true;
        self
    }

    pub fn submit_count(&self) -> usize {
        self.submits.load(Ordering::SeqCst)
    }

    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Targets and arguments in submission order.
    pub fn submissions(&self) -> Vec<(String, Value)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowClient for ScriptedWorkflowClient {
    async fn submit(&self, target: &str, argument: &Value) -> Result<Execution, ClientError> {
        if self.reject_submissions {
            return Err(ClientError::Submission {
                target: target.to_string(),
                status: Some(403),
                message: "permission denied".to_string(),
            });
        }

        let n = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        let id = ExecutionId::new(format!("exec-{}", n));
        let script = self
            .target_scripts
            .get(target)
            .unwrap_or(&self.default_script)
            .clone();

        self.live.lock().unwrap().insert(id.clone(), script.into());
        self.submissions
            .lock()
            .unwrap()
            .push((target.to_string(), argument.clone()));

        Ok(Execution::created(id, target, argument.clone()))
    }

    async fn refresh(&self, execution: &Execution) -> Result<Execution, ClientError> {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        let step = self
            .live
            .lock()
            .unwrap()
            .get_mut(execution.id())
            .and_then(|script| script.pop_front())
            .unwrap_or(Step::State(ExecutionState::Running));

        let snapshot = |state, result, error| {
            Ok(Execution::snapshot(
                execution.id().clone(),
                execution.target(),
                state,
                execution.argument().clone(),
                result,
                error,
            ))
        };

        match step {
            Step::State(state) => snapshot(state, None, None),
            Step::Succeeded(result) => snapshot(ExecutionState::Succeeded, Some(result), None),
            Step::Failed(payload) => {
                snapshot(ExecutionState::Failed, None, Some(ErrorPayload::new(payload)))
            }
            Step::NotFound => Err(ClientError::NotFound {
                execution_id: execution.id().clone(),
            }),
            Step::Transport => Err(ClientError::Transport {
                message: "connection reset by peer".to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Shared call log so tests can assert invocation order across stages.
pub type CallLog = Arc<Mutex<Vec<StageName>>>;

/// A stage that always answers with the same response and records its inputs.
pub struct StaticStage {
    name: StageName,
    response: StageResponse,
    inputs: Mutex<Vec<StageInput>>,
    log: Option<CallLog>,
}

impl StaticStage {
    pub fn new(name: StageName, output: StageOutput) -> Self {
        Self {
            name,
            response: StageResponse::output(output),
            inputs: Mutex::new(Vec::new()),
            log: None,
        }
    }

    pub fn responding(name: StageName, response: StageResponse) -> Self {
        Self {
            name,
            response,
            inputs: Mutex::new(Vec::new()),
            log: None,
        }
    }

    pub fn logging_to(mut self, log: CallLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn calls(&self) -> usize {
        self.inputs.lock().unwrap().len()
    }

    pub fn inputs(&self) -> Vec<StageInput> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Stage for StaticStage {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError> {
        self.inputs.lock().unwrap().push(input);
        if let Some(log) = &self.log {
            log.lock().unwrap().push(self.name);
        }
        Ok(self.response.clone())
    }

    fn name(&self) -> StageName {
        self.name
    }
}

/// A stage whose call never reaches the service.
pub struct FailingStage {
    name: StageName,
    calls: AtomicUsize,
}

impl FailingStage {
    pub fn new(name: StageName) -> Self {
        Self {
            name,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Stage for FailingStage {
    async fn invoke(&self, _input: StageInput) -> Result<StageResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ClientError::Transport {
            message: format!("{} unreachable", self.name),
        })
    }

    fn name(&self) -> StageName {
        self.name
    }
}

/// Outputs a well-behaved stage would produce under the standard plan.
pub fn standard_output(stage: StageName, run_id: &str) -> StageOutput {
    match stage {
        StageName::Scriptwriter => {
            StageOutput::new().with("script_uri", format!("gs://b/{}_script.txt", run_id))
        }
        StageName::MediaSourcing => StageOutput::new().with(
            "media_uris",
            vec![
                format!("gs://b/{}_media/frame_0.ppm", run_id),
                format!("gs://b/{}_media/frame_1.ppm", run_id),
            ],
        ),
        StageName::Narrator => {
            StageOutput::new().with("audio_uri", format!("gs://b/{}_narration.wav", run_id))
        }
        StageName::VideoAssembly => {
            StageOutput::new().with("output_uri", format!("gs://b/{}_final.mp4", run_id))
        }
        StageName::Uploader => StageOutput::new()
            .with("status", "uploaded")
            .with("run_id", run_id),
    }
}
