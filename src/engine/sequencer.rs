// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::errors::{PipelineError, RunFailure};
use crate::observability::messages::engine::{
    RunAborted, RunCompleted, RunStarted, StageCompleted, StageContractViolated, StageStarted,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{
    RunReport, RunRequest, Source, StageInput, StageName, StageOutput, StagePlan, StageSpec,
    StageValue, TraceEntry, ValueKind,
};
use crate::traits::{PipelineRunner, StageExecutor};

/// Values shared by every stage of every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConstants {
    pub bucket: String,
    pub project_id: String,
    pub region: String,
}

/// Sequential pipeline driver.
///
/// Runs the stages of a [`StagePlan`] strictly in order through a
/// [`StageExecutor`]. Each stage's input is assembled from the run constants
/// and the outputs of earlier stages, and each stage must produce every output
/// the plan declares for it before the next one starts.
///
/// ## Failure handling
///
/// The first error of any kind ends the run. Outputs gathered so far are
/// dropped; the returned [`RunFailure`] names the failing step and carries the
/// trace up to and including it. Nothing is retried at this level.
///
/// ## Cancellation
///
/// The token is checked before every stage and handed to the executor, which
/// races it against any waiting it does.
pub struct Pipeline {
    plan: StagePlan,
    executor: Box<dyn StageExecutor>,
    constants: RunConstants,
}

impl Pipeline {
    pub fn new(plan: StagePlan, executor: Box<dyn StageExecutor>, constants: RunConstants) -> Self {
        Self {
            plan,
            executor,
            constants,
        }
    }

    pub fn plan(&self) -> &StagePlan {
        &self.plan
    }

    fn build_input(
        &self,
        spec: &StageSpec,
        request: &RunRequest,
        outputs: &HashMap<StageName, StageOutput>,
    ) -> StageInput {
        let mut input = StageInput::new();
        for binding in spec.inputs {
            let value = match binding.source {
                Source::Topic => Some(StageValue::Text(request.topic.clone())),
                Source::RunId => Some(StageValue::Text(request.run_id.to_string())),
                Source::Bucket => Some(StageValue::Text(self.constants.bucket.clone())),
                Source::ProjectId => Some(StageValue::Text(self.constants.project_id.clone())),
                Source::Region => Some(StageValue::Text(self.constants.region.clone())),
                Source::Output { stage, field } => outputs
                    .get(&stage)
                    .and_then(|output| output.get(field))
                    .and_then(stage_value),
            };
            if let Some(value) = value {
                input.insert(binding.input, value);
            }
        }
        input
    }

    async fn run_stages(
        &self,
        request: RunRequest,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunFailure> {
        let run_started = Instant::now();
        let run_id = request.run_id.to_string();
        let mut outputs: HashMap<StageName, StageOutput> = HashMap::new();
        let mut trace: Vec<TraceEntry> = Vec::with_capacity(self.plan.len());
        let mut last_output = None;

        for spec in self.plan.stages() {
            if cancel.is_cancelled() {
                return Err(abort(&request, spec.name, PipelineError::Cancelled, trace));
            }

            let input = self.build_input(spec, &request, &outputs);
            let started = StageStarted {
                run_id: &run_id,
                stage: spec.name.as_str(),
                executor: self.executor.kind(),
                input_count: input.len(),
            };
            started.log();
            let span = started.span("stage");

            let stage_started = Instant::now();
            let invocation = match self
                .executor
                .invoke(spec.name, input, cancel)
                .instrument(span)
                .await
            {
                Ok(invocation) => invocation,
                Err(error) => {
                    trace.push(TraceEntry {
                        step: spec.name.to_string(),
                        execution_id: error.execution_id().cloned(),
                        state: error.terminal_state(),
                        elapsed_ms: elapsed_ms(stage_started),
                    });
                    return Err(abort(&request, spec.name, error, trace));
                }
            };

            trace.push(TraceEntry {
                step: spec.name.to_string(),
                execution_id: invocation.execution_id.clone(),
                state: invocation.state,
                elapsed_ms: elapsed_ms(stage_started),
            });

            if let Some(field) = missing_output(spec, &invocation.output) {
                StageContractViolated {
                    run_id: &run_id,
                    stage: spec.name.as_str(),
                    field,
                }
                .log();
                let error = PipelineError::ContractViolation {
                    stage: spec.name,
                    field: field.to_string(),
                };
                return Err(abort(&request, spec.name, error, trace));
            }

            StageCompleted {
                run_id: &run_id,
                stage: spec.name.as_str(),
                execution_id: invocation.execution_id.as_ref().map(|id| id.as_str()),
                duration: stage_started.elapsed(),
            }
            .log();

            last_output = Some(invocation.output.clone());
            outputs.insert(spec.name, invocation.output);
        }

        RunCompleted {
            run_id: &run_id,
            stage_count: trace.len(),
            duration: run_started.elapsed(),
        }
        .log();

        let output = last_output.map(StageOutput::into_value).unwrap_or(Value::Null);
        Ok(RunReport::succeeded(request, output, trace))
    }
}

#[async_trait]
impl PipelineRunner for Pipeline {
    async fn run(
        &self,
        request: RunRequest,
        cancel: &CancellationToken,
    ) -> Result<RunReport, RunFailure> {
        let started = RunStarted {
            run_id: request.run_id.as_str(),
            topic: &request.topic,
            runner: self.kind(),
            stage_count: self.plan.len(),
        };
        started.log();
        let span = started.span("pipeline");

        self.run_stages(request, cancel).instrument(span).await
    }

    fn kind(&self) -> &'static str {
        "sequenced"
    }
}

/// First declared output that is absent or of the wrong kind.
fn missing_output(spec: &StageSpec, output: &StageOutput) -> Option<&'static str> {
    spec.produces
        .iter()
        .find(|produced| match produced.kind {
            ValueKind::Text => output.text(produced.field).is_none(),
            ValueKind::List => output.list(produced.field).is_none(),
        })
        .map(|produced| produced.field)
}

fn stage_value(value: &Value) -> Option<StageValue> {
    match value {
        Value::String(text) => Some(StageValue::Text(text.clone())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(StageValue::List),
        _ => None,
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn abort(
    request: &RunRequest,
    step: StageName,
    error: PipelineError,
    trace: Vec<TraceEntry>,
) -> RunFailure {
    RunAborted {
        run_id: request.run_id.as_str(),
        step: step.as_str(),
        error: &error,
    }
    .log();

    RunFailure {
        run_id: request.run_id.clone(),
        step: step.to_string(),
        error,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{RunId, StageOutput};
    use serde_json::json;

    #[test]
    fn test_stage_value_conversion() {
        assert_eq!(stage_value(&json!("a")), Some(StageValue::Text("a".into())));
        assert_eq!(
            stage_value(&json!(["a", "b"])),
            Some(StageValue::List(vec!["a".into(), "b".into()]))
        );
        assert_eq!(stage_value(&json!(["a", 1])), None);
        assert_eq!(stage_value(&json!(3)), None);
    }

    #[test]
    fn test_missing_output_checks_kind() {
        let plan = StagePlan::standard();
        let media = &plan.stages()[1];

        let wrong_kind = StageOutput::new().with("media_uris", "just-one.ppm");
        assert_eq!(missing_output(media, &wrong_kind), Some("media_uris"));

        let ok = StageOutput::new().with("media_uris", json!([]));
        assert_eq!(missing_output(media, &ok), None);
    }

    #[test]
    fn test_inputs_are_wired_from_constants_and_earlier_outputs() {
        struct Unused;
        #[async_trait]
        impl StageExecutor for Unused {
            async fn invoke(
                &self,
                _stage: StageName,
                _input: StageInput,
                _cancel: &CancellationToken,
            ) -> Result<crate::traits::StageInvocation, PipelineError> {
                Err(PipelineError::Cancelled)
            }
            fn kind(&self) -> &'static str {
                "unused"
            }
        }

        let pipeline = Pipeline::new(
            StagePlan::standard(),
            Box::new(Unused),
            RunConstants {
                bucket: "b".into(),
                project_id: "p".into(),
                region: "r".into(),
            },
        );
        let request = RunRequest::new("topic", RunId::new("r9"));
        let mut outputs = HashMap::new();
        outputs.insert(
            StageName::MediaSourcing,
            StageOutput::new().with("media_uris", json!(["f1", "f2"])),
        );
        outputs.insert(
            StageName::Narrator,
            StageOutput::new().with("audio_uri", "n.wav"),
        );

        let assembly = &pipeline.plan().stages()[3];
        let input = pipeline.build_input(assembly, &request, &outputs);
        assert_eq!(
            input.to_json(),
            json!({
                "media_uris": ["f1", "f2"],
                "narration_uri": "n.wav",
                "gcs_bucket": "b",
                "project_id": "p",
                "region": "r",
                "run_id": "r9"
            })
        );
    }
}
