// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! JSON shapes exchanged with the workflow executor.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::execution::{ErrorPayload, Execution, ExecutionId, ExecutionState};

/// Body of a create-execution request. The argument travels as a JSON string.
#[derive(Debug, Serialize)]
pub(crate) struct SubmitBody {
    pub argument: String,
}

/// An execution as the executor reports it.
#[derive(Debug, Deserialize)]
pub(crate) struct ExecutionRecord {
    pub name: String,
    pub state: ExecutionState,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<ErrorRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorRecord {
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub context: Option<String>,
}

impl ExecutionRecord {
    pub fn into_execution(self, target: &str, argument: Value) -> Execution {
        let error = self.error.map(|error| ErrorPayload {
            payload: error.payload,
            context: error.context,
        });
        Execution::snapshot(
            ExecutionId::new(self.name),
            target,
            self.state,
            argument,
            self.result,
            error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_with_executor_vocabulary() {
        let record: ExecutionRecord = serde_json::from_value(json!({
            "name": "projects/p/locations/r/workflows/w/executions/abc",
            "state": "ACTIVE",
            "startTime": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        let execution = record.into_execution("wf", json!({}));
        assert_eq!(execution.state(), ExecutionState::Running);
        assert_eq!(
            execution.id().as_str(),
            "projects/p/locations/r/workflows/w/executions/abc"
        );
    }

    #[test]
    fn test_failed_record_keeps_error_payload() {
        let record: ExecutionRecord = serde_json::from_value(json!({
            "name": "e1",
            "state": "FAILED",
            "error": {"payload": "{\"code\":500}", "context": "step upload"}
        }))
        .unwrap();
        let execution = record.into_execution("wf", json!({}));
        let error = execution.error().unwrap();
        assert_eq!(error.payload, json!("{\"code\":500}"));
        assert_eq!(error.context.as_deref(), Some("step upload"));
    }
}
