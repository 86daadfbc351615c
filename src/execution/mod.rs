// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Job status model for remote executions.
//!
//! An [`Execution`] is created by a workflow client on submission and is only
//! ever mutated through [`Execution::advance`] (a refreshed snapshot) or
//! [`Execution::mark_not_found`]. Both enforce the state machine in
//! [`ExecutionState`], so a terminal execution can never be revived by a stale
//! or misbehaving executor.

mod state;

pub use state::ExecutionState;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::ClientError;

/// Opaque identifier assigned by the executor at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionId(String);

impl ExecutionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Diagnostic payload attached to a failed execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub payload: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ErrorPayload {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            context: None,
        }
    }
}

/// One invocation of a remote workflow (or of a single stage).
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    id: ExecutionId,
    target: String,
    state: ExecutionState,
    argument: Value,
    result: Option<Value>,
    error: Option<ErrorPayload>,
}

impl Execution {
    /// Build an execution snapshot as reported by an executor.
    ///
    /// `result` is dropped unless the state is `Succeeded` and `error` is dropped
    /// unless the state is `Failed`, so the data model invariants hold no matter
    /// what the executor sends.
    pub fn snapshot(
        id: ExecutionId,
        target: impl Into<String>,
        state: ExecutionState,
        argument: Value,
        result: Option<Value>,
        error: Option<ErrorPayload>,
    ) -> Self {
        Self {
            id,
            target: target.into(),
            state,
            argument,
            result: result.filter(|_| state == ExecutionState::Succeeded),
            error: error.filter(|_| state == ExecutionState::Failed),
        }
    }

    /// A freshly submitted execution with no result yet.
    pub fn created(id: ExecutionId, target: impl Into<String>, argument: Value) -> Self {
        Self::snapshot(id, target, ExecutionState::Created, argument, None, None)
    }

    pub fn id(&self) -> &ExecutionId {
        &self.id
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn argument(&self) -> &Value {
        &self.argument
    }

    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorPayload> {
        self.error.as_ref()
    }

    /// The result, JSON-decoded when the executor reports it as a JSON string.
    pub fn decoded_result(&self) -> Option<Value> {
        self.result.as_ref().map(decode_json_string)
    }

    /// Apply a refreshed snapshot of this execution.
    ///
    /// The id and argument never change. A snapshot for another id, or one that
    /// would move a terminal execution to a different state, is rejected as an
    /// executor protocol violation.
    pub fn advance(&mut self, next: Execution) -> Result<(), ClientError> {
        if next.id != self.id {
            return Err(ClientError::Protocol {
                message: format!(
                    "refresh of execution '{}' returned execution '{}'",
                    self.id, next.id
                ),
            });
        }
        if !self.state.can_transition_to(next.state) {
            return Err(ClientError::Protocol {
                message: format!(
                    "execution '{}' cannot move from {} to {}",
                    self.id, self.state, next.state
                ),
            });
        }
        self.state = next.state;
        self.result = next.result;
        self.error = next.error;
        Ok(())
    }

    /// Record that the executor no longer knows this execution.
    pub fn mark_not_found(&mut self) {
        if !self.state.is_terminal() {
            self.state = ExecutionState::NotFound;
        }
    }
}

/// Decode a JSON document smuggled inside a JSON string; anything else is
/// returned unchanged.
pub fn decode_json_string(value: &Value) -> Value {
    match value {
        Value::String(text) => serde_json::from_str(text).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn running(id: &str) -> Execution {
        Execution::snapshot(
            ExecutionId::new(id),
            "wf",
            ExecutionState::Running,
            json!({"topic": "t"}),
            None,
            None,
        )
    }

    #[test]
    fn test_snapshot_drops_payloads_that_do_not_match_state() {
        let execution = Execution::snapshot(
            ExecutionId::new("e1"),
            "wf",
            ExecutionState::Running,
            json!({}),
            Some(json!("early")),
            Some(ErrorPayload::new(json!("boom"))),
        );
        assert!(execution.result().is_none());
        assert!(execution.error().is_none());

        let failed = Execution::snapshot(
            ExecutionId::new("e1"),
            "wf",
            ExecutionState::Failed,
            json!({}),
            Some(json!("ignored")),
            Some(ErrorPayload::new(json!("boom"))),
        );
        assert!(failed.result().is_none());
        assert_eq!(failed.error().unwrap().payload, json!("boom"));
    }

    #[test]
    fn test_advance_keeps_argument_and_applies_result() {
        let mut execution = running("e1");
        let next = Execution::snapshot(
            ExecutionId::new("e1"),
            "wf",
            ExecutionState::Succeeded,
            json!({"tampered": true}),
            Some(json!({"ok": 1})),
            None,
        );
        execution.advance(next).unwrap();
        assert_eq!(execution.state(), ExecutionState::Succeeded);
        assert_eq!(execution.argument(), &json!({"topic": "t"}));
        assert_eq!(execution.result(), Some(&json!({"ok": 1})));
    }

    #[test]
    fn test_advance_rejects_id_mismatch() {
        let mut execution = running("e1");
        let err = execution.advance(running("e2")).unwrap_err();
        assert!(matches!(err, ClientError::Protocol { .. }));
        assert_eq!(execution.id().as_str(), "e1");
    }

    #[test]
    fn test_advance_rejects_leaving_terminal_state() {
        let mut execution = running("e1");
        execution
            .advance(Execution::snapshot(
                ExecutionId::new("e1"),
                "wf",
                ExecutionState::Cancelled,
                json!({}),
                None,
                None,
            ))
            .unwrap();

        let err = execution.advance(running("e1")).unwrap_err();
        assert!(err.to_string().contains("cannot move from CANCELLED to RUNNING"));
        assert_eq!(execution.state(), ExecutionState::Cancelled);
    }

    #[test]
    fn test_mark_not_found_leaves_terminal_state_alone() {
        let mut execution = running("e1");
        execution.mark_not_found();
        assert_eq!(execution.state(), ExecutionState::NotFound);

        let mut done = Execution::snapshot(
            ExecutionId::new("e2"),
            "wf",
            ExecutionState::Succeeded,
            json!({}),
            Some(json!(1)),
            None,
        );
        done.mark_not_found();
        assert_eq!(done.state(), ExecutionState::Succeeded);
    }

    #[test]
    fn test_decoded_result_parses_json_strings() {
        let execution = Execution::snapshot(
            ExecutionId::new("e1"),
            "wf",
            ExecutionState::Succeeded,
            json!({}),
            Some(json!("{\"status\":\"uploaded\"}")),
            None,
        );
        assert_eq!(execution.decoded_result(), Some(json!({"status": "uploaded"})));
        assert_eq!(decode_json_string(&json!("plain text")), json!("plain text"));
    }
}
