// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a remote execution.
///
/// `Succeeded`, `Failed` and `Cancelled` are terminal: once observed they never
/// change. `NotFound` is recorded by the polling driver when the executor loses
/// track of an execution; it is final for the driver but deliberately not
/// classified as terminal, since the real outcome is unknown.
///
/// Executors in the wild use slightly different vocabularies, so the wire
/// aliases `QUEUED`/`STATE_UNSPECIFIED` (created) and `ACTIVE` (running) are
/// accepted on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    #[serde(alias = "QUEUED", alias = "STATE_UNSPECIFIED")]
    Created,
    #[serde(alias = "ACTIVE")]
    Running,
    Succeeded,
    Failed,
    Cancelled,
    NotFound,
}

impl ExecutionState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionState::Succeeded | ExecutionState::Failed | ExecutionState::Cancelled
        )
    }

    /// Whether an execution currently in `self` may be observed in `next`.
    ///
    /// Terminal states and `NotFound` only accept themselves; nothing moves back
    /// to `Created`.
    pub fn can_transition_to(self, next: ExecutionState) -> bool {
        if self.is_terminal() || self == ExecutionState::NotFound {
            return next == self;
        }
        match next {
            ExecutionState::Created => self == ExecutionState::Created,
            _ => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionState::Created => "CREATED",
            ExecutionState::Running => "RUNNING",
            ExecutionState::Succeeded => "SUCCEEDED",
            ExecutionState::Failed => "FAILED",
            ExecutionState::Cancelled => "CANCELLED",
            ExecutionState::NotFound => "NOT_FOUND",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CREATED" | "QUEUED" | "STATE_UNSPECIFIED" => Ok(ExecutionState::Created),
            "RUNNING" | "ACTIVE" => Ok(ExecutionState::Running),
            "SUCCEEDED" => Ok(ExecutionState::Succeeded),
            "FAILED" => Ok(ExecutionState::Failed),
            "CANCELLED" => Ok(ExecutionState::Cancelled),
            "NOT_FOUND" => Ok(ExecutionState::NotFound),
            other => Err(format!("unknown execution state '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(ExecutionState::Succeeded.is_terminal());
        assert!(ExecutionState::Failed.is_terminal());
        assert!(ExecutionState::Cancelled.is_terminal());
        assert!(!ExecutionState::Created.is_terminal());
        assert!(!ExecutionState::Running.is_terminal());
        assert!(!ExecutionState::NotFound.is_terminal());
    }

    #[test]
    fn test_terminal_states_never_change() {
        for terminal in [
            ExecutionState::Succeeded,
            ExecutionState::Failed,
            ExecutionState::Cancelled,
        ] {
            assert!(terminal.can_transition_to(terminal));
            assert!(!terminal.can_transition_to(ExecutionState::Running));
            assert!(!terminal.can_transition_to(ExecutionState::NotFound));
        }
        assert!(!ExecutionState::NotFound.can_transition_to(ExecutionState::Succeeded));
    }

    #[test]
    fn test_running_cannot_return_to_created() {
        assert!(ExecutionState::Created.can_transition_to(ExecutionState::Created));
        assert!(ExecutionState::Created.can_transition_to(ExecutionState::Running));
        assert!(ExecutionState::Running.can_transition_to(ExecutionState::Cancelled));
        assert!(!ExecutionState::Running.can_transition_to(ExecutionState::Created));
    }

    #[test]
    fn test_wire_aliases() {
        let active: ExecutionState = serde_json::from_str("\"ACTIVE\"").unwrap();
        assert_eq!(active, ExecutionState::Running);
        let queued: ExecutionState = serde_json::from_str("\"QUEUED\"").unwrap();
        assert_eq!(queued, ExecutionState::Created);
        assert_eq!(
            serde_json::to_string(&ExecutionState::NotFound).unwrap(),
            "\"NOT_FOUND\""
        );
        assert_eq!("cancelled".parse::<ExecutionState>().unwrap(), ExecutionState::Cancelled);
        assert!("PAUSED".parse::<ExecutionState>().is_err());
    }
}
