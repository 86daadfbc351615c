// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types emitted by the stage collaborators themselves.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};

/// A local stage wrote a run-scoped artifact.
///
/// # Log Level
/// `debug!` - Detail
pub struct ArtifactWritten<'a> {
    pub stage: &'a str,
    pub run_id: &'a str,
    pub path: &'a str,
}

impl Display for ArtifactWritten<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' wrote {}", self.stage, self.path)
    }
}

impl StructuredLog for ArtifactWritten<'_> {
    fn log(&self) {
        tracing::debug!(
            stage = self.stage,
            run_id = self.run_id,
            path = self.path,
            "{}", self
        );
    }
}

/// A stage refused its input and answered with an error outcome.
///
/// # Log Level
/// `warn!` - The run will abort
pub struct StageRejected<'a> {
    pub stage: &'a str,
    pub run_id: &'a str,
    pub reason: &'a str,
}

impl Display for StageRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Stage '{}' rejected its input: {}", self.stage, self.reason)
    }
}

impl StructuredLog for StageRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            stage = self.stage,
            run_id = self.run_id,
            reason = self.reason,
            "{}", self
        );
    }
}
