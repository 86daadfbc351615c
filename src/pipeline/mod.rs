// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Pipeline data model: stage contract, stage plan and run reporting.

pub mod plan;
mod report;
mod stage;

pub use plan::{Binding, Produced, Source, StagePlan, StageSpec, ValueKind};
pub use report::{RunId, RunReport, RunRequest, RunStatus, TraceEntry};
pub use stage::{ErrorDetail, Outcome, StageInput, StageName, StageOutput, StageResponse, StageValue};
