// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Placeholder stage collaborators that run in-process.
//!
//! Each stage writes run-scoped artifacts under its output directory and
//! reports file paths as URIs, mirroring what the deployed services return.

mod media_sourcing;
mod narrator;
mod scriptwriter;
mod uploader;
mod video_assembly;

pub use media_sourcing::MediaSourcingStage;
pub use narrator::NarratorStage;
pub use scriptwriter::ScriptwriterStage;
pub use uploader::UploaderStage;
pub use video_assembly::VideoAssemblyStage;

use std::path::Path;

use crate::observability::messages::stage::{ArtifactWritten, StageRejected};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{RunId, StageName, StageResponse};

const DEFAULT_RUN_ID: &str = "test";

fn path_uri(path: &Path) -> String {
    path.display().to_string()
}

fn artifact_written(stage: StageName, run_id: &str, path: &Path) {
    ArtifactWritten {
        stage: stage.as_str(),
        run_id,
        path: &path_uri(path),
    }
    .log();
}

fn reject(stage: StageName, run_id: &str, reason: impl Into<String>) -> StageResponse {
    let reason = reason.into();
    StageRejected {
        stage: stage.as_str(),
        run_id,
        reason: &reason,
    }
    .log();
    StageResponse::error(reason)
}

/// Rejection for a run id that would place artifacts outside the output dir.
fn unsafe_run_id(stage: StageName, run_id: &str) -> Option<StageResponse> {
    if RunId::is_path_safe(run_id) {
        None
    } else {
        Some(reject(stage, run_id, format!("Invalid run id '{}'", run_id)))
    }
}
