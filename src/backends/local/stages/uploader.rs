// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use super::{reject, DEFAULT_RUN_ID};
use crate::errors::ClientError;
use crate::pipeline::{StageInput, StageName, StageOutput, StageResponse};
use crate::traits::Stage;

/// Stands in for the publishing step; nothing leaves the machine.
#[derive(Debug, Default)]
pub struct UploaderStage;

impl UploaderStage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Stage for UploaderStage {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError> {
        let run_id = input.text("run_id").unwrap_or(DEFAULT_RUN_ID);
        let Some(final_uri) = input.text("final_uri") else {
            return Ok(reject(self.name(), run_id, "No final video URI provided"));
        };

        Ok(StageResponse::output(
            StageOutput::new()
                .with("status", "uploaded")
                .with("final_uri", final_uri)
                .with("script_content", input.text("script_content").unwrap_or_default())
                .with("run_id", run_id),
        ))
    }

    fn name(&self) -> StageName {
        StageName::Uploader
    }
}
