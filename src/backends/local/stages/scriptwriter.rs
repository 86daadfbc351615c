// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use super::{artifact_written, path_uri, reject, unsafe_run_id, DEFAULT_RUN_ID};
use crate::errors::ClientError;
use crate::pipeline::{StageInput, StageName, StageOutput, StageResponse};
use crate::traits::Stage;

const DEFAULT_TOPIC: &str = "black news";

/// Writes a short three-line script for the topic.
pub struct ScriptwriterStage {
    output_dir: PathBuf,
}

impl ScriptwriterStage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn compose(topic: &str) -> String {
        [
            format!("Welcome to our black news update on {}.", topic),
            "We bring you the latest stories and updates impacting black communities worldwide."
                .to_string(),
            "Stay tuned for more details and insights.".to_string(),
        ]
        .join("\n")
    }
}

#[async_trait]
impl Stage for ScriptwriterStage {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError> {
        let topic = input.text("topic").unwrap_or(DEFAULT_TOPIC);
        let run_id = input.text("run_id").unwrap_or(DEFAULT_RUN_ID);

        if let Some(rejection) = unsafe_run_id(self.name(), run_id) {
            return Ok(rejection);
        }

        let path = self.output_dir.join(format!("{}_script.txt", run_id));
        let written = async {
            fs::create_dir_all(&self.output_dir).await?;
            fs::write(&path, Self::compose(topic)).await
        };
        if let Err(e) = written.await {
            return Ok(reject(
                self.name(),
                run_id,
                format!("Unable to write script {}: {}", path_uri(&path), e),
            ));
        }

        artifact_written(self.name(), run_id, &path);
        Ok(StageResponse::output(
            StageOutput::new().with("script_uri", path_uri(&path)),
        ))
    }

    fn name(&self) -> StageName {
        StageName::Scriptwriter
    }
}
