// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{artifact_written, path_uri, reject, unsafe_run_id, DEFAULT_RUN_ID};
use crate::errors::ClientError;
use crate::pipeline::{StageInput, StageName, StageOutput, StageResponse};
use crate::traits::Stage;

pub const FRAME_WIDTH: usize = 640;
pub const FRAME_HEIGHT: usize = 360;

/// Turns each sentence of the script into a placeholder frame.
///
/// Frames are binary PPM images (black background) with the sentence stored
/// as a header comment.
pub struct MediaSourcingStage {
    output_dir: PathBuf,
}

impl MediaSourcingStage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Split on `.`, dropping empty fragments.
    pub fn sentences(script: &str) -> Vec<String> {
        script
            .split('.')
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|s| !s.is_empty())
            .collect()
    }

    fn frame(sentence: &str) -> Vec<u8> {
        let header = format!(
            "P6\n# {}\n{} {}\n255\n",
            sentence.replace('\n', " "),
            FRAME_WIDTH,
            FRAME_HEIGHT
        );
        let mut bytes = header.into_bytes();
        bytes.resize(bytes.len() + FRAME_WIDTH * FRAME_HEIGHT * 3, 0);
        bytes
    }

    async fn write_frames(&self, media_dir: &Path, sentences: &[String]) -> std::io::Result<Vec<String>> {
        match fs::remove_dir_all(media_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(media_dir).await?;

        let mut uris = Vec::with_capacity(sentences.len());
        for (index, sentence) in sentences.iter().enumerate() {
            let path = media_dir.join(format!("frame_{}.ppm", index + 1));
            fs::write(&path, Self::frame(sentence)).await?;
            uris.push(path_uri(&path));
        }
        Ok(uris)
    }
}

/// Run id encoded in a `{run_id}_script.txt` file name.
fn run_id_from_script(script: &str) -> Option<String> {
    let name = Path::new(script).file_name()?.to_str()?;
    name.split('_').next().map(str::to_string)
}

#[async_trait]
impl Stage for MediaSourcingStage {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError> {
        let script_path = input.text("script").unwrap_or_default();
        let run_id = input
            .text("run_id")
            .map(str::to_string)
            .or_else(|| run_id_from_script(script_path))
            .unwrap_or_else(|| DEFAULT_RUN_ID.to_string());

        if let Some(rejection) = unsafe_run_id(self.name(), &run_id) {
            return Ok(rejection);
        }

        let script = match fs::read_to_string(script_path).await {
            Ok(script) if !script_path.is_empty() => script,
            _ => return Ok(reject(self.name(), &run_id, "Script file not found")),
        };

        let sentences = Self::sentences(&script);
        let media_dir = self.output_dir.join(format!("{}_media", run_id));
        let media_uris = match self.write_frames(&media_dir, &sentences).await {
            Ok(uris) => uris,
            Err(e) => {
                return Ok(reject(
                    self.name(),
                    &run_id,
                    format!("Unable to write frames to {}: {}", path_uri(&media_dir), e),
                ))
            }
        };

        artifact_written(self.name(), &run_id, &media_dir);
        Ok(StageResponse::output(
            StageOutput::new().with("media_uris", media_uris),
        ))
    }

    fn name(&self) -> StageName {
        StageName::MediaSourcing
    }
}
