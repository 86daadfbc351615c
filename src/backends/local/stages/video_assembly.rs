// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::{artifact_written, path_uri, reject, unsafe_run_id, DEFAULT_RUN_ID};
use crate::errors::ClientError;
use crate::pipeline::{StageInput, StageName, StageOutput, StageResponse};
use crate::traits::Stage;

const FRAMES_PER_SECOND: u32 = 1;

/// Assembly instructions for one video: which frames, in order, over which
/// narration track.
#[derive(Debug, Serialize)]
struct AssemblyManifest<'a> {
    run_id: &'a str,
    width: usize,
    height: usize,
    fps: u32,
    duration_seconds: usize,
    frames: &'a [String],
    narration_uri: Option<&'a str>,
}

/// Collects the frames and narration into an assembly manifest.
pub struct VideoAssemblyStage {
    output_dir: PathBuf,
}

impl VideoAssemblyStage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

/// Width and height from a binary PPM header, skipping comment lines.
fn ppm_dimensions(bytes: &[u8]) -> Option<(usize, usize)> {
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(1024)]);
    let mut fields = text
        .lines()
        .filter(|line| !line.starts_with('#'))
        .flat_map(str::split_whitespace);

    if fields.next()? != "P6" {
        return None;
    }
    let width = fields.next()?.parse().ok()?;
    let height = fields.next()?.parse().ok()?;
    Some((width, height))
}

/// Run id encoded in a `{run_id}_media/frame_N.ppm` path.
fn run_id_from_frame(frame: &str) -> Option<String> {
    let parent = Path::new(frame).parent()?.file_name()?.to_str()?;
    parent.strip_suffix("_media").map(str::to_string)
}

#[async_trait]
impl Stage for VideoAssemblyStage {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError> {
        let media_uris = input.list("media_uris").unwrap_or_default();
        let run_id = input
            .text("run_id")
            .map(str::to_string)
            .or_else(|| media_uris.first().and_then(|uri| run_id_from_frame(uri)))
            .unwrap_or_else(|| DEFAULT_RUN_ID.to_string());

        if let Some(rejection) = unsafe_run_id(self.name(), &run_id) {
            return Ok(rejection);
        }

        let Some(first) = media_uris.first() else {
            return Ok(reject(self.name(), &run_id, "No media URIs provided"));
        };

        let dimensions = fs::read(first).await.ok().and_then(|bytes| ppm_dimensions(&bytes));
        let Some((width, height)) = dimensions else {
            return Ok(reject(self.name(), &run_id, "Unable to read image file"));
        };

        let manifest = AssemblyManifest {
            run_id: &run_id,
            width,
            height,
            fps: FRAMES_PER_SECOND,
            duration_seconds: media_uris.len() / FRAMES_PER_SECOND as usize,
            frames: media_uris,
            narration_uri: input.text("narration_uri"),
        };

        let path = self.output_dir.join(format!("{}_final.json", run_id));
        let written = async {
            let body = serde_json::to_vec_pretty(&manifest)?;
            fs::create_dir_all(&self.output_dir).await?;
            fs::write(&path, body).await
        };
        if let Err(e) = written.await {
            return Ok(reject(
                self.name(),
                &run_id,
                format!("Unable to write {}: {}", path_uri(&path), e),
            ));
        }

        artifact_written(self.name(), &run_id, &path);
        Ok(StageResponse::output(
            StageOutput::new().with("output_uri", path_uri(&path)),
        ))
    }

    fn name(&self) -> StageName {
        StageName::VideoAssembly
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Outcome;

    fn message(response: StageResponse) -> String {
        match response.outcome {
            Outcome::Error(detail) => detail.message,
            Outcome::Output(output) => panic!("expected error, got {:?}", output),
        }
    }

    #[tokio::test]
    async fn test_empty_media_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let response = VideoAssemblyStage::new(dir.path())
            .invoke(StageInput::new().with("media_uris", Vec::<String>::new()))
            .await
            .unwrap();
        assert_eq!(message(response), "No media URIs provided");
    }

    #[tokio::test]
    async fn test_unreadable_first_frame_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("frame_1.ppm");
        std::fs::write(&bogus, b"not an image").unwrap();

        let response = VideoAssemblyStage::new(dir.path())
            .invoke(StageInput::new().with("media_uris", vec![bogus.display().to_string()]))
            .await
            .unwrap();
        assert_eq!(message(response), "Unable to read image file");
    }

    #[tokio::test]
    async fn test_manifest_lists_frames_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let media = dir.path().join("r3_media");
        std::fs::create_dir_all(&media).unwrap();
        let frames: Vec<String> = (1..=2)
            .map(|i| {
                let path = media.join(format!("frame_{}.ppm", i));
                std::fs::write(&path, b"P6\n# hi\n4 2\n255\n").unwrap();
                path.display().to_string()
            })
            .collect();

        let response = VideoAssemblyStage::new(dir.path())
            .invoke(
                StageInput::new()
                    .with("media_uris", frames.clone())
                    .with("narration_uri", "n.wav"),
            )
            .await
            .unwrap();

        let Outcome::Output(output) = response.outcome else {
            panic!("expected output");
        };
        let uri = output.text("output_uri").unwrap();
        assert!(uri.ends_with("r3_final.json"));

        let manifest: serde_json::Value =
            serde_json::from_slice(&std::fs::read(uri).unwrap()).unwrap();
        assert_eq!(manifest["width"], 4);
        assert_eq!(manifest["height"], 2);
        assert_eq!(manifest["duration_seconds"], 2);
        assert_eq!(manifest["frames"], serde_json::json!(frames));
        assert_eq!(manifest["narration_uri"], "n.wav");
    }
}
