// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use super::{artifact_written, path_uri, reject, unsafe_run_id, DEFAULT_RUN_ID};
use crate::errors::ClientError;
use crate::pipeline::{StageInput, StageName, StageOutput, StageResponse};
use crate::traits::Stage;

const SAMPLE_RATE: u32 = 44_100;
const DURATION_SECONDS: u32 = 6;
const BYTES_PER_SAMPLE: u16 = 2;

/// Produces a silent mono narration track.
pub struct NarratorStage {
    output_dir: PathBuf,
}

impl NarratorStage {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 16-bit PCM WAV of silence.
    pub fn silent_wav(seconds: u32, sample_rate: u32) -> Vec<u8> {
        let data_len = seconds * sample_rate * BYTES_PER_SAMPLE as u32;
        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVEfmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * BYTES_PER_SAMPLE as u32).to_le_bytes());
        wav.extend_from_slice(&BYTES_PER_SAMPLE.to_le_bytes());
        wav.extend_from_slice(&(BYTES_PER_SAMPLE * 8).to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        wav.resize(44 + data_len as usize, 0);
        wav
    }
}

#[async_trait]
impl Stage for NarratorStage {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError> {
        let run_id = input.text("run_id").unwrap_or(DEFAULT_RUN_ID);

        if let Some(rejection) = unsafe_run_id(self.name(), run_id) {
            return Ok(rejection);
        }
        let path = self.output_dir.join(format!("{}_narration.wav", run_id));

        let written = async {
            fs::create_dir_all(&self.output_dir).await?;
            fs::write(&path, Self::silent_wav(DURATION_SECONDS, SAMPLE_RATE)).await
        };
        if let Err(e) = written.await {
            return Ok(reject(
                self.name(),
                run_id,
                format!("Unable to write narration {}: {}", path_uri(&path), e),
            ));
        }

        artifact_written(self.name(), run_id, &path);
        Ok(StageResponse::output(
            StageOutput::new().with("audio_uri", path_uri(&path)),
        ))
    }

    fn name(&self) -> StageName {
        StageName::Narrator
    }
}
