// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;
use std::sync::Arc;

use super::stages::*;
use crate::pipeline::StageName;
use crate::traits::Stage;

/// Factory for the in-process stage collaborators.
pub struct LocalStageFactory;

impl LocalStageFactory {
    /// Create the local implementation of `name`, writing under `output_dir`.
    pub fn create_stage(name: StageName, output_dir: &Path) -> Arc<dyn Stage> {
        match name {
            StageName::Scriptwriter => Arc::new(ScriptwriterStage::new(output_dir)),
            StageName::MediaSourcing => Arc::new(MediaSourcingStage::new(output_dir)),
            StageName::Narrator => Arc::new(NarratorStage::new(output_dir)),
            StageName::VideoAssembly => Arc::new(VideoAssemblyStage::new(output_dir)),
            StageName::Uploader => Arc::new(UploaderStage::new()),
        }
    }
}
