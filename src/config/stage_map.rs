// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::backends::http::HttpStage;
use crate::backends::local::LocalStageFactory;
use crate::config::StageEndpoints;
use crate::errors::ConfigError;
use crate::pipeline::StageName;
use crate::traits::Stage;

/// Registry of stage collaborators keyed by stage name.
///
/// Stages are held as `Arc<dyn Stage>` so one map can back any number of runs.
///
/// # Example
/// ```
/// use newsreel::config::StageMap;
/// use newsreel::pipeline::StageName;
///
/// let stages = StageMap::local("outputs");
/// assert!(stages.contains(StageName::Narrator));
/// assert_eq!(stages.len(), 5);
/// ```
#[derive(Clone, Default)]
pub struct StageMap(HashMap<StageName, Arc<dyn Stage>>);

impl StageMap {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Register `stage` under its own name, replacing any earlier entry.
    pub fn insert(&mut self, stage: Arc<dyn Stage>) {
        self.0.insert(stage.name(), stage);
    }

    pub fn with(mut self, stage: Arc<dyn Stage>) -> Self {
        self.insert(stage);
        self
    }

    pub fn get(&self, name: StageName) -> Option<&Arc<dyn Stage>> {
        self.0.get(&name)
    }

    pub fn contains(&self, name: StageName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The in-process placeholder stages, writing under `output_dir`.
    pub fn local(output_dir: impl AsRef<Path>) -> Self {
        StageName::ALL
            .into_iter()
            .fold(Self::new(), |map, name| {
                map.with(LocalStageFactory::create_stage(name, output_dir.as_ref()))
            })
    }

    /// One HTTP stage per configured URL. Every stage needs a URL.
    pub fn http(endpoints: &StageEndpoints, client: reqwest::Client) -> Result<Self, ConfigError> {
        let mut map = Self::new();
        let mut missing = Vec::new();
        for name in StageName::ALL {
            match endpoints.stage_url(name) {
                Some(url) => map.insert(Arc::new(HttpStage::new(name, url, client.clone()))),
                None => missing.push(format!("{} endpoint", name)),
            }
        }

        if missing.is_empty() {
            Ok(map)
        } else {
            Err(ConfigError::Missing { names: missing })
        }
    }
}

impl std::fmt::Debug for StageMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.0.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        f.debug_struct("StageMap")
            .field("stage_count", &self.0.len())
            .field("stages", &names)
            .finish()
    }
}
