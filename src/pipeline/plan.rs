// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Declarative description of which stages run, in which order, and how each
//! stage's inputs are wired from run constants and earlier outputs.

use std::collections::HashSet;

use crate::errors::ConfigError;
use crate::pipeline::StageName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    List,
}

/// Where a stage input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Output { stage: StageName, field: &'static str },
    Topic,
    RunId,
    Bucket,
    ProjectId,
    Region,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub input: &'static str,
    pub source: Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Produced {
    pub field: &'static str,
    pub kind: ValueKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageSpec {
    pub name: StageName,
    pub inputs: &'static [Binding],
    pub produces: &'static [Produced],
}

const fn bind(input: &'static str, source: Source) -> Binding {
    Binding { input, source }
}

const fn from(input: &'static str, stage: StageName, field: &'static str) -> Binding {
    Binding {
        input,
        source: Source::Output { stage, field },
    }
}

const fn text(field: &'static str) -> Produced {
    Produced {
        field,
        kind: ValueKind::Text,
    }
}

const STANDARD: [StageSpec; 5] = [
    StageSpec {
        name: StageName::Scriptwriter,
        inputs: &[
            bind("topic", Source::Topic),
            bind("bucket", Source::Bucket),
            bind("run_id", Source::RunId),
        ],
        produces: &[text("script_uri")],
    },
    StageSpec {
        name: StageName::MediaSourcing,
        inputs: &[
            from("script", StageName::Scriptwriter, "script_uri"),
            bind("gcs_bucket", Source::Bucket),
            bind("run_id", Source::RunId),
        ],
        produces: &[Produced {
            field: "media_uris",
            kind: ValueKind::List,
        }],
    },
    StageSpec {
        name: StageName::Narrator,
        inputs: &[
            from("script_content", StageName::Scriptwriter, "script_uri"),
            bind("gcs_bucket", Source::Bucket),
            bind("run_id", Source::RunId),
        ],
        produces: &[text("audio_uri")],
    },
    StageSpec {
        name: StageName::VideoAssembly,
        inputs: &[
            from("media_uris", StageName::MediaSourcing, "media_uris"),
            from("narration_uri", StageName::Narrator, "audio_uri"),
            bind("gcs_bucket", Source::Bucket),
            bind("project_id", Source::ProjectId),
            bind("region", Source::Region),
            bind("run_id", Source::RunId),
        ],
        produces: &[text("output_uri")],
    },
    StageSpec {
        name: StageName::Uploader,
        inputs: &[
            from("final_uri", StageName::VideoAssembly, "output_uri"),
            from("script_content", StageName::Scriptwriter, "script_uri"),
            bind("run_id", Source::RunId),
        ],
        produces: &[text("status")],
    },
];

/// An ordered, validated list of stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    stages: Vec<StageSpec>,
}

impl StagePlan {
    /// Validate and build a plan.
    ///
    /// Stage names must be unique and every `Source::Output` must reference a
    /// field declared by a stage that runs earlier.
    pub fn new(stages: Vec<StageSpec>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::InvalidPlan {
                message: "a plan needs at least one stage".to_string(),
            });
        }

        let mut seen: HashSet<StageName> = HashSet::new();
        for (position, spec) in stages.iter().enumerate() {
            if !seen.insert(spec.name) {
                return Err(ConfigError::InvalidPlan {
                    message: format!("stage '{}' appears more than once", spec.name),
                });
            }

            for binding in spec.inputs {
                if let Source::Output { stage, field } = binding.source {
                    let declared = stages[..position]
                        .iter()
                        .find(|earlier| earlier.name == stage)
                        .map(|earlier| earlier.produces.iter().any(|p| p.field == field));

                    match declared {
                        Some(true) => {}
                        Some(false) => {
                            return Err(ConfigError::InvalidPlan {
                                message: format!(
                                    "input '{}' of stage '{}' references '{}.{}', which that stage does not produce",
                                    binding.input, spec.name, stage, field
                                ),
                            })
                        }
                        None => {
                            return Err(ConfigError::InvalidPlan {
                                message: format!(
                                    "input '{}' of stage '{}' depends on stage '{}', which does not run before it",
                                    binding.input, spec.name, stage
                                ),
                            })
                        }
                    }
                }
            }
        }

        Ok(Self { stages })
    }

    /// scriptwriter, media_sourcing, narrator, video_assembly, uploader.
    pub fn standard() -> Self {
        Self {
            stages: STANDARD.to_vec(),
        }
    }

    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    pub fn names(&self) -> impl Iterator<Item = StageName> + '_ {
        self.stages.iter().map(|spec| spec.name)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Default for StagePlan {
    fn default() -> Self {
        Self::standard()
    }
}
