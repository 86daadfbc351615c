// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::config::consts::*;
use crate::config::validation::validate_required;
use crate::errors::ConfigError;
use crate::observability::messages::config::ConfigurationLoaded;
use crate::observability::messages::StructuredLog;
use crate::pipeline::StageName;

/// How the pipeline gets its stages to run.
///
/// # Variants
/// * `Workflow` - one remote execution of a deployed workflow runs every stage
/// * `Staged` - one remote execution per stage, sequenced locally
/// * `Http` - each stage is called directly over HTTP
/// * `Local` - in-process placeholder stages writing to `output_dir`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    Workflow,
    Staged,
    Http,
    Local,
}

impl ExecutionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionMode::Workflow => "workflow",
            ExecutionMode::Staged => "staged",
            ExecutionMode::Http => "http",
            ExecutionMode::Local => "local",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "workflow" => Ok(ExecutionMode::Workflow),
            "staged" => Ok(ExecutionMode::Staged),
            "http" => Ok(ExecutionMode::Http),
            "local" => Ok(ExecutionMode::Local),
            other => Err(format!(
                "unknown mode '{}' (expected workflow, staged, http or local)",
                other
            )),
        }
    }
}

/// Polling behaviour for remote executions.
///
/// # Fields
/// * `interval` - wait between two refreshes (defaults to 10s)
/// * `max_wait` - give up after this long; `None` waits forever
/// * `transport_retries` - extra refresh attempts after a transport error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingOptions {
    pub interval: Duration,
    pub max_wait: Option<Duration>,
    pub transport_retries: u32,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECONDS),
            max_wait: None,
            transport_retries: DEFAULT_TRANSPORT_RETRIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorEndpoint {
    pub url: String,
    pub token: Option<String>,
}

/// Location of a deployed workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTarget {
    pub project_id: String,
    pub region: String,
    pub name: String,
}

impl WorkflowTarget {
    pub fn path(&self) -> String {
        format!(
            "projects/{}/locations/{}/workflows/{}",
            self.project_id, self.region, self.name
        )
    }
}

/// URLs of the stage services plus the two auxiliary endpoints the composite
/// workflow calls on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageEndpoints {
    pub scriptwriter: Option<String>,
    pub media_sourcing: Option<String>,
    pub narrator: Option<String>,
    pub video_assembly: Option<String>,
    pub uploader: Option<String>,
    pub error_handler: Option<String>,
    pub logger: Option<String>,
}

impl StageEndpoints {
    pub fn stage_url(&self, stage: StageName) -> Option<&str> {
        let url = match stage {
            StageName::Scriptwriter => &self.scriptwriter,
            StageName::MediaSourcing => &self.media_sourcing,
            StageName::Narrator => &self.narrator,
            StageName::VideoAssembly => &self.video_assembly,
            StageName::Uploader => &self.uploader,
        };
        url.as_deref()
    }
}

/// Fully resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub mode: ExecutionMode,
    pub env: String,
    pub executor: Option<ExecutorEndpoint>,
    pub workflow: Option<WorkflowTarget>,
    pub project_id: Option<String>,
    pub region: Option<String>,
    pub endpoints: StageEndpoints,
    pub bucket: String,
    pub output_dir: PathBuf,
    pub polling: PollingOptions,
}

impl PipelineConfig {
    /// Zero-configuration local setup writing artifacts under `output_dir`.
    pub fn local(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            mode: ExecutionMode::Local,
            env: DEFAULT_ENV.to_string(),
            executor: None,
            workflow: None,
            project_id: None,
            region: None,
            endpoints: StageEndpoints::default(),
            bucket: DEFAULT_BUCKET.to_string(),
            output_dir: output_dir.into(),
            polling: PollingOptions::default(),
        }
    }
}

/// On-disk configuration. Every value is optional; the environment overrides
/// anything set here.
///
/// # Example
/// ```yaml
/// env: staging
/// executor:
///   url: "https://workflowexecutions.googleapis.com"
/// workflow:
///   project_id: my-project
///   region: us-central1
///   name: video-pipeline
/// endpoints:
///   scriptwriter: "https://scriptwriter.example.run.app"
/// polling:
///   interval_seconds: 5
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub env: Option<String>,
    pub executor: ExecutorSection,
    pub workflow: WorkflowSection,
    pub endpoints: StageEndpoints,
    pub bucket: Option<String>,
    pub output_dir: Option<String>,
    pub polling: PollingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecutorSection {
    pub url: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowSection {
    pub project_id: Option<String>,
    pub region: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PollingSection {
    pub interval_seconds: Option<u64>,
    pub max_wait_seconds: Option<u64>,
    pub transport_retries: Option<u32>,
}

impl ConfigFile {
    /// Parse a YAML or TOML file, chosen by extension.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &contents)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string()))
            }
            Some("toml") => toml::from_str(contents).map_err(|e| parse_error(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// The file's value for an environment-variable key, as a string.
    fn value(&self, key: &str) -> Option<String> {
        let text = |value: &Option<String>| value.clone();
        match key {
            EXECUTOR_URL => text(&self.executor.url),
            EXECUTOR_TOKEN => text(&self.executor.token),
            PROJECT_ID => text(&self.workflow.project_id),
            REGION => text(&self.workflow.region),
            WORKFLOW_NAME => text(&self.workflow.name),
            SCRIPTWRITER_URL => text(&self.endpoints.scriptwriter),
            MEDIA_SOURCING_URL => text(&self.endpoints.media_sourcing),
            NARRATOR_URL => text(&self.endpoints.narrator),
            ASSEMBLY_URL => text(&self.endpoints.video_assembly),
            UPLOADER_URL => text(&self.endpoints.uploader),
            ERROR_HANDLER_URL => text(&self.endpoints.error_handler),
            LOGGER_URL => text(&self.endpoints.logger),
            BUCKET => text(&self.bucket),
            OUTPUT_DIR => text(&self.output_dir),
            POLL_INTERVAL_SECONDS => self.polling.interval_seconds.map(|v| v.to_string()),
            MAX_WAIT_SECONDS => self.polling.max_wait_seconds.map(|v| v.to_string()),
            TRANSPORT_RETRIES => self.polling.transport_retries.map(|v| v.to_string()),
            _ => None,
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Builds a [`PipelineConfig`] from an optional file and the environment.
///
/// Values resolve environment first, then file, then built-in default. Empty
/// environment values count as unset.
///
/// # Example
/// ```
/// use newsreel::config::{ConfigLoader, ExecutionMode};
///
/// let config = ConfigLoader::new()
///     .with_env(|key| (key == "BUCKET").then(|| "media".to_string()))
///     .load(ExecutionMode::Local)
///     .unwrap();
///
/// assert_eq!(config.bucket, "media");
/// assert_eq!(config.env, "dev");
/// ```
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env: EnvLookup,
    env_name: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader reading the process environment.
    pub fn new() -> Self {
        Self {
            file: None,
            env: Box::new(|key| std::env::var(key).ok()),
            env_name: None,
        }
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Replace the environment with a lookup function.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    /// Environment name passed to the workflow; wins over the file's `env`.
    pub fn with_env_name(mut self, env_name: impl Into<String>) -> Self {
        self.env_name = Some(env_name.into());
        self
    }

    pub fn load(&self, mode: ExecutionMode) -> Result<PipelineConfig, ConfigError> {
        let file = match &self.file {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };

        let resolve = |key: &str| -> Option<String> {
            (self.env)(key)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| file.value(key))
        };

        validate_required(mode, |key| resolve(key).is_some())?;

        let env = self
            .env_name
            .clone()
            .or_else(|| file.env.clone())
            .unwrap_or_else(|| DEFAULT_ENV.to_string());

        let executor = resolve(EXECUTOR_URL).map(|url| ExecutorEndpoint {
            url: url.trim_end_matches('/').to_string(),
            token: resolve(EXECUTOR_TOKEN),
        });

        let project_id = resolve(PROJECT_ID);
        let region = resolve(REGION);
        let workflow = match (&project_id, &region, resolve(WORKFLOW_NAME)) {
            (Some(project_id), Some(region), Some(name)) => Some(WorkflowTarget {
                project_id: project_id.clone(),
                region: region.clone(),
                name,
            }),
            _ => None,
        };

        let endpoints = StageEndpoints {
            scriptwriter: resolve(SCRIPTWRITER_URL),
            media_sourcing: resolve(MEDIA_SOURCING_URL),
            narrator: resolve(NARRATOR_URL),
            video_assembly: resolve(ASSEMBLY_URL),
            uploader: resolve(UPLOADER_URL),
            error_handler: resolve(ERROR_HANDLER_URL),
            logger: resolve(LOGGER_URL),
        };

        let defaults = PollingOptions::default();
        let polling = PollingOptions {
            interval: match resolve(POLL_INTERVAL_SECONDS) {
                Some(raw) => Duration::from_secs(parse_positive(POLL_INTERVAL_SECONDS, &raw)?),
                None => defaults.interval,
            },
            max_wait: resolve(MAX_WAIT_SECONDS)
                .map(|raw| parse_positive(MAX_WAIT_SECONDS, &raw).map(Duration::from_secs))
                .transpose()?,
            transport_retries: match resolve(TRANSPORT_RETRIES) {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    name: TRANSPORT_RETRIES.to_string(),
                    message: format!("'{}' is not a non-negative integer", raw),
                })?,
                None => defaults.transport_retries,
            },
        };

        let config = PipelineConfig {
            mode,
            env,
            executor,
            workflow,
            project_id,
            region,
            endpoints,
            bucket: resolve(BUCKET).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            output_dir: PathBuf::from(
                resolve(OUTPUT_DIR).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            polling,
        };

        let file_name = self.file.as_ref().map(|path| path.display().to_string());
        ConfigurationLoaded {
            mode: mode.as_str(),
            env: &config.env,
            file: file_name.as_deref(),
        }
        .log();

        Ok(config)
    }
}

fn parse_positive(name: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::Invalid {
            name: name.to_string(),
            message: format!("'{}' is not a positive number of seconds", raw),
        }),
    }
}
