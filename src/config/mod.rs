// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod consts;
mod loader;
mod runtime;
mod stage_map;
pub mod validation;

pub use loader::{
    ConfigFile, ConfigLoader, ExecutionMode, ExecutorEndpoint, PipelineConfig, PollingOptions,
    StageEndpoints, WorkflowTarget,
};
pub use runtime::RuntimeBuilder;
pub use stage_map::StageMap;
