// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod executor;
pub mod stage;
pub mod workflow_client;

pub use executor::{PipelineRunner, StageExecutor, StageInvocation};
pub use stage::Stage;
pub use workflow_client::WorkflowClient;
