// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod client;
mod config;
mod pipeline;

pub use client::ClientError;
pub use config::ConfigError;
pub use pipeline::{PipelineError, RunFailure};
