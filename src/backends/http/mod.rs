// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! HTTP-backed collaborators: a workflow executor client and a direct stage
//! caller, both built on a shared `reqwest::Client`.

mod client;
mod stage;
mod wire;

pub use client::HttpWorkflowClient;
pub use stage::HttpStage;
