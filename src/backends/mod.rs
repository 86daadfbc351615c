// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stage collaborators and workflow executor clients.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process placeholder stages that write run-scoped artifacts to disk:
//! - **Scriptwriter**: three-line script per topic
//! - **Media sourcing**: one placeholder frame per sentence
//! - **Narrator**: silent WAV track
//! - **Video assembly**: assembly manifest over frames and narration
//! - **Uploader**: echo of the publishing receipt
//!
//! ## HTTP Backend
//! - **HttpWorkflowClient**: submit and poll executions on a remote executor
//! - **HttpStage**: call a deployed stage service directly
//!
//! ## Stub Backend (Test-Only)
//! Scripted workflow client and canned stages for engine tests. Not available
//! in production builds.
//!
//! # Architecture
//!
//! ```text
//! PipelineConfig → RuntimeBuilder → StageMap / WorkflowClient → Executor
//! ```

pub mod http;
pub mod local;
#[cfg(test)]
pub mod stub;
