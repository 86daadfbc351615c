// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::errors::ClientError;
use crate::pipeline::{StageInput, StageName, StageResponse};

/// A single pipeline stage collaborator.
///
/// Stage-level failures are reported as `Outcome::Error` inside the response;
/// `Err` is reserved for transport and protocol faults.
#[async_trait]
pub trait Stage: Send + Sync {
    async fn invoke(&self, input: StageInput) -> Result<StageResponse, ClientError>;

    fn name(&self) -> StageName;
}
