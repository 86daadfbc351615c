// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Base URL of the remote workflow executor
pub const EXECUTOR_URL: &str = "EXECUTOR_URL";
/// Optional bearer token sent to the executor
pub const EXECUTOR_TOKEN: &str = "EXECUTOR_TOKEN";
pub const PROJECT_ID: &str = "PROJECT_ID";
pub const REGION: &str = "REGION";
pub const WORKFLOW_NAME: &str = "WORKFLOW_NAME";

pub const SCRIPTWRITER_URL: &str = "SCRIPTWRITER_URL";
pub const MEDIA_SOURCING_URL: &str = "MEDIA_SOURCING_URL";
pub const NARRATOR_URL: &str = "NARRATOR_URL";
pub const ASSEMBLY_URL: &str = "ASSEMBLY_URL";
pub const UPLOADER_URL: &str = "UPLOADER_URL";
pub const ERROR_HANDLER_URL: &str = "ERROR_HANDLER_URL";
pub const LOGGER_URL: &str = "LOGGER_URL";

pub const POLL_INTERVAL_SECONDS: &str = "POLL_INTERVAL_SECONDS";
pub const MAX_WAIT_SECONDS: &str = "MAX_WAIT_SECONDS";
pub const TRANSPORT_RETRIES: &str = "TRANSPORT_RETRIES";
pub const BUCKET: &str = "BUCKET";
pub const OUTPUT_DIR: &str = "OUTPUT_DIR";

/// Seconds between two refreshes of a running execution
pub const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 10;
/// Extra refresh attempts after a transport error (none)
pub const DEFAULT_TRANSPORT_RETRIES: u32 = 0;
pub const DEFAULT_BUCKET: &str = "local";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
pub const DEFAULT_ENV: &str = "dev";
