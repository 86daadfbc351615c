// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Which configuration keys each execution mode cannot run without.

use crate::config::consts::*;
use crate::config::ExecutionMode;
use crate::errors::ConfigError;
use crate::observability::messages::config::ConfigurationMissing;
use crate::observability::messages::StructuredLog;

const STAGE_URLS: [&str; 5] = [
    SCRIPTWRITER_URL,
    MEDIA_SOURCING_URL,
    NARRATOR_URL,
    ASSEMBLY_URL,
    UPLOADER_URL,
];

/// Required keys for `mode`, in reporting order.
pub fn required_keys(mode: ExecutionMode) -> Vec<&'static str> {
    match mode {
        ExecutionMode::Workflow => {
            let mut keys = vec![EXECUTOR_URL, PROJECT_ID, REGION, WORKFLOW_NAME];
            keys.extend(STAGE_URLS);
            keys.extend([ERROR_HANDLER_URL, LOGGER_URL]);
            keys
        }
        ExecutionMode::Staged => {
            let mut keys = vec![EXECUTOR_URL];
            keys.extend(STAGE_URLS);
            keys
        }
        ExecutionMode::Http => STAGE_URLS.to_vec(),
        ExecutionMode::Local => Vec::new(),
    }
}

/// Check every required key at once so the operator sees the full list.
pub fn validate_required<F>(mode: ExecutionMode, mut is_set: F) -> Result<(), ConfigError>
where
    F: FnMut(&str) -> bool,
{
    let names: Vec<String> = required_keys(mode)
        .into_iter()
        .filter(|key| !is_set(key))
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Ok(());
    }

    ConfigurationMissing {
        mode: mode.as_str(),
        names: &names,
    }
    .log();
    Err(ConfigError::Missing { names })
}
