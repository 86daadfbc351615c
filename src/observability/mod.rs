// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types live under [`messages`] and are grouped by subsystem. Logs go
//! to stderr so stdout stays reserved for the machine-readable run report.

use tracing_subscriber::EnvFilter;

pub mod messages;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` controls filtering and defaults to `info`. Calling this twice is
/// harmless; the second install is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
