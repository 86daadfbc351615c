// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shutdown signal handling for the CLI.

/// Resolves on Ctrl-C, or SIGTERM on Unix.
///
/// If the SIGTERM handler cannot be installed only Ctrl-C is watched.
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => Some(sigterm),
        Err(e) => {
            tracing::warn!(error = %e, "Unable to watch SIGTERM; only Ctrl-C will cancel the run");
            None
        }
    };

    let terminate = async {
        match sigterm.as_mut() {
            Some(sigterm) => {
                sigterm.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!(signal = "SIGINT", "Signal received, cancelling run");
        }
        _ = terminate => {
            tracing::info!(signal = "SIGTERM", "Signal received, cancelling run");
        }
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!(signal = "ctrl-c", "Signal received, cancelling run");
    }
}
