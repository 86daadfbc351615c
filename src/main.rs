// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use newsreel::config::{ConfigLoader, ExecutionMode, PipelineConfig, RuntimeBuilder};
use newsreel::errors::{ConfigError, PipelineError, RunFailure};
use newsreel::execution::ExecutionId;
use newsreel::pipeline::{RunId, RunRequest, RunStatus, TraceEntry};
use newsreel::signal::shutdown_signal;

/// Generate a narrated news video for a topic.
#[derive(Parser, Debug)]
#[command(name = "newsreel", version)]
struct Cli {
    /// Topic for the video
    #[arg(long)]
    topic: String,

    /// Environment name passed to the workflow [default: dev]
    #[arg(long)]
    env: Option<String>,

    /// Run identifier; a random one is generated when omitted
    #[arg(long)]
    run_id: Option<String>,

    /// Execution mode: workflow, staged, http or local
    #[arg(long, default_value = "workflow")]
    mode: ExecutionMode,

    /// YAML or TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Submit the workflow and exit without waiting (workflow mode only)
    #[arg(long)]
    no_wait: bool,
}

#[derive(Serialize)]
struct FailureSummary<'a> {
    run_id: &'a RunId,
    status: RunStatus,
    step: &'a str,
    error: String,
    trace: &'a [TraceEntry],
}

impl<'a> From<&'a RunFailure> for FailureSummary<'a> {
    fn from(failure: &'a RunFailure) -> Self {
        Self {
            run_id: &failure.run_id,
            status: failure.status(),
            step: &failure.step,
            error: failure.error.to_string(),
            trace: &failure.trace,
        }
    }
}

#[derive(Serialize)]
struct TriggerReceipt<'a> {
    run_id: &'a RunId,
    execution_id: &'a ExecutionId,
    state: String,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let body = serde_json::to_string_pretty(value).context("failed to serialize run report")?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", body).context("failed to write run report to stdout")?;
    Ok(())
}

fn exit_with(error: &PipelineError) -> ExitCode {
    eprintln!("error: {}", error);
    ExitCode::from(error.exit_code())
}

async fn trigger(config: &PipelineConfig, request: &RunRequest) -> ExitCode {
    if config.mode != ExecutionMode::Workflow {
        return exit_with(&PipelineError::Configuration(ConfigError::Invalid {
            name: "--no-wait".to_string(),
            message: format!("only supported in workflow mode, not {}", config.mode),
        }));
    }

    let composite = match RuntimeBuilder::workflow_client(config)
        .and_then(|client| RuntimeBuilder::composite(config, client))
    {
        Ok(composite) => composite,
        Err(e) => return exit_with(&e.into()),
    };

    match composite.trigger(request).await {
        Ok(execution) => {
            let receipt = TriggerReceipt {
                run_id: &request.run_id,
                execution_id: execution.id(),
                state: execution.state().to_string(),
            };
            match print_json(&receipt) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: {:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => exit_with(&e),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    newsreel::init_tracing();
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    if let Some(env) = &cli.env {
        loader = loader.with_env_name(env);
    }

    let config = match loader.load(cli.mode) {
        Ok(config) => config,
        Err(e) => return exit_with(&e.into()),
    };

    let run_id = match cli.run_id.as_deref().map(RunId::parse) {
        Some(Ok(run_id)) => run_id,
        Some(Err(e)) => return exit_with(&e.into()),
        None => RunId::generate(),
    };
    let request = RunRequest::new(cli.topic, run_id);

    if cli.no_wait {
        return trigger(&config, &request).await;
    }

    let runner = match RuntimeBuilder::from_config(&config) {
        Ok(runner) => runner,
        Err(e) => return exit_with(&e.into()),
    };

    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            cancel.cancel();
        })
    };

    let result = runner.run(request, &cancel).await;
    watcher.abort();

    match result {
        Ok(report) => match print_json(&report) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {:#}", e);
                ExitCode::FAILURE
            }
        },
        Err(failure) => {
            if let Err(e) = print_json(&FailureSummary::from(&failure)) {
                eprintln!("error: {:#}", e);
            }
            eprintln!("error: {}", failure);
            ExitCode::from(failure.error.exit_code())
        }
    }
}
