// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // stage collaborators and workflow clients
pub mod config;        // config loading + runtime assembly
pub mod engine;        // poller, sequencer, executors
pub mod errors;        // error handling
pub mod execution;     // remote job status model
pub mod observability;
pub mod pipeline;      // stage contract, plan, run reporting
pub mod signal;
pub mod traits;        // unified abstractions

pub use observability::init_tracing;
