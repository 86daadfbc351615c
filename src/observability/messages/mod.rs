// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Every diagnostic line the pipeline emits is a struct implementing `Display`
//! plus [`StructuredLog`], which knows the level and the structured fields to
//! attach. Call sites never format log text inline. Messages that open a
//! scope (a run, a stage, a polled execution) also offer a `span` carrying
//! their identifying fields.
//!
//! # Organization
//!
//! * `engine` - run and stage lifecycle
//! * `polling` - submission, state observations, retries, timeouts
//! * `config` - configuration loading and validation
//! * `stage` - artifacts written by the local stage collaborators
//!
//! # Usage Pattern
//!
//! ```rust
//! use newsreel::observability::messages::engine::RunStarted;
//! use newsreel::observability::messages::StructuredLog;
//!
//! let msg = RunStarted {
//!     run_id: "4f1c",
//!     topic: "deep sea vents",
//!     runner: "sequenced",
//!     stage_count: 5,
//! };
//!
//! msg.log();
//! ```

pub mod config;
pub mod engine;
pub mod polling;
pub mod stage;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);
}
