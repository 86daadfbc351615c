// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod composite;
pub mod direct;
pub mod poller;
pub mod sequencer;
pub mod workflow;

pub use composite::CompositeWorkflow;
pub use direct::DirectExecutor;
pub use poller::{Completion, Poller};
pub use sequencer::{Pipeline, RunConstants};
pub use workflow::WorkflowExecutor;
