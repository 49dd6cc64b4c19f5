// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Observable state of a [`crate::TaskQueue`].

/// Where the queue stands in its `Idle → Running → Draining` cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueStatus {
    /// Nothing is running or waiting.
    Idle,
    /// Exactly one unit of work is in flight.
    Running,
    /// One unit is in flight and more are waiting behind it.
    Draining,
}

impl QueueStatus {
    pub(crate) fn from_pending(pending: usize) -> Self {
        match pending {
            0 => QueueStatus::Idle,
            1 => QueueStatus::Running,
            _ => QueueStatus::Draining,
        }
    }
}

/// Counters describing the work a queue has seen so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    /// Units of work accepted by `submit`.
    pub submitted: u64,
    /// Units of work that ran to completion, successfully or not.
    pub completed: u64,
    /// Completed units whose result was an error.
    pub failed: u64,
    /// Units submitted but not completed yet, including the running one.
    pub pending: usize,
    /// Panics raised while delivering a completion on the worker thread that
    /// have not been collected yet.
    pub unobserved: usize,
}
