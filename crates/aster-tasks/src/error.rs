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

use thiserror::Error;

/// Why a submitted task did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The task panicked. Holds the panic message when it was a string.
    #[error("task panicked: {0}")]
    Panicked(String),
    /// The task was dropped without running, because the pool shut down.
    #[error("task was dropped before it ran")]
    Cancelled,
}

/// Errors raised while building a [`WorkerPool`](crate::WorkerPool).
#[derive(Debug, Error)]
pub enum PoolError {
    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker thread {index}")]
    Spawn {
        /// Index of the worker that failed to start.
        index: usize,
        /// The underlying OS error.
        #[source]
        source: std::io::Error,
    },
}
