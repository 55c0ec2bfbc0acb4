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

use crate::TaskError;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// The eventual result of a task submitted to a [`WorkerPool`](crate::WorkerPool).
///
/// The result can be taken once. Dropping the handle detaches the task; it
/// still runs.
#[derive(Debug)]
pub struct TaskHandle<R> {
    receiver: Receiver<Result<R, TaskError>>,
}

impl<R> TaskHandle<R> {
    pub(crate) fn new(receiver: Receiver<Result<R, TaskError>>) -> Self {
        Self { receiver }
    }

    /// Blocks until the task finishes.
    pub fn wait(self) -> Result<R, TaskError> {
        self.receiver.recv().unwrap_or(Err(TaskError::Cancelled))
    }

    /// Blocks for at most `timeout`. Returns `None` if the task is still
    /// pending when it elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<R, TaskError>> {
        match self.receiver.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(TaskError::Cancelled)),
        }
    }

    /// Takes the result if the task has finished, without blocking.
    pub fn try_take(&self) -> Option<Result<R, TaskError>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(TaskError::Cancelled)),
        }
    }
}
