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

//! The background execution contract the asset manager runs on.

/// A unit of work handed to an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Something that runs jobs on background threads.
///
/// The engine ships a worker pool implementing this, but a host application
/// may plug in its own scheduler. Implementations must run jobs in roughly
/// submission order and must never let a panicking job take a worker down.
pub trait TaskExecutor: Send + Sync {
    /// Queues a job. An executor that has shut down drops the job instead.
    fn execute(&self, job: Job);

    /// Blocks until every job queued so far has finished.
    ///
    /// Must not be called from one of the executor's own threads.
    fn wait_idle(&self);

    /// Returns `true` if the calling thread belongs to this executor.
    fn is_worker_thread(&self) -> bool;
}
