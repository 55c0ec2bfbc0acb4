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

//! # Aster Tasks
//!
//! A fixed-size pool of worker threads draining one FIFO queue, used to run
//! asset loads and teardowns off the calling thread.

#![warn(missing_docs)]

mod error;
mod future;
mod pool;

pub use error::{PoolError, TaskError};
pub use future::TaskHandle;
pub use pool::{panic_message, WorkerPool};
