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

//! # Aster Core
//!
//! Foundational crate containing identifiers, the handle liveness oracle and
//! the interface contracts (file sources, task executors) that the rest of
//! the asset stack is built against.

#![warn(missing_docs)]

pub mod asset;
pub mod handle;
pub mod source;
pub mod task;

pub use asset::{AssetId, PathFingerprint, RefController};
pub use handle::{HandleCategory, HandleValidator, Registration};
pub use source::{normalize_path, AssetSource};
pub use task::{Job, TaskExecutor};
