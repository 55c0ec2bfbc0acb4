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

/// Reasons an asset failed to initialize.
///
/// These never escape a load call: the manager logs them and leaves the
/// asset in the failed state, where [`AssetSlot::load_error`] exposes the
/// message.
///
/// [`AssetSlot::load_error`]: crate::AssetSlot::load_error
#[derive(Debug, Error)]
pub enum AssetError {
    /// The path does not name a loadable resource.
    #[error("'{path}' does not resolve to a loadable resource")]
    NotFound {
        /// The path as given.
        path: String,
    },
    /// The source could not read the file.
    #[error("failed to read '{path}'")]
    Io {
        /// Canonical path that was read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bytes were read but are not a valid asset of the requested type.
    #[error("failed to decode '{path}': {reason}")]
    Decode {
        /// Canonical path of the asset.
        path: String,
        /// Human readable description of the problem.
        reason: String,
    },
    /// A dependency the asset needs failed to load.
    #[error("dependency '{path}' failed to load")]
    Dependency {
        /// Path of the failed dependency.
        path: String,
    },
    /// The manager was dropped before the load could run.
    #[error("the asset manager has shut down")]
    ManagerShutDown,
    /// Any other loader failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
