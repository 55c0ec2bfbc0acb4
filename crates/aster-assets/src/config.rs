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

//! Configuration of the asset manager.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for an [`AssetManager`](crate::AssetManager).
///
/// Missing fields fall back to their defaults when deserializing, so a
/// config file only needs to mention what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetManagerConfig {
    /// Number of loader threads. `0` uses one per hardware thread.
    pub worker_threads: usize,
    /// Prefix of the loader thread names.
    pub thread_name: String,
    /// Log every load and unload at trace level.
    pub lifetime_logging: bool,
}

impl Default for AssetManagerConfig {
    fn default() -> Self {
        Self {
            worker_threads: 0,
            thread_name: "asset-worker".to_owned(),
            lifetime_logging: true,
        }
    }
}

impl AssetManagerConfig {
    /// Parses a configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Reads a RON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read asset config '{}'", path.display()))?;
        Self::from_ron(&text)
            .with_context(|| format!("Failed to parse asset config '{}'", path.display()))
    }
}
