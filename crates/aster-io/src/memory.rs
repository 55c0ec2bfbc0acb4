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

use ahash::AHashMap;
use aster_core::source::{normalize_path, AssetSource};
use parking_lot::RwLock;
use std::io;
use std::sync::Arc;

/// An in-memory table of asset files.
///
/// Useful for engine built-ins compiled into the binary and for tests.
/// Files can be added while the source is shared.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: RwLock<AHashMap<String, Arc<[u8]>>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file. Returns `false` if `path` is malformed.
    pub fn insert(&self, path: &str, contents: impl Into<Vec<u8>>) -> bool {
        let Some(canonical) = normalize_path(path) else {
            log::warn!("Refusing to store a file under malformed path '{path}'.");
            return false;
        };
        let bytes: Vec<u8> = contents.into();
        let contents: Arc<[u8]> = bytes.into();
        self.files.write().insert(canonical, contents);
        true
    }

    /// Builder-style [`insert`](MemorySource::insert).
    #[must_use]
    pub fn with_file(self, path: &str, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Removes a file, returning `true` if it existed.
    pub fn remove(&self, path: &str) -> bool {
        normalize_path(path)
            .map(|canonical| self.files.write().remove(&canonical).is_some())
            .unwrap_or(false)
    }

    /// Number of stored files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    /// Returns `true` if no file is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl AssetSource for MemorySource {
    fn resolve(&self, path: &str) -> Option<String> {
        let canonical = normalize_path(path)?;
        self.files.read().contains_key(&canonical).then_some(canonical)
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let canonical = normalize_path(path).unwrap_or_default();
        self.files
            .read()
            .get(&canonical)
            .map(|bytes| bytes.to_vec())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no file '{path}'")))
    }
}
