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

use aster_core::source::{normalize_path, AssetSource};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Serves assets from a directory on disk.
///
/// Canonical paths are relative to the root and always use forward slashes,
/// so `Textures\grass.png` and `./Textures/grass.png` name the same asset.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    /// Creates a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory assets are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, canonical: &str) -> PathBuf {
        canonical
            .split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }
}

impl AssetSource for FileSystemSource {
    fn resolve(&self, path: &str) -> Option<String> {
        let canonical = normalize_path(path)?;
        if self.full_path(&canonical).is_file() {
            Some(canonical)
        } else {
            log::debug!(
                "'{}' does not exist under '{}'.",
                canonical,
                self.root.display()
            );
            None
        }
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        let canonical = normalize_path(path).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("malformed path '{path}'"))
        })?;
        fs::read(self.full_path(&canonical))
    }
}
