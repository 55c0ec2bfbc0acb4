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

//! The file-reader contract used by asset loaders.

use std::io;

/// A read-only store of asset files addressed by canonical path.
///
/// Implementations decide where bytes come from (a directory on disk, an
/// in-memory table, an archive). The asset manager only ever calls
/// [`resolve`](AssetSource::resolve) with user input and then uses the
/// returned canonical form for everything else.
pub trait AssetSource: Send + Sync {
    /// Maps a user-supplied path to its canonical form if it names a
    /// loadable resource, or `None` if it is malformed or missing.
    fn resolve(&self, path: &str) -> Option<String>;

    /// Reads the full contents of a canonical path.
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;

    /// Reads a canonical path as UTF-8 text.
    fn read_to_string(&self, path: &str) -> io::Result<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Normalizes a relative asset path into canonical form.
///
/// Backslashes become forward slashes, empty and `.` segments are dropped and
/// `..` pops the previous segment. Returns `None` for paths that are empty
/// after normalization, contain a NUL byte, or climb above the root.
pub fn normalize_path(path: &str) -> Option<String> {
    if path.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.trim().split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}
