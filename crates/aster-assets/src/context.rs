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

use crate::manager::Shared;
use crate::{Asset, AssetError, Handle, LoadOptions};
use aster_core::AssetId;
use std::sync::Arc;

/// Everything an [`Asset::init`] may touch.
///
/// Gives access to the file source and to the manager, so an asset can pull
/// in the assets it depends on. Dependencies requested here are ordinary
/// loads: they are deduplicated and reference counted like any other.
/// Waiting on one from inside `init` is safe even on a single-threaded pool.
pub struct LoadContext<'a> {
    manager: &'a Arc<Shared>,
    id: AssetId,
    path: &'a str,
}

impl<'a> LoadContext<'a> {
    pub(crate) fn new(manager: &'a Arc<Shared>, id: AssetId, path: &'a str) -> Self {
        Self { manager, id, path }
    }

    /// Id of the asset being loaded.
    #[must_use]
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Canonical path of the asset being loaded.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path
    }

    /// Reads the asset's own file.
    pub fn read(&self) -> Result<Vec<u8>, AssetError> {
        self.read_path(self.path)
    }

    /// Reads the asset's own file as UTF-8.
    pub fn read_string(&self) -> Result<String, AssetError> {
        let bytes = self.read()?;
        String::from_utf8(bytes).map_err(|e| AssetError::Decode {
            path: self.path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Reads any file from the source, for assets spread over several files.
    pub fn read_path(&self, path: &str) -> Result<Vec<u8>, AssetError> {
        let source = self.manager.source();
        let canonical = source.resolve(path).ok_or_else(|| AssetError::NotFound {
            path: path.to_owned(),
        })?;
        source
            .read(&canonical)
            .map_err(|source| AssetError::Io {
                path: canonical,
                source,
            })
    }

    /// Requests a dependency with default settings.
    pub fn load<U: Asset>(&self, path: &str) -> Handle<U>
    where
        U::Settings: Default,
    {
        self.manager
            .load_with(path, U::Settings::default(), LoadOptions::default())
    }

    /// Requests a dependency with explicit settings and options.
    pub fn load_with<U: Asset>(
        &self,
        path: &str,
        settings: U::Settings,
        options: LoadOptions,
    ) -> Handle<U> {
        self.manager.load_with(path, settings, options)
    }

    /// Looks up an already registered asset without loading it.
    pub fn find<U: Asset>(&self, path: &str) -> Handle<U> {
        self.manager.find(path)
    }
}
