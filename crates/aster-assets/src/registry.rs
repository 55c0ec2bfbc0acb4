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

//! Bookkeeping of every asset the manager currently owns.

use crate::slot::ErasedSlot;
use crate::{Asset, AssetSlot, AssetTypeTag};
use ahash::AHashMap;
use aster_core::{AssetId, PathFingerprint, RefController};
use std::sync::Arc;

/// One registered asset.
pub(crate) struct RegistryEntry {
    pub(crate) id: AssetId,
    pub(crate) fingerprint: PathFingerprint,
    pub(crate) path: String,
    pub(crate) type_tag: AssetTypeTag,
    pub(crate) persistent: bool,
    pub(crate) slot: Arc<dyn ErasedSlot>,
    pub(crate) refs: Arc<RefController>,
}

impl RegistryEntry {
    pub(crate) fn new<T: Asset>(
        fingerprint: PathFingerprint,
        slot: Arc<AssetSlot<T>>,
        refs: Arc<RefController>,
    ) -> Self {
        Self {
            id: slot.id(),
            fingerprint,
            path: slot.path().to_owned(),
            type_tag: AssetTypeTag::of::<T>(),
            persistent: slot.is_persistent(),
            slot,
            refs,
        }
    }

    /// The slot as `AssetSlot<T>`, if the entry holds a `T`.
    pub(crate) fn downcast<T: Asset>(&self) -> Option<Arc<AssetSlot<T>>> {
        if self.type_tag != AssetTypeTag::of::<T>() {
            return None;
        }
        Arc::clone(&self.slot)
            .into_any()
            .downcast::<AssetSlot<T>>()
            .ok()
    }
}

/// Registered assets, bucketed by path fingerprint.
///
/// Not synchronized; the manager keeps it behind one lock so that checking
/// for an existing entry and inserting a new one is a single critical
/// section.
#[derive(Default)]
pub(crate) struct Registry {
    buckets: AHashMap<PathFingerprint, Vec<RegistryEntry>>,
    by_id: AHashMap<AssetId, PathFingerprint>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The entry for `path`. The fingerprint only narrows the search; the
    /// full path decides.
    pub(crate) fn find(&self, fingerprint: PathFingerprint, path: &str) -> Option<&RegistryEntry> {
        self.buckets
            .get(&fingerprint)?
            .iter()
            .find(|entry| entry.path == path)
    }

    pub(crate) fn insert(&mut self, entry: RegistryEntry) {
        let bucket = self.buckets.entry(entry.fingerprint).or_default();
        if !bucket.is_empty() {
            log::warn!(
                "Path fingerprint collision between '{}' and {} other asset(s).",
                entry.path,
                bucket.len()
            );
        }
        self.by_id.insert(entry.id, entry.fingerprint);
        bucket.push(entry);
    }

    pub(crate) fn remove(&mut self, id: AssetId) -> Option<RegistryEntry> {
        let fingerprint = self.by_id.remove(&id)?;
        let bucket = self.buckets.get_mut(&fingerprint)?;
        let position = bucket.iter().position(|entry| entry.id == id)?;
        let entry = bucket.swap_remove(position);
        if bucket.is_empty() {
            self.buckets.remove(&fingerprint);
        }
        Some(entry)
    }

    /// Removes and returns every entry.
    pub(crate) fn drain(&mut self) -> Vec<RegistryEntry> {
        self.by_id.clear();
        self.buckets.drain().flat_map(|(_, bucket)| bucket).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }
}
