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

use crate::{Asset, AssetSlot};
use aster_core::{AssetId, HandleCategory, HandleValidator, RefController};
use std::any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

/// A counted reference to a managed asset.
///
/// Handles do not own the asset; the manager does. Each live handle keeps
/// the asset's reference count up, and dropping the last one schedules an
/// unload. Access goes through [`get`](Handle::get), which checks the handle
/// is non-null and that the asset is still alive according to the
/// [`HandleValidator`] before handing anything out.
///
/// A handle may outlive its asset (for instance after
/// [`AssetManager::unload_all_assets`](crate::AssetManager::unload_all_assets)).
/// It then reports itself invalid and yields nothing.
pub struct Handle<T: Asset> {
    slot: Weak<AssetSlot<T>>,
    id: AssetId,
    refs: Option<Arc<RefController>>,
}

impl<T: Asset> Handle<T> {
    /// A handle that refers to nothing.
    pub fn null() -> Self {
        Self {
            slot: Weak::new(),
            id: AssetId::NULL,
            refs: None,
        }
    }

    /// Wraps a slot. The caller has already counted this handle in `refs`.
    pub(crate) fn from_parts(slot: &Arc<AssetSlot<T>>, refs: Arc<RefController>) -> Self {
        Self {
            slot: Arc::downgrade(slot),
            id: slot.id(),
            refs: Some(refs),
        }
    }

    /// Id of the referenced asset, [`AssetId::NULL`] for a null handle.
    #[must_use]
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// `true` for handles that never referred to anything.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.id.is_null()
    }

    /// `true` while the referenced asset is alive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.is_null() && HandleValidator::global().validate(HandleCategory::Asset, self.id.raw())
    }

    /// Checked access to the asset's slot.
    ///
    /// Logs an error and returns `None` if the handle is null or the asset
    /// has been destroyed. The returned `Arc` keeps the slot alive while the
    /// caller uses it.
    pub fn get(&self) -> Option<Arc<AssetSlot<T>>> {
        if self.is_null() {
            log::error!("Dereferenced a null {} handle.", any::type_name::<T>());
            return None;
        }
        if !self.is_valid() {
            log::error!(
                "Dereferenced {} handle {} whose asset is no longer alive.",
                any::type_name::<T>(),
                self.id
            );
            return None;
        }
        self.slot.upgrade()
    }

    /// Runs `f` on the loaded value. `None` unless the asset is alive and
    /// [`Ready`](crate::LoadState::Ready).
    ///
    /// Unlike [`get`](Handle::get) this does not log: a null or dead handle
    /// is the expected case for callers that substitute a fallback.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let slot = self.live_slot()?;
        let value = slot.get()?;
        Some(f(value))
    }

    /// `true` if the asset is alive and loaded successfully.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.live_slot().is_some_and(|slot| slot.is_ok())
    }

    /// `true` if the asset is alive and done loading.
    #[must_use]
    pub fn is_load_finished(&self) -> bool {
        self.live_slot().is_some_and(|slot| slot.is_load_finished())
    }

    /// Blocks until the asset is done loading. Returns at once for null or
    /// dead handles.
    pub fn wait_ready(&self) {
        if let Some(slot) = self.live_slot() {
            slot.wait_ready();
        }
    }

    /// Number of strong handles sharing this asset, plus the registry's pin
    /// for persistent assets. Zero for null handles.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        self.refs.as_ref().map_or(0, |refs| refs.count())
    }

    /// Silent variant of `get` used by the status queries.
    fn live_slot(&self) -> Option<Arc<AssetSlot<T>>> {
        if self.is_valid() {
            self.slot.upgrade()
        } else {
            None
        }
    }
}

impl<T: Asset> Clone for Handle<T> {
    fn clone(&self) -> Self {
        if let Some(refs) = &self.refs {
            refs.retain();
        }
        Self {
            slot: self.slot.clone(),
            id: self.id,
            refs: self.refs.clone(),
        }
    }
}

impl<T: Asset> Drop for Handle<T> {
    fn drop(&mut self) {
        if let Some(refs) = self.refs.take() {
            refs.release();
        }
    }
}

impl<T: Asset> Default for Handle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: Asset> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: Asset> Eq for Handle<T> {}

impl<T: Asset> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: Asset> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("type", &any::type_name::<T>())
            .field("id", &self.id)
            .field("refs", &self.ref_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetError, LoadContext};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Marker;

    impl Asset for Marker {
        type Settings = ();

        fn init(_ctx: &LoadContext<'_>, _settings: ()) -> Result<Self, AssetError> {
            Ok(Marker)
        }
    }

    fn slot() -> Arc<AssetSlot<Marker>> {
        Arc::new(AssetSlot::new(
            AssetId::next(),
            "marker".to_owned(),
            false,
            (),
            Weak::new(),
        ))
    }

    #[test]
    fn test_null_handle() {
        let handle = Handle::<Marker>::null();
        assert!(handle.is_null());
        assert!(!handle.is_valid());
        assert!(handle.get().is_none());
        assert_eq!(handle.ref_count(), 0);
        assert!(!handle.is_ok());
        handle.wait_ready();
        assert_eq!(handle, Handle::default());
    }

    #[test]
    fn test_clone_and_drop_adjust_count() {
        let zeroed = Arc::new(AtomicUsize::new(0));
        let zeroed_clone = Arc::clone(&zeroed);
        let refs = Arc::new(RefController::new(move || {
            zeroed_clone.fetch_add(1, Ordering::SeqCst);
        }));
        let slot = slot();

        let first = Handle::from_parts(&slot, refs);
        let second = first.clone();
        assert_eq!(first.ref_count(), 2);
        assert_eq!(first, second);

        drop(first);
        assert_eq!(second.ref_count(), 1);
        assert_eq!(zeroed.load(Ordering::SeqCst), 0);

        drop(second);
        assert_eq!(zeroed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_with_value_on_null_handle_is_none() {
        let handle = Handle::<Marker>::null();
        assert!(handle.with_value(|_| ()).is_none());
    }

    #[test]
    fn test_handle_outliving_its_slot_is_invalid() {
        let refs = Arc::new(RefController::new(|| {}));
        let slot = slot();
        let handle = Handle::from_parts(&slot, refs);
        assert!(handle.is_valid());
        assert!(handle.get().is_some());

        drop(slot);
        assert!(!handle.is_null());
        assert!(!handle.is_valid());
        assert!(handle.get().is_none());
        assert!(handle.with_value(|_| ()).is_none());
    }
}
