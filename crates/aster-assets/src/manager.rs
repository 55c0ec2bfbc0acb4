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

//! The asset manager: path-keyed deduplication, async loads and unloads.

use crate::registry::{Registry, RegistryEntry};
use crate::slot::InitJob;
use crate::{Asset, AssetManagerConfig, AssetSlot, Handle};
use anyhow::{Context, Result};
use aster_core::{normalize_path, AssetId, AssetSource, PathFingerprint, RefController, TaskExecutor};
use aster_tasks::WorkerPool;
use parking_lot::Mutex;
use std::any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::ThreadId;

/// How a load is performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Keep the asset loaded after its last handle is dropped. Persistent
    /// assets are only released by an explicit unload or at shutdown, after
    /// every non-persistent asset.
    pub persistent: bool,
    /// Run `init` on the calling thread and return once it has finished.
    pub blocking: bool,
}

impl LoadOptions {
    /// Options for a persistent, asynchronous load.
    #[must_use]
    pub fn persistent() -> Self {
        Self {
            persistent: true,
            blocking: false,
        }
    }

    /// Options for a non-persistent, blocking load.
    #[must_use]
    pub fn blocking() -> Self {
        Self {
            persistent: false,
            blocking: true,
        }
    }

    /// Sets [`persistent`](LoadOptions::persistent).
    #[must_use]
    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Sets [`blocking`](LoadOptions::blocking).
    #[must_use]
    pub fn with_blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }
}

/// State shared by the manager, the unload callbacks of every handle and
/// the load contexts.
pub(crate) struct Shared {
    config: AssetManagerConfig,
    source: Arc<dyn AssetSource>,
    executor: Arc<dyn TaskExecutor>,
    registry: Mutex<Registry>,
    accepting: AtomicBool,
}

impl Shared {
    pub(crate) fn source(&self) -> &dyn AssetSource {
        self.source.as_ref()
    }

    pub(crate) fn is_worker_thread(&self) -> bool {
        self.executor.is_worker_thread()
    }

    pub(crate) fn load_with<T: Asset>(
        self: &Arc<Self>,
        path: &str,
        settings: T::Settings,
        options: LoadOptions,
    ) -> Handle<T> {
        if !self.accepting.load(Ordering::Acquire) {
            log::error!("Cannot load '{path}': the asset manager has shut down.");
            return Handle::null();
        }
        let Some(canonical) = self.source.resolve(path) else {
            log::error!(
                "Cannot load {} from '{}': the path does not resolve to a loadable resource.",
                any::type_name::<T>(),
                path
            );
            return Handle::null();
        };
        let fingerprint = PathFingerprint::of(&canonical);

        let mut stale = None;
        let (handle, slot) = {
            let mut registry = self.registry.lock();

            if let Some(entry) = registry.find(fingerprint, &canonical) {
                if entry.refs.is_released() {
                    // Last handle already gone and its unload not processed
                    // yet. That entry is finished whatever its type.
                    let stale_id = entry.id;
                    stale = registry.remove(stale_id);
                }
            }

            if let Some(entry) = registry.find(fingerprint, &canonical) {
                let Some(existing) = entry.downcast::<T>() else {
                    log::error!(
                        "'{}' is already loaded as {}, not as {}.",
                        canonical,
                        entry.type_tag.name(),
                        any::type_name::<T>()
                    );
                    return Handle::null();
                };
                if entry.refs.try_retain() {
                    let handle = Handle::from_parts(&existing, Arc::clone(&entry.refs));
                    drop(registry);
                    if options.blocking {
                        handle.wait_ready();
                    }
                    return handle;
                }
                // Released between the check above and now.
                let stale_id = entry.id;
                stale = registry.remove(stale_id);
            }

            let id = AssetId::next();
            if self.config.lifetime_logging {
                log::trace!("Loading {} '{}' ({}).", any::type_name::<T>(), canonical, id);
            }
            let slot = Arc::new(AssetSlot::<T>::new(
                id,
                canonical,
                options.persistent,
                settings,
                Arc::downgrade(self),
            ));
            let refs = Arc::new(RefController::new(self.unload_on_release(id)));
            if options.persistent {
                // The registry's pin.
                refs.retain();
            }
            let handle = Handle::from_parts(&slot, Arc::clone(&refs));
            registry.insert(RegistryEntry::new(fingerprint, Arc::clone(&slot), refs));
            (handle, slot)
        };

        if let Some(entry) = stale {
            self.schedule_teardown(entry);
        }

        if options.blocking {
            slot.run_init();
        } else {
            slot.mark_loading();
            let job = InitJob(slot);
            self.executor.execute(Box::new(move || job.run()));
        }
        handle
    }

    pub(crate) fn find<T: Asset>(&self, path: &str) -> Handle<T> {
        let Some(canonical) = self
            .source
            .resolve(path)
            .or_else(|| normalize_path(path))
        else {
            log::error!("Cannot find '{path}': malformed path.");
            return Handle::null();
        };
        let fingerprint = PathFingerprint::of(&canonical);

        let registry = self.registry.lock();
        let Some(entry) = registry.find(fingerprint, &canonical) else {
            return Handle::null();
        };
        let Some(slot) = entry.downcast::<T>() else {
            log::error!(
                "'{}' is loaded as {}, not as {}.",
                canonical,
                entry.type_tag.name(),
                any::type_name::<T>()
            );
            return Handle::null();
        };
        if !entry.refs.try_retain() {
            return Handle::null();
        }
        Handle::from_parts(&slot, Arc::clone(&entry.refs))
    }

    pub(crate) fn unload(&self, id: AssetId) {
        let entry = self.registry.lock().remove(id);
        match entry {
            Some(entry) => self.schedule_teardown(entry),
            None => log::trace!("Unload of {id} ignored: not registered."),
        }
    }

    fn unload_all(&self) {
        let entries = self.registry.lock().drain();
        if entries.is_empty() {
            return;
        }
        let (persistent, normal): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|entry| entry.persistent);
        log::info!(
            "Unloading {} assets ({} persistent).",
            normal.len() + persistent.len(),
            persistent.len()
        );

        // Normal assets may still read persistent ones while they are torn
        // down, so the persistent ones go last.
        for entry in normal {
            self.schedule_teardown(entry);
        }
        self.executor.wait_idle();
        for entry in persistent {
            self.schedule_teardown(entry);
        }
        self.executor.wait_idle();
    }

    /// Destroys an entry on the executor once its load (if any) is over.
    fn schedule_teardown(&self, entry: RegistryEntry) {
        if self.config.lifetime_logging {
            log::trace!("Unloading '{}' ({}).", entry.path, entry.id);
        }
        self.executor.execute(Box::new(move || {
            entry.slot.abandon("unloaded before loading started");
            entry.slot.wait_ready();
            drop(entry);
        }));
    }

    fn unload_on_release(self: &Arc<Self>, id: AssetId) -> impl FnOnce() + Send + 'static {
        let shared = Arc::downgrade(self);
        move || {
            if let Some(shared) = shared.upgrade() {
                shared.unload(id);
            }
        }
    }
}

/// Loads assets by path, shares them between requesters and unloads them
/// when nobody holds a handle any more.
///
/// All bookkeeping sits behind one registry lock, so concurrent loads of the
/// same path produce exactly one asset and one `init` run. Loads and
/// unloads run on a [`TaskExecutor`], by default an owned [`WorkerPool`].
///
/// Dropping the manager calls [`shutdown`](AssetManager::shutdown).
pub struct AssetManager {
    shared: Arc<Shared>,
    pool: Option<Arc<WorkerPool>>,
}

impl AssetManager {
    /// Creates a manager with its own worker pool.
    pub fn new(config: AssetManagerConfig, source: Arc<dyn AssetSource>) -> Result<Self> {
        let pool = WorkerPool::with_thread_name(&config.thread_name, config.worker_threads)
            .context("Failed to start the asset worker pool")?;
        let pool = Arc::new(pool);
        let executor: Arc<dyn TaskExecutor> = pool.clone();

        let mut manager = Self::with_executor(config, source, executor);
        manager.pool = Some(pool);
        Ok(manager)
    }

    /// Creates a manager running on a host-provided executor. The executor
    /// is not shut down with the manager.
    pub fn with_executor(
        config: AssetManagerConfig,
        source: Arc<dyn AssetSource>,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                source,
                executor,
                registry: Mutex::new(Registry::new()),
                accepting: AtomicBool::new(true),
            }),
            pool: None,
        }
    }

    /// Loads `path` asynchronously with default settings.
    ///
    /// Returns a null handle (and logs an error) if the path does not
    /// resolve, or if it is already loaded as a different type.
    pub fn load<T: Asset>(&self, path: &str) -> Handle<T>
    where
        T::Settings: Default,
    {
        self.load_with(path, T::Settings::default(), LoadOptions::default())
    }

    /// Loads `path` as a persistent asset with default settings.
    pub fn load_persistent<T: Asset>(&self, path: &str) -> Handle<T>
    where
        T::Settings: Default,
    {
        self.load_with(path, T::Settings::default(), LoadOptions::persistent())
    }

    /// Loads `path` with explicit settings and options.
    ///
    /// If the path is already registered, the existing asset is shared and
    /// `settings` is dropped unused.
    pub fn load_with<T: Asset>(
        &self,
        path: &str,
        settings: T::Settings,
        options: LoadOptions,
    ) -> Handle<T> {
        self.shared.load_with(path, settings, options)
    }

    /// A handle to `path` if it is registered as a `T`, or a null handle.
    pub fn find<T: Asset>(&self, path: &str) -> Handle<T> {
        self.shared.find(path)
    }

    /// Drops the registry's ownership of an asset and destroys it on the
    /// executor once any in-flight load has finished. Unknown ids, including
    /// already unloaded ones, are ignored.
    pub fn unload(&self, id: AssetId) {
        self.shared.unload(id);
    }

    /// Unloads every asset, non-persistent ones first, and waits for all of
    /// them to be destroyed. Must not be called from a loader thread.
    pub fn unload_all_assets(&self) {
        self.shared.unload_all();
    }

    /// Waits until every queued load and unload has run.
    pub fn wait_idle(&self) {
        self.shared.executor.wait_idle();
    }

    /// Number of registered assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shared.registry.lock().len()
    }

    /// `true` if no asset is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `path` is currently registered, as any type.
    #[must_use]
    pub fn is_loaded(&self, path: &str) -> bool {
        let Some(canonical) = self
            .shared
            .source
            .resolve(path)
            .or_else(|| normalize_path(path))
        else {
            return false;
        };
        self.shared
            .registry
            .lock()
            .find(PathFingerprint::of(&canonical), &canonical)
            .is_some()
    }

    /// Whether the caller runs on one of the loader threads.
    #[must_use]
    pub fn is_worker_thread(&self) -> bool {
        self.shared.is_worker_thread()
    }

    /// Ids of the loader threads of the owned pool. Empty when running on a
    /// host-provided executor.
    #[must_use]
    pub fn loading_thread_ids(&self) -> Vec<ThreadId> {
        self.pool
            .as_ref()
            .map(|pool| pool.thread_ids().to_vec())
            .unwrap_or_default()
    }

    /// The owned worker pool, if any.
    #[must_use]
    pub fn worker_pool(&self) -> Option<&WorkerPool> {
        self.pool.as_deref()
    }

    /// The configuration the manager was built with.
    #[must_use]
    pub fn config(&self) -> &AssetManagerConfig {
        &self.shared.config
    }

    /// Refuses further loads, unloads everything and stops the owned pool.
    /// Idempotent.
    pub fn shutdown(&self) {
        if !self.shared.accepting.swap(false, Ordering::SeqCst) {
            return;
        }
        log::info!("Shutting down the asset manager.");
        self.shared.unload_all();
        if let Some(pool) = &self.pool {
            pool.shutdown();
        }
    }
}

impl Drop for AssetManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
