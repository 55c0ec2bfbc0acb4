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

//! The per-asset container tracking load progress.

use crate::manager::Shared;
use crate::{Asset, AssetError, LoadContext};
use aster_core::{AssetId, HandleCategory, HandleValidator, Registration};
use aster_tasks::panic_message;
use parking_lot::{Condvar, Mutex};
use std::any::{self, Any};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock, Weak};
use std::time::{Duration, Instant};

/// Where an asset is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Created and registered, `init` not started.
    Instantiated,
    /// Handed to a worker (or running inline).
    Loading,
    /// `init` succeeded; the value is available.
    Ready,
    /// `init` failed, panicked, or was abandoned.
    Failed,
}

impl LoadState {
    /// `true` for [`Ready`](LoadState::Ready) and [`Failed`](LoadState::Failed).
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, LoadState::Ready | LoadState::Failed)
    }
}

struct Status {
    state: LoadState,
    error: Option<String>,
}

/// State transitions plus the condition waiters sleep on.
///
/// The finished flag is only ever written under the mutex and every write
/// notifies, so a waiter that checks then sleeps cannot miss it.
struct Lifecycle {
    status: Mutex<Status>,
    finished: Condvar,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            status: Mutex::new(Status {
                state: LoadState::Instantiated,
                error: None,
            }),
            finished: Condvar::new(),
        }
    }

    fn state(&self) -> LoadState {
        self.status.lock().state
    }

    fn begin(&self) {
        let mut status = self.status.lock();
        if status.state == LoadState::Instantiated {
            status.state = LoadState::Loading;
        }
    }

    fn finish(&self, state: LoadState, error: Option<String>) {
        debug_assert!(state.is_finished());
        let mut status = self.status.lock();
        status.state = state;
        status.error = error;
        self.finished.notify_all();
    }

    fn wait(&self) {
        let mut status = self.status.lock();
        while !status.state.is_finished() {
            self.finished.wait(&mut status);
        }
    }

    fn wait_until(&self, deadline: Instant) -> bool {
        let mut status = self.status.lock();
        while !status.state.is_finished() {
            if self.finished.wait_until(&mut status, deadline).timed_out() {
                return status.state.is_finished();
            }
        }
        true
    }
}

struct PendingInit<T: Asset> {
    settings: T::Settings,
    manager: Weak<Shared>,
}

/// One loaded (or loading) asset and its lifecycle.
///
/// A slot is created by the manager, registered with the
/// [`HandleValidator`] for exactly as long as it exists, and owned by the
/// registry. Handles reach it through [`Handle::get`](crate::Handle::get).
pub struct AssetSlot<T: Asset> {
    // Declared first so the id is invalidated before the value is dropped.
    registration: Registration,
    id: AssetId,
    path: String,
    persistent: bool,
    lifecycle: Lifecycle,
    value: OnceLock<T>,
    pending: Mutex<Option<PendingInit<T>>>,
}

impl<T: Asset> AssetSlot<T> {
    pub(crate) fn new(
        id: AssetId,
        path: String,
        persistent: bool,
        settings: T::Settings,
        manager: Weak<Shared>,
    ) -> Self {
        Self {
            registration: HandleValidator::global().register(HandleCategory::Asset, id.raw()),
            id,
            path,
            persistent,
            lifecycle: Lifecycle::new(),
            value: OnceLock::new(),
            pending: Mutex::new(Some(PendingInit { settings, manager })),
        }
    }

    /// The asset's id.
    #[must_use]
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Canonical path the asset was loaded from.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the asset survives its reference count reaching zero.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.lifecycle.state()
    }

    /// `true` once `init` has succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.state() == LoadState::Ready
    }

    /// `true` once loading has ended, successfully or not.
    #[must_use]
    pub fn is_load_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// Why loading failed, if it did.
    #[must_use]
    pub fn load_error(&self) -> Option<String> {
        self.lifecycle.status.lock().error.clone()
    }

    /// The loaded value. `None` until the asset is [`Ready`](LoadState::Ready),
    /// and forever if it failed.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Blocks until loading has finished.
    ///
    /// On a worker thread of the owning manager, a load that no worker has
    /// picked up yet is run inline first, so an asset waiting for its
    /// dependencies cannot starve the pool.
    pub fn wait_ready(&self) {
        self.help_if_worker();
        self.lifecycle.wait();
    }

    /// Like [`wait_ready`](AssetSlot::wait_ready) with an upper bound.
    /// Returns whether loading finished in time.
    pub fn wait_ready_timeout(&self, timeout: Duration) -> bool {
        self.help_if_worker();
        self.lifecycle.wait_until(Instant::now() + timeout)
    }

    pub(crate) fn mark_loading(&self) {
        self.lifecycle.begin();
    }

    /// Runs `init` if nobody has claimed it yet.
    pub(crate) fn run_init(&self) {
        let Some(pending) = self.pending.lock().take() else {
            return;
        };
        self.lifecycle.begin();

        let PendingInit { settings, manager } = pending;
        let Some(manager) = manager.upgrade() else {
            self.fail(AssetError::ManagerShutDown.to_string());
            return;
        };
        // May run inline inside another asset's `init` or on the caller of a
        // blocking load; a panic must not get past this frame.
        let ctx = LoadContext::new(&manager, self.id, &self.path);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| T::init(&ctx, settings)));

        match outcome {
            Err(payload) => {
                self.fail(format!("init panicked: {}", panic_message(payload.as_ref())));
            }
            Ok(Ok(value)) => {
                // `pending` is taken exactly once, so the cell is still empty.
                let _ = self.value.set(value);
                self.lifecycle.finish(LoadState::Ready, None);
            }
            Ok(Err(err)) => self.fail(err.to_string()),
        }
    }

    fn fail(&self, reason: String) {
        log::error!(
            "Failed to load {} at '{}' ({}): {}",
            any::type_name::<T>(),
            self.path,
            self.id,
            reason
        );
        self.lifecycle.finish(LoadState::Failed, Some(reason));
    }

    /// Fails the asset without running `init`, if `init` has not been
    /// claimed yet. Returns whether it did.
    pub(crate) fn abandon(&self, reason: &str) -> bool {
        let Some(pending) = self.pending.lock().take() else {
            return false;
        };
        drop(pending);
        log::debug!("Abandoned load of '{}' ({}): {}", self.path, self.id, reason);
        self.lifecycle
            .finish(LoadState::Failed, Some(reason.to_owned()));
        true
    }

    fn help_if_worker(&self) {
        let manager = match self.pending.lock().as_ref() {
            Some(pending) => pending.manager.upgrade(),
            None => return,
        };
        if manager.is_some_and(|m| m.is_worker_thread()) {
            self.run_init();
        }
    }
}

impl<T: Asset> fmt::Debug for AssetSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetSlot")
            .field("type", &any::type_name::<T>())
            .field("id", &self.id)
            .field("path", &self.path)
            .field("persistent", &self.persistent)
            .field("state", &self.state())
            .field("registered", &self.registration.id())
            .finish()
    }
}

/// Type-erased view of a slot, as stored by the registry.
pub(crate) trait ErasedSlot: Send + Sync + 'static {
    fn state(&self) -> LoadState;
    fn abandon(&self, reason: &str) -> bool;
    fn wait_ready(&self);
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Asset> ErasedSlot for AssetSlot<T> {
    fn state(&self) -> LoadState {
        AssetSlot::state(self)
    }

    fn abandon(&self, reason: &str) -> bool {
        AssetSlot::abandon(self, reason)
    }

    fn wait_ready(&self) {
        AssetSlot::wait_ready(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A queued `init`. If the executor drops it without running it (because it
/// shut down), the asset is abandoned so no waiter blocks forever.
pub(crate) struct InitJob<T: Asset>(pub(crate) Arc<AssetSlot<T>>);

impl<T: Asset> InitJob<T> {
    pub(crate) fn run(self) {
        self.0.run_init();
    }
}

impl<T: Asset> Drop for InitJob<T> {
    fn drop(&mut self) {
        self.0.abandon("the load task was dropped before it ran");
    }
}
