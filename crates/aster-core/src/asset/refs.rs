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

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

type ZeroCallback = Box<dyn FnOnce() + Send + 'static>;

/// A shared reference counter with a one-shot callback on the zero crossing.
///
/// Every live strong handle to an asset accounts for one reference. When the
/// last one is released the callback runs exactly once, on the releasing
/// thread. A counter that has reached zero is dead: [`try_retain`] refuses to
/// revive it, which lets a registry detect an entry whose unload is already
/// under way.
///
/// [`try_retain`]: RefController::try_retain
pub struct RefController {
    count: AtomicUsize,
    on_zero: Mutex<Option<ZeroCallback>>,
}

impl RefController {
    /// Creates a controller holding one reference, owned by the caller.
    pub fn new(on_zero: impl FnOnce() + Send + 'static) -> Self {
        Self {
            count: AtomicUsize::new(1),
            on_zero: Mutex::new(Some(Box::new(on_zero))),
        }
    }

    /// Current number of references.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Returns `true` once the count has reached zero.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.count() == 0
    }

    /// Adds a reference on behalf of a caller that already holds one.
    pub fn retain(&self) {
        let previous = self.count.fetch_add(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "retain() on a released RefController");
    }

    /// Adds a reference unless the count already dropped to zero.
    pub fn try_retain(&self) -> bool {
        let mut current = self.count.load(Ordering::Acquire);
        loop {
            if current == 0 {
                return false;
            }
            match self.count.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
    }

    /// Drops one reference.
    ///
    /// Returns `true` if this call performed the zero crossing and ran the
    /// callback. Releasing an already-released controller is ignored.
    pub fn release(&self) -> bool {
        let mut current = self.count.load(Ordering::Acquire);
        loop {
            if current == 0 {
                log::debug!("release() on a RefController that is already at zero");
                return false;
            }
            match self.count.compare_exchange_weak(
                current,
                current - 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break,
                Err(observed) => current = observed,
            }
        }

        if current != 1 {
            return false;
        }

        // Only the thread that moved the count from one to zero gets here.
        let callback = self.on_zero.lock().take();
        match callback {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for RefController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefController")
            .field("count", &self.count())
            .finish()
    }
}
