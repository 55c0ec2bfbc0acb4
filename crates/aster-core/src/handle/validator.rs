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

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::LazyLock;

/// The families of handles tracked by a [`HandleValidator`].
///
/// Each category owns an independent id set, so ids only need to be unique
/// within their own family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleCategory {
    /// Handles to loaded assets.
    Asset,
    /// Handles to scenes.
    Scene,
    /// Handles to scene entities.
    Entity,
    /// Handles to components attached to entities.
    Component,
}

impl HandleCategory {
    /// Number of categories.
    pub const COUNT: usize = 4;

    /// Every category, in declaration order.
    pub const ALL: [HandleCategory; Self::COUNT] = [
        HandleCategory::Asset,
        HandleCategory::Scene,
        HandleCategory::Entity,
        HandleCategory::Component,
    ];

    const fn index(self) -> usize {
        match self {
            HandleCategory::Asset => 0,
            HandleCategory::Scene => 1,
            HandleCategory::Entity => 2,
            HandleCategory::Component => 3,
        }
    }
}

static GLOBAL: LazyLock<HandleValidator> = LazyLock::new(HandleValidator::new);

/// A liveness oracle: which ids of each category are currently backed by a
/// live object.
///
/// Objects register themselves on construction and unregister on
/// destruction, normally through a [`Registration`] guard. A handle holding
/// an id can then ask [`validate`](HandleValidator::validate) before touching
/// the object, which turns a use-after-free into a recoverable "null" result.
///
/// Reads take a shared lock per category, writes an exclusive one.
#[derive(Debug)]
pub struct HandleValidator {
    sets: [RwLock<HashSet<u64>>; HandleCategory::COUNT],
}

impl HandleValidator {
    /// Creates an empty, standalone validator.
    pub fn new() -> Self {
        Self {
            sets: std::array::from_fn(|_| RwLock::new(HashSet::new())),
        }
    }

    /// The process-wide validator consulted by engine handles.
    pub fn global() -> &'static HandleValidator {
        &GLOBAL
    }

    /// Marks `id` as live. Adding an id twice is a pairing bug.
    pub fn add(&self, category: HandleCategory, id: u64) {
        let inserted = self.sets[category.index()].write().insert(id);
        debug_assert!(inserted, "{category:?} handle {id} registered twice");
    }

    /// Marks `id` as dead. Removing an unknown id is a no-op.
    pub fn remove(&self, category: HandleCategory, id: u64) {
        let removed = self.sets[category.index()].write().remove(&id);
        if !removed && cfg!(debug_assertions) {
            log::warn!("Removed {category:?} handle {id} which was not registered.");
        }
    }

    /// Returns `true` if `id` is currently live.
    #[must_use]
    pub fn validate(&self, category: HandleCategory, id: u64) -> bool {
        self.sets[category.index()].read().contains(&id)
    }

    /// Number of live ids in a category.
    #[must_use]
    pub fn live_count(&self, category: HandleCategory) -> usize {
        self.sets[category.index()].read().len()
    }

    /// Registers `id` and returns a guard that unregisters it when dropped.
    pub fn register(&'static self, category: HandleCategory, id: u64) -> Registration {
        self.add(category, id);
        Registration {
            validator: self,
            category,
            id,
        }
    }
}

impl Default for HandleValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps an id registered for as long as the guard lives.
///
/// Embedding one in an object ties the id's liveness to the object's
/// lifetime on every exit path, including unwinding.
#[derive(Debug)]
pub struct Registration {
    validator: &'static HandleValidator,
    category: HandleCategory,
    id: u64,
}

impl Registration {
    /// The registered id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The category the id is registered under.
    #[must_use]
    pub fn category(&self) -> HandleCategory {
        self.category
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.validator.remove(self.category, self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_validate_remove() {
        let validator = HandleValidator::new();
        validator.add(HandleCategory::Asset, 1);
        assert!(validator.validate(HandleCategory::Asset, 1));
        assert_eq!(validator.live_count(HandleCategory::Asset), 1);

        validator.remove(HandleCategory::Asset, 1);
        assert!(!validator.validate(HandleCategory::Asset, 1));
        assert_eq!(validator.live_count(HandleCategory::Asset), 0);
    }

    #[test]
    fn test_categories_are_independent() {
        let validator = HandleValidator::new();
        validator.add(HandleCategory::Scene, 42);

        assert!(validator.validate(HandleCategory::Scene, 42));
        for category in HandleCategory::ALL {
            if category != HandleCategory::Scene {
                assert!(!validator.validate(category, 42));
            }
        }
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let validator = HandleValidator::new();
        validator.add(HandleCategory::Entity, 3);
        validator.remove(HandleCategory::Entity, 4);
        assert!(validator.validate(HandleCategory::Entity, 3));
        assert_eq!(validator.live_count(HandleCategory::Entity), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "registered twice")]
    fn test_double_add_asserts_in_debug() {
        let validator = HandleValidator::new();
        validator.add(HandleCategory::Component, 9);
        validator.add(HandleCategory::Component, 9);
    }

    #[test]
    fn test_registration_guard() {
        // Large raw ids keep this clear of ids handed out to real assets.
        let id = u64::MAX - 17;
        let validator = HandleValidator::global();
        {
            let registration = validator.register(HandleCategory::Component, id);
            assert_eq!(registration.id(), id);
            assert!(validator.validate(HandleCategory::Component, id));
        }
        assert!(!validator.validate(HandleCategory::Component, id));
    }

    #[test]
    fn test_concurrent_readers_and_writers() {
        use std::sync::Arc;
        use std::thread;

        let validator = Arc::new(HandleValidator::new());
        let writers: Vec<_> = (0..4u64)
            .map(|t| {
                let validator = Arc::clone(&validator);
                thread::spawn(move || {
                    for i in 0..250 {
                        let id = t * 1_000 + i;
                        validator.add(HandleCategory::Asset, id);
                        assert!(validator.validate(HandleCategory::Asset, id));
                        validator.remove(HandleCategory::Asset, id);
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }
        assert_eq!(validator.live_count(HandleCategory::Asset), 0);
    }
}
