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

mod common;

use aster_assets::{Asset, AssetError, Handle, LoadContext, LoadOptions};
use common::{manager, memory_source};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

const FALLBACK: &str = "engine/fallback.tex";
const MAGENTA: u32 = 0xff00ff;

struct Fallback {
    color: u32,
}

impl Asset for Fallback {
    type Settings = ();

    fn init(_ctx: &LoadContext<'_>, _settings: ()) -> Result<Self, AssetError> {
        Ok(Self { color: MAGENTA })
    }
}

/// Reads the fallback from its destructor.
struct Consumer {
    fallback: Handle<Fallback>,
    observed: Arc<AtomicBool>,
}

impl Asset for Consumer {
    type Settings = Arc<AtomicBool>;

    fn init(ctx: &LoadContext<'_>, observed: Arc<AtomicBool>) -> Result<Self, AssetError> {
        let fallback = ctx.find::<Fallback>(FALLBACK);
        if fallback.is_null() {
            return Err(AssetError::Dependency {
                path: FALLBACK.to_owned(),
            });
        }
        Ok(Self { fallback, observed })
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        let readable = self
            .fallback
            .with_value(|fallback| fallback.color == MAGENTA)
            .unwrap_or(false);
        self.observed.store(readable, Ordering::SeqCst);
    }
}

#[test]
fn test_persistent_assets_are_released_last() {
    let source = memory_source(&[(FALLBACK, ""), ("level/a.mat", ""), ("level/b.mat", "")]);
    let manager = manager(2, source);

    let fallback = manager.load_persistent::<Fallback>(FALLBACK);
    fallback.wait_ready();
    assert!(fallback.is_ok());

    let flags: Vec<Arc<AtomicBool>> = (0..2).map(|_| Arc::new(AtomicBool::new(false))).collect();
    let consumers: Vec<Handle<Consumer>> = ["level/a.mat", "level/b.mat"]
        .iter()
        .zip(&flags)
        .map(|(path, flag)| {
            manager.load_with::<Consumer>(path, Arc::clone(flag), LoadOptions::default())
        })
        .collect();
    for consumer in &consumers {
        consumer.wait_ready();
        assert!(consumer.is_ok());
    }

    manager.unload_all_assets();

    for flag in &flags {
        assert!(flag.load(Ordering::SeqCst), "fallback was gone during teardown");
    }
    assert!(!fallback.is_valid());
    assert!(consumers.iter().all(|c| !c.is_valid()));
    assert!(manager.is_empty());
}

#[test]
fn test_shutdown_refuses_new_loads() {
    let source = memory_source(&[(FALLBACK, "")]);
    let manager = manager(1, source);

    let before = manager.load::<Fallback>(FALLBACK);
    before.wait_ready();
    manager.shutdown();

    assert!(!before.is_valid());
    assert!(manager.load::<Fallback>(FALLBACK).is_null());
    assert_eq!(manager.loading_thread_ids().len(), 1);

    // Idempotent, and dropping the manager afterwards is fine.
    manager.shutdown();
}

#[test]
fn test_handles_may_outlive_the_manager() {
    let source = memory_source(&[(FALLBACK, "")]);
    let manager = manager(1, source);
    let handle = manager.load_persistent::<Fallback>(FALLBACK);
    handle.wait_ready();
    let copy = handle.clone();

    drop(manager);

    assert!(!handle.is_valid());
    assert!(handle.with_value(|f| f.color).is_none());
    drop(handle);
    drop(copy);
}
