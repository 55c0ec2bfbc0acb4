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

use aster_assets::{HandleCategory, HandleValidator, LoadOptions};
use common::{manager, memory_source, Probe, ProbeSettings};
use std::time::Duration;

fn is_live(id: aster_assets::AssetId) -> bool {
    HandleValidator::global().validate(HandleCategory::Asset, id.raw())
}

#[test]
fn test_dropping_last_handle_unloads() {
    let source = memory_source(&[("a.txt", "a")]);
    let manager = manager(2, source);
    let settings = ProbeSettings::default();

    let handle = manager.load_with::<Probe>("a.txt", settings.clone(), LoadOptions::default());
    let copy = handle.clone();
    handle.wait_ready();
    let id = handle.id();
    assert!(is_live(id));

    drop(handle);
    manager.wait_idle();
    assert!(manager.is_loaded("a.txt"));
    assert!(copy.is_ok());

    drop(copy);
    manager.wait_idle();
    assert!(!manager.is_loaded("a.txt"));
    assert!(!is_live(id));
    assert_eq!(settings.drops(), 1);
}

#[test]
fn test_unload_is_idempotent() {
    let source = memory_source(&[("b.txt", "b")]);
    let manager = manager(2, source);
    let settings = ProbeSettings::default();

    let handle = manager.load_with::<Probe>("b.txt", settings.clone(), LoadOptions::default());
    handle.wait_ready();
    let id = handle.id();

    manager.unload(id);
    manager.unload(id);
    manager.wait_idle();

    assert!(!is_live(id));
    assert!(!handle.is_valid());
    assert!(handle.get().is_none());
    assert_eq!(settings.drops(), 1);

    // The late release of the handle finds nothing left to unload.
    drop(handle);
    manager.wait_idle();
    assert_eq!(settings.drops(), 1);
    assert!(manager.is_empty());
}

#[test]
fn test_unload_during_load_waits_for_init() {
    let source = memory_source(&[("slow.txt", "slow")]);
    let manager = manager(1, source);
    let settings = ProbeSettings {
        delay: Duration::from_millis(30),
        ..ProbeSettings::default()
    };

    let handle = manager.load_with::<Probe>("slow.txt", settings.clone(), LoadOptions::default());
    manager.unload(handle.id());
    manager.wait_idle();

    assert_eq!(settings.inits(), 1);
    assert_eq!(settings.drops(), 1);
    assert!(!handle.is_valid());
}

#[test]
fn test_reload_after_unload_is_a_new_generation() {
    let source = memory_source(&[("c.txt", "c")]);
    let manager = manager(1, source);
    let settings = ProbeSettings::default();

    let first = manager.load_with::<Probe>("c.txt", settings.clone(), LoadOptions::default());
    first.wait_ready();
    let first_id = first.id();
    drop(first);
    manager.wait_idle();

    let second = manager.load_with::<Probe>("c.txt", settings.clone(), LoadOptions::default());
    second.wait_ready();
    assert_ne!(second.id(), first_id);
    assert!(second.id() > first_id);
    assert_eq!(settings.inits(), 2);
}

#[test]
fn test_persistent_asset_outlives_its_handles() {
    let source = memory_source(&[("engine/white.txt", "white")]);
    let manager = manager(1, source);
    let settings = ProbeSettings::default();

    let handle = manager.load_with::<Probe>(
        "engine/white.txt",
        settings.clone(),
        LoadOptions::persistent(),
    );
    handle.wait_ready();
    let id = handle.id();
    // One for the handle, one for the registry's pin.
    assert_eq!(handle.ref_count(), 2);
    drop(handle);
    manager.wait_idle();

    assert!(manager.is_loaded("engine/white.txt"));
    assert!(is_live(id));
    let found = manager.find::<Probe>("engine/white.txt");
    assert_eq!(found.id(), id);
    assert!(found.is_ok());
    assert_eq!(settings.inits(), 1);
    assert_eq!(settings.drops(), 0);

    // Explicit unload still works.
    manager.unload(id);
    manager.wait_idle();
    assert!(!found.is_valid());
    assert_eq!(settings.drops(), 1);
}

#[test]
fn test_validator_tracks_every_asset() {
    let files: Vec<(String, String)> = (0..12)
        .map(|i| (format!("many/{i}.txt"), i.to_string()))
        .collect();
    let borrowed: Vec<(&str, &str)> = files
        .iter()
        .map(|(p, c)| (p.as_str(), c.as_str()))
        .collect();
    let manager = manager(3, memory_source(&borrowed));

    let handles: Vec<_> = files
        .iter()
        .map(|(path, _)| manager.load::<Probe>(path))
        .collect();
    for handle in &handles {
        assert!(is_live(handle.id()));
    }

    manager.unload_all_assets();
    for handle in &handles {
        assert!(!is_live(handle.id()));
        assert!(!handle.is_valid());
    }
    assert!(manager.is_empty());
}

#[test]
fn test_id_is_not_live_before_its_asset_exists() {
    let source = memory_source(&[("later.txt", "later")]);
    let manager = manager(1, source);

    let unused = aster_assets::AssetId::next();
    assert!(!is_live(unused));

    let handle = manager.load::<Probe>("later.txt");
    assert!(handle.id() > unused);
    assert!(is_live(handle.id()));
    assert!(!is_live(unused));
}
