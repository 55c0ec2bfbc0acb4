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

use anyhow::Result;
use aster_assets::builtin::BlobSettings;
use aster_assets::{AssetManager, AssetManagerConfig, BlobAsset, LoadOptions, TextAsset};
use aster_io::FileSystemSource;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_load_text_and_blob_from_disk() -> Result<()> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("config"))?;
    fs::write(dir.path().join("config").join("settings.txt"), "fullscreen\nvsync")?;
    fs::write(dir.path().join("data.bin"), [1u8, 2, 3])?;

    let config = AssetManagerConfig {
        worker_threads: 2,
        ..AssetManagerConfig::default()
    };
    let manager = AssetManager::new(config, Arc::new(FileSystemSource::new(dir.path())))?;

    let text = manager.load::<TextAsset>(r"config\settings.txt");
    let blob = manager.load::<BlobAsset>("data.bin");
    text.wait_ready();
    blob.wait_ready();

    assert_eq!(text.with_value(|t| t.lines().count()), Some(2));
    assert_eq!(blob.with_value(|b| b.bytes().to_vec()), Some(vec![1, 2, 3]));
    assert!(manager.is_loaded("./config/settings.txt"));
    assert_eq!(manager.len(), 2);
    Ok(())
}

#[test]
fn test_blob_size_limit() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("big.bin"), vec![0u8; 64])?;

    let manager = AssetManager::new(
        AssetManagerConfig::default(),
        Arc::new(FileSystemSource::new(dir.path())),
    )?;
    let settings = BlobSettings { max_len: Some(16) };
    let blob = manager.load_with::<BlobAsset>("big.bin", settings, LoadOptions::blocking());

    assert!(blob.is_load_finished());
    assert!(!blob.is_ok());
    Ok(())
}

#[test]
fn test_invalid_utf8_fails_text_asset() -> Result<()> {
    let dir = tempdir()?;
    fs::write(dir.path().join("bad.txt"), [0xffu8, 0xfe])?;

    let manager = AssetManager::new(
        AssetManagerConfig::default(),
        Arc::new(FileSystemSource::new(dir.path())),
    )?;
    let text = manager.load::<TextAsset>("bad.txt");
    text.wait_ready();
    assert!(!text.is_ok());
    Ok(())
}

#[test]
fn test_config_file_drives_the_pool() -> Result<()> {
    let dir = tempdir()?;
    let config_path = dir.path().join("assets.ron");
    fs::write(
        &config_path,
        r#"(worker_threads: 3, thread_name: "loader", lifetime_logging: false)"#,
    )?;

    let config = AssetManagerConfig::from_file(&config_path)?;
    let manager = AssetManager::new(config, Arc::new(FileSystemSource::new(dir.path())))?;

    assert_eq!(manager.loading_thread_ids().len(), 3);
    assert_eq!(manager.worker_pool().map(|p| p.size()), Some(3));
    assert!(!manager.is_worker_thread());
    assert!(!manager.config().lifetime_logging);
    Ok(())
}
