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

//! Small driver for the asset stack.
//!
//! With no arguments it loads a set of built-in files from memory. With a
//! directory argument it serves that directory and loads every remaining
//! argument as a text asset, optionally configured by `assets.ron` in the
//! directory.

use anyhow::Result;
use aster_assets::{
    Asset, AssetError, AssetManager, AssetManagerConfig, Handle, LoadContext, TextAsset,
};
use aster_core::AssetSource;
use aster_io::{FileSystemSource, MemorySource};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

const FALLBACK_SHADER: &str = "engine/shaders/default.wgsl";

/// A shader program made of the sources listed in its file.
struct Program {
    stages: Vec<Handle<TextAsset>>,
    fallback: Handle<TextAsset>,
}

impl Asset for Program {
    type Settings = ();

    fn init(ctx: &LoadContext<'_>, _settings: ()) -> Result<Self, AssetError> {
        let listing = ctx.read_string()?;
        let stages: Vec<_> = listing
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| ctx.load::<TextAsset>(line.trim()))
            .collect();
        for stage in &stages {
            stage.wait_ready();
        }
        Ok(Self {
            stages,
            fallback: ctx.find::<TextAsset>(FALLBACK_SHADER),
        })
    }
}

impl Program {
    fn source_len(&self) -> usize {
        self.stages
            .iter()
            .map(|stage| {
                let own = stage.with_value(|text| text.text().len());
                own.or_else(|| self.fallback.with_value(|text| text.text().len()))
                    .unwrap_or(0)
            })
            .sum()
    }
}

fn builtin_source() -> MemorySource {
    MemorySource::new()
        .with_file(
            FALLBACK_SHADER,
            "@fragment fn main() -> @location(0) vec4<f32> { return vec4(1.0, 0.0, 1.0, 1.0); }",
        )
        .with_file("shaders/lit.vert", "// vertex stage")
        .with_file("shaders/lit.frag", "// fragment stage")
        .with_file("shaders/lit.program", "shaders/lit.vert\nshaders/lit.frag")
        .with_file("shaders/unlit.program", "shaders/lit.vert\nshaders/missing.frag")
}

fn run_builtin_demo() -> Result<()> {
    let manager = Arc::new(AssetManager::new(
        AssetManagerConfig::default(),
        Arc::new(builtin_source()),
    )?);
    log::info!("Loading on {} threads.", manager.loading_thread_ids().len());

    let fallback = manager.load_persistent::<TextAsset>(FALLBACK_SHADER);
    fallback.wait_ready();

    let requesters: Vec<_> = (0..4)
        .map(|i| {
            let manager = Arc::clone(&manager);
            let path = if i % 2 == 0 {
                "shaders/lit.program"
            } else {
                "shaders/unlit.program"
            };
            thread::spawn(move || {
                let program = manager.load::<Program>(path);
                program.wait_ready();
                program
            })
        })
        .collect();

    for requester in requesters {
        let program = requester
            .join()
            .map_err(|_| anyhow::anyhow!("requester thread panicked"))?;
        match program.with_value(Program::source_len) {
            Some(len) => log::info!("Program {} ready, {len} bytes of source.", program.id()),
            None => log::warn!("Program {} is not usable.", program.id()),
        }
    }

    log::info!("{} assets registered before shutdown.", manager.len());
    manager.shutdown();
    Ok(())
}

fn run_directory(root: PathBuf, paths: &[String]) -> Result<()> {
    let config_path = root.join("assets.ron");
    let config = if config_path.is_file() {
        AssetManagerConfig::from_file(&config_path)?
    } else {
        AssetManagerConfig::default()
    };
    let source: Arc<dyn AssetSource> = Arc::new(FileSystemSource::new(root));
    let manager = AssetManager::new(config, source)?;

    let handles: Vec<_> = paths
        .iter()
        .map(|path| manager.load::<TextAsset>(path))
        .collect();
    for (path, handle) in paths.iter().zip(&handles) {
        handle.wait_ready();
        match handle.with_value(|text| text.lines().count()) {
            Some(lines) => log::info!("'{path}': {lines} lines."),
            None => log::warn!("'{path}' could not be loaded."),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    match args.next() {
        Some(root) => {
            let paths: Vec<String> = args.collect();
            run_directory(PathBuf::from(root), &paths)
        }
        None => run_builtin_demo(),
    }
}
