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

//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use aster_assets::{Asset, AssetError, AssetManager, AssetManagerConfig, LoadContext};
use aster_core::{Job, TaskExecutor};
use aster_io::MemorySource;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Knobs and counters for [`Probe`].
#[derive(Clone, Default)]
pub struct ProbeSettings {
    pub inits: Arc<AtomicUsize>,
    pub drops: Arc<AtomicUsize>,
    pub delay: Duration,
    pub fail: bool,
    pub panic: bool,
}

impl ProbeSettings {
    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

/// A text asset that counts its inits and drops.
pub struct Probe {
    pub contents: String,
    drops: Arc<AtomicUsize>,
}

impl Asset for Probe {
    type Settings = ProbeSettings;

    fn init(ctx: &LoadContext<'_>, settings: ProbeSettings) -> Result<Self, AssetError> {
        settings.inits.fetch_add(1, Ordering::SeqCst);
        if !settings.delay.is_zero() {
            thread::sleep(settings.delay);
        }
        if settings.panic {
            panic!("probe init panicked");
        }
        if settings.fail {
            return Err(AssetError::Decode {
                path: ctx.path().to_owned(),
                reason: "probe configured to fail".to_owned(),
            });
        }
        Ok(Self {
            contents: ctx.read_string()?,
            drops: settings.drops,
        })
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn memory_source(files: &[(&str, &str)]) -> Arc<MemorySource> {
    let source = MemorySource::new();
    for (path, contents) in files {
        source.insert(path, *contents);
    }
    Arc::new(source)
}

pub fn manager(threads: usize, source: Arc<MemorySource>) -> AssetManager {
    let config = AssetManagerConfig {
        worker_threads: threads,
        ..AssetManagerConfig::default()
    };
    AssetManager::new(config, source).unwrap()
}

/// An executor that only runs jobs when told to.
#[derive(Default)]
pub struct ManualExecutor {
    jobs: Mutex<VecDeque<Job>>,
}

impl ManualExecutor {
    /// Runs queued jobs, including the ones they queue, until none are left.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        loop {
            let job = self.jobs.lock().pop_front();
            match job {
                Some(job) => {
                    job();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }

    /// Runs only the most recently queued job.
    pub fn run_newest(&self) -> bool {
        let job = self.jobs.lock().pop_back();
        match job {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }

    /// Drops every queued job without running it, like a pool shutting down.
    pub fn discard_all(&self) {
        let jobs: Vec<Job> = self.jobs.lock().drain(..).collect();
        drop(jobs);
    }

    pub fn pending(&self) -> usize {
        self.jobs.lock().len()
    }
}

impl TaskExecutor for ManualExecutor {
    fn execute(&self, job: Job) {
        self.jobs.lock().push_back(job);
    }

    fn wait_idle(&self) {
        self.run_all();
    }

    fn is_worker_thread(&self) -> bool {
        false
    }
}
