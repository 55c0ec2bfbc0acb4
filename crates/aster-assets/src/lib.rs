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

//! # Aster Assets
//!
//! Path-keyed, deduplicating asset loading on a background worker pool.
//!
//! Loading a path that is already known returns a handle to the existing
//! asset instead of starting a second load. Handles are reference counted:
//! when the last one goes away the asset is unloaded on the pool. Every
//! dereference checks the process-wide
//! [`HandleValidator`](aster_core::HandleValidator), so a handle that
//! outlives its asset reads as empty instead of dangling.
//!
//! ```no_run
//! use std::sync::Arc;
//! use aster_assets::{AssetManager, AssetManagerConfig, TextAsset};
//! # fn source() -> Arc<dyn aster_core::AssetSource> { unimplemented!() }
//!
//! let manager = AssetManager::new(AssetManagerConfig::default(), source()).unwrap();
//! let readme = manager.load::<TextAsset>("docs/readme.txt");
//! readme.wait_ready();
//! if let Some(text) = readme.with_value(|t| t.text().to_owned()) {
//!     println!("{text}");
//! }
//! ```

#![warn(missing_docs)]

mod asset;
pub mod builtin;
mod config;
mod context;
mod error;
mod handle;
mod manager;
mod registry;
mod slot;

pub use asset::{Asset, AssetTypeTag};
pub use builtin::{BlobAsset, TextAsset};
pub use config::AssetManagerConfig;
pub use context::LoadContext;
pub use error::AssetError;
pub use handle::Handle;
pub use manager::{AssetManager, LoadOptions};
pub use slot::{AssetSlot, LoadState};

pub use aster_core::{AssetId, AssetSource, HandleCategory, HandleValidator};
