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

use crate::{AssetError, LoadContext};
use std::any::{self, TypeId};
use std::fmt;

/// A type the [`AssetManager`](crate::AssetManager) can load from a path.
///
/// `init` runs once per load, usually on a worker thread. It reads whatever
/// it needs through the [`LoadContext`] and may request other assets from
/// there. Returning an error leaves the asset in the
/// [`Failed`](crate::LoadState::Failed) state; handles to it stay valid but
/// never expose a value.
///
/// Releasing resources happens in `Drop`, which runs on a worker thread once
/// the asset is unloaded.
pub trait Asset: Send + Sync + Sized + 'static {
    /// Extra arguments for `init`, supplied by whoever requests the load.
    type Settings: Send + 'static;

    /// Builds the asset.
    fn init(ctx: &LoadContext<'_>, settings: Self::Settings) -> Result<Self, AssetError>;
}

/// Runtime tag identifying a concrete asset type.
///
/// The registry stores assets type-erased; the tag is compared before any
/// downcast so a path loaded as one type can never be handed out as another.
#[derive(Clone, Copy)]
pub struct AssetTypeTag {
    id: TypeId,
    name: &'static str,
}

impl AssetTypeTag {
    /// The tag of `T`.
    pub fn of<T: Asset>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
        }
    }

    /// The Rust type name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for AssetTypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AssetTypeTag {}

impl fmt::Debug for AssetTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
