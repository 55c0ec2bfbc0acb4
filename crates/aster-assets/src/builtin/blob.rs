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

use crate::{Asset, AssetError, LoadContext};

/// Options for [`BlobAsset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobSettings {
    /// Reject files larger than this many bytes. `None` accepts any size.
    pub max_len: Option<usize>,
}

/// The raw bytes of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobAsset {
    bytes: Vec<u8>,
}

impl BlobAsset {
    /// The file contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for an empty file.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Asset for BlobAsset {
    type Settings = BlobSettings;

    fn init(ctx: &LoadContext<'_>, settings: BlobSettings) -> Result<Self, AssetError> {
        let bytes = ctx.read()?;
        if let Some(max_len) = settings.max_len {
            if bytes.len() > max_len {
                return Err(AssetError::Decode {
                    path: ctx.path().to_owned(),
                    reason: format!("{} bytes exceeds the limit of {max_len}", bytes.len()),
                });
            }
        }
        Ok(Self { bytes })
    }
}
