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

/// A UTF-8 text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAsset {
    text: String,
}

impl TextAsset {
    /// The file contents.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Iterates over the lines, without their terminators.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

impl Asset for TextAsset {
    type Settings = ();

    fn init(ctx: &LoadContext<'_>, _settings: ()) -> Result<Self, AssetError> {
        Ok(Self {
            text: ctx.read_string()?,
        })
    }
}
