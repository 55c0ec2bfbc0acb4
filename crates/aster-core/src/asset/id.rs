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

use std::fmt;
use std::hash::BuildHasher;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of fresh asset ids. Zero is reserved for the null id.
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

/// A process-unique identifier assigned to an asset when it is created.
///
/// Ids are handed out from a monotonically increasing counter and are never
/// reused, so a stale id can be told apart from a live one even after the
/// original asset has been destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(u64);

impl AssetId {
    /// The id carried by null handles. No asset is ever assigned this value.
    pub const NULL: AssetId = AssetId(0);

    /// Allocates the next id.
    pub fn next() -> Self {
        Self(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw value. Intended for tests and for interop with other
    /// handle families that share the validator.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Returns `true` for [`AssetId::NULL`].
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stable 64-bit hash of a canonical asset path.
///
/// Fingerprints key the registry buckets. They are not unique: two distinct
/// paths may share one, so lookups must still compare the full path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathFingerprint(u64);

impl PathFingerprint {
    /// Hashes a canonical path with fixed seeds, so the value is stable for
    /// the lifetime of the process.
    pub fn of(path: &str) -> Self {
        let state = ahash::RandomState::with_seeds(
            0x243f_6a88_85a3_08d3,
            0x1319_8a2e_0370_7344,
            0xa409_3822_299f_31d0,
            0x082e_fa98_ec4e_6c89,
        );
        Self(BuildHasher::hash_one(&state, path))
    }

    /// Wraps a raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw hash.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}
