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

use super::UntypedAssetHandle;
use thiserror::Error;

/// An error reported by an [`AssetSource`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetSourceError {
    /// No asset is known under the requested identifier.
    #[error("no asset is known under '{0}'")]
    NotFound(String),
    /// The asset exists but could not be loaded.
    #[error("failed to load '{identifier}': {reason}")]
    LoadFailed {
        /// The identifier that was requested.
        identifier: String,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// The asset loading collaborator consumed by scene (de)serialization.
///
/// Implementations map stable, path-like identifiers to shared handles and
/// back. The import pipeline behind them is not part of this contract.
pub trait AssetSource: Send + Sync {
    /// Loads (or looks up an already loaded) asset by its identifier.
    fn load_by_identifier(&self, identifier: &str) -> Result<UntypedAssetHandle, AssetSourceError>;

    /// Returns the identifier an asset was loaded from, or `None` if the asset
    /// has no stable origin (procedural, never persisted).
    fn identifier_of(&self, handle: &UntypedAssetHandle) -> Option<String>;
}
