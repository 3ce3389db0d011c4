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

use crate::{asset::AssetSourceError, EntityId};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The persisted identity of an entity inside one scene tree.
///
/// File-local: the number only means something within the tree that contains
/// it and is rebound to a fresh [`EntityId`] on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityReference(pub u32);

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The persisted identity of a shared asset: the identifier it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetReference(String);

impl AssetReference {
    /// Creates a reference from an asset identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    /// The asset identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

/// The kind of relation a pending reference stands for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReferenceToken {
    /// A relation to another entity of the same tree.
    Entity(EntityReference),
    /// A relation to a shared asset.
    Asset(AssetReference),
}

impl fmt::Display for ReferenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceToken::Entity(r) => write!(f, "entity {r}"),
            ReferenceToken::Asset(r) => write!(f, "asset {r}"),
        }
    }
}

/// Why a reference could not be written or patched back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    /// The asset has no identifier it can be reloaded from.
    #[error("asset of type '{type_name}' has no stable identifier")]
    UnidentifiableAsset {
        /// The Rust type name of the asset.
        type_name: &'static str,
    },
    /// The relation points at an entity that is not part of the saved world.
    #[error("entity {0} is not alive in the saved world")]
    DanglingEntity(EntityId),
    /// The tree references an entity it does not define.
    #[error("{0} is not defined by this scene")]
    UnknownEntity(EntityReference),
    /// The asset source could not provide the asset.
    #[error("asset {reference} is unavailable")]
    AssetUnavailable {
        /// The asset that was requested.
        reference: AssetReference,
        /// The error reported by the asset source.
        #[source]
        source: AssetSourceError,
    },
    /// The asset loaded but is of another type than the field holds.
    #[error("asset {reference} is a '{found}', expected a '{expected}'")]
    AssetTypeMismatch {
        /// The asset that was requested.
        reference: AssetReference,
        /// The type the field holds.
        expected: &'static str,
        /// The type the asset source returned.
        found: &'static str,
    },
    /// The instance holding the reference no longer exists.
    #[error("the owner {0} no longer exists")]
    OwnerMissing(String),
    /// The instance holding the reference is not of the expected type.
    #[error("the owner is not a '{expected}'")]
    OwnerTypeMismatch {
        /// The type the pending patch was created for.
        expected: &'static str,
    },
    /// The resolved value does not match the kind of reference requested.
    #[error("resolved value does not match {token}")]
    TokenKindMismatch {
        /// The token that was resolved.
        token: ReferenceToken,
    },
}

impl ResolveError {
    /// Convenience constructor for [`ResolveError::OwnerMissing`].
    pub fn owner_missing(owner: impl fmt::Display) -> Self {
        ResolveError::OwnerMissing(owner.to_string())
    }
}
