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

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use strata_core::asset::{
    Asset, AssetHandle, AssetSource, AssetSourceError, UntypedAssetHandle,
};

type Loader = Box<dyn Fn(&str) -> Result<UntypedAssetHandle, AssetSourceError> + Send + Sync>;

/// A central, in-memory cache of loaded assets keyed by identifier.
///
/// Any given identifier is loaded at most once; later requests receive a clone
/// of the cached handle. Assets inserted directly are served as is; anything
/// else goes through the optional loader.
#[derive(Default)]
pub struct AssetCatalog {
    entries: Mutex<HashMap<String, UntypedAssetHandle>>,
    loader: Option<Loader>,
}

impl AssetCatalog {
    /// Creates an empty catalog without a loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty catalog that loads unknown identifiers with `loader`.
    pub fn with_loader(
        loader: impl Fn(&str) -> Result<UntypedAssetHandle, AssetSourceError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            entries: Mutex::default(),
            loader: Some(Box::new(loader)),
        }
    }

    /// Stores an already loaded asset under `identifier`, replacing any previous one.
    pub fn insert(&self, identifier: impl Into<String>, handle: UntypedAssetHandle) {
        self.lock().insert(identifier.into(), handle);
    }

    /// Wraps `asset` in a handle, stores it and returns the typed handle.
    pub fn insert_asset<A: Asset>(&self, identifier: impl Into<String>, asset: A) -> AssetHandle<A> {
        let handle = AssetHandle::new(asset);
        self.insert(identifier, handle.untyped());
        handle
    }

    /// The number of cached assets.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UntypedAssetHandle>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AssetSource for AssetCatalog {
    fn load_by_identifier(&self, identifier: &str) -> Result<UntypedAssetHandle, AssetSourceError> {
        if let Some(handle) = self.lock().get(identifier) {
            return Ok(handle.clone());
        }
        let loader = self
            .loader
            .as_ref()
            .ok_or_else(|| AssetSourceError::NotFound(identifier.to_owned()))?;

        // The lock is not held while loading; a concurrent load of the same
        // identifier keeps whichever handle was inserted first.
        let loaded = loader(identifier)?;
        log::debug!("Loaded asset '{}' ({})", identifier, loaded.type_name());
        let handle = self
            .lock()
            .entry(identifier.to_owned())
            .or_insert(loaded)
            .clone();
        Ok(handle)
    }

    fn identifier_of(&self, handle: &UntypedAssetHandle) -> Option<String> {
        self.lock()
            .iter()
            .find(|(_, cached)| cached.ptr_eq(handle))
            .map(|(identifier, _)| identifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{Cubemap, Font};

    #[test]
    fn inserted_assets_are_identified_by_allocation() {
        let catalog = AssetCatalog::new();
        let font = catalog.insert_asset("fonts/mono.ttf", Font { family: "Mono".into() });
        let twin = AssetHandle::new(Font { family: "Mono".into() });

        assert_eq!(
            catalog.identifier_of(&font.untyped()).as_deref(),
            Some("fonts/mono.ttf")
        );
        assert_eq!(catalog.identifier_of(&twin.untyped()), None);
    }

    #[test]
    fn loader_results_are_cached() {
        let catalog = AssetCatalog::with_loader(|id| {
            if id.ends_with(".ktx") {
                Ok(UntypedAssetHandle::new(Cubemap { resolution: 256 }))
            } else {
                Err(AssetSourceError::NotFound(id.to_owned()))
            }
        });

        let first = catalog.load_by_identifier("sky/day.ktx").unwrap();
        let second = catalog.load_by_identifier("sky/day.ktx").unwrap();

        assert!(first.ptr_eq(&second));
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.load_by_identifier("sky/day.png").unwrap_err(),
            AssetSourceError::NotFound("sky/day.png".into())
        );
    }

    #[test]
    fn without_loader_unknown_identifiers_are_not_found() {
        let catalog = AssetCatalog::new();
        assert!(matches!(
            catalog.load_by_identifier("missing"),
            Err(AssetSourceError::NotFound(_))
        ));
    }
}
