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

use super::Asset;
use std::{
    any::{type_name, Any},
    fmt,
    ops::Deref,
    sync::Arc,
};

/// A shared, reference-counted handle to a loaded asset.
///
/// Cloning a handle is cheap and never duplicates the asset data. Two handles
/// compare equal when they point at the same allocation.
#[derive(Debug)]
pub struct AssetHandle<T: Asset>(Arc<T>);

impl<T: Asset> AssetHandle<T> {
    /// Creates a new `AssetHandle` that takes ownership of the asset data.
    pub fn new(asset: T) -> Self {
        Self(Arc::new(asset))
    }

    /// Erases the asset type, keeping the same shared allocation.
    pub fn untyped(&self) -> UntypedAssetHandle {
        UntypedAssetHandle {
            inner: self.0.clone(),
            type_name: type_name::<T>(),
        }
    }

    /// Returns `true` if both handles share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Asset> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Asset> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: Asset> Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A type-erased [`AssetHandle`].
///
/// This is what crosses the boundary with the asset loader: the loader does
/// not know which component will end up holding the asset, and the component
/// recovers the concrete type with [`UntypedAssetHandle::typed`].
#[derive(Clone)]
pub struct UntypedAssetHandle {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl UntypedAssetHandle {
    /// Wraps a freshly loaded asset.
    pub fn new<T: Asset>(asset: T) -> Self {
        AssetHandle::new(asset).untyped()
    }

    /// The Rust type name of the asset behind this handle.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recovers a typed handle, or `None` if the asset is of another type.
    pub fn typed<T: Asset>(&self) -> Option<AssetHandle<T>> {
        self.inner.clone().downcast::<T>().ok().map(AssetHandle)
    }

    /// Returns `true` if both handles share the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    /// The address of the shared allocation, usable as an identity key.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl fmt::Debug for UntypedAssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UntypedAssetHandle")
            .field("type_name", &self.type_name)
            .field("addr", &format_args!("{:#x}", self.addr()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Glyphs(u32);
    impl Asset for Glyphs {}

    #[derive(Debug)]
    struct Sound;
    impl Asset for Sound {}

    #[test]
    fn untyped_handle_recovers_the_same_allocation() {
        let handle = AssetHandle::new(Glyphs(7));
        let untyped = handle.untyped();

        let typed = untyped.typed::<Glyphs>().expect("type should match");
        assert!(typed.ptr_eq(&handle));
        assert_eq!(typed.0 .0, 7);
        assert!(untyped.type_name().ends_with("Glyphs"));
    }

    #[test]
    fn typed_returns_none_for_another_asset_type() {
        let untyped = UntypedAssetHandle::new(Sound);
        assert!(untyped.typed::<Glyphs>().is_none());
    }

    #[test]
    fn identity_follows_the_allocation_not_the_value() {
        let a = AssetHandle::new(Glyphs(1));
        let b = AssetHandle::new(Glyphs(1));
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
        assert!(a.untyped().ptr_eq(&a.clone().untyped()));
        assert!(!a.untyped().ptr_eq(&b.untyped()));
    }
}
