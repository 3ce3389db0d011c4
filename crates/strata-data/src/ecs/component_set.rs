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
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
};

use crate::ecs::Component;

/// A set of components keyed by their concrete type, at most one per type.
///
/// This is the storage behind every entity, every camera and the scene. The
/// registry's attachment hooks are thin, type-erased wrappers around it.
#[derive(Default)]
pub struct ComponentSet {
    components: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl ComponentSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a component, returning the one it replaced.
    pub fn insert<T: Component>(&mut self, component: T) -> Option<T> {
        self.components
            .insert(TypeId::of::<T>(), Box::new(component))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Returns a reference to the component of type `T`.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|c| c.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the component of type `T`.
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .and_then(|c| c.downcast_mut::<T>())
    }

    /// Type-erased access by `TypeId`.
    pub fn get_dyn_mut(&mut self, type_id: TypeId) -> Option<&mut (dyn Any + Send + Sync)> {
        self.components.get_mut(&type_id).map(|c| &mut **c)
    }

    /// Removes and returns the component of type `T`.
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.components
            .remove(&TypeId::of::<T>())
            .and_then(|c| c.downcast::<T>().ok())
            .map(|c| *c)
    }

    /// Returns `true` if a component of type `T` is present.
    pub fn contains<T: Component>(&self) -> bool {
        self.contains_type(TypeId::of::<T>())
    }

    /// Returns `true` if a component with the given `TypeId` is present.
    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.components.contains_key(&type_id)
    }

    /// The number of components in the set.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns `true` if the set holds no component.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The types of the components in the set, in no particular order.
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.components.keys().copied()
    }
}

impl fmt::Debug for ComponentSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentSet")
            .field("len", &self.components.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    impl Component for Health {}

    #[test]
    fn insert_replaces_and_returns_the_previous_value() {
        let mut set = ComponentSet::new();
        assert_eq!(set.insert(Health(3)), None);
        assert_eq!(set.insert(Health(5)), Some(Health(3)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get::<Health>(), Some(&Health(5)));
    }

    #[test]
    fn dyn_access_reaches_the_same_value() {
        let mut set = ComponentSet::new();
        set.insert(Health(1));

        let erased = set.get_dyn_mut(TypeId::of::<Health>()).unwrap();
        erased.downcast_mut::<Health>().unwrap().0 = 9;

        assert_eq!(set.remove::<Health>(), Some(Health(9)));
        assert!(set.is_empty());
    }
}
