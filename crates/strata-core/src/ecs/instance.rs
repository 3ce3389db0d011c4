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

use super::{CameraId, EntityId};
use crate::scene::TypeKey;
use std::fmt;

/// The container a component is attached to.
///
/// Component memory is always owned by one of these three hosts. Everything
/// else (the registry, the resolver, the editor) only addresses data through
/// a target plus a type key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachTarget {
    /// A live entity in the entity store.
    Entity(EntityId),
    /// A camera container.
    Camera(CameraId),
    /// The single scene-level container.
    Scene,
}

impl fmt::Display for AttachTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachTarget::Entity(id) => write!(f, "entity {id}"),
            AttachTarget::Camera(id) => write!(f, "{id}"),
            AttachTarget::Scene => f.write_str("scene"),
        }
    }
}

/// A type-erased reference to a component value.
///
/// It never points at the value itself: it names the owning container and
/// the registered type, so an `InstanceRef` can never outlive the data it
/// describes. Hooks look the value up again each time they need it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceRef {
    /// The registered type of the component.
    pub key: TypeKey,
    /// The container that owns the component.
    pub target: AttachTarget,
}

impl InstanceRef {
    /// Creates a new instance reference.
    pub fn new(key: impl Into<TypeKey>, target: AttachTarget) -> Self {
        Self {
            key: key.into(),
            target,
        }
    }
}

impl fmt::Display for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.key, self.target)
    }
}
