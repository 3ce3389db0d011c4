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
    any::{type_name, Any, TypeId},
    fmt,
    marker::PhantomData,
};

use strata_core::{
    editor::{EditorFactory, ObjectEditor},
    scene::NodeError,
    AttachTarget, DefinitionNode, TypeKey,
};
use thiserror::Error;

use crate::{
    ecs::{Component, ComponentSet, World},
    registry::{Channel, Persist, PersistContext, RestoreContext},
};

/// A type-erased component value, owned by whoever holds the box.
pub type OpaqueInstance = Box<dyn Any + Send + Sync>;

/// An error raised when attaching an instance through a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachError {
    /// The type has no attachment capability for this kind of container.
    #[error("'{key}' cannot be attached to {target}")]
    Unsupported {
        /// The type being attached.
        key: TypeKey,
        /// The requested container.
        target: AttachTarget,
    },
    /// The addressed container does not exist.
    #[error("{0} does not exist")]
    TargetMissing(AttachTarget),
    /// The boxed instance is not of the descriptor's type.
    #[error("instance is not a '{expected}'")]
    TypeMismatch {
        /// The descriptor's Rust type.
        expected: &'static str,
    },
}

type ConstructFn = fn() -> OpaqueInstance;
type PersistFn = fn(&dyn Any, &mut PersistContext<'_>) -> Option<DefinitionNode>;
type RestoreFn = fn(&DefinitionNode, &mut RestoreContext) -> Result<OpaqueInstance, NodeError>;

#[derive(Clone, Copy)]
struct SerializationHooks {
    persist: PersistFn,
    restore: RestoreFn,
}

/// Per-container accessors, monomorphized for one component type.
#[derive(Clone, Copy)]
struct AttachHooks {
    attach: fn(&mut ComponentSet, OpaqueInstance) -> Result<(), AttachError>,
    get: fn(&ComponentSet) -> Option<&(dyn Any + Send + Sync)>,
    get_mut: fn(&mut ComponentSet) -> Option<&mut (dyn Any + Send + Sync)>,
    remove: fn(&mut ComponentSet) -> bool,
    has: fn(&ComponentSet) -> bool,
}

impl AttachHooks {
    fn of<T: Component>() -> Self {
        Self {
            attach: |set, instance| {
                let value = instance
                    .downcast::<T>()
                    .map_err(|_| AttachError::TypeMismatch {
                        expected: type_name::<T>(),
                    })?;
                set.insert(*value);
                Ok(())
            },
            get: |set| set.get::<T>().map(|c| c as &(dyn Any + Send + Sync)),
            get_mut: |set| set.get_mut::<T>().map(|c| c as &mut (dyn Any + Send + Sync)),
            remove: |set| set.remove::<T>().is_some(),
            has: |set| set.contains::<T>(),
        }
    }
}

/// The capability table of one registered type.
///
/// Every capability is optional. Callers probe with [`has`](Self::has) or
/// [`supports`](Self::supports) before invoking a hook; a missing capability
/// means "unsupported for this type", never an error in itself.
#[derive(Clone)]
pub struct TypeDescriptor {
    key: TypeKey,
    display_name: String,
    type_id: TypeId,
    type_name: &'static str,
    construct: Option<ConstructFn>,
    serialization: Option<SerializationHooks>,
    entity: Option<AttachHooks>,
    camera: Option<AttachHooks>,
    scene: Option<AttachHooks>,
    editor: Option<EditorFactory>,
}

impl TypeDescriptor {
    /// Starts describing `T` under `key`.
    pub fn builder<T: Any + Send + Sync>(key: impl Into<TypeKey>) -> DescriptorBuilder<T> {
        let key = key.into();
        DescriptorBuilder {
            descriptor: TypeDescriptor {
                display_name: key.as_str().to_owned(),
                key,
                type_id: TypeId::of::<T>(),
                type_name: type_name::<T>(),
                construct: None,
                serialization: None,
                entity: None,
                camera: None,
                scene: None,
                editor: None,
            },
            _marker: PhantomData,
        }
    }

    /// The stable key of the type.
    pub fn key(&self) -> &TypeKey {
        &self.key
    }

    /// The name shown in menus and inspectors.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The `TypeId` of the described type.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The Rust type name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the type exposes `channel`.
    pub fn has(&self, channel: Channel) -> bool {
        match channel {
            Channel::EntityComponent => self.entity.is_some(),
            Channel::CameraComponent => self.camera.is_some(),
            Channel::SceneComponent => self.scene.is_some(),
            Channel::Editor => self.editor.is_some(),
            Channel::Serialization => self.serialization.is_some(),
            Channel::Object => self.construct.is_some(),
        }
    }

    /// The channels the type exposes, in declaration order.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(|c| self.has(*c))
    }

    /// Builds a default instance, if the type is independently constructible.
    pub fn construct_default(&self) -> Option<OpaqueInstance> {
        self.construct.map(|construct| construct())
    }

    /// Writes `instance` to a definition node tagged with this type's key.
    ///
    /// Returns `None` if the type is not serializable or `instance` is of
    /// another type.
    pub fn serialize(
        &self,
        instance: &dyn Any,
        ctx: &mut PersistContext<'_>,
    ) -> Option<DefinitionNode> {
        (self.serialization?.persist)(instance, ctx)
    }

    /// Rebuilds an instance from a definition node.
    ///
    /// Returns `None` if the type is not serializable. Reference fields are
    /// not set; they are queued on `ctx` for the resolution pass.
    pub fn deserialize(
        &self,
        node: &DefinitionNode,
        ctx: &mut RestoreContext,
    ) -> Option<Result<OpaqueInstance, NodeError>> {
        self.serialization.map(|hooks| (hooks.restore)(node, ctx))
    }

    fn hooks_for(&self, target: AttachTarget) -> Option<&AttachHooks> {
        match target {
            AttachTarget::Entity(_) => self.entity.as_ref(),
            AttachTarget::Camera(_) => self.camera.as_ref(),
            AttachTarget::Scene => self.scene.as_ref(),
        }
    }

    /// Returns `true` if the type can be attached to this kind of container.
    pub fn supports(&self, target: AttachTarget) -> bool {
        self.hooks_for(target).is_some()
    }

    /// Moves `instance` into the container addressed by `target`.
    ///
    /// An instance of the same type already attached there is replaced.
    pub fn attach(
        &self,
        world: &mut World,
        target: AttachTarget,
        instance: OpaqueInstance,
    ) -> Result<(), AttachError> {
        let hooks = self.hooks_for(target).ok_or_else(|| AttachError::Unsupported {
            key: self.key.clone(),
            target,
        })?;
        let host = world
            .host_mut(target)
            .ok_or(AttachError::TargetMissing(target))?;
        (hooks.attach)(host, instance)
    }

    /// Borrows the attached instance of this type.
    pub fn get<'w>(
        &self,
        world: &'w World,
        target: AttachTarget,
    ) -> Option<&'w (dyn Any + Send + Sync)> {
        let hooks = self.hooks_for(target)?;
        (hooks.get)(world.host(target)?)
    }

    /// Mutably borrows the attached instance of this type.
    pub fn get_mut<'w>(
        &self,
        world: &'w mut World,
        target: AttachTarget,
    ) -> Option<&'w mut (dyn Any + Send + Sync)> {
        let hooks = self.hooks_for(target)?;
        (hooks.get_mut)(world.host_mut(target)?)
    }

    /// Drops the attached instance of this type. Returns `false` if there was none.
    pub fn detach(&self, world: &mut World, target: AttachTarget) -> bool {
        match (self.hooks_for(target), world.host_mut(target)) {
            (Some(hooks), Some(host)) => (hooks.remove)(host),
            _ => false,
        }
    }

    /// Returns `true` if an instance of this type is attached to `target`.
    pub fn is_attached(&self, world: &World, target: AttachTarget) -> bool {
        match (self.hooks_for(target), world.host(target)) {
            (Some(hooks), Some(host)) => (hooks.has)(host),
            _ => false,
        }
    }

    /// The editor factory, if the type has an editor.
    pub fn editor_factory(&self) -> Option<EditorFactory> {
        self.editor
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("key", &self.key)
            .field("type_name", &self.type_name)
            .field("channels", &self.channels().collect::<Vec<_>>())
            .finish()
    }
}

/// Builds a [`TypeDescriptor`] for `T`, one capability at a time.
pub struct DescriptorBuilder<T> {
    descriptor: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> DescriptorBuilder<T> {
    /// Overrides the display name, which defaults to the key.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.descriptor.display_name = name.into();
        self
    }

    /// Makes the type independently constructible through `T::default()`.
    pub fn constructible(mut self) -> Self
    where
        T: Default,
    {
        self.descriptor.construct = Some(|| Box::new(T::default()) as OpaqueInstance);
        self
    }

    /// Adds the serialization capability.
    pub fn serializable(mut self) -> Self
    where
        T: Persist,
    {
        self.descriptor.serialization = Some(SerializationHooks {
            persist: |instance, ctx| {
                let value = instance.downcast_ref::<T>()?;
                Some(value.to_node(ctx.key().clone(), ctx))
            },
            restore: |node, ctx| {
                node.expect_key(ctx.key().as_str())?;
                T::restore(node, ctx).map(|value| Box::new(value) as OpaqueInstance)
            },
        });
        self
    }

    /// Allows the type to be attached to entities.
    pub fn entity_component(mut self) -> Self
    where
        T: Component,
    {
        self.descriptor.entity = Some(AttachHooks::of::<T>());
        self
    }

    /// Allows the type to be attached to cameras.
    pub fn camera_component(mut self) -> Self
    where
        T: Component,
    {
        self.descriptor.camera = Some(AttachHooks::of::<T>());
        self
    }

    /// Allows the type to be attached to the scene container.
    pub fn scene_component(mut self) -> Self
    where
        T: Component,
    {
        self.descriptor.scene = Some(AttachHooks::of::<T>());
        self
    }

    /// Adds an editor built with `E::default()`.
    pub fn editor<E: ObjectEditor + Default + 'static>(mut self) -> Self {
        self.descriptor.editor = Some(|| Box::new(E::default()) as Box<dyn ObjectEditor>);
        self
    }

    /// Finishes the descriptor.
    pub fn build(self) -> TypeDescriptor {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::editor::EditContext;

    #[derive(Debug, Default, PartialEq)]
    struct Marker(u8);
    impl Component for Marker {}

    impl Persist for Marker {
        fn persist(&self, node: &mut DefinitionNode, _: &mut PersistContext<'_>) {
            node.set("value", u32::from(self.0));
        }

        fn restore(node: &DefinitionNode, _: &mut RestoreContext) -> Result<Self, NodeError> {
            Ok(Marker(node.i64("value")? as u8))
        }
    }

    #[derive(Default)]
    struct MarkerEditor;
    impl ObjectEditor for MarkerEditor {
        fn render(&self, _: &mut EditContext<'_>, _: &mut dyn Any) -> bool {
            false
        }
    }

    #[test]
    fn capabilities_follow_the_builder_calls() {
        let descriptor = TypeDescriptor::builder::<Marker>("Marker")
            .entity_component()
            .editor::<MarkerEditor>()
            .build();

        assert!(descriptor.has(Channel::EntityComponent));
        assert!(descriptor.has(Channel::Editor));
        assert!(!descriptor.has(Channel::CameraComponent));
        assert!(!descriptor.has(Channel::Serialization));
        assert!(!descriptor.has(Channel::Object));
        assert!(descriptor.construct_default().is_none());
        assert_eq!(descriptor.display_name(), "Marker");
    }

    #[test]
    fn attach_hooks_only_cover_declared_targets() {
        let descriptor = TypeDescriptor::builder::<Marker>("Marker")
            .constructible()
            .entity_component()
            .build();
        let mut world = World::new();
        let entity = AttachTarget::Entity(world.spawn());

        let instance = descriptor.construct_default().unwrap();
        descriptor.attach(&mut world, entity, instance).unwrap();

        assert!(descriptor.is_attached(&world, entity));
        assert_eq!(
            descriptor.attach(&mut world, AttachTarget::Scene, Box::new(Marker(1))),
            Err(AttachError::Unsupported {
                key: "Marker".into(),
                target: AttachTarget::Scene
            })
        );
        assert!(matches!(
            descriptor.attach(&mut world, entity, Box::new(5u32)),
            Err(AttachError::TypeMismatch { .. })
        ));
        assert!(descriptor.detach(&mut world, entity));
        assert!(!descriptor.is_attached(&world, entity));
    }

    #[test]
    fn deserialize_checks_the_node_key() {
        let descriptor = TypeDescriptor::builder::<Marker>("Marker")
            .serializable()
            .build();
        let owner = strata_core::InstanceRef::new("Marker", AttachTarget::Scene);

        let mut ctx = RestoreContext::new(owner.clone());
        let node = DefinitionNode::new("Marker").with("value", 3i64);
        let restored = descriptor.deserialize(&node, &mut ctx).unwrap().unwrap();
        assert_eq!(restored.downcast_ref::<Marker>(), Some(&Marker(3)));

        let mut ctx = RestoreContext::new(owner);
        let wrong = DefinitionNode::new("Other").with("value", 3i64);
        assert!(matches!(
            descriptor.deserialize(&wrong, &mut ctx),
            Some(Err(NodeError::UnexpectedKey { .. }))
        ));
    }
}
