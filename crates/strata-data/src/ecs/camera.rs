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

use crate::ecs::ComponentSet;

/// A named camera and the components attached to it.
///
/// Cameras live beside the entity store rather than in it; camera components
/// (projection, exposure...) are registered on their own capability channel.
#[derive(Debug, Default)]
pub struct Camera {
    name: String,
    components: ComponentSet,
}

impl Camera {
    /// Creates a camera with no component.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: ComponentSet::new(),
        }
    }

    /// The display name of the camera.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The components attached to the camera.
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    /// Mutable access to the camera's components.
    pub fn components_mut(&mut self) -> &mut ComponentSet {
        &mut self.components
    }
}
