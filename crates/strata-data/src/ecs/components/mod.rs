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

//! The built-in component modules.
//!
//! Each module owns its data type, its persistence and its editor, and
//! describes them with a `descriptor()` function.

mod camera;
mod environment;
mod light;
mod physics;
mod script;
mod text;
mod transform;

pub use camera::*;
pub use environment::*;
pub use light::*;
pub use physics::*;
pub use script::*;
pub use text::*;
pub use transform::*;

use crate::registry::TypeDescriptor;

/// The descriptors of every built-in type, in registration order.
pub fn builtin_descriptors() -> Vec<TypeDescriptor> {
    vec![
        Transform::descriptor(),
        Light::descriptor(),
        ColliderShape::descriptor(),
        Collider::descriptor(),
        Text::descriptor(),
        ScriptBinding::descriptor(),
        Projection::descriptor(),
        Exposure::descriptor(),
        Environment::descriptor(),
        Fog::descriptor(),
    ]
}
