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

/// An independent capability a registered type may expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Can be attached to entities.
    EntityComponent,
    /// Can be attached to cameras.
    CameraComponent,
    /// Can be attached to the scene container.
    SceneComponent,
    /// Has a generic object editor.
    Editor,
    /// Can be written to and read from a definition node.
    Serialization,
    /// Can be default-constructed on its own.
    Object,
}

impl Channel {
    /// Every channel, in declaration order.
    pub const ALL: [Channel; 6] = [
        Channel::EntityComponent,
        Channel::CameraComponent,
        Channel::SceneComponent,
        Channel::Editor,
        Channel::Serialization,
        Channel::Object,
    ];
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::EntityComponent => "entity",
            Channel::CameraComponent => "camera",
            Channel::SceneComponent => "scene",
            Channel::Editor => "editor",
            Channel::Serialization => "serialization",
            Channel::Object => "object",
        };
        f.write_str(name)
    }
}
