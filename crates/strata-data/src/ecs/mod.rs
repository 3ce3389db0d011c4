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

//! Foundational ECS types: the world, its containers and the built-in components.

mod bundle;
mod camera;
mod component;
mod component_set;
pub mod components;
mod entity;
mod entity_store;
mod world;


pub use bundle::*;
pub use camera::*;
pub use component::*;
pub use component_set::*;
pub use entity::*;
pub use world::*;
