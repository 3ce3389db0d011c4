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

//! # Strata Data
//!
//! Data layouts and the runtime type registry.
//!
//! The [`World`](ecs::World) owns every component value. The
//! [`CapabilityRegistry`](registry::CapabilityRegistry) describes what each
//! registered type can do (attach to an entity, a camera or the scene, persist
//! itself, be edited) without ever owning component data.

#![warn(missing_docs)]

extern crate self as strata_data;

pub mod assets;
pub mod ecs;
pub mod registry;
pub mod scene;

pub use strata_macros::Component;
