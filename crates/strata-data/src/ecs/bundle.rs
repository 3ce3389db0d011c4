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

use crate::ecs::{Component, ComponentSet};

/// A collection of components that can be spawned together.
///
/// Implemented for tuples of up to six components, like `(Transform, Light)`
/// or `(Transform,)`. A later element replaces an earlier one of the same type.
pub trait ComponentBundle {
    /// Moves every component of the bundle into `set`.
    fn insert_into(self, set: &mut ComponentSet);
}

macro_rules! impl_bundle_for_tuple {
    ($($name:ident),*) => {
        #[allow(non_snake_case, unused_variables)]
        impl<$($name: Component),*> ComponentBundle for ($($name,)*) {
            fn insert_into(self, set: &mut ComponentSet) {
                let ($($name,)*) = self;
                $(set.insert($name);)*
            }
        }
    };
}

impl_bundle_for_tuple!();
impl_bundle_for_tuple!(C1);
impl_bundle_for_tuple!(C1, C2);
impl_bundle_for_tuple!(C1, C2, C3);
impl_bundle_for_tuple!(C1, C2, C3, C4);
impl_bundle_for_tuple!(C1, C2, C3, C4, C5);
impl_bundle_for_tuple!(C1, C2, C3, C4, C5, C6);
