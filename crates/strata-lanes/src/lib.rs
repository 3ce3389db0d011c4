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

//! Execution pipelines for scene persistence.
//!
//! Lanes do the work and hold no policy: choosing which strategy to use,
//! where files go and how failures are reported to a user is left to the
//! agents driving them.

#![warn(missing_docs)]

pub mod scene_lane;
