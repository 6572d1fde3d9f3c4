// Copyright 2025 John Brosnihan
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
//! Scene graph built on the component store
//!
//! - [`Transform`]: cached world pose, and the local pose inside a node
//! - [`SceneGraphComponent`]: intrusive tree links per entity
//! - [`SceneGraph`]: relationship creation, eager propagation and repair on destroy
//! - [`Scene`] and [`EntityHandle`]: the surface scripts and game code use

mod config;
mod extract;
mod graph;
mod handle;
mod node;
#[allow(clippy::module_inception)]
mod scene;
mod transform;

pub use config::{SceneGraphConfig, Traversal};
pub use extract::{extract_render_instances, RenderInstance};
pub use graph::{Children, SceneGraph};
pub use handle::EntityHandle;
pub use node::SceneGraphComponent;
pub use scene::Scene;
pub use transform::{Transform, EULER_ORDER};
