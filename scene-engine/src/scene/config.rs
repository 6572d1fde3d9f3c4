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
//! Scene-graph configuration

/// How a subtree is walked when world transforms are recomputed
///
/// Both strategies visit nodes in the same order: a parent before its
/// children, depth-first, children in sibling-list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Plain recursion; stack depth grows with tree depth
    #[default]
    Recursive,
    /// Explicit stack on the heap, for very deep hierarchies
    Worklist,
}

/// Configuration for [`SceneGraph`](crate::scene::SceneGraph) behavior
#[derive(Debug, Clone)]
pub struct SceneGraphConfig {
    /// Traversal used by transform propagation
    pub traversal: Traversal,
    /// Run a full invariant check after every structural change and panic on failure
    pub validate_after_mutation: bool,
    /// Numeric tolerance used when validating cached world transforms
    pub tolerance: f32,
}

impl Default for SceneGraphConfig {
    fn default() -> Self {
        SceneGraphConfig {
            traversal: Traversal::Recursive,
            validate_after_mutation: false,
            tolerance: 1e-4,
        }
    }
}

impl SceneGraphConfig {
    /// Select the traversal strategy
    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    /// Enable invariant checking after every structural change
    pub fn with_validation(mut self) -> Self {
        self.validate_after_mutation = true;
        self
    }

    /// Set the validation tolerance
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        assert!(
            tolerance.is_finite() && tolerance >= 0.0,
            "Tolerance must be finite and non-negative"
        );
        self.tolerance = tolerance;
        self
    }
}
