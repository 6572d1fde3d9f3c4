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
//! Transform value type
//!
//! A [`Transform`] is a position/rotation/scale triple. Attached directly to
//! an entity it is the entity's cached world-space pose; inside a
//! [`SceneGraphComponent`](crate::scene::SceneGraphComponent) it is the pose
//! relative to the parent.

use crate::ecs::Component;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Euler order used for `rotation` (yaw about Y, then pitch about X, then roll about Z)
pub const EULER_ORDER: EulerRot = EulerRot::YXZ;

/// Position, rotation and scale of an entity
///
/// `rotation` holds Euler angles in degrees, applied in [`EULER_ORDER`].
///
/// # Examples
///
/// ```
/// use scene_engine::scene::Transform;
/// use glam::Vec3;
///
/// let parent = Transform::from_xyz(5.0, 0.0, 0.0);
/// let local = Transform::from_xyz(0.0, 1.0, 0.0);
/// assert_eq!(local.transform(&parent).position, Vec3::new(5.0, 1.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation
    pub position: Vec3,
    /// Euler angles in degrees
    pub rotation: Vec3,
    /// Per-axis scale
    pub scale: Vec3,
}

impl Transform {
    /// Position 0, rotation 0, scale 1
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Create a transform from its three parts
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Transform {
            position,
            rotation,
            scale,
        }
    }

    /// Create a translation-only transform
    pub fn from_position(position: Vec3) -> Self {
        Transform {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a translation-only transform from coordinates
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    /// Replace the rotation (degrees)
    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Replace the scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion
    pub fn rotation_quat(&self) -> Quat {
        let radians = self.rotation * (std::f32::consts::PI / 180.0);
        Quat::from_euler(EULER_ORDER, radians.y, radians.x, radians.z)
    }

    /// Model matrix (scale, then rotate, then translate)
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation_quat(), self.position)
    }

    /// Express this local transform in the space of `parent`
    ///
    /// The local position is scaled by the parent's scale, rotated by the
    /// parent's rotation and offset by the parent's position. Rotations
    /// compose as quaternions and scales multiply per axis. Folding this
    /// from a root down to a leaf yields the leaf's world transform.
    pub fn transform(&self, parent: &Transform) -> Transform {
        let parent_rotation = parent.rotation_quat();
        let position = parent.position + parent_rotation * (parent.scale * self.position);

        // Unrotated parents keep the child's angles verbatim instead of
        // round-tripping them through a quaternion.
        let rotation = if parent.rotation == Vec3::ZERO {
            self.rotation
        } else {
            euler_degrees(parent_rotation * self.rotation_quat())
        };

        Transform {
            position,
            rotation,
            scale: parent.scale * self.scale,
        }
    }

    /// Compare two transforms within `epsilon`
    ///
    /// Rotations are compared as orientations, so different Euler triples
    /// that describe the same rotation are equal.
    pub fn abs_diff_eq(&self, other: &Transform, epsilon: f32) -> bool {
        self.position.abs_diff_eq(other.position, epsilon)
            && self.scale.abs_diff_eq(other.scale, epsilon)
            && self.rotation_quat().dot(other.rotation_quat()).abs() >= 1.0 - epsilon
    }

    /// Check if all parts are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform {}

fn euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EULER_ORDER);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}
