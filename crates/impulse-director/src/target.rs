use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use impulse_core::Displacement;

/// Something a [`ShakeDirector`](crate::director::ShakeDirector) can move.
///
/// A pose is carried as a [`Displacement`] from the origin: `offset` is the
/// local position and `angles` the local Euler rotation (YXZ order).
pub trait ShakeTarget {
    fn pose(&self) -> Displacement;

    fn set_pose(&mut self, pose: Displacement);

    /// World-space position, used for distance attenuation.
    fn global_position(&self) -> Vec3;

    /// Drop the components this target cannot represent.
    fn constrain(&self, displacement: Displacement) -> Displacement {
        displacement
    }

    /// Rotate a shake offset from the baseline's local frame into its
    /// parent's frame, so "right" means right relative to current facing.
    fn orient(&self, baseline: &Displacement, offset: Vec3) -> Vec3 {
        euler_to_quat(baseline.angles) * offset
    }
}

/// Quaternion for Euler angles stored as `(x, y, z)`, applied in YXZ order.
pub fn euler_to_quat(angles: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, angles.y, angles.x, angles.z)
}

/// Position plus Euler rotation of a 3D node without a parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform3D {
    pub position: Vec3,
    /// Radians, YXZ order.
    pub rotation: Vec3,
}

impl Transform3D {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }
}

impl ShakeTarget for Transform3D {
    fn pose(&self) -> Displacement {
        Displacement::new(self.position, self.rotation)
    }

    fn set_pose(&mut self, pose: Displacement) {
        self.position = pose.offset;
        self.rotation = pose.angles;
    }

    fn global_position(&self) -> Vec3 {
        self.position
    }
}

/// Position plus rotation of a 2D node. Only XY offsets and rotation about Z
/// reach it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    /// Radians.
    pub rotation: f32,
}

impl Transform2D {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }
}

impl ShakeTarget for Transform2D {
    fn pose(&self) -> Displacement {
        Displacement::new(self.position.extend(0.0), Vec3::new(0.0, 0.0, self.rotation))
    }

    fn set_pose(&mut self, pose: Displacement) {
        self.position = pose.offset.truncate();
        self.rotation = pose.angles.z;
    }

    fn global_position(&self) -> Vec3 {
        self.position.extend(0.0)
    }

    fn constrain(&self, displacement: Displacement) -> Displacement {
        Displacement::new(
            displacement.offset.truncate().extend(0.0),
            Vec3::new(0.0, 0.0, displacement.angles.z),
        )
    }

    fn orient(&self, baseline: &Displacement, offset: Vec3) -> Vec3 {
        Vec2::from_angle(baseline.angles.z).rotate(offset.truncate()).extend(offset.z)
    }
}
