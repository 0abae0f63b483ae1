//! 2D pose delta: translation, rotation in degrees, non-uniform scale.
//!
//! Rotation is stored and interpolated in degrees everywhere in the core.
//! Any angular interpolation takes the shortest signed path: the delta is
//! normalized into (-180, 180] before scaling by `t`.

use serde::{Deserialize, Serialize};

use crate::interp::functions::{lerp_angle_deg, lerp_f32};

/// A 2D transform delta. Defaults to the identity `(0, 0, 0°, 1, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "one", rename = "scaleX")]
    pub scale_x: f32,
    #[serde(default = "one", rename = "scaleY")]
    pub scale_y: f32,
}

fn one() -> f32 {
    1.0
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    pub fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self {
            x,
            y,
            rotation,
            ..Self::default()
        }
    }

    #[inline]
    pub fn rotation_rad(&self) -> f32 {
        self.rotation.to_radians()
    }

    /// Component-wise interpolation; rotation follows the shortest angular path.
    pub fn lerp(&self, other: &Transform, t: f32) -> Transform {
        Transform {
            x: lerp_f32(self.x, other.x, t),
            y: lerp_f32(self.y, other.y, t),
            rotation: lerp_angle_deg(self.rotation, other.rotation, t),
            scale_x: lerp_f32(self.scale_x, other.scale_x, t),
            scale_y: lerp_f32(self.scale_y, other.scale_y, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_default() {
        let t = Transform::default();
        assert_eq!((t.x, t.y, t.rotation, t.scale_x, t.scale_y), (0.0, 0.0, 0.0, 1.0, 1.0));
    }

    /// it should cross the ±180 seam through the short side
    #[test]
    fn lerp_wraps_rotation() {
        let a = Transform::new(0.0, 0.0, 170.0);
        let b = Transform::new(0.0, 0.0, -170.0);
        let mid = a.lerp(&b, 0.5);
        assert!((mid.rotation - 180.0).abs() < 1e-4, "got {}", mid.rotation);
    }
}
