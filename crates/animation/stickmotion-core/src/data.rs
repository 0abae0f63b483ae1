//! Canonical definition formats for skeletons, poses, actions and sequences.
//!
//! These are the plain serde-backed shapes external callers author (JSON);
//! the runtime types (`Skeleton`, `Pose`, `Action`, `Sequence`) are built
//! from them. All lists are flat and order-independent except action
//! keyframes, which are assumed sorted ascending by `time`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// A named attachment point with a bind position.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointDef {
    pub name: String,
    pub x: f32,
    pub y: f32,
}

/// A rigid segment definition. Parent and joint references are by name and
/// resolved permissively at skeleton construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneDef {
    pub name: String,
    pub length: f32,
    #[serde(default, rename = "parentName", skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(rename = "jointStart")]
    pub joint_start: String,
    #[serde(rename = "jointEnd")]
    pub joint_end: String,
    #[serde(default, rename = "bindTransform", skip_serializing_if = "Option::is_none")]
    pub bind_transform: Option<Transform>,
}

/// Flat skeleton definition: `{joints: [...], bones: [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonDef {
    #[serde(default)]
    pub joints: Vec<JointDef>,
    #[serde(default)]
    pub bones: Vec<BoneDef>,
}

/// Sparse per-bone channel data: absent fields mean "do not touch".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneChannels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default, rename = "scaleX", skip_serializing_if = "Option::is_none")]
    pub scale_x: Option<f32>,
    #[serde(default, rename = "scaleY", skip_serializing_if = "Option::is_none")]
    pub scale_y: Option<f32>,
}

impl BoneChannels {
    pub fn is_empty(&self) -> bool {
        self.rotation.is_none()
            && self.x.is_none()
            && self.y.is_none()
            && self.scale_x.is_none()
            && self.scale_y.is_none()
    }

    /// Channels the compiler animates, resolved against neutral defaults
    /// (rotation 0, x 0, y 0).
    #[inline]
    pub fn resolved_motion(&self) -> (f32, f32, f32) {
        (
            self.rotation.unwrap_or(0.0),
            self.x.unwrap_or(0.0),
            self.y.unwrap_or(0.0),
        )
    }
}

/// Pose definition: `{name, boneTransforms: {<bone>: {rotation?, ...}}}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseDef {
    pub name: String,
    #[serde(default, rename = "boneTransforms")]
    pub bone_transforms: HashMap<String, BoneChannels>,
}

/// One waypoint in an action: normalized time, pose reference, optional easing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyframeDef {
    /// Normalized time in [0,1] within the action duration.
    pub time: f32,
    /// Pose name reference, resolved against a `PoseLibrary`.
    pub pose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<String>,
}

/// Action definition: `{name, duration, keyframes, category?}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: String,
    /// Duration in seconds, authoritative for mapping normalized keyframe
    /// times to seconds.
    pub duration: f32,
    #[serde(default)]
    pub keyframes: Vec<KeyframeDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ActionDef {
    /// Validate basic invariants (finite, non-decreasing times in [0,1],
    /// positive duration).
    pub fn validate_basic(&self) -> Result<(), String> {
        if !(self.duration > 0.0) {
            return Err(format!("Action '{}' duration must be > 0 s", self.name));
        }
        let mut last = -f32::INFINITY;
        for kf in &self.keyframes {
            if !kf.time.is_finite() || kf.time < 0.0 || kf.time > 1.0 {
                return Err(format!(
                    "Keyframe time must be in [0,1] and finite in action '{}'",
                    self.name
                ));
            }
            if kf.time < last {
                return Err(format!(
                    "Keyframe times must be non-decreasing in action '{}'",
                    self.name
                ));
            }
            last = kf.time;
        }
        Ok(())
    }
}

/// One scheduled actor+action occurrence at an absolute time within a
/// sequence. Value type; equality is by field values. `target` is semantic
/// only and never enforced against the skeleton.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    /// Absolute seconds within the sequence.
    pub time: f32,
    pub actor: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// Sequence definition: `{name, figures: [names], beats: [...]}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SequenceDef {
    pub name: String,
    #[serde(default)]
    pub figures: Vec<String>,
    #[serde(default)]
    pub beats: Vec<Beat>,
}
