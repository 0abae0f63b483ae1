//! Named sparse poses: bone-name → partial channel data.
//!
//! A pose never zeroes channels it does not mention. `lerp` works over the
//! union of bone names in either operand; a channel present in either side
//! interpolates against the absent side's neutral default (rotation/x/y → 0,
//! scale → 1), while a channel absent from both sides stays absent
//! (sparse-in, sparse-out). Rotation interpolates along the shortest
//! angular path.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::{BoneChannels, PoseDef};
use crate::interp::functions::{lerp_angle_deg, lerp_f32};
use crate::skeleton::Skeleton;

/// A named, sparse mapping from bone name to partial transform data.
/// Value object: cloning yields an independent copy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub name: String,
    #[serde(rename = "boneTransforms")]
    pub bones: HashMap<String, BoneChannels>,
}

fn lerp_channel(a: Option<f32>, b: Option<f32>, neutral: f32, t: f32) -> Option<f32> {
    match (a, b) {
        (None, None) => None,
        _ => Some(lerp_f32(a.unwrap_or(neutral), b.unwrap_or(neutral), t)),
    }
}

fn lerp_rotation(a: Option<f32>, b: Option<f32>, t: f32) -> Option<f32> {
    match (a, b) {
        (None, None) => None,
        _ => Some(lerp_angle_deg(a.unwrap_or(0.0), b.unwrap_or(0.0), t)),
    }
}

fn diff_channel(from: Option<f32>, to: Option<f32>, neutral: f32) -> Option<f32> {
    to.map(|v| v - from.unwrap_or(neutral))
}

impl Pose {
    pub fn new(name: impl Into<String>) -> Pose {
        Pose {
            name: name.into(),
            bones: HashMap::new(),
        }
    }

    pub fn from_def(def: PoseDef) -> Pose {
        Pose {
            name: def.name,
            bones: def.bone_transforms,
        }
    }

    pub fn to_def(&self) -> PoseDef {
        PoseDef {
            name: self.name.clone(),
            bone_transforms: self.bones.clone(),
        }
    }

    /// Builder-style channel insert, mainly for authoring defaults and tests.
    pub fn with_bone(mut self, bone: impl Into<String>, channels: BoneChannels) -> Pose {
        self.bones.insert(bone.into(), channels);
        self
    }

    pub fn channels(&self, bone: &str) -> Option<&BoneChannels> {
        self.bones.get(bone)
    }

    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.keys().map(String::as_str)
    }

    /// Interpolate between two poses over the union of their bone names.
    pub fn lerp(a: &Pose, b: &Pose, t: f32) -> Pose {
        let mut out = Pose::new(format!("{}~{}", a.name, b.name));
        let empty = BoneChannels::default();
        for name in a.bones.keys().chain(b.bones.keys()) {
            if out.bones.contains_key(name) {
                continue;
            }
            let ca = a.bones.get(name).unwrap_or(&empty);
            let cb = b.bones.get(name).unwrap_or(&empty);
            let mixed = BoneChannels {
                rotation: lerp_rotation(ca.rotation, cb.rotation, t),
                x: lerp_channel(ca.x, cb.x, 0.0, t),
                y: lerp_channel(ca.y, cb.y, 0.0, t),
                scale_x: lerp_channel(ca.scale_x, cb.scale_x, 1.0, t),
                scale_y: lerp_channel(ca.scale_y, cb.scale_y, 1.0, t),
            };
            if !mixed.is_empty() {
                out.bones.insert(name.clone(), mixed);
            }
        }
        out
    }

    /// Delta pose: target-minus-source for every channel explicitly present
    /// in `to`. Channels absent in `to` are never emitted, even when present
    /// in `from`.
    pub fn difference(from: &Pose, to: &Pose) -> Pose {
        let mut out = Pose::new(format!("{}-{}", to.name, from.name));
        let empty = BoneChannels::default();
        for (name, ct) in &to.bones {
            let cf = from.bones.get(name).unwrap_or(&empty);
            let delta = BoneChannels {
                rotation: diff_channel(cf.rotation, ct.rotation, 0.0),
                x: diff_channel(cf.x, ct.x, 0.0),
                y: diff_channel(cf.y, ct.y, 0.0),
                scale_x: diff_channel(cf.scale_x, ct.scale_x, 0.0),
                scale_y: diff_channel(cf.scale_y, ct.scale_y, 0.0),
            };
            if !delta.is_empty() {
                out.bones.insert(name.clone(), delta);
            }
        }
        out
    }

    /// Write the pose onto a skeleton, touching only explicitly present
    /// channels, then recompute world transforms. Bone names that do not
    /// resolve are ignored.
    pub fn apply_to(&self, skeleton: &mut Skeleton) {
        for (name, ch) in &self.bones {
            let Some(bone) = skeleton.bone_by_name_mut(name) else {
                continue;
            };
            if let Some(rot) = ch.rotation {
                bone.set_rotation(rot);
            }
            match (ch.x, ch.y) {
                (None, None) => {}
                (x, y) => {
                    let local = *bone.local_transform();
                    let bind = *bone.bind_transform();
                    bone.set_offset(
                        x.unwrap_or(local.x - bind.x),
                        y.unwrap_or(local.y - bind.y),
                    );
                }
            }
            match (ch.scale_x, ch.scale_y) {
                (None, None) => {}
                (sx, sy) => {
                    let local = *bone.local_transform();
                    let bind = *bone.bind_transform();
                    let current_sx = if bind.scale_x != 0.0 {
                        local.scale_x / bind.scale_x
                    } else {
                        1.0
                    };
                    let current_sy = if bind.scale_y != 0.0 {
                        local.scale_y / bind.scale_y
                    } else {
                        1.0
                    };
                    bone.set_scale(sx.unwrap_or(current_sx), sy.unwrap_or(current_sy));
                }
            }
        }
        skeleton.update_transforms();
    }
}
