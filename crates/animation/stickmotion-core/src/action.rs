//! Actions: named, timestamped pose references compiled into timelines.
//!
//! An action is an ordered keyframe list (normalized time, pose name,
//! optional easing). Compilation walks every bone touched by any referenced
//! pose and schedules one tween per consecutive keyframe pair, so segments
//! for a single bone are contiguous and never overlap, while segments for
//! different bones are independent. Each tween apply writes the current
//! interpolated values through the skeleton's bind-relative setters,
//! recomputes world transforms, then invokes the redraw callback.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::animator::Timeline;
use crate::data::{ActionDef, KeyframeDef};
use crate::interp::functions::{lerp_f32, wrap_deg};
use crate::interp::Easing;
use crate::library::PoseLibrary;
use crate::pose::Pose;
use crate::skeleton::Skeleton;

/// Redraw notification invoked after each animated step.
pub type RedrawFn = Rc<dyn Fn()>;

/// One waypoint: (normalized time, pose reference, optional easing curve).
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Normalized time in [0,1] against the action duration.
    pub time: f32,
    /// Pose name, resolved against a `PoseLibrary`.
    pub pose: String,
    /// Easing into this keyframe; `None` means the default smooth in-out.
    pub easing: Option<Easing>,
}

/// A named ordered list of timestamped pose references. Keyframes are
/// assumed sorted ascending by time.
#[derive(Clone, Debug, PartialEq)]
pub struct Action {
    pub name: String,
    /// Duration in seconds.
    pub duration: f32,
    pub keyframes: Vec<Keyframe>,
    pub category: Option<String>,
}

impl Action {
    pub fn from_def(def: ActionDef) -> Action {
        Action {
            name: def.name,
            duration: def.duration,
            keyframes: def
                .keyframes
                .into_iter()
                .map(|kf| Keyframe {
                    time: kf.time,
                    pose: kf.pose,
                    easing: kf.easing.as_deref().map(Easing::from_name_or_default),
                })
                .collect(),
            category: def.category,
        }
    }

    pub fn to_def(&self) -> ActionDef {
        ActionDef {
            name: self.name.clone(),
            duration: self.duration,
            keyframes: self
                .keyframes
                .iter()
                .map(|kf| KeyframeDef {
                    time: kf.time,
                    pose: kf.pose.clone(),
                    easing: kf.easing.map(|e| e.name().to_string()),
                })
                .collect(),
            category: self.category.clone(),
        }
    }

    /// The set of bones touched by any keyframe's referenced pose, in
    /// deterministic (sorted) order. Unresolvable pose references
    /// contribute nothing.
    pub fn touched_bones(&self, poses: &PoseLibrary) -> Vec<String> {
        let mut bones = BTreeSet::new();
        for kf in &self.keyframes {
            let Some(pose) = poses.get(&kf.pose) else {
                log::debug!(
                    "action '{}' references unknown pose '{}'",
                    self.name,
                    kf.pose
                );
                continue;
            };
            for bone in pose.bone_names() {
                bones.insert(bone.to_string());
            }
        }
        bones.into_iter().collect()
    }

    /// Animated motion channels `{rotation, x, y}` of `bone` at `kf`,
    /// defaulting missing channels (and unresolvable poses) to neutral.
    fn resolve_motion(&self, kf: &Keyframe, bone: &str, poses: &PoseLibrary) -> (f32, f32, f32) {
        poses
            .get(&kf.pose)
            .and_then(|p| p.channels(bone))
            .copied()
            .unwrap_or_default()
            .resolved_motion()
    }

    /// Compile this action against a skeleton and pose library into a
    /// timeline. Every apply step writes back into the skeleton (rotation
    /// setters re-add the bind offset), triggers a full transform
    /// recomputation and invokes `on_update`.
    pub fn create_timeline(
        &self,
        skeleton: Rc<RefCell<Skeleton>>,
        poses: &PoseLibrary,
        on_update: RedrawFn,
    ) -> Timeline {
        let mut timeline = Timeline::new();
        for bone_name in self.touched_bones(poses) {
            let Some(bone_id) = skeleton.borrow().bone_id(&bone_name) else {
                log::debug!(
                    "action '{}' touches unknown bone '{}', skipped",
                    self.name,
                    bone_name
                );
                continue;
            };

            if self.keyframes.len() == 1 {
                // A single keyframe degenerates to an instantaneous set.
                let kf = &self.keyframes[0];
                let to = self.resolve_motion(kf, &bone_name, poses);
                let at = kf.time * self.duration;
                let sk = skeleton.clone();
                let redraw = on_update.clone();
                timeline.add_tween(
                    at,
                    0.0,
                    kf.easing.unwrap_or_default(),
                    Box::new(move |_| {
                        let mut sk = sk.borrow_mut();
                        let bone = sk.bone_mut(bone_id);
                        bone.set_rotation(to.0);
                        bone.set_offset(to.1, to.2);
                        sk.update_transforms();
                        redraw();
                    }),
                );
                continue;
            }

            for pair in self.keyframes.windows(2) {
                let (left, right) = (&pair[0], &pair[1]);
                let from = self.resolve_motion(left, &bone_name, poses);
                let to = self.resolve_motion(right, &bone_name, poses);
                let start = left.time * self.duration;
                let span = (right.time - left.time).max(0.0) * self.duration;
                // Shortest-path rotation delta, fixed at compile time.
                let rot_delta = wrap_deg(to.0 - from.0);
                let sk = skeleton.clone();
                let redraw = on_update.clone();
                timeline.add_tween(
                    start,
                    span,
                    right.easing.unwrap_or_default(),
                    Box::new(move |eased| {
                        {
                            let mut sk = sk.borrow_mut();
                            let bone = sk.bone_mut(bone_id);
                            bone.set_rotation(from.0 + rot_delta * eased);
                            bone.set_offset(
                                lerp_f32(from.1, to.1, eased),
                                lerp_f32(from.2, to.2, eased),
                            );
                            sk.update_transforms();
                        }
                        redraw();
                    }),
                );
            }
        }
        timeline
    }

    /// Non-destructive preview: the instantaneous pose at normalized `t`,
    /// clamped to the first/last keyframe pose outside the keyframe range.
    /// Matches what a live-driven timeline reports at `t * duration` for a
    /// linear segment (easing applies to the live playhead only).
    pub fn pose_at(&self, t: f32, poses: &PoseLibrary) -> Option<Pose> {
        let kfs = &self.keyframes;
        if kfs.is_empty() {
            return None;
        }
        let resolve = |kf: &Keyframe| -> Pose {
            poses.get(&kf.pose).cloned().unwrap_or_else(|| {
                log::debug!(
                    "action '{}' references unknown pose '{}'",
                    self.name,
                    kf.pose
                );
                Pose::new(kf.pose.clone())
            })
        };

        if t <= kfs[0].time || kfs.len() == 1 {
            return Some(resolve(&kfs[0]));
        }
        if t >= kfs[kfs.len() - 1].time {
            return Some(resolve(&kfs[kfs.len() - 1]));
        }
        for pair in kfs.windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            if t >= left.time && t <= right.time {
                let denom = (right.time - left.time).max(f32::EPSILON);
                let local = ((t - left.time) / denom).clamp(0.0, 1.0);
                return Some(Pose::lerp(&resolve(left), &resolve(right), local));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BoneChannels;
    use crate::library::PoseLibrary;

    fn library() -> PoseLibrary {
        let mut lib = PoseLibrary::new();
        lib.insert(Pose::new("down").with_bone(
            "arm",
            BoneChannels {
                rotation: Some(0.0),
                ..Default::default()
            },
        ));
        lib.insert(Pose::new("up").with_bone(
            "arm",
            BoneChannels {
                rotation: Some(-90.0),
                x: Some(4.0),
                ..Default::default()
            },
        ));
        lib
    }

    fn action() -> Action {
        Action {
            name: "raise".into(),
            duration: 2.0,
            keyframes: vec![
                Keyframe {
                    time: 0.0,
                    pose: "down".into(),
                    easing: None,
                },
                Keyframe {
                    time: 1.0,
                    pose: "up".into(),
                    easing: Some(Easing::Linear),
                },
            ],
            category: None,
        }
    }

    #[test]
    fn touched_bones_unions_keyframe_poses() {
        let lib = library();
        assert_eq!(action().touched_bones(&lib), vec!["arm".to_string()]);
    }

    #[test]
    fn preview_clamps_outside_range() {
        let lib = library();
        let a = action();
        let before = a.pose_at(-0.5, &lib).unwrap();
        assert_eq!(before.channels("arm").unwrap().rotation, Some(0.0));
        let after = a.pose_at(1.5, &lib).unwrap();
        assert_eq!(after.channels("arm").unwrap().rotation, Some(-90.0));
    }

    #[test]
    fn preview_interpolates_bracketing_pair() {
        let lib = library();
        let mid = action().pose_at(0.5, &lib).unwrap();
        let ch = mid.channels("arm").unwrap();
        assert_eq!(ch.rotation, Some(-45.0));
        assert_eq!(ch.x, Some(2.0));
    }

    #[test]
    fn empty_action_previews_nothing() {
        let lib = library();
        let a = Action {
            name: "void".into(),
            duration: 1.0,
            keyframes: vec![],
            category: None,
        };
        assert!(a.pose_at(0.5, &lib).is_none());
    }
}
