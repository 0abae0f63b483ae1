//! Name-keyed pose and action libraries.
//!
//! Libraries are plain associative lookup tables, explicitly constructed and
//! passed to whichever component needs them (never ambient globals), so
//! independent libraries can coexist. They are read-only during playback;
//! mutation happens at load time.

use std::collections::HashMap;

use crate::action::{Action, Keyframe};
use crate::data::BoneChannels;
use crate::interp::Easing;
use crate::pose::Pose;

#[derive(Clone, Debug, Default)]
pub struct PoseLibrary {
    poses: HashMap<String, Pose>,
}

impl PoseLibrary {
    pub fn new() -> PoseLibrary {
        PoseLibrary::default()
    }

    /// Insert keyed by the pose's own name, replacing any previous entry.
    pub fn insert(&mut self, pose: Pose) {
        self.poses.insert(pose.name.clone(), pose);
    }

    pub fn get(&self, name: &str) -> Option<&Pose> {
        self.poses.get(name)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.poses.keys().map(String::as_str)
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActionLibrary {
    actions: HashMap<String, Action>,
}

impl ActionLibrary {
    pub fn new() -> ActionLibrary {
        ActionLibrary::default()
    }

    pub fn insert(&mut self, action: Action) {
        self.actions.insert(action.name.clone(), action);
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

/// Bundled lookup context handed to figures and sequences.
#[derive(Clone, Debug, Default)]
pub struct Libraries {
    pub poses: PoseLibrary,
    pub actions: ActionLibrary,
}

fn rot(deg: f32) -> BoneChannels {
    BoneChannels {
        rotation: Some(deg),
        ..Default::default()
    }
}

fn kf(time: f32, pose: &str, easing: Option<Easing>) -> Keyframe {
    Keyframe {
        time,
        pose: pose.into(),
        easing,
    }
}

impl Libraries {
    pub fn new() -> Libraries {
        Libraries::default()
    }

    /// The standard pose/action set for the reference humanoid rig
    /// (`rig::default_humanoid`). Rotations are degrees relative to bind.
    pub fn with_defaults() -> Libraries {
        let mut libs = Libraries::new();

        // Relaxed stance, arms hanging.
        libs.poses.insert(
            Pose::new("idle")
                .with_bone("torso", rot(0.0))
                .with_bone("l_upper_arm", rot(5.0))
                .with_bone("r_upper_arm", rot(-5.0))
                .with_bone("l_forearm", rot(5.0))
                .with_bone("r_forearm", rot(-5.0)),
        );
        libs.poses.insert(
            Pose::new("idle-sway")
                .with_bone("torso", rot(2.0))
                .with_bone("l_upper_arm", rot(8.0))
                .with_bone("r_upper_arm", rot(-8.0)),
        );
        // Fists up, elbows bent.
        libs.poses.insert(
            Pose::new("guard")
                .with_bone("torso", rot(-5.0))
                .with_bone("l_upper_arm", rot(-40.0))
                .with_bone("l_forearm", rot(-90.0))
                .with_bone("r_upper_arm", rot(40.0))
                .with_bone("r_forearm", rot(90.0)),
        );
        // Rear hand snapped straight out.
        libs.poses.insert(
            Pose::new("jab-extended")
                .with_bone("torso", rot(-10.0))
                .with_bone("r_upper_arm", rot(95.0))
                .with_bone("r_forearm", rot(0.0)),
        );
        libs.poses.insert(
            Pose::new("cross-extended")
                .with_bone("torso", rot(-20.0))
                .with_bone("l_upper_arm", rot(-100.0))
                .with_bone("l_forearm", rot(0.0)),
        );
        libs.poses.insert(
            Pose::new("kick-raised")
                .with_bone("torso", rot(8.0))
                .with_bone("r_thigh", rot(-70.0))
                .with_bone("r_shin", rot(-80.0)),
        );
        libs.poses.insert(
            Pose::new("kick-extended")
                .with_bone("torso", rot(12.0))
                .with_bone("r_thigh", rot(-85.0))
                .with_bone("r_shin", rot(0.0)),
        );
        // Forearms crossed in front of the head.
        libs.poses.insert(
            Pose::new("block")
                .with_bone("torso", rot(3.0))
                .with_bone("l_upper_arm", rot(-60.0))
                .with_bone("l_forearm", rot(-110.0))
                .with_bone("r_upper_arm", rot(60.0))
                .with_bone("r_forearm", rot(110.0)),
        );
        libs.poses.insert(
            Pose::new("hit-react")
                .with_bone("torso", rot(18.0))
                .with_bone("neck", rot(10.0))
                .with_bone("l_upper_arm", rot(-25.0))
                .with_bone("r_upper_arm", rot(25.0)),
        );

        libs.actions.insert(Action {
            name: "idle".into(),
            duration: 1.0,
            keyframes: vec![
                kf(0.0, "idle", None),
                kf(0.5, "idle-sway", None),
                kf(1.0, "idle", None),
            ],
            category: Some("neutral".into()),
        });
        libs.actions.insert(Action {
            name: "jab".into(),
            duration: 0.3,
            keyframes: vec![
                kf(0.0, "guard", None),
                kf(0.4, "jab-extended", Some(Easing::Power2Out)),
                kf(1.0, "guard", Some(Easing::EaseInOut)),
            ],
            category: Some("attack".into()),
        });
        libs.actions.insert(Action {
            name: "cross".into(),
            duration: 0.4,
            keyframes: vec![
                kf(0.0, "guard", None),
                kf(0.5, "cross-extended", Some(Easing::Power2Out)),
                kf(1.0, "guard", Some(Easing::EaseInOut)),
            ],
            category: Some("attack".into()),
        });
        libs.actions.insert(Action {
            name: "kick".into(),
            duration: 0.5,
            keyframes: vec![
                kf(0.0, "guard", None),
                kf(0.35, "kick-raised", Some(Easing::Power2In)),
                kf(0.7, "kick-extended", Some(Easing::Power2Out)),
                kf(1.0, "guard", Some(Easing::EaseInOut)),
            ],
            category: Some("attack".into()),
        });
        libs.actions.insert(Action {
            name: "block".into(),
            duration: 0.25,
            keyframes: vec![
                kf(0.0, "guard", None),
                kf(0.5, "block", Some(Easing::Power2Out)),
                kf(1.0, "guard", None),
            ],
            category: Some("defense".into()),
        });
        libs.actions.insert(Action {
            name: "hit-react".into(),
            duration: 0.35,
            keyframes: vec![
                kf(0.0, "guard", None),
                kf(0.4, "hit-react", Some(Easing::BackOut)),
                kf(1.0, "guard", Some(Easing::EaseInOut)),
            ],
            category: Some("reaction".into()),
        });

        libs
    }
}
