//! Reference humanoid rig: 16 joints, 14 bones.
//!
//! Screen coordinates (y grows downward), angles in degrees with 0° along
//! +x. The pelvis is a zero-length root; the torso points up (-90°), limbs
//! hang straight down (+90° world) in bind pose. Child bones attach at
//! their parent's distal end via a local x offset equal to the parent
//! length.

use crate::data::{BoneDef, JointDef, SkeletonDef};
use crate::transform::Transform;

fn joint(name: &str, x: f32, y: f32) -> JointDef {
    JointDef {
        name: name.into(),
        x,
        y,
    }
}

fn bone(
    name: &str,
    length: f32,
    parent: Option<&str>,
    joints: (&str, &str),
    bind: Transform,
) -> BoneDef {
    BoneDef {
        name: name.into(),
        length,
        parent_name: parent.map(String::from),
        joint_start: joints.0.into(),
        joint_end: joints.1.into(),
        bind_transform: Some(bind),
    }
}

/// The default humanoid skeleton definition.
pub fn default_humanoid() -> SkeletonDef {
    SkeletonDef {
        joints: vec![
            joint("pelvis", 0.0, 0.0),
            joint("chest", 0.0, -50.0),
            joint("neck", 0.0, -60.0),
            joint("head_top", 0.0, -78.0),
            joint("l_shoulder", -12.0, -50.0),
            joint("l_elbow", -12.0, -30.0),
            joint("l_hand", -12.0, -12.0),
            joint("r_shoulder", 12.0, -50.0),
            joint("r_elbow", 12.0, -30.0),
            joint("r_hand", 12.0, -12.0),
            joint("l_hip", -6.0, 0.0),
            joint("l_knee", -6.0, 26.0),
            joint("l_foot", -6.0, 50.0),
            joint("r_hip", 6.0, 0.0),
            joint("r_knee", 6.0, 26.0),
            joint("r_foot", 6.0, 50.0),
        ],
        bones: vec![
            // Zero-length anchor every chain hangs off.
            bone("pelvis", 0.0, None, ("pelvis", "pelvis"), Transform::default()),
            bone(
                "torso",
                50.0,
                Some("pelvis"),
                ("pelvis", "chest"),
                Transform::new(0.0, 0.0, -90.0),
            ),
            bone(
                "neck",
                10.0,
                Some("torso"),
                ("chest", "neck"),
                Transform::new(50.0, 0.0, 0.0),
            ),
            bone(
                "head",
                18.0,
                Some("neck"),
                ("neck", "head_top"),
                Transform::new(10.0, 0.0, 0.0),
            ),
            bone(
                "l_clavicle",
                12.0,
                Some("torso"),
                ("chest", "l_shoulder"),
                Transform::new(50.0, 0.0, -90.0),
            ),
            bone(
                "l_upper_arm",
                20.0,
                Some("l_clavicle"),
                ("l_shoulder", "l_elbow"),
                Transform::new(12.0, 0.0, -90.0),
            ),
            bone(
                "l_forearm",
                18.0,
                Some("l_upper_arm"),
                ("l_elbow", "l_hand"),
                Transform::new(20.0, 0.0, 0.0),
            ),
            bone(
                "r_clavicle",
                12.0,
                Some("torso"),
                ("chest", "r_shoulder"),
                Transform::new(50.0, 0.0, 90.0),
            ),
            bone(
                "r_upper_arm",
                20.0,
                Some("r_clavicle"),
                ("r_shoulder", "r_elbow"),
                Transform::new(12.0, 0.0, 90.0),
            ),
            bone(
                "r_forearm",
                18.0,
                Some("r_upper_arm"),
                ("r_elbow", "r_hand"),
                Transform::new(20.0, 0.0, 0.0),
            ),
            bone(
                "l_thigh",
                26.0,
                Some("pelvis"),
                ("l_hip", "l_knee"),
                Transform::new(-6.0, 0.0, 90.0),
            ),
            bone(
                "l_shin",
                24.0,
                Some("l_thigh"),
                ("l_knee", "l_foot"),
                Transform::new(26.0, 0.0, 0.0),
            ),
            bone(
                "r_thigh",
                26.0,
                Some("pelvis"),
                ("r_hip", "r_knee"),
                Transform::new(6.0, 0.0, 90.0),
            ),
            bone(
                "r_shin",
                24.0,
                Some("r_thigh"),
                ("r_knee", "r_foot"),
                Transform::new(26.0, 0.0, 0.0),
            ),
        ],
    }
}
