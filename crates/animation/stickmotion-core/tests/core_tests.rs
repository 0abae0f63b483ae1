use stickmotion_core::{
    data::BoneChannels,
    library::Libraries,
    pose::Pose,
    rig::default_humanoid,
    skeleton::Skeleton,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn rot(deg: f32) -> BoneChannels {
    BoneChannels {
        rotation: Some(deg),
        ..Default::default()
    }
}

/// it should reproduce every bind-declared world position after reset
#[test]
fn bind_pose_identity() {
    let def = default_humanoid();
    let mut sk = Skeleton::from_def(&def);

    // Scribble over the whole rig, then reset.
    let names: Vec<String> = sk.iter_bones().map(|b| b.name().to_string()).collect();
    for name in &names {
        let id = sk.bone_id(name).unwrap();
        let bone = sk.bone_mut(id);
        bone.set_rotation(33.0);
        bone.set_offset(5.0, -4.0);
    }
    sk.update_transforms();
    sk.reset_to_bind();

    let reference = Skeleton::from_def(&def);
    for name in &names {
        let got = sk.bone_by_name(name).unwrap();
        let want = reference.bone_by_name(name).unwrap();
        approx(got.world_position().0, want.world_position().0, 1e-4);
        approx(got.world_position().1, want.world_position().1, 1e-4);
        approx(got.world_rotation(), want.world_rotation(), 1e-4);
        assert_eq!(got.rotation_from_bind(), 0.0, "{name}");
    }
}

/// it should rotate every descendant about the parent's world origin
#[test]
fn hierarchy_propagation_rotates_descendants() {
    let mut sk = Skeleton::from_def(&default_humanoid());
    let before: Vec<(String, (f32, f32))> = sk
        .iter_bones()
        .map(|b| (b.name().to_string(), b.world_position()))
        .collect();

    let theta: f32 = 30.0;
    let torso = sk.bone_id("torso").unwrap();
    let pivot = sk.bone(torso).world_position();
    sk.bone_mut(torso).set_rotation(theta);
    sk.update_transforms();

    let (sin, cos) = theta.to_radians().sin_cos();
    let descendants = ["neck", "head", "l_clavicle", "l_upper_arm", "r_forearm"];
    for name in descendants {
        let (bx, by) = before
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| *p)
            .unwrap();
        // Expected: the old position rotated by theta about the torso origin.
        let dx = bx - pivot.0;
        let dy = by - pivot.1;
        let expect = (pivot.0 + dx * cos - dy * sin, pivot.1 + dx * sin + dy * cos);
        let got = sk.bone_by_name(name).unwrap().world_position();
        approx(got.0, expect.0, 1e-3);
        approx(got.1, expect.1, 1e-3);
        // Descendant locals stay untouched.
        assert_eq!(sk.bone_by_name(name).unwrap().rotation_from_bind(), 0.0);
    }
    // Legs hang off the pelvis, not the torso: unaffected.
    let (lx, ly) = sk.bone_by_name("l_shin").unwrap().world_position();
    let (ox, oy) = before
        .iter()
        .find(|(n, _)| n == "l_shin")
        .map(|(_, p)| *p)
        .unwrap();
    approx(lx, ox, 1e-4);
    approx(ly, oy, 1e-4);
}

/// it should satisfy lerp(A,B,0)==A and lerp(A,B,1)==B per present channel
#[test]
fn lerp_boundary_over_default_poses() {
    let libs = Libraries::with_defaults();
    let a = libs.poses.get("guard").unwrap();
    let b = libs.poses.get("jab-extended").unwrap();

    let at0 = Pose::lerp(a, b, 0.0);
    let at1 = Pose::lerp(a, b, 1.0);
    for (pose, sample) in [(a, &at0), (b, &at1)] {
        for bone in pose.bone_names() {
            let want = pose.channels(bone).unwrap();
            let got = sample.channels(bone).unwrap();
            if let (Some(w), Some(g)) = (want.rotation, got.rotation) {
                approx(g, w, 1e-4);
            }
        }
    }
}

#[test]
fn difference_builds_delta_pose() {
    let from = Pose::new("from")
        .with_bone("torso", rot(-5.0))
        .with_bone("r_upper_arm", rot(40.0));
    let to = Pose::new("to").with_bone("r_upper_arm", rot(95.0));
    let delta = Pose::difference(&from, &to);
    assert_eq!(delta.channels("r_upper_arm").unwrap().rotation, Some(55.0));
    assert!(delta.channels("torso").is_none());
}

#[test]
fn pose_application_reaches_world_transforms() {
    let libs = Libraries::with_defaults();
    let mut sk = Skeleton::from_def(&default_humanoid());
    let hand_before = sk.bone_by_name("r_forearm").unwrap().end_point();
    libs.poses.get("jab-extended").unwrap().apply_to(&mut sk);
    let hand_after = sk.bone_by_name("r_forearm").unwrap().end_point();
    assert!(
        (hand_before.0 - hand_after.0).abs() > 1.0
            || (hand_before.1 - hand_after.1).abs() > 1.0,
        "jab should move the lead hand"
    );
    // Bones the pose never mentions keep their bind rotation.
    assert_eq!(sk.bone_by_name("l_thigh").unwrap().rotation_from_bind(), 0.0);
}
