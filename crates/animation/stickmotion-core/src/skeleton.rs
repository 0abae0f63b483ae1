//! Bone/joint hierarchy and world-transform propagation.
//!
//! Bones live in an arena (`Vec<Bone>` + name index); each bone stores its
//! parent id and child ids, so the structure is acyclic by construction.
//! `update_transforms` walks every root pre-order (parents strictly before
//! children) and is the only entry point that guarantees a consistent set
//! of world transforms. World positions are only meaningful after a full
//! pass.
//!
//! Construction is permissive: a bone whose declared parent or joint name
//! does not resolve is still created, just left unlinked (it degrades to a
//! root / jointless bone), with a warn diagnostic.

use std::collections::HashMap;

use crate::data::SkeletonDef;
use crate::transform::Transform;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BoneId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct JointId(pub u32);

/// A named attachment point. The bind position is immutable; the world
/// position is derived from the owning bone each transform pass.
#[derive(Clone, Debug)]
pub struct Joint {
    name: String,
    bind_x: f32,
    bind_y: f32,
    world_x: f32,
    world_y: f32,
}

impl Joint {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bind_position(&self) -> (f32, f32) {
        (self.bind_x, self.bind_y)
    }

    pub fn world_position(&self) -> (f32, f32) {
        (self.world_x, self.world_y)
    }
}

/// A rigid segment of fixed length. Carries an immutable bind transform and
/// a mutable local transform; the world transform is recomputed from the
/// ancestor chain by `Skeleton::update_transforms`.
#[derive(Clone, Debug)]
pub struct Bone {
    name: String,
    length: f32,
    bind: Transform,
    local: Transform,
    parent: Option<BoneId>,
    children: Vec<BoneId>,
    joint_start: Option<JointId>,
    joint_end: Option<JointId>,
    world_x: f32,
    world_y: f32,
    /// World rotation in degrees.
    world_rotation: f32,
}

impl Bone {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn bind_transform(&self) -> &Transform {
        &self.bind
    }

    pub fn local_transform(&self) -> &Transform {
        &self.local
    }

    pub fn parent(&self) -> Option<BoneId> {
        self.parent
    }

    pub fn children(&self) -> &[BoneId] {
        &self.children
    }

    pub fn joint_start(&self) -> Option<JointId> {
        self.joint_start
    }

    pub fn joint_end(&self) -> Option<JointId> {
        self.joint_end
    }

    pub fn world_position(&self) -> (f32, f32) {
        (self.world_x, self.world_y)
    }

    /// World rotation in degrees, valid after the last full transform pass.
    pub fn world_rotation(&self) -> f32 {
        self.world_rotation
    }

    /// Rotation relative to bind, in degrees.
    pub fn rotation_from_bind(&self) -> f32 {
        self.local.rotation - self.bind.rotation
    }

    /// Set the rotation relative to bind; re-adds the bind offset so that a
    /// neutral value of 0° reproduces the bind pose exactly.
    pub fn set_rotation(&mut self, degrees: f32) {
        self.local.rotation = self.bind.rotation + degrees;
    }

    /// Set the positional offset relative to bind.
    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.local.x = self.bind.x + x;
        self.local.y = self.bind.y + y;
    }

    /// Set scale relative to bind (multiplicative, so 1 reproduces bind).
    pub fn set_scale(&mut self, scale_x: f32, scale_y: f32) {
        self.local.scale_x = self.bind.scale_x * scale_x;
        self.local.scale_y = self.bind.scale_y * scale_y;
    }

    /// The bone's distal point, derived from its world transform and fixed
    /// length. Zero-length bones collapse start and end.
    pub fn end_point(&self) -> (f32, f32) {
        let r = self.world_rotation.to_radians();
        (
            self.world_x + r.cos() * self.length,
            self.world_y + r.sin() * self.length,
        )
    }
}

/// Owns the full bone and joint arenas plus the list of root bones.
#[derive(Clone, Debug, Default)]
pub struct Skeleton {
    bones: Vec<Bone>,
    joints: Vec<Joint>,
    bone_ids: HashMap<String, BoneId>,
    joint_ids: HashMap<String, JointId>,
    roots: Vec<BoneId>,
}

impl Skeleton {
    /// Build a skeleton from a flat definition. Name references resolve at
    /// construction time; dangling references degrade (parentless bone,
    /// unlinked joint) instead of failing.
    pub fn from_def(def: &SkeletonDef) -> Skeleton {
        let mut sk = Skeleton::default();

        for jd in &def.joints {
            if sk.joint_ids.contains_key(&jd.name) {
                log::warn!("duplicate joint name '{}', keeping the first", jd.name);
                continue;
            }
            let id = JointId(sk.joints.len() as u32);
            sk.joints.push(Joint {
                name: jd.name.clone(),
                bind_x: jd.x,
                bind_y: jd.y,
                world_x: jd.x,
                world_y: jd.y,
            });
            sk.joint_ids.insert(jd.name.clone(), id);
        }

        // First pass: create every bone unlinked.
        for bd in &def.bones {
            if sk.bone_ids.contains_key(&bd.name) {
                log::warn!("duplicate bone name '{}', keeping the first", bd.name);
                continue;
            }
            let id = BoneId(sk.bones.len() as u32);
            let bind = bd.bind_transform.unwrap_or_default();
            let joint_start = sk.joint_ids.get(&bd.joint_start).copied();
            if joint_start.is_none() {
                log::warn!(
                    "bone '{}' references unknown start joint '{}'",
                    bd.name,
                    bd.joint_start
                );
            }
            let joint_end = sk.joint_ids.get(&bd.joint_end).copied();
            if joint_end.is_none() {
                log::warn!(
                    "bone '{}' references unknown end joint '{}'",
                    bd.name,
                    bd.joint_end
                );
            }
            sk.bones.push(Bone {
                name: bd.name.clone(),
                length: bd.length,
                bind,
                local: bind,
                parent: None,
                children: Vec::new(),
                joint_start,
                joint_end,
                world_x: bind.x,
                world_y: bind.y,
                world_rotation: bind.rotation,
            });
            sk.bone_ids.insert(bd.name.clone(), id);
        }

        // Second pass: link parents; a dangling parent name leaves the bone
        // as a root.
        for bd in &def.bones {
            let Some(&child) = sk.bone_ids.get(&bd.name) else {
                continue;
            };
            if let Some(parent_name) = &bd.parent_name {
                match sk.bone_ids.get(parent_name).copied() {
                    Some(parent) if parent != child => {
                        sk.bones[child.0 as usize].parent = Some(parent);
                        sk.bones[parent.0 as usize].children.push(child);
                    }
                    Some(_) => {
                        log::warn!("bone '{}' declares itself as parent, ignored", bd.name);
                    }
                    None => {
                        log::warn!(
                            "bone '{}' references unknown parent '{}', left as root",
                            bd.name,
                            parent_name
                        );
                    }
                }
            }
        }

        for (idx, bone) in sk.bones.iter().enumerate() {
            if bone.parent.is_none() {
                sk.roots.push(BoneId(idx as u32));
            }
        }

        sk.update_transforms();
        sk
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn roots(&self) -> &[BoneId] {
        &self.roots
    }

    pub fn bone_id(&self, name: &str) -> Option<BoneId> {
        self.bone_ids.get(name).copied()
    }

    pub fn joint_id(&self, name: &str) -> Option<JointId> {
        self.joint_ids.get(name).copied()
    }

    pub fn bone(&self, id: BoneId) -> &Bone {
        &self.bones[id.0 as usize]
    }

    pub fn bone_mut(&mut self, id: BoneId) -> &mut Bone {
        &mut self.bones[id.0 as usize]
    }

    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.bone_id(name).map(|id| self.bone(id))
    }

    pub fn bone_by_name_mut(&mut self, name: &str) -> Option<&mut Bone> {
        self.bone_id(name).map(|id| &mut self.bones[id.0 as usize])
    }

    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.0 as usize]
    }

    pub fn joint_by_name(&self, name: &str) -> Option<&Joint> {
        self.joint_id(name).map(|id| self.joint(id))
    }

    pub fn iter_bones(&self) -> impl Iterator<Item = &Bone> {
        self.bones.iter()
    }

    /// Recompute every bone's world transform, walking all roots pre-order
    /// exactly once. Joint world positions are refreshed from their owning
    /// bones in the same pass.
    pub fn update_transforms(&mut self) {
        let mut stack: Vec<BoneId> = Vec::with_capacity(self.bones.len());
        for &root in self.roots.iter().rev() {
            stack.push(root);
        }
        while let Some(id) = stack.pop() {
            let parent_frame = self.bones[id.0 as usize]
                .parent
                .map(|p| {
                    let pb = &self.bones[p.0 as usize];
                    (pb.world_x, pb.world_y, pb.world_rotation)
                });

            let bone = &mut self.bones[id.0 as usize];
            match parent_frame {
                Some((px, py, prot)) => {
                    // Rotate the local offset into the parent's frame, then
                    // translate.
                    let pr = prot.to_radians();
                    let (sin, cos) = pr.sin_cos();
                    bone.world_rotation = prot + bone.local.rotation;
                    bone.world_x = px + bone.local.x * cos - bone.local.y * sin;
                    bone.world_y = py + bone.local.x * sin + bone.local.y * cos;
                }
                None => {
                    // A root bone's world transform equals its local
                    // transform verbatim.
                    bone.world_rotation = bone.local.rotation;
                    bone.world_x = bone.local.x;
                    bone.world_y = bone.local.y;
                }
            }

            let (start, end) = (bone.joint_start, bone.joint_end);
            let origin = (bone.world_x, bone.world_y);
            let tip = bone.end_point();
            if let Some(j) = start {
                let joint = &mut self.joints[j.0 as usize];
                joint.world_x = origin.0;
                joint.world_y = origin.1;
            }
            if let Some(j) = end {
                let joint = &mut self.joints[j.0 as usize];
                joint.world_x = tip.0;
                joint.world_y = tip.1;
            }

            let bone = &self.bones[id.0 as usize];
            for &child in bone.children.iter().rev() {
                stack.push(child);
            }
        }
    }

    /// Restore every bone's local transform to its bind copy and recompute
    /// world transforms.
    pub fn reset_to_bind(&mut self) {
        for bone in &mut self.bones {
            bone.local = bone.bind;
        }
        self.update_transforms();
    }
}
