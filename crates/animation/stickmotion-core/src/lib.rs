//! Stickmotion core (renderer-agnostic)
//!
//! Kinematics and animation blending for 2D articulated stick figures:
//! bone/joint hierarchy with world-transform propagation, sparse named
//! poses with angle-aware interpolation, keyframe actions compiled into
//! timelines, and a sequence scheduler that merges many actors'
//! independently-timed actions into one pausable, scrubbable master
//! timeline.
//!
//! Rendering is external: after each tick, consumers read per-bone world
//! positions, world rotations (degrees) and derived end points off the
//! skeleton, nothing more. Everything is single-threaded and cooperative;
//! the host drives playback via `advance(dt)` on its own clock.
//!
//! Failure policy: name lookups that miss return `Option`/empty results,
//! dangling skeleton references degrade to unlinked bones, and
//! unresolvable beats are skipped with a `log` diagnostic. Only malformed
//! JSON input surfaces as an error (`loader::LoadError`).

pub mod action;
pub mod animator;
pub mod data;
pub mod events;
pub mod figure;
pub mod interp;
pub mod library;
pub mod loader;
pub mod pose;
pub mod rig;
pub mod sequence;
pub mod skeleton;
pub mod transform;

// Re-exports for consumers (renderers, tooling)
pub use action::{Action, Keyframe, RedrawFn};
pub use animator::{PlayState, Timeline};
pub use data::{
    ActionDef, Beat, BoneChannels, BoneDef, JointDef, KeyframeDef, PoseDef, SequenceDef,
    SkeletonDef,
};
pub use events::SequenceEvent;
pub use figure::Figure;
pub use interp::Easing;
pub use library::{ActionLibrary, Libraries, PoseLibrary};
pub use loader::{
    parse_action_json, parse_action_library_json, parse_pose_json, parse_pose_library_json,
    parse_sequence_json, parse_skeleton_json, LoadError,
};
pub use pose::Pose;
pub use rig::default_humanoid;
pub use sequence::{Sequence, SequenceState};
pub use skeleton::{Bone, BoneId, Joint, JointId, Skeleton};
pub use transform::Transform;
