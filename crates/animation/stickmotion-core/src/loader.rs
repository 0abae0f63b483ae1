//! JSON loaders for the definition formats in `data`.
//!
//! Plain data round-trip: parse, validate basics, hand back runtime types.
//! All loaders return `Result<_, LoadError>`; lookup-style failures inside
//! the core stay `Option`-based (see the crate docs), only malformed input
//! surfaces as an error here.

use thiserror::Error;

use crate::action::Action;
use crate::data::{ActionDef, PoseDef, SequenceDef, SkeletonDef};
use crate::library::{ActionLibrary, PoseLibrary};
use crate::pose::Pose;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid definition: {0}")]
    Invalid(String),
}

/// Parse a `{joints, bones}` skeleton definition.
pub fn parse_skeleton_json(s: &str) -> Result<SkeletonDef, LoadError> {
    Ok(serde_json::from_str(s)?)
}

/// Parse a `{name, boneTransforms}` pose definition.
pub fn parse_pose_json(s: &str) -> Result<Pose, LoadError> {
    let def: PoseDef = serde_json::from_str(s)?;
    Ok(Pose::from_def(def))
}

/// Parse a `{name, duration, keyframes, category?}` action definition,
/// validating basic invariants (positive duration, sorted normalized times).
pub fn parse_action_json(s: &str) -> Result<Action, LoadError> {
    let def: ActionDef = serde_json::from_str(s)?;
    def.validate_basic().map_err(LoadError::Invalid)?;
    Ok(Action::from_def(def))
}

/// Parse a `{name, figures, beats}` sequence definition. Actor/action name
/// references are resolved later, at build time.
pub fn parse_sequence_json(s: &str) -> Result<SequenceDef, LoadError> {
    Ok(serde_json::from_str(s)?)
}

/// Parse a JSON array of pose definitions into a library.
pub fn parse_pose_library_json(s: &str) -> Result<PoseLibrary, LoadError> {
    let defs: Vec<PoseDef> = serde_json::from_str(s)?;
    let mut lib = PoseLibrary::new();
    for def in defs {
        lib.insert(Pose::from_def(def));
    }
    Ok(lib)
}

/// Parse a JSON array of action definitions into a library.
pub fn parse_action_library_json(s: &str) -> Result<ActionLibrary, LoadError> {
    let defs: Vec<ActionDef> = serde_json::from_str(s)?;
    let mut lib = ActionLibrary::new();
    for def in defs {
        def.validate_basic().map_err(LoadError::Invalid)?;
        lib.insert(Action::from_def(def));
    }
    Ok(lib)
}
