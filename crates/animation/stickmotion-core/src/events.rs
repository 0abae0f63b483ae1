//! Semantic notifications emitted while a sequence plays.
//!
//! Sequences collect events into a drainable queue; external observers
//! (renderers, sound, UI) poll after ticking. Transform data never travels
//! through events, only through the skeleton.

/// Discrete signals emitted by a sequence's master timeline.
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceEvent {
    /// A beat's sub-timeline started: fired at the beat offset while the
    /// playhead crosses it moving forward.
    BeatStarted {
        /// Absolute seconds within the sequence.
        time: f32,
        actor: String,
        action: String,
        target: Option<String>,
    },
}
