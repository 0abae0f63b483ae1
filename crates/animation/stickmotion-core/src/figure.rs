//! A figure: a named skeleton instance plus its currently active action.
//!
//! The skeleton is exclusively mutated by whichever one action timeline is
//! current for the figure; performing a new action always kills the previous
//! timeline first, so at most one action is active per figure at any
//! instant.

use std::cell::RefCell;
use std::rc::Rc;

use crate::action::{Action, RedrawFn};
use crate::animator::Timeline;
use crate::library::PoseLibrary;
use crate::skeleton::Skeleton;

pub struct Figure {
    name: String,
    skeleton: Rc<RefCell<Skeleton>>,
    current: Option<Timeline>,
    on_redraw: RedrawFn,
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("name", &self.name)
            .field("performing", &self.current.is_some())
            .finish()
    }
}

impl Figure {
    pub fn new(name: impl Into<String>, skeleton: Skeleton) -> Figure {
        Figure {
            name: name.into(),
            skeleton: Rc::new(RefCell::new(skeleton)),
            current: None,
            on_redraw: Rc::new(|| {}),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the figure's skeleton; the external renderer reads
    /// world transforms through this after each tick.
    pub fn skeleton(&self) -> Rc<RefCell<Skeleton>> {
        self.skeleton.clone()
    }

    /// Install the redraw callback invoked after each animated step.
    pub fn set_redraw(&mut self, on_redraw: RedrawFn) {
        self.on_redraw = on_redraw;
    }

    /// Compile an action into a timeline bound to this figure's skeleton
    /// without making it the current action (used by sequences, which nest
    /// the result into their master timeline).
    pub fn compile_action(&self, action: &Action, poses: &PoseLibrary) -> Timeline {
        action.create_timeline(self.skeleton.clone(), poses, self.on_redraw.clone())
    }

    /// Start performing an action, cancelling whatever was active before.
    pub fn perform(&mut self, action: &Action, poses: &PoseLibrary) {
        self.stop_action();
        let mut timeline = self.compile_action(action, poses);
        timeline.play();
        self.current = Some(timeline);
    }

    /// Advance the current action, if any, by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if let Some(timeline) = &mut self.current {
            timeline.advance(dt);
        }
    }

    pub fn is_performing(&self) -> bool {
        self.current.as_ref().is_some_and(Timeline::is_active)
    }

    pub fn current_timeline(&self) -> Option<&Timeline> {
        self.current.as_ref()
    }

    /// Kill and drop the current action timeline; in-flight segment
    /// callbacks that have not fired will not fire afterwards.
    pub fn stop_action(&mut self) {
        if let Some(mut timeline) = self.current.take() {
            timeline.kill();
        }
    }

    /// Reset the skeleton to bind pose and notify the redraw callback.
    pub fn reset_to_bind(&self) {
        self.skeleton.borrow_mut().reset_to_bind();
        (self.on_redraw)();
    }
}
