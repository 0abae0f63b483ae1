//! Time-indexed interpolation scheduler.
//!
//! A `Timeline` owns three kinds of scheduled items: tween segments (a value
//! interpolation over a span, with a named easing curve and a per-tick apply
//! callback), zero-duration call marks, and labeled nested child timelines
//! at absolute offsets. Items are kept sorted by start time; insertion order
//! is preserved for equal starts.
//!
//! Playback is cooperative and single-threaded: the host calls `advance(dt)`
//! on its own clock. Seeking is a stateless two-pass render: items after
//! the playhead are rendered at progress 0 in descending start order, then
//! items at or before it in ascending order at clamped progress, so the
//! playhead can jump anywhere, forward or backward, without replay. Call
//! marks fire only when the playhead crosses them moving forward during
//! `advance`; a killed timeline fires nothing ever again.

use crate::interp::Easing;

/// Per-tick apply callback for a tween segment. Receives eased progress
/// in [0, 1].
pub type ApplyFn = Box<dyn FnMut(f32)>;

/// Zero-duration callback for a call mark.
pub type CallFn = Box<dyn FnMut()>;

enum Item {
    Tween {
        start: f32,
        duration: f32,
        easing: Easing,
        apply: ApplyFn,
    },
    Call {
        at: f32,
        callback: CallFn,
    },
    Child {
        offset: f32,
        label: Option<String>,
        timeline: Timeline,
    },
}

impl Item {
    fn start(&self) -> f32 {
        match self {
            Item::Tween { start, .. } => *start,
            Item::Call { at, .. } => *at,
            Item::Child { offset, .. } => *offset,
        }
    }

    fn end(&self) -> f32 {
        match self {
            Item::Tween { start, duration, .. } => start + duration,
            Item::Call { at, .. } => *at,
            Item::Child {
                offset, timeline, ..
            } => offset + timeline.duration(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PlayState {
    Idle,
    Playing,
    Paused,
    Killed,
}

/// A pausable, seekable master/sub timeline.
#[derive(Default)]
pub struct Timeline {
    items: Vec<Item>,
    time: f32,
    state: PlayState,
    /// Whether the very first forward render has happened; call marks at
    /// t = 0 fire on that render.
    started: bool,
}

impl Default for PlayState {
    fn default() -> Self {
        PlayState::Idle
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("items", &self.items.len())
            .field("time", &self.time)
            .field("state", &self.state)
            .finish()
    }
}

impl Timeline {
    pub fn new() -> Timeline {
        Timeline::default()
    }

    /// Total span: the latest end across all items, 0 for an empty timeline.
    pub fn duration(&self) -> f32 {
        self.items.iter().map(Item::end).fold(0.0, f32::max)
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Normalized playhead position in [0, 1].
    pub fn progress(&self) -> f32 {
        let d = self.duration();
        if d > 0.0 {
            (self.time / d).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PlayState::Playing && self.time < self.duration()
    }

    /// Stable insert keeping items sorted ascending by start time.
    fn insert(&mut self, item: Item) {
        let start = item.start();
        let idx = self
            .items
            .iter()
            .rposition(|existing| existing.start() <= start)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.items.insert(idx, item);
    }

    /// Schedule a value-interpolation segment over `[start, start+duration]`
    /// seconds. `apply` receives eased progress each render.
    pub fn add_tween(&mut self, start: f32, duration: f32, easing: Easing, apply: ApplyFn) {
        self.insert(Item::Tween {
            start,
            duration: duration.max(0.0),
            easing,
            apply,
        });
    }

    /// Schedule a zero-duration callback at an absolute offset.
    pub fn add_call(&mut self, at: f32, callback: CallFn) {
        self.insert(Item::Call { at, callback });
    }

    /// Nest a sub-timeline at an absolute offset.
    pub fn add_child(&mut self, offset: f32, label: Option<String>, timeline: Timeline) {
        self.insert(Item::Child {
            offset,
            label,
            timeline,
        });
    }

    pub fn child_labels(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            Item::Child {
                label: Some(l), ..
            } => Some(l.as_str()),
            _ => None,
        })
    }

    pub fn play(&mut self) {
        if self.state != PlayState::Killed {
            self.state = PlayState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayState::Paused {
            self.state = PlayState::Playing;
        }
    }

    /// Detach everything: no scheduled segment or call mark fires after this.
    pub fn kill(&mut self) {
        self.state = PlayState::Killed;
        for item in &mut self.items {
            if let Item::Child { timeline, .. } = item {
                timeline.kill();
            }
        }
    }

    /// Advance the playhead by `dt` seconds if playing, rendering every
    /// segment active in the crossed span and firing crossed call marks.
    pub fn advance(&mut self, dt: f32) {
        if self.state != PlayState::Playing || dt < 0.0 {
            return;
        }
        let prev = if self.started { self.time } else { -1.0 };
        let now = (self.time + dt.max(0.0)).min(self.duration());
        self.time = now;
        self.started = true;
        self.render_range(prev, now);
    }

    /// Render `(prev, now]`: tweens overlapping the span at clamped eased
    /// progress, call marks crossed in the span.
    fn render_range(&mut self, prev: f32, now: f32) {
        for item in &mut self.items {
            match item {
                Item::Tween {
                    start,
                    duration,
                    easing,
                    apply,
                } => {
                    if *start <= now && *start + *duration > prev {
                        let p = if *duration > 0.0 {
                            ((now - *start) / *duration).clamp(0.0, 1.0)
                        } else {
                            1.0
                        };
                        apply(easing.apply(p));
                    }
                }
                Item::Call { at, callback } => {
                    if *at > prev && *at <= now {
                        callback();
                    }
                }
                Item::Child {
                    offset, timeline, ..
                } => {
                    if *offset <= now && *offset + timeline.duration() > prev {
                        let local_now = (now - *offset).min(timeline.duration());
                        timeline.time = local_now;
                        timeline.started = true;
                        timeline.render_range(prev - *offset, local_now);
                    }
                }
            }
        }
    }

    /// Jump the playhead to an absolute time and render the full state there
    /// deterministically. Call marks do not fire on seek; rewinding to 0
    /// re-arms marks at the timeline start.
    pub fn seek(&mut self, time: f32) {
        if self.state == PlayState::Killed {
            return;
        }
        let t = time.clamp(0.0, self.duration());
        self.time = t;
        self.started = t > 0.0;
        self.render_at(t);
    }

    /// Seek by normalized progress in [0, 1].
    pub fn seek_progress(&mut self, progress: f32) {
        let d = self.duration();
        self.seek(progress.clamp(0.0, 1.0) * d);
    }

    /// Stateless render of the complete timeline state at `t`.
    ///
    /// Pass 1 walks items strictly after the playhead in descending start
    /// order, rendering each at progress 0; once it finishes, every channel
    /// holds the value it has just before its earliest pending segment.
    /// Pass 2 walks items at or before the playhead in ascending order at
    /// clamped progress, so the latest started segment for a channel wins.
    fn render_at(&mut self, t: f32) {
        for item in self.items.iter_mut().rev() {
            if item.start() > t {
                match item {
                    Item::Tween { apply, .. } => apply(0.0),
                    Item::Call { .. } => {}
                    Item::Child { timeline, .. } => {
                        timeline.time = 0.0;
                        timeline.render_at(0.0);
                    }
                }
            }
        }
        for item in &mut self.items {
            if item.start() <= t {
                match item {
                    Item::Tween {
                        start,
                        duration,
                        easing,
                        apply,
                    } => {
                        let p = if *duration > 0.0 {
                            ((t - *start) / *duration).clamp(0.0, 1.0)
                        } else {
                            1.0
                        };
                        apply(easing.apply(p));
                    }
                    Item::Call { .. } => {}
                    Item::Child {
                        offset, timeline, ..
                    } => {
                        let local = (t - *offset).min(timeline.duration());
                        timeline.time = local.max(0.0);
                        timeline.render_at(timeline.time);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<f32>>>, ApplyFn) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, Box::new(move |p| sink.borrow_mut().push(p)))
    }

    fn value_sink() -> (Rc<RefCell<f32>>, ApplyFn) {
        let cell = Rc::new(RefCell::new(0.0));
        let sink = cell.clone();
        (cell, Box::new(move |p| *sink.borrow_mut() = p))
    }

    #[test]
    fn duration_is_max_item_end() {
        let mut tl = Timeline::new();
        assert_eq!(tl.duration(), 0.0);
        tl.add_tween(0.0, 0.5, Easing::Linear, Box::new(|_| {}));
        tl.add_call(0.8, Box::new(|| {}));
        let mut child = Timeline::new();
        child.add_tween(0.0, 0.4, Easing::Linear, Box::new(|_| {}));
        tl.add_child(0.6, None, child);
        assert!((tl.duration() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn advance_renders_active_segments() {
        let (log, apply) = recorder();
        let mut tl = Timeline::new();
        tl.add_tween(0.0, 1.0, Easing::Linear, apply);
        tl.play();
        tl.advance(0.25);
        tl.advance(0.25);
        assert_eq!(&*log.borrow(), &[0.25, 0.5]);
    }

    #[test]
    fn paused_timeline_does_not_render() {
        let (log, apply) = recorder();
        let mut tl = Timeline::new();
        tl.add_tween(0.0, 1.0, Easing::Linear, apply);
        tl.play();
        tl.advance(0.25);
        tl.pause();
        tl.advance(0.25);
        assert_eq!(log.borrow().len(), 1);
        tl.resume();
        tl.advance(0.25);
        assert_eq!(&*log.borrow(), &[0.25, 0.5]);
    }

    /// it should fire call marks once, on forward crossing only
    #[test]
    fn call_marks_fire_on_crossing() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let mut tl = Timeline::new();
        tl.add_call(0.5, Box::new(move || *sink.borrow_mut() += 1));
        tl.add_tween(0.0, 1.0, Easing::Linear, Box::new(|_| {}));
        tl.play();
        tl.advance(0.4);
        assert_eq!(*count.borrow(), 0);
        tl.advance(0.2);
        assert_eq!(*count.borrow(), 1);
        tl.advance(0.2);
        assert_eq!(*count.borrow(), 1);
        tl.seek(0.0);
        assert_eq!(*count.borrow(), 1, "seek must not fire marks");
    }

    #[test]
    fn call_mark_at_zero_fires_on_first_advance() {
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        let mut tl = Timeline::new();
        tl.add_call(0.0, Box::new(move || *sink.borrow_mut() += 1));
        tl.add_tween(0.0, 1.0, Easing::Linear, Box::new(|_| {}));
        tl.play();
        tl.advance(0.1);
        assert_eq!(*count.borrow(), 1);
    }

    /// it should resolve the bracketing segment when scrubbing backward
    #[test]
    fn seek_is_deterministic_across_consecutive_segments() {
        let (value, _apply) = value_sink();
        let mut tl = Timeline::new();
        // Two contiguous segments on the same channel: 0->1 over [0,1],
        // then 1->3 over [1,2].
        let sink = value.clone();
        tl.add_tween(
            0.0,
            1.0,
            Easing::Linear,
            Box::new(move |p| *sink.borrow_mut() = p),
        );
        let sink = value.clone();
        tl.add_tween(
            1.0,
            1.0,
            Easing::Linear,
            Box::new(move |p| *sink.borrow_mut() = 1.0 + 2.0 * p),
        );

        tl.seek(1.5);
        assert!((*value.borrow() - 2.0).abs() < 1e-5);
        // Backward into the first segment: the second renders at its start
        // value first, then the first overwrites with its live value.
        tl.seek(0.5);
        assert!((*value.borrow() - 0.5).abs() < 1e-5);
        // Before everything: first segment's start value.
        tl.seek(0.0);
        assert!(value.borrow().abs() < 1e-5);
    }

    #[test]
    fn seek_progress_maps_to_duration() {
        let (value, apply) = value_sink();
        let mut tl = Timeline::new();
        tl.add_tween(0.0, 2.0, Easing::Linear, apply);
        tl.seek_progress(0.5);
        assert!((tl.time() - 1.0).abs() < 1e-6);
        assert!((*value.borrow() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn nested_child_renders_at_offset() {
        let (value, apply) = value_sink();
        let mut child = Timeline::new();
        child.add_tween(0.0, 1.0, Easing::Linear, apply);
        let mut tl = Timeline::new();
        tl.add_child(1.0, Some("beat".into()), child);
        tl.play();
        tl.advance(0.5);
        assert!(value.borrow().abs() < 1e-5, "child not started yet");
        tl.advance(1.0);
        assert!((*value.borrow() - 0.5).abs() < 1e-5);
        assert_eq!(tl.child_labels().collect::<Vec<_>>(), vec!["beat"]);
    }

    /// it should never invoke callbacks after kill
    #[test]
    fn kill_detaches_segments() {
        let (log, apply) = recorder();
        let mut tl = Timeline::new();
        tl.add_tween(0.0, 1.0, Easing::Linear, apply);
        tl.play();
        tl.advance(0.2);
        tl.kill();
        tl.advance(0.2);
        tl.seek(0.9);
        tl.play();
        tl.advance(0.2);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn stable_order_for_equal_starts() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut tl = Timeline::new();
        for tag in ["first", "second", "third"] {
            let sink = order.clone();
            tl.add_call(0.5, Box::new(move || sink.borrow_mut().push(tag)));
        }
        tl.play();
        tl.advance(1.0);
        assert_eq!(&*order.borrow(), &["first", "second", "third"]);
    }
}
