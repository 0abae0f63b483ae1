//! Multi-actor choreography: beats merged into one master timeline.
//!
//! A sequence owns an actor-name → figure map (figures are shared handles,
//! their lifetime controlled externally) and an always-time-sorted beat
//! list. Building compiles every resolvable beat's action into a
//! sub-timeline nested at the beat's offset, plus a zero-duration
//! "beat started" notification; unresolvable beats are skipped with a warn
//! diagnostic and the rest of the sequence still builds. Building is
//! idempotent: every call derives a fresh master timeline from the current
//! beats and figures, discarding any stale one. Mutating beats or figures
//! after a build requires an explicit rebuild before seeking or playing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::animator::Timeline;
use crate::data::Beat;
use crate::events::SequenceEvent;
use crate::figure::Figure;
use crate::library::Libraries;

/// Sequence lifecycle: Empty → Built → Playing ⇄ Paused, plus Stopped.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SequenceState {
    #[default]
    Empty,
    Built,
    Playing,
    Paused,
    Stopped,
}

pub struct Sequence {
    name: String,
    libraries: Rc<Libraries>,
    figures: HashMap<String, Rc<RefCell<Figure>>>,
    beats: Vec<Beat>,
    master: Option<Timeline>,
    state: SequenceState,
    events: Rc<RefCell<Vec<SequenceEvent>>>,
}

impl std::fmt::Debug for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sequence")
            .field("name", &self.name)
            .field("figures", &self.figures.len())
            .field("beats", &self.beats.len())
            .field("state", &self.state)
            .finish()
    }
}

impl Sequence {
    pub fn new(name: impl Into<String>, libraries: Rc<Libraries>) -> Sequence {
        Sequence {
            name: name.into(),
            libraries,
            figures: HashMap::new(),
            beats: Vec::new(),
            master: None,
            state: SequenceState::Empty,
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Register an actor, keyed by the figure's own name. The sequence
    /// shares the figure; it does not own it.
    pub fn add_figure(&mut self, figure: Rc<RefCell<Figure>>) {
        let name = figure.borrow().name().to_string();
        self.figures.insert(name, figure);
    }

    pub fn figure(&self, actor: &str) -> Option<Rc<RefCell<Figure>>> {
        self.figures.get(actor).cloned()
    }

    pub fn actor_names(&self) -> impl Iterator<Item = &str> {
        self.figures.keys().map(String::as_str)
    }

    /// Insert a beat keeping the list sorted ascending by time; beats with
    /// equal times retain insertion order.
    pub fn add_beat(&mut self, beat: Beat) {
        let idx = self
            .beats
            .iter()
            .rposition(|b| b.time <= beat.time)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.beats.insert(idx, beat);
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    /// Total duration: max over beats of `beat.time + action.duration`.
    /// Beats whose action cannot be resolved contribute 0; no beats means 0.
    pub fn duration(&self) -> f32 {
        self.beats
            .iter()
            .map(|b| {
                self.libraries
                    .actions
                    .get(&b.action)
                    .map(|a| b.time + a.duration)
                    .unwrap_or(0.0)
            })
            .fold(0.0, f32::max)
    }

    /// Compile a fresh master timeline from the current beats and figures.
    pub fn build(&mut self) {
        let mut master = Timeline::new();
        for beat in &self.beats {
            let Some(figure) = self.figures.get(&beat.actor) else {
                log::warn!(
                    "sequence '{}': beat at {:.2}s names unknown actor '{}', skipped",
                    self.name,
                    beat.time,
                    beat.actor
                );
                continue;
            };
            let Some(action) = self.libraries.actions.get(&beat.action) else {
                log::warn!(
                    "sequence '{}': beat at {:.2}s names unknown action '{}', skipped",
                    self.name,
                    beat.time,
                    beat.action
                );
                continue;
            };

            let sub = figure
                .borrow()
                .compile_action(action, &self.libraries.poses);
            master.add_child(
                beat.time,
                Some(format!("{}:{}", beat.actor, beat.action)),
                sub,
            );

            let events = self.events.clone();
            let note = SequenceEvent::BeatStarted {
                time: beat.time,
                actor: beat.actor.clone(),
                action: beat.action.clone(),
                target: beat.target.clone(),
            };
            master.add_call(beat.time, Box::new(move || events.borrow_mut().push(note.clone())));
        }
        self.master = Some(master);
        self.state = SequenceState::Built;
    }

    fn ensure_built(&mut self) {
        if self.master.is_none() {
            self.build();
        }
    }

    pub fn play(&mut self) {
        self.ensure_built();
        if let Some(master) = &mut self.master {
            master.play();
            self.state = SequenceState::Playing;
        }
    }

    pub fn pause(&mut self) {
        if self.state == SequenceState::Playing {
            if let Some(master) = &mut self.master {
                master.pause();
            }
            self.state = SequenceState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == SequenceState::Paused {
            if let Some(master) = &mut self.master {
                master.resume();
            }
            self.state = SequenceState::Playing;
        }
    }

    /// Advance playback by `dt` seconds; the host calls this on its clock.
    pub fn advance(&mut self, dt: f32) {
        if self.state == SequenceState::Playing {
            if let Some(master) = &mut self.master {
                master.advance(dt);
            }
        }
    }

    /// Scrub to an absolute time, building first if no timeline exists yet.
    pub fn seek(&mut self, time: f32) {
        self.ensure_built();
        if let Some(master) = &mut self.master {
            master.seek(time);
        }
    }

    /// Scrub by normalized progress in [0, 1].
    pub fn seek_progress(&mut self, progress: f32) {
        self.ensure_built();
        if let Some(master) = &mut self.master {
            master.seek_progress(progress);
        }
    }

    /// Normalized master-timeline progress.
    pub fn progress(&self) -> f32 {
        self.master.as_ref().map(Timeline::progress).unwrap_or(0.0)
    }

    /// Halt playback, rewind the master timeline and reset every
    /// participating figure's skeleton to bind pose.
    pub fn stop(&mut self) {
        if let Some(master) = &mut self.master {
            master.pause();
            master.seek(0.0);
        }
        for figure in self.figures.values() {
            figure.borrow().reset_to_bind();
        }
        self.state = SequenceState::Stopped;
    }

    /// Take all notifications emitted since the last drain, in fire order.
    pub fn drain_events(&mut self) -> Vec<SequenceEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Reference choreography: a 2-actor, 6-beat exchange on the default
    /// humanoid rig and default libraries.
    pub fn create_sample_fight(libraries: Rc<Libraries>) -> Sequence {
        use crate::rig::default_humanoid;
        use crate::skeleton::Skeleton;

        let mut seq = Sequence::new("sample-fight", libraries);
        for actor in ["attacker", "defender"] {
            seq.add_figure(Rc::new(RefCell::new(Figure::new(
                actor,
                Skeleton::from_def(&default_humanoid()),
            ))));
        }

        let beat = |time: f32, actor: &str, action: &str, target: Option<&str>| Beat {
            time,
            actor: actor.into(),
            action: action.into(),
            target: target.map(String::from),
        };
        seq.add_beat(beat(0.0, "attacker", "jab", Some("defender")));
        seq.add_beat(beat(0.1, "defender", "block", None));
        seq.add_beat(beat(0.4, "attacker", "cross", Some("defender")));
        seq.add_beat(beat(0.55, "defender", "hit-react", None));
        seq.add_beat(beat(1.0, "attacker", "kick", Some("defender")));
        seq.add_beat(beat(1.1, "defender", "hit-react", None));
        seq
    }
}
