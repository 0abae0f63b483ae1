use std::cell::RefCell;
use std::rc::Rc;

use stickmotion_core::{
    data::Beat,
    events::SequenceEvent,
    figure::Figure,
    library::Libraries,
    rig::default_humanoid,
    sequence::{Sequence, SequenceState},
    skeleton::Skeleton,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn beat(time: f32, actor: &str, action: &str) -> Beat {
    Beat {
        time,
        actor: actor.into(),
        action: action.into(),
        target: None,
    }
}

fn sample_fight() -> Sequence {
    Sequence::create_sample_fight(Rc::new(Libraries::with_defaults()))
}

/// it should report max(beat.time + action.duration) as total duration
#[test]
fn sample_fight_duration() {
    let seq = sample_fight();
    assert_eq!(seq.beats().len(), 6);
    // kick (0.5 s) starting at 1.0 s is the latest-running beat.
    approx(seq.duration(), 1.5, 1e-6);
}

#[test]
fn empty_sequence_has_zero_duration() {
    let seq = Sequence::new("empty", Rc::new(Libraries::with_defaults()));
    assert_eq!(seq.duration(), 0.0);
    assert_eq!(seq.state(), SequenceState::Empty);
}

/// it should keep equal-time beats in insertion order
#[test]
fn add_beat_is_stable_for_ties() {
    let mut seq = Sequence::new("ties", Rc::new(Libraries::with_defaults()));
    seq.add_beat(beat(0.5, "a", "jab"));
    seq.add_beat(beat(0.2, "b", "jab"));
    seq.add_beat(beat(0.5, "c", "jab"));
    seq.add_beat(beat(0.5, "d", "jab"));
    let order: Vec<&str> = seq.beats().iter().map(|b| b.actor.as_str()).collect();
    assert_eq!(order, vec!["b", "a", "c", "d"]);
}

/// it should skip unresolvable beats and still build the rest
#[test]
fn unresolvable_beats_degrade_gracefully() {
    let mut seq = sample_fight();
    seq.add_beat(beat(0.3, "nobody", "jab"));
    seq.add_beat(beat(0.35, "attacker", "no-such-action"));
    seq.build();
    seq.play();
    seq.advance(2.0);
    // Only the six resolvable beats announce themselves.
    let events = seq.drain_events();
    assert_eq!(events.len(), 6);
}

/// it should count unknown-actor beats toward duration, unknown-action not
#[test]
fn duration_resolves_actions_not_actors() {
    let mut seq = sample_fight();
    approx(seq.duration(), 1.5, 1e-6);
    // An unknown action contributes 0, even past the current end.
    seq.add_beat(beat(3.0, "attacker", "no-such-action"));
    approx(seq.duration(), 1.5, 1e-6);
    // An unknown actor still counts: the beat is dropped at build time
    // only, not in the duration sum.
    seq.add_beat(beat(2.0, "nobody", "jab"));
    approx(seq.duration(), 2.3, 1e-6);
}

#[test]
fn beat_started_events_fire_in_time_order() {
    let mut seq = sample_fight();
    seq.play();
    seq.advance(0.05);
    let first = seq.drain_events();
    assert_eq!(first.len(), 1);
    match &first[0] {
        SequenceEvent::BeatStarted {
            time,
            actor,
            action,
            target,
        } => {
            approx(*time, 0.0, 1e-6);
            assert_eq!(actor, "attacker");
            assert_eq!(action, "jab");
            assert_eq!(target.as_deref(), Some("defender"));
        }
    }
    seq.advance(0.45);
    let times: Vec<f32> = seq
        .drain_events()
        .iter()
        .map(|SequenceEvent::BeatStarted { time, .. }| *time)
        .collect();
    assert_eq!(times, vec![0.1, 0.4]);
}

#[test]
fn pause_and_resume_gate_progress() {
    let mut seq = sample_fight();
    seq.play();
    assert_eq!(seq.state(), SequenceState::Playing);
    seq.advance(0.2);
    let p = seq.progress();
    seq.pause();
    assert_eq!(seq.state(), SequenceState::Paused);
    seq.advance(0.2);
    approx(seq.progress(), p, 1e-6);
    seq.resume();
    seq.advance(0.2);
    assert!(seq.progress() > p);
}

/// it should drive figures identically when advancing or scrubbing
#[test]
fn seek_is_deterministic() {
    let mut played = sample_fight();
    played.play();
    for _ in 0..9 {
        played.advance(0.05); // 0.45 s, inside the cross
    }

    let mut scrubbed = sample_fight();
    scrubbed.seek(2.0);
    scrubbed.seek(0.45);

    for actor in ["attacker", "defender"] {
        let a = played.figure(actor).unwrap();
        let b = scrubbed.figure(actor).unwrap();
        let (a, b) = (a.borrow().skeleton(), b.borrow().skeleton());
        let (a, b) = (a.borrow(), b.borrow());
        for bone in a.iter_bones() {
            let other = b.bone_by_name(bone.name()).unwrap();
            approx(
                bone.rotation_from_bind(),
                other.rotation_from_bind(),
                1e-3,
            );
        }
    }
}

#[test]
fn seek_builds_if_needed() {
    let mut seq = sample_fight();
    assert_eq!(seq.state(), SequenceState::Empty);
    seq.seek_progress(0.5);
    assert_eq!(seq.state(), SequenceState::Built);
    assert!(seq.progress() > 0.0);
}

/// it should reset every participating figure to bind pose on stop
#[test]
fn stop_resets_figures_to_bind() {
    let mut seq = sample_fight();
    seq.play();
    seq.advance(0.45);
    seq.stop();
    assert_eq!(seq.state(), SequenceState::Stopped);
    for actor in ["attacker", "defender"] {
        let fig = seq.figure(actor).unwrap();
        let sk = fig.borrow().skeleton();
        let sk = sk.borrow();
        for bone in sk.iter_bones() {
            assert_eq!(bone.rotation_from_bind(), 0.0, "{actor}/{}", bone.name());
        }
    }
}

#[test]
fn rebuild_reflects_added_beats() {
    let mut seq = sample_fight();
    seq.build();
    let before = seq.duration();
    seq.add_beat(beat(2.0, "defender", "kick"));
    // Duration is derived from beats, not the stale timeline.
    approx(seq.duration(), 2.5, 1e-6);
    assert!(seq.duration() > before);
    seq.build();
    seq.play();
    seq.advance(3.0);
    assert_eq!(seq.drain_events().len(), 7);
}

#[test]
fn figures_are_shared_not_owned() {
    let libs = Rc::new(Libraries::with_defaults());
    let fig = Rc::new(RefCell::new(Figure::new(
        "solo",
        Skeleton::from_def(&default_humanoid()),
    )));
    let mut seq = Sequence::new("shared", libs);
    seq.add_figure(fig.clone());
    seq.add_beat(beat(0.0, "solo", "jab"));
    seq.play();
    seq.advance(0.1);
    // External handle observes the sequence-driven mutation.
    let sk = fig.borrow().skeleton();
    let moved = sk
        .borrow()
        .iter_bones()
        .any(|b| b.rotation_from_bind().abs() > 1e-3);
    assert!(moved);
}
