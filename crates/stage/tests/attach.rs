#![allow(clippy::float_cmp)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use choreo::animate::{self, Tween};
use choreo::{EngineNode, Options, Point};
use proptest::prelude::*;
use stage::{Error, Layer, ManualClock};

fn setup() -> (Arc<ManualClock>, Layer) {
    let clock = Arc::new(ManualClock::new(0.0));
    let layer = Layer::new(clock.clone());
    (clock, layer)
}

#[test]
fn attach_snapshots_the_lowered_tree() {
    let (_, layer) = setup();
    let animation = animate::sequence([animate::wait(1.0), animate::fade_in(0.5).unwrap()])
        .build()
        .unwrap();
    let key = layer.attach(&animation, Some("intro"));
    assert_eq!(key, "intro");

    let attached = layer.animation("intro").unwrap();
    assert_eq!(attached, animation.to_engine());
    assert!(matches!(attached, EngineNode::Group { .. }));
}

#[test]
fn completion_fires_once_after_the_accumulated_duration() {
    let (clock, layer) = setup();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&calls);
    let animation = animate::replay(&animate::wait(1.0), 2);

    layer.attach_with_completion(&animation, Some("r"), move |finished| {
        log.lock().unwrap().push(finished);
    });

    clock.advance(2.5);
    assert!(layer.advance().is_empty());
    clock.advance(0.5);
    assert_eq!(layer.advance(), vec!["r".to_string()]);
    clock.advance(5.0);
    assert!(layer.advance().is_empty());
    assert_eq!(*calls.lock().unwrap(), vec![true]);
}

#[test]
fn removed_on_completion_drops_the_attachment() {
    let (clock, layer) = setup();
    let keep = animate::fade_out(1.0).unwrap();
    let transient = animate::fade_out(animate::Motion::new(1.0).options(
        Options::default().with_removed_on_completion(true),
    ))
    .unwrap();
    layer.attach(&keep, Some("keep"));
    layer.attach(&transient, Some("drop"));

    clock.advance(1.0);
    assert_eq!(layer.advance(), vec!["drop".to_string(), "keep".to_string()]);
    assert_eq!(layer.keys(), vec!["keep".to_string()]);
    assert!(layer.is_finished("keep"));
}

#[test]
fn endless_animations_never_complete() {
    let (clock, layer) = setup();
    layer.attach(&animate::replay_forever(&animate::wait(0.1)), Some("spin"));
    clock.advance(1_000.0);
    assert!(layer.advance().is_empty());
    assert!(!layer.is_finished("spin"));
}

#[test]
fn detach_and_replace_report_unfinished() {
    let (_, layer) = setup();
    let calls = Arc::new(Mutex::new(Vec::new()));

    let log = Arc::clone(&calls);
    layer.attach_with_completion(&animate::wait(1.0), Some("a"), move |f| log.lock().unwrap().push(("first", f)));
    let log = Arc::clone(&calls);
    layer.attach_with_completion(&animate::wait(1.0), Some("a"), move |f| log.lock().unwrap().push(("second", f)));
    layer.detach("a").unwrap();

    assert_eq!(*calls.lock().unwrap(), vec![("first", false), ("second", false)]);
    assert_eq!(layer.detach("a"), Err(Error::UnknownAnimation("a".into())));
    assert!(layer.is_empty());
}

#[test]
fn finish_delivers_platform_notification() {
    let (_, layer) = setup();
    let count = Arc::new(AtomicUsize::new(0));
    let hits = Arc::clone(&count);
    layer.attach_with_completion(&animate::wait(10.0), Some("w"), move |finished| {
        assert!(finished);
        hits.fetch_add(1, Ordering::SeqCst);
    });
    layer.finish("w").unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    // Waits are removed once finished.
    assert!(layer.animation("w").is_none());
    assert!(matches!(layer.finish("w"), Err(Error::UnknownAnimation(_))));
}

#[test]
fn paused_layer_holds_completions() {
    let (clock, layer) = setup();
    layer.attach(&animate::wait(1.0), Some("w"));
    clock.advance(0.5);
    layer.pause();
    clock.advance(10.0);
    assert!(layer.advance().is_empty());
    assert_eq!(layer.local_time(), 0.5);

    layer.resume_at_speed(0.5);
    clock.advance(1.0);
    assert_eq!(layer.advance(), vec!["w".to_string()]);
}

#[test]
fn one_animation_runs_on_many_layers() {
    let clock = Arc::new(ManualClock::new(0.0));
    let animation = animate::move_to(Tween::new(1.0).to(Point::new(5.0, 5.0))).unwrap();
    let finished = Arc::new(AtomicUsize::new(0));

    thread::scope(|scope| {
        for i in 0..8 {
            let clock = Arc::clone(&clock);
            let animation = &animation;
            let finished = Arc::clone(&finished);
            scope.spawn(move || {
                let layer = Layer::new(clock);
                let key = format!("move-{i}");
                layer.attach_with_completion(animation, Some(&key), move |_| {
                    finished.fetch_add(1, Ordering::SeqCst);
                });
                layer.finish(&key).unwrap();
                assert_eq!(layer.animation(&key), Some(animation.to_engine()));
            });
        }
    });

    assert_eq!(finished.load(Ordering::SeqCst), 8);
}

proptest! {
    #[test]
    fn local_time_is_continuous_across_pause_and_resume(
        before in 0.0f64..100.0,
        paused_for in 0.0f64..100.0,
        speed in 0.1f64..4.0,
    ) {
        let (clock, layer) = setup();
        clock.advance(before);
        let at_pause = layer.local_time();
        layer.pause();
        clock.advance(paused_for);
        prop_assert_eq!(layer.local_time(), at_pause);
        layer.resume_at_speed(speed);
        prop_assert_eq!(layer.local_time(), at_pause);
    }
}
