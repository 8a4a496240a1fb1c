//! Integration tests driving a full scene headlessly.
//!
//! The scene is updated by hand with fixed deltas; no window or GPU is
//! involved. Classifier doubles run on the controller's worker thread, so
//! assertions that depend on a classification landing poll with a deadline.

use std::sync::atomic::{AtomicI32, AtomicU32, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use treeform::prelude::*;
use treeform::Vec3;

const FRAME: f32 = 1.0 / 60.0;

fn small_config() -> TreeConfig {
    TreeConfig {
        foliage_count: 500,
        ornament_count: 40,
        card_count: 10,
        seed: Some(1234),
        ..TreeConfig::default()
    }
}

/// Classifier that blocks until the test releases it, tracking how many
/// calls run concurrently.
struct BlockingClassifier {
    gate: Mutex<Receiver<()>>,
    started: AtomicU32,
    concurrent: AtomicI32,
    max_concurrent: AtomicI32,
}

impl BlockingClassifier {
    fn new() -> (Arc<Self>, Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let this = Arc::new(Self {
            gate: Mutex::new(rx),
            started: AtomicU32::new(0),
            concurrent: AtomicI32::new(0),
            max_concurrent: AtomicI32::new(0),
        });
        (this, tx)
    }
}

impl Classifier for BlockingClassifier {
    fn classify(&self, _jpeg: &[u8]) -> Option<Classification> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let now = self.concurrent.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_concurrent.fetch_max(now, Ordering::SeqCst);

        // Hold until the test unblocks one call.
        let _ = self.gate.lock().unwrap().recv();

        self.concurrent.fetch_sub(1, Ordering::SeqCst);
        Some(Classification {
            mode: Mode::Chaos,
            hand_x: 0.5,
            hand_y: -0.5,
            confidence: 1.0,
        })
    }
}

/// Classifier that always fails.
struct NullClassifier {
    calls: AtomicU32,
}

impl Classifier for NullClassifier {
    fn classify(&self, _jpeg: &[u8]) -> Option<Classification> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        None
    }
}

/// Classifier that always reports chaos at a fixed hand position.
struct ChaosClassifier;

impl Classifier for ChaosClassifier {
    fn classify(&self, _jpeg: &[u8]) -> Option<Classification> {
        Some(Classification {
            mode: Mode::Chaos,
            hand_x: 0.5,
            hand_y: -0.5,
            confidence: 0.95,
        })
    }
}

fn spin_until<F: FnMut() -> bool>(mut done: F, what: &str) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_at_most_one_classification_in_flight() {
    let (classifier, release) = BlockingClassifier::new();
    let mut scene = TreeScene::new(small_config())
        .with_frame_source(Box::new(TestPattern::new(32, 32)))
        .with_classifier(classifier.clone())
        .with_poll_interval(Duration::ZERO);

    // Many due ticks while the first classification blocks: no second call
    // may ever start.
    let mut elapsed = 0.0;
    for _ in 0..200 {
        elapsed += FRAME;
        scene.update(elapsed, FRAME);
        thread::sleep(Duration::from_micros(200));
    }
    assert_eq!(classifier.started.load(Ordering::SeqCst), 1);
    assert!(scene.signal_in_flight());
    assert_eq!(scene.mode(), Mode::Formed);

    // Release the call; the pending result lands on a later update and the
    // token frees for the next tick.
    release.send(()).unwrap();
    spin_until(
        || {
            elapsed += FRAME;
            scene.update(elapsed, FRAME);
            scene.mode() == Mode::Chaos
        },
        "classification to apply",
    );

    // More ticks may have started since, but never two at once.
    spin_until(
        || {
            elapsed += FRAME;
            scene.update(elapsed, FRAME);
            classifier.started.load(Ordering::SeqCst) >= 2
        },
        "a second classification",
    );
    assert_eq!(classifier.max_concurrent.load(Ordering::SeqCst), 1);

    // Unblock whatever is still waiting so worker threads can exit.
    let _ = release.send(());
}

#[test]
fn test_always_null_classifier_leaves_state_untouched() {
    let classifier = Arc::new(NullClassifier {
        calls: AtomicU32::new(0),
    });
    let mut scene = TreeScene::new(small_config())
        .with_frame_source(Box::new(TestPattern::new(32, 32)))
        .with_classifier(classifier.clone())
        .with_poll_interval(Duration::ZERO);

    let mut elapsed = 0.0;
    spin_until(
        || {
            elapsed += FRAME;
            scene.update(elapsed, FRAME);
            classifier.calls.load(Ordering::SeqCst) >= 5
        },
        "several failed classifications",
    );

    // Five failures later: mode, control, and blends all still initial.
    assert_eq!(scene.mode(), Mode::Formed);
    assert_eq!(scene.control(), Default::default());
    for population in scene.populations() {
        assert_eq!(population.blend().factor(), 0.0);
    }
}

#[test]
fn test_chaos_classification_scatters_the_tree() {
    let config = small_config();
    let scatter_radius = config.scatter_radius;
    let mut scene = TreeScene::new(config)
        .with_frame_source(Box::new(TestPattern::new(32, 32)))
        .with_classifier(Arc::new(ChaosClassifier))
        .with_poll_interval(Duration::ZERO);

    let mut elapsed = 0.0;
    spin_until(
        || {
            elapsed += FRAME;
            scene.update(elapsed, FRAME);
            scene.mode() == Mode::Chaos
        },
        "chaos classification",
    );

    // Mirrored horizontal component: handX 0.5 steers as -0.5.
    assert_eq!(scene.control().x, -0.5);
    assert_eq!(scene.control().y, -0.5);

    // Simulate ~5s at 60 fps: the fastest population converges past 0.99
    // and every rendered position sits inside the scatter bound.
    for _ in 0..300 {
        elapsed += FRAME;
        scene.update(elapsed, FRAME);
    }

    let foliage = &scene.populations()[0];
    assert!(
        foliage.blend().factor() >= 0.99,
        "foliage factor {}",
        foliage.blend().factor()
    );
    for raw in foliage.raw() {
        let p = Vec3::from_array(raw.position);
        assert!(
            p.length() <= scatter_radius + 0.5,
            "position {p} outside scatter bound"
        );
    }

    // Slower populations trail but head the same way.
    let cards = &scene.populations()[2];
    assert!(cards.blend().factor() > 0.9);
    assert!(cards.blend().factor() <= foliage.blend().factor());
}

#[test]
fn test_scene_without_frame_source_idles() {
    let classifier = Arc::new(NullClassifier {
        calls: AtomicU32::new(0),
    });
    let mut scene = TreeScene::new(small_config())
        .with_classifier(classifier.clone())
        .with_poll_interval(Duration::ZERO);

    let mut elapsed = 0.0;
    for _ in 0..50 {
        elapsed += FRAME;
        scene.update(elapsed, FRAME);
    }

    // No frames, no classifications: the loop never starts.
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    assert!(!scene.signal_in_flight());
    assert_eq!(scene.mode(), Mode::Formed);
}
