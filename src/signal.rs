//! Fixed-interval sampling of the external classification signal.
//!
//! The controller is polled from the render loop every frame but only acts
//! when its interval elapses. Each due tick captures one frame, encodes it,
//! and hands it to the classifier on a worker thread. The pending result
//! receiver doubles as the in-flight token: while it exists, due ticks are
//! skipped outright, so there is never more than one classification
//! outstanding no matter how slow the external service is. All failures
//! stop here: a failed tick just means the scene holds its last state.

use crate::capture::{encode_jpeg, FrameSource, JPEG_QUALITY};
use crate::classify::Classifier;
use crate::state::StateMachine;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::classify::Classification;

/// Default sampling cadence, balancing latency against classifier cost.
pub const POLL_INTERVAL: Duration = Duration::from_millis(800);

/// How the horizontal control component maps to the scene.
///
/// Camera-facing capture devices show the user a mirror image, so by
/// default the x component is negated to make "move hand right" steer
/// right. Use [`MirrorMode::Direct`] for non-mirrored sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorMode {
    #[default]
    Mirrored,
    Direct,
}

/// Lightweight condition indicator for status overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalStatus {
    /// Nothing attempted yet.
    Idle,
    /// No classifier configured; the scene runs without a signal.
    Unavailable,
    /// The frame source is not ready (no permission or no data).
    NoSource,
    /// A classification is outstanding.
    InFlight,
    /// The last classification succeeded.
    Signal,
    /// The last classification failed or returned nothing.
    NoSignal,
}

impl SignalStatus {
    /// Short label for overlay text.
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStatus::Idle => "initializing",
            SignalStatus::Unavailable => "classifier unavailable",
            SignalStatus::NoSource => "waiting for camera",
            SignalStatus::InFlight => "classifying",
            SignalStatus::Signal => "signal",
            SignalStatus::NoSignal => "no signal",
        }
    }
}

/// Polls the capture/classify collaborators and feeds the state machine.
pub struct SignalController {
    source: Option<Box<dyn FrameSource>>,
    classifier: Option<Arc<dyn Classifier>>,
    interval: Duration,
    mirror: MirrorMode,
    jpeg_quality: u8,
    last_tick: Option<Instant>,
    /// In-flight token: present while a classification is outstanding.
    pending: Option<Receiver<Option<Classification>>>,
    status: SignalStatus,
}

impl SignalController {
    pub fn new() -> Self {
        Self {
            source: None,
            classifier: None,
            interval: POLL_INTERVAL,
            mirror: MirrorMode::default(),
            jpeg_quality: JPEG_QUALITY,
            last_tick: None,
            pending: None,
            status: SignalStatus::Idle,
        }
    }

    pub fn set_frame_source(&mut self, source: Box<dyn FrameSource>) {
        self.source = Some(source);
    }

    pub fn set_classifier(&mut self, classifier: Arc<dyn Classifier>) {
        self.classifier = Some(classifier);
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn set_mirror(&mut self, mirror: MirrorMode) {
        self.mirror = mirror;
    }

    #[inline]
    pub fn status(&self) -> SignalStatus {
        self.status
    }

    /// Whether a classification is currently outstanding.
    #[inline]
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    fn tick_due(&self) -> bool {
        match self.last_tick {
            None => true,
            Some(at) => at.elapsed() >= self.interval,
        }
    }

    /// Drive the controller. Called every frame; acts on its own cadence.
    ///
    /// Finished classifications are drained first so their tick's token is
    /// released before the next tick is considered. The worker sends into a
    /// plain channel: if the controller is dropped mid-flight, the send
    /// fails and the late result is discarded.
    pub fn poll(&mut self, machine: &mut StateMachine) {
        if let Some(rx) = &self.pending {
            match rx.try_recv() {
                Ok(result) => {
                    self.pending = None;
                    match result {
                        Some(mut classification) => {
                            if self.mirror == MirrorMode::Mirrored {
                                classification.hand_x = -classification.hand_x;
                            }
                            machine.apply_classification(&classification);
                            self.status = SignalStatus::Signal;
                        }
                        // State holds; the next tick is the retry.
                        None => self.status = SignalStatus::NoSignal,
                    }
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.pending = None;
                    self.status = SignalStatus::NoSignal;
                }
            }
        }

        if !self.tick_due() {
            return;
        }
        self.last_tick = Some(Instant::now());

        // At most one outstanding classification: skip the tick entirely.
        if self.pending.is_some() {
            return;
        }

        let Some(classifier) = &self.classifier else {
            self.status = SignalStatus::Unavailable;
            return;
        };
        let Some(source) = self.source.as_mut() else {
            self.status = SignalStatus::NoSource;
            return;
        };
        let Some(frame) = source.frame() else {
            self.status = SignalStatus::NoSource;
            return;
        };

        let jpeg = match encode_jpeg(&frame, self.jpeg_quality) {
            Ok(jpeg) => jpeg,
            Err(e) => {
                eprintln!("Frame encode error: {}", e);
                return;
            }
        };

        let (tx, rx) = mpsc::channel();
        let classifier = Arc::clone(classifier);
        thread::spawn(move || {
            let _ = tx.send(classifier.classify(&jpeg));
        });
        self.pending = Some(rx);
        self.status = SignalStatus::InFlight;
    }
}

impl Default for SignalController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{Frame, TestPattern};
    use crate::state::Mode;

    struct FixedClassifier(Option<Classification>);

    impl Classifier for FixedClassifier {
        fn classify(&self, _jpeg: &[u8]) -> Option<Classification> {
            self.0
        }
    }

    struct NeverReady;

    impl FrameSource for NeverReady {
        fn frame(&mut self) -> Option<Frame> {
            None
        }
    }

    fn chaos_half() -> Classification {
        Classification {
            mode: Mode::Chaos,
            hand_x: 0.5,
            hand_y: -0.5,
            confidence: 0.9,
        }
    }

    fn instant_controller(mirror: MirrorMode, result: Option<Classification>) -> SignalController {
        let mut controller = SignalController::new();
        controller.set_frame_source(Box::new(TestPattern::new(16, 16)));
        controller.set_classifier(Arc::new(FixedClassifier(result)));
        controller.set_interval(Duration::ZERO);
        controller.set_mirror(mirror);
        controller
    }

    fn poll_until<F: Fn(&StateMachine, &SignalController) -> bool>(
        controller: &mut SignalController,
        machine: &mut StateMachine,
        done: F,
    ) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(machine, controller) {
            assert!(Instant::now() < deadline, "condition not reached in time");
            controller.poll(machine);
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_no_classifier_is_unavailable() {
        let mut controller = SignalController::new();
        controller.set_interval(Duration::ZERO);
        let mut machine = StateMachine::new();
        controller.poll(&mut machine);
        assert_eq!(controller.status(), SignalStatus::Unavailable);
        assert!(!controller.in_flight());
        assert_eq!(machine.mode(), Mode::Formed);
    }

    #[test]
    fn test_unready_source_is_noop() {
        let mut controller = SignalController::new();
        controller.set_frame_source(Box::new(NeverReady));
        controller.set_classifier(Arc::new(FixedClassifier(Some(chaos_half()))));
        controller.set_interval(Duration::ZERO);
        let mut machine = StateMachine::new();
        for _ in 0..20 {
            controller.poll(&mut machine);
        }
        assert_eq!(controller.status(), SignalStatus::NoSource);
        assert!(!controller.in_flight());
        assert_eq!(machine.mode(), Mode::Formed);
    }

    #[test]
    fn test_classification_applies_with_mirror() {
        let mut controller = instant_controller(MirrorMode::Mirrored, Some(chaos_half()));
        let mut machine = StateMachine::new();
        poll_until(&mut controller, &mut machine, |m, _| m.mode() == Mode::Chaos);
        // handX 0.5 arrives negated.
        assert_eq!(machine.control().x, -0.5);
        assert_eq!(machine.control().y, -0.5);
        assert_eq!(controller.status(), SignalStatus::Signal);
    }

    #[test]
    fn test_direct_mapping_keeps_sign() {
        let mut controller = instant_controller(MirrorMode::Direct, Some(chaos_half()));
        let mut machine = StateMachine::new();
        poll_until(&mut controller, &mut machine, |m, _| m.mode() == Mode::Chaos);
        assert_eq!(machine.control().x, 0.5);
    }

    #[test]
    fn test_null_result_holds_state() {
        let mut controller = instant_controller(MirrorMode::Mirrored, None);
        let mut machine = StateMachine::new();
        poll_until(&mut controller, &mut machine, |_, c| {
            c.status() == SignalStatus::NoSignal
        });
        assert_eq!(machine.mode(), Mode::Formed);
        assert_eq!(machine.control(), Default::default());
        // The token was released: further polls start fresh ticks.
        assert!(!controller.in_flight() || controller.status() == SignalStatus::InFlight);
    }

    #[test]
    fn test_interval_gates_ticks() {
        let mut controller = instant_controller(MirrorMode::Mirrored, Some(chaos_half()));
        controller.set_interval(Duration::from_secs(3600));
        let mut machine = StateMachine::new();
        controller.poll(&mut machine);
        assert!(controller.in_flight());
        // Wait for the worker, then poll again: result applies but no new
        // tick fires inside the hour-long interval.
        poll_until(&mut controller, &mut machine, |m, _| m.mode() == Mode::Chaos);
        for _ in 0..10 {
            controller.poll(&mut machine);
        }
        assert!(!controller.in_flight());
    }
}
