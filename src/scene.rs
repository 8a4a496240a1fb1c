//! Scene assembly: populations, state, signal, and view in one place.
//!
//! [`TreeScene`] owns everything the render loop touches. Build it with
//! method chaining, drive it with [`TreeScene::update`] once per frame (or
//! hand it to [`TreeScene::run`] to open a window), and read the
//! per-population instance buffers back for rendering.
//!
//! # Example
//!
//! ```ignore
//! use treeform::prelude::*;
//!
//! TreeScene::new(TreeConfig::default())
//!     .with_frame_source(Box::new(TestPattern::new(320, 240)))
//!     .with_classifier(Arc::new(ScriptedClassifier::new(4)))
//!     .run()
//!     .unwrap();
//! ```

use crate::capture::FrameSource;
use crate::classify::Classifier;
use crate::error::SceneError;
use crate::instance::{Population, TreeConfig};
use crate::morph;
use crate::shape::ShapeContext;
use crate::signal::{MirrorMode, SignalController, SignalStatus};
use crate::state::{ControlVector, Mode, StateMachine};
use crate::view::ViewDriver;
use crate::window::App;
use glam::Mat4;
use std::sync::Arc;
use std::time::Duration;
use winit::event_loop::{ControlFlow, EventLoop};

/// The complete morphing tree: three populations plus the control plumbing.
pub struct TreeScene {
    populations: Vec<Population>,
    machine: StateMachine,
    signal: SignalController,
    view: ViewDriver,
}

impl TreeScene {
    /// Generate the populations once and assemble the scene.
    pub fn new(config: TreeConfig) -> Self {
        let mut ctx = match config.seed {
            Some(seed) => ShapeContext::from_seed(seed),
            None => ShapeContext::new(),
        };

        let populations = vec![
            Population::foliage(&mut ctx, &config),
            Population::ornaments(&mut ctx, &config),
            Population::cards(&mut ctx, &config),
        ];

        Self {
            populations,
            machine: StateMachine::new(),
            signal: SignalController::new(),
            view: ViewDriver::new(),
        }
    }

    /// Attach the capture collaborator. Without one the signal loop idles.
    pub fn with_frame_source(mut self, source: Box<dyn FrameSource>) -> Self {
        self.signal.set_frame_source(source);
        self
    }

    /// Attach the classification collaborator. Without one the tree stays
    /// formed (or wherever it last was) for the whole run.
    pub fn with_classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.signal.set_classifier(classifier);
        self
    }

    /// Override the classification sampling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.signal.set_interval(interval);
        self
    }

    /// Choose how the horizontal control component maps to the scene.
    pub fn with_mirror(mut self, mirror: MirrorMode) -> Self {
        self.signal.set_mirror(mirror);
        self
    }

    /// Advance the whole scene by one frame.
    ///
    /// Polls the signal controller (interval-gated internally), morphs all
    /// populations toward the current mode, and eases the camera.
    pub fn update(&mut self, elapsed: f32, delta: f32) {
        self.signal.poll(&mut self.machine);

        let mode = self.machine.mode();
        for population in &mut self.populations {
            morph::advance(population, mode, elapsed, delta);
        }

        self.view.update(self.machine.control(), mode, elapsed, delta);
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.machine.mode()
    }

    #[inline]
    pub fn control(&self) -> ControlVector {
        self.machine.control()
    }

    #[inline]
    pub fn status(&self) -> SignalStatus {
        self.signal.status()
    }

    #[inline]
    pub fn populations(&self) -> &[Population] {
        &self.populations
    }

    /// Combined view-projection matrix for the current frame.
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.view.view_proj(aspect)
    }

    /// Mouse-wheel zoom passthrough for the window layer.
    pub fn zoom_by(&mut self, amount: f32) {
        self.view.zoom_by(amount);
    }

    /// Whether a classification is currently outstanding.
    #[inline]
    pub fn signal_in_flight(&self) -> bool {
        self.signal.in_flight()
    }

    /// Open a window and run the scene until it is closed.
    ///
    /// Dropping the scene at exit tears the signal controller down with it;
    /// an in-flight classification that completes afterwards is discarded.
    pub fn run(self) -> Result<(), SceneError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}
