//! # Treeform
//!
//! An interactive 3D particle formation that continuously morphs between an
//! ordered tree and a scattered cloud, steered by an external vision
//! classifier sampling a camera at a fixed cadence.
//!
//! ## Quick Start
//!
//! ```ignore
//! use treeform::prelude::*;
//! use std::sync::Arc;
//!
//! fn main() {
//!     TreeScene::new(TreeConfig::default())
//!         .with_frame_source(Box::new(TestPattern::new(320, 240)))
//!         .with_classifier(Arc::new(ScriptedClassifier::new(4)))
//!         .run()
//!         .unwrap();
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Populations
//!
//! Three fixed-size instance populations make up the tree: fine foliage
//! particles, ornament baubles, and flat photo cards. Every instance gets a
//! stable pair of endpoint transforms at creation (a formed position on
//! the cone and a scattered position in a larger sphere) and interpolates
//! between that same pair for its whole lifetime ([`instance`], [`shape`]).
//!
//! ### Morphing
//!
//! A per-population [`blend::BlendState`] eases toward 0 (formed) or 1
//! (scattered) depending on the discrete [`state::Mode`]; the
//! [`morph`] pass rewrites each population's render buffer from the cached
//! endpoints every frame, with a desynchronized drift swell mid-transition.
//! Foliage reacts fastest, cards trail behind.
//!
//! ### The signal
//!
//! A [`signal::SignalController`] samples a [`capture::FrameSource`] every
//! 800 ms and hands the JPEG to a [`classify::Classifier`] on a worker
//! thread, never more than one outstanding at a time. A successful
//! classification flips the mode and refreshes the 2D control vector that
//! steers the camera ([`view`]); any failure just means the scene holds.

pub mod blend;
pub mod capture;
pub mod classify;
pub mod error;
pub mod gpu;
pub mod instance;
pub mod morph;
pub mod scene;
pub mod shader;
pub mod shape;
pub mod signal;
pub mod state;
pub mod time;
pub mod view;
pub mod window;

// Re-export the math types used throughout the public API.
pub use glam::{Mat4, Quat, Vec2, Vec3};

pub use capture::{Frame, FrameSource, TestPattern};
pub use classify::{Classification, Classifier, ScriptedClassifier};
pub use error::{CaptureError, GpuError, SceneError};
pub use instance::{Population, PopulationKind, TreeConfig};
pub use scene::TreeScene;
pub use signal::{MirrorMode, SignalStatus};
pub use state::{ControlVector, Mode};

/// Common imports for building a scene.
pub mod prelude {
    pub use crate::capture::{Frame, FrameSource, TestPattern};
    pub use crate::classify::{Classification, Classifier, ScriptedClassifier};
    pub use crate::instance::TreeConfig;
    pub use crate::scene::TreeScene;
    pub use crate::signal::MirrorMode;
    pub use crate::state::Mode;
    pub use glam::Vec3;
}
