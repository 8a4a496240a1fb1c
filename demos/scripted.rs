//! Scripted run: a canned classifier alternates FORMED and CHAOS every few
//! ticks while sweeping the control vector, so the full morph and camera
//! path plays without a camera or a vision backend.
//!
//! Run with: `cargo run --example scripted`

use std::sync::Arc;
use std::time::Duration;
use treeform::prelude::*;

fn main() {
    TreeScene::new(TreeConfig::default())
        .with_frame_source(Box::new(TestPattern::new(320, 240)))
        .with_classifier(Arc::new(ScriptedClassifier::new(5)))
        .with_poll_interval(Duration::from_millis(800))
        .run()
        .unwrap();
}
