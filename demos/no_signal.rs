//! Degraded-mode run: no classifier at all. The scene reports the signal
//! as unavailable and simply holds the formed tree with its idle camera
//! orbit, the same behavior as missing credentials in production.
//!
//! Run with: `cargo run --example no_signal`

use treeform::prelude::*;

fn main() {
    TreeScene::new(TreeConfig::default()).run().unwrap();
}
