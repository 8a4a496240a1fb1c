use std::sync::Arc;
use treeform::prelude::*;

fn main() {
    println!("treeform: open hand scatters, fist reforms");

    let result = TreeScene::new(TreeConfig::default())
        .with_frame_source(Box::new(TestPattern::new(320, 240)))
        .with_classifier(Arc::new(ScriptedClassifier::new(4)))
        .run();

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
