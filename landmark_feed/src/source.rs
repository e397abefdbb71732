//! Perception sources: anything that turns camera input into landmark
//! results on a background thread.
//!
//! The render loop only ever sees the [`Feed`]; it does not know whether the
//! values came from the simulator or an external tracker.

use std::thread;

use crate::frame::CameraFrame;
use crate::landmark::Detections;
use crate::latest::Latest;

// ════════════════════════════════════════════════════════════════════════════
// Feed
// ════════════════════════════════════════════════════════════════════════════

/// The two slots a source publishes into.
#[derive(Clone, Default)]
pub struct Feed {
    pub camera:     Latest<CameraFrame>,
    pub detections: Latest<Detections>,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PerceptionSource trait
// ════════════════════════════════════════════════════════════════════════════

/// A producer of camera frames and detection results.
///
/// `run` owns its thread and returns only when the source has nothing more
/// to deliver (input channel closed, unrecoverable socket state).
pub trait PerceptionSource: Send + 'static {
    fn name(&self) -> &'static str;
    fn run(self: Box<Self>, feed: Feed);
}

/// Spawn a source on its own thread and return the feed it publishes into.
pub fn spawn_perception_source<S: PerceptionSource>(source: S) -> Feed {
    let feed = Feed::new();
    let tx = feed.clone();
    log::info!("starting perception source: {}", source.name());
    thread::spawn(move || Box::new(source).run(tx));
    feed
}
