//! # landmark_feed
//!
//! Hand and face landmarks from an external perception service, delivered to
//! a render loop through single-slot "latest value" cells.
//!
//! ## Sources
//!
//! | Source | Input | Use |
//! |---|---|---|
//! | [`SimPerceptionSource`] | window keyboard/mouse events | no camera or tracker needed |
//! | [`UdpPerceptionSource`] | JSON datagrams from a tracker process | live camera |
//!
//! Both run on their own thread and publish into a [`Feed`]:
//!
//! ```rust,no_run
//! use landmark_feed::{spawn_perception_source, UdpPerceptionSource};
//!
//! let source = UdpPerceptionSource::bind(("127.0.0.1", 4000), 2).unwrap();
//! let feed = spawn_perception_source(source);
//! if let Some(d) = feed.detections.get() {
//!     println!("{} hand(s)", d.hands.len());
//! }
//! ```

pub mod error;
pub mod frame;
pub mod landmark;
pub mod latest;
pub mod sim;
pub mod source;
pub mod wire;

pub use error::{FeedError, Result};
pub use frame::{CameraFrame, CAMERA_H, CAMERA_W};
pub use landmark::{face_index, hand_index, Detections, Face, Finger, Hand, Landmark, Point};
pub use latest::Latest;
pub use sim::{SimInput, SimPerceptionSource, SimPose};
pub use source::{spawn_perception_source, Feed, PerceptionSource};
pub use wire::{FeedMessage, UdpPerceptionSource, DEFAULT_PORT};
