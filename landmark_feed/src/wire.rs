//! UDP/JSON link to an external tracker process.
//!
//! The tracker (a MediaPipe script, or any program speaking this format)
//! sends one JSON object per datagram:
//!
//! ```text
//! {"type":"detections","hands":[[{"x":0.41,"y":0.62,"z":0.0}, …21], …],"faces":[[…468]]}
//! {"type":"frame","width":64,"height":48,"rgb":[r,g,b, r,g,b, …]}
//! ```
//!
//! A datagram that fails to decode is dropped and the previously published
//! value stays current; the renderer cannot tell that apart from "nothing
//! new detected".

use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::frame::CameraFrame;
use crate::landmark::{Detections, Face, Hand};
use crate::source::{Feed, PerceptionSource};

/// Default port the renderer listens on.
pub const DEFAULT_PORT: u16 = 4000;

/// Largest UDP payload.
const MAX_DATAGRAM: usize = 65_507;

// ════════════════════════════════════════════════════════════════════════════
// FeedMessage
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FeedMessage {
    Detections {
        #[serde(default)]
        hands: Vec<Hand>,
        #[serde(default)]
        faces: Vec<Face>,
    },
    Frame {
        width:  usize,
        height: usize,
        rgb:    Vec<u8>,
    },
}

impl FeedMessage {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Publish the message's content into `feed`.
    ///
    /// Only the first `max_hands` hands and the first face are kept.
    pub fn publish(self, feed: &Feed, max_hands: usize) -> Result<()> {
        match self {
            FeedMessage::Detections { hands, faces } => {
                let face = faces.into_iter().next();
                feed.detections.publish(Detections::new(hands, face).limit_hands(max_hands));
            }
            FeedMessage::Frame { width, height, rgb } => {
                feed.camera.publish(CameraFrame::new(width, height, rgb)?);
            }
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// UdpPerceptionSource
// ════════════════════════════════════════════════════════════════════════════

/// Perception source that listens for [`FeedMessage`] datagrams.
pub struct UdpPerceptionSource {
    socket:    UdpSocket,
    max_hands: usize,
}

impl UdpPerceptionSource {
    pub fn bind<A: ToSocketAddrs>(addr: A, max_hands: usize) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        Ok(UdpPerceptionSource { socket, max_hands })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }
}

impl PerceptionSource for UdpPerceptionSource {
    fn name(&self) -> &'static str { "udp" }

    fn run(self: Box<Self>, feed: Feed) {
        if let Ok(addr) = self.socket.local_addr() {
            log::info!("listening for tracker datagrams on {}", addr);
        }
        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let (len, from) = match self.socket.recv_from(&mut buf) {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("udp receive failed: {}", e);
                    thread::sleep(Duration::from_millis(100));
                    continue;
                }
            };
            let result = FeedMessage::decode(&buf[..len])
                .and_then(|msg| msg.publish(&feed, self.max_hands));
            match result {
                Ok(()) => log::debug!("datagram from {} ({} bytes)", from, len),
                Err(e) => log::warn!("dropped datagram from {}: {}", from, e),
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::landmark::Landmark;
    use crate::source::spawn_perception_source;
    use std::time::Instant;

    #[test]
    fn decodes_detections_with_defaults() {
        let msg = FeedMessage::decode(br#"{"type":"detections","hands":[[{"x":0.5,"y":0.5}]]}"#)
            .unwrap();
        match msg {
            FeedMessage::Detections { hands, faces } => {
                assert_eq!(hands.len(), 1);
                assert!(faces.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_type() {
        assert!(matches!(
            FeedMessage::decode(br#"{"type":"audio"}"#),
            Err(FeedError::Decode(_))
        ));
    }

    #[test]
    fn frame_with_wrong_length_is_malformed() {
        let feed = Feed::new();
        let msg = FeedMessage::Frame { width: 2, height: 2, rgb: vec![0; 5] };
        assert!(matches!(msg.publish(&feed, 2), Err(FeedError::Malformed(_))));
        assert!(feed.camera.get().is_none());
    }

    #[test]
    fn oversized_frame_datagram_is_dropped() {
        let feed = Feed::new();
        for width in [usize::MAX, 1usize << (usize::BITS - 1)] {
            let json = format!(r#"{{"type":"frame","width":{},"height":2,"rgb":[]}}"#, width);
            let result = FeedMessage::decode(json.as_bytes()).and_then(|m| m.publish(&feed, 2));
            assert!(matches!(result, Err(FeedError::Malformed(_))));
        }
        assert!(feed.camera.get().is_none());
    }

    #[test]
    fn publish_limits_hands_and_faces() {
        let feed = Feed::new();
        let hand = Hand::new(vec![Landmark::new(0.1, 0.1)]);
        let face = Face::new(vec![Landmark::new(0.5, 0.5)]);
        FeedMessage::Detections {
            hands: vec![hand.clone(), hand.clone(), hand],
            faces: vec![face.clone(), face],
        }
        .publish(&feed, 2)
        .unwrap();
        let d = feed.detections.get().unwrap();
        assert_eq!(d.hands.len(), 2);
        assert!(d.face.is_some());
    }

    #[test]
    fn udp_source_publishes_received_frame() {
        let source = UdpPerceptionSource::bind("127.0.0.1:0", 2).unwrap();
        let addr = source.local_addr().unwrap();
        let feed = spawn_perception_source(source);

        let sender = UdpSocket::bind("127.0.0.1:0").unwrap();
        let bytes = FeedMessage::Frame { width: 2, height: 1, rgb: vec![9; 6] }
            .encode()
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while feed.camera.get().is_none() && Instant::now() < deadline {
            sender.send_to(&bytes, addr).unwrap();
            thread::sleep(Duration::from_millis(20));
        }
        let frame = feed.camera.get().unwrap();
        assert_eq!(frame.pixel(1, 0), Some([9, 9, 9]));
    }
}
