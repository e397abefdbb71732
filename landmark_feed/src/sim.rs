//! Keyboard/mouse simulation of the perception service.
//!
//! The window forwards [`SimInput`] events; this source turns them into a
//! synthetic hand (or two), an optional face, and a low-resolution camera
//! frame, and republishes the scene at roughly camera rate.

use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::Duration;

use crate::frame::CameraFrame;
use crate::landmark::{face_index, hand_index, Detections, Face, Finger, Hand, Landmark};
use crate::source::{Feed, PerceptionSource};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Normalized finger-segment length of a synthetic hand.
const HAND_SCALE: f32 = 0.06;

// ════════════════════════════════════════════════════════════════════════════
// Input events
// ════════════════════════════════════════════════════════════════════════════

/// Hand shapes the simulator can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    OpenPalm,
    VSign,
    Fist,
    /// Index finger only.
    Point,
}

impl SimPose {
    /// Open/closed per finger, thumb→pinky.
    pub fn fingers(self) -> [bool; 5] {
        match self {
            SimPose::OpenPalm => [true; 5],
            SimPose::VSign    => [false, true, true, false, false],
            SimPose::Fist     => [false; 5],
            SimPose::Point    => [false, true, false, false, false],
        }
    }
}

/// Raw input event from the simulation window.
#[derive(Clone, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position, normalized to the window.
    PointerMoved { x: f32, y: f32 },
    Pose(SimPose),
    ToggleHands,
    ToggleSecondHand,
    ToggleFace,
    ToggleMouth,
}

// ════════════════════════════════════════════════════════════════════════════
// SimScene: what the fake camera is looking at
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct SimScene {
    pub pointer:     (f32, f32),
    pub pose:        SimPose,
    pub hands_shown: bool,
    pub second_hand: bool,
    pub face_shown:  bool,
    pub mouth_open:  bool,
    tick:            u32,
}

impl Default for SimScene {
    fn default() -> Self {
        SimScene {
            pointer:     (0.5, 0.5),
            pose:        SimPose::OpenPalm,
            hands_shown: true,
            second_hand: false,
            face_shown:  true,
            mouth_open:  false,
            tick:        0,
        }
    }
}

impl SimScene {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::PointerMoved { x, y } => {
                self.pointer = (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
            }
            SimInput::Pose(p)          => self.pose = p,
            SimInput::ToggleHands      => self.hands_shown = !self.hands_shown,
            SimInput::ToggleSecondHand => self.second_hand = !self.second_hand,
            SimInput::ToggleFace       => self.face_shown  = !self.face_shown,
            SimInput::ToggleMouth      => self.mouth_open  = !self.mouth_open,
        }
    }

    pub fn advance(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Current scene as a perception result.
    pub fn detections(&self) -> Detections {
        let mut hands = Vec::new();
        if self.hands_shown {
            let (x, y) = self.pointer;
            hands.push(synth_hand(x, y, self.pose));
            if self.second_hand {
                // Mirror image across the vertical centre line; crossing the
                // middle makes the two hands overlap.
                hands.push(synth_hand(1.0 - x, y, self.pose));
            }
        }
        let face = self.face_shown.then(|| synth_face(self.mouth_open));
        Detections::new(hands, face)
    }

    /// A synthetic camera image: a slow moving gradient with a bright blob
    /// where the hand is and a dark oval for the face.
    pub fn camera_frame(&self, width: usize, height: usize) -> CameraFrame {
        let mut frame = CameraFrame::blank(width, height);
        let (px, py) = self.pointer;
        let phase = self.tick as f32 * 0.05;

        for y in 0..height {
            for x in 0..width {
                let nx = x as f32 / width.max(1) as f32;
                let ny = y as f32 / height.max(1) as f32;

                let mut v = 90.0 + 60.0 * (nx * 6.0 + phase).sin() * (ny * 4.0 - phase).cos();

                if self.hands_shown {
                    let d = ((nx - px).powi(2) + (ny - py).powi(2)).sqrt();
                    v += 160.0 * (1.0 - d / 0.2).max(0.0);
                }
                if self.face_shown {
                    let fx = (nx - 0.5) / 0.18;
                    let fy = (ny - 0.45) / 0.25;
                    if fx * fx + fy * fy < 1.0 {
                        v *= 0.35;
                    }
                }

                let l = v.clamp(0.0, 255.0) as u8;
                frame.set_pixel(x, y, [l, l, l.saturating_sub(10)]);
            }
        }
        frame
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark synthesis
// ════════════════════════════════════════════════════════════════════════════

/// Build a 21-point hand whose knuckle line is centred on `(cx, cy)`.
///
/// Extended fingers run strictly upward joint by joint; curled fingers fold
/// back below their middle joint so the open/closed test reads them as
/// closed.
pub fn synth_hand(cx: f32, cy: f32, pose: SimPose) -> Hand {
    let s = HAND_SCALE;
    let open = pose.fingers();
    let mut lm = vec![Landmark::default(); hand_index::COUNT];

    lm[hand_index::WRIST] = Landmark::new(cx, cy + 1.6 * s);

    for finger in Finger::ALL {
        let f = finger.ordinal();
        let column = cx + (f as f32 - 2.0) * 0.45 * s;
        let base_y = if finger == Finger::Thumb { cy + 0.8 * s } else { cy };
        let (b, m, t) = finger.joints();
        let tip = finger.tip();

        let ys = if open[f] {
            [base_y, base_y - 0.6 * s, base_y - 1.1 * s, base_y - 1.5 * s]
        } else {
            [base_y, base_y - 0.5 * s, base_y - 0.2 * s, base_y + 0.1 * s]
        };
        for (idx, y) in [b, m, t, tip].into_iter().zip(ys) {
            lm[idx] = Landmark::new(column.clamp(0.0, 1.0), y.clamp(0.0, 1.0));
        }
    }
    Hand::new(lm)
}

/// Build a face mesh: an oval of points with the two inner-lip landmarks
/// placed for an open or closed mouth.
pub fn synth_face(mouth_open: bool) -> Face {
    let mut lm: Vec<Landmark> = (0..face_index::COUNT)
        .map(|i| {
            let a = i as f32 / face_index::COUNT as f32 * std::f32::consts::TAU;
            Landmark::new(0.5 + 0.18 * a.cos(), 0.45 + 0.25 * a.sin())
        })
        .collect();

    let gap = if mouth_open { 0.12 } else { 0.01 };
    lm[face_index::UPPER_LIP] = Landmark::new(0.5, 0.58 - gap / 2.0);
    lm[face_index::LOWER_LIP] = Landmark::new(0.5, 0.58 + gap / 2.0);
    Face::new(lm)
}

// ════════════════════════════════════════════════════════════════════════════
// SimPerceptionSource
// ════════════════════════════════════════════════════════════════════════════

/// Perception source driven by [`SimInput`] events from the window.
pub struct SimPerceptionSource {
    pub rx:            Receiver<SimInput>,
    pub camera_width:  usize,
    pub camera_height: usize,
}

impl PerceptionSource for SimPerceptionSource {
    fn name(&self) -> &'static str { "simulator" }

    fn run(self: Box<Self>, feed: Feed) {
        let mut scene = SimScene::default();
        loop {
            match self.rx.recv_timeout(FRAME_INTERVAL) {
                Ok(input) => {
                    log::debug!("sim input: {:?}", input);
                    scene.apply(input);
                    // Coalesce bursts of pointer events into one publish.
                    while let Ok(more) = self.rx.try_recv() {
                        scene.apply(more);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::info!("simulator input closed");
                    return;
                }
            }
            scene.advance();
            feed.detections.publish(scene.detections());
            feed.camera.publish(scene.camera_frame(self.camera_width, self.camera_height));
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
