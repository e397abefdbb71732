//! Landmark data model.
//!
//! Coordinates arrive normalized to the camera frame (`0.0..=1.0` on both
//! axes, `y` growing downward) and are scaled to canvas pixels with
//! [`Landmark::to_canvas`].  Every per-frame structure here is immutable once
//! built; a new detection result replaces the previous one wholesale.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

// ════════════════════════════════════════════════════════════════════════════
// Index schemas
// ════════════════════════════════════════════════════════════════════════════

/// 21-point hand schema (wrist, then four joints per finger).
pub mod hand_index {
    pub const WRIST:      usize = 0;
    pub const THUMB_TIP:  usize = 4;
    pub const INDEX_TIP:  usize = 8;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_TIP:   usize = 16;
    pub const PINKY_TIP:  usize = 20;

    /// Thumb, index, middle, ring, pinky.
    pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

    /// Number of landmarks in a complete hand.
    pub const COUNT: usize = 21;
}

/// Face-mesh indices used by the renderer.
pub mod face_index {
    /// Inner upper lip.
    pub const UPPER_LIP: usize = 13;
    /// Inner lower lip.
    pub const LOWER_LIP: usize = 14;

    /// Number of landmarks in a complete face mesh.
    pub const COUNT: usize = 468;
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

/// A single normalized key point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist / face centre; unused by the renderer.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, z: 0.0 }
    }

    /// Scale to canvas pixels.
    pub fn to_canvas(&self, width: f32, height: f32) -> Point {
        Point::new(self.x * width, self.y * height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Point: canvas-space position / displacement
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: Point) -> f32 {
        (*self - other).length()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// Same direction, new length.  A zero vector has no direction and stays
    /// zero.
    pub fn with_length(&self, len: f32) -> Point {
        let l = self.length();
        if l == 0.0 {
            return Point::ZERO;
        }
        *self * (len / l)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point { Point::new(self.x + rhs.x, self.y + rhs.y) }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point { Point::new(self.x - rhs.x, self.y - rhs.y) }
}

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, k: f32) -> Point { Point::new(self.x * k, self.y * k) }
}

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky,
    ];

    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// `(base, middle, tip)` joint indices compared by the open/closed test.
    pub fn joints(self) -> (usize, usize, usize) {
        let f = self.ordinal() * 4;
        (f + 1, f + 2, f + 3)
    }

    /// Landmark index of the fingertip.
    pub fn tip(self) -> usize {
        hand_index::FINGERTIPS[self.ordinal()]
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Hand / Face
// ════════════════════════════════════════════════════════════════════════════

/// One detected hand, landmarks in schema order.
///
/// A detection may be truncated; lookups return `None` for absent joints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    pub landmarks: Vec<Landmark>,
}

impl Hand {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Hand { landmarks }
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Fingertips present in this detection, in thumb→pinky order.
    pub fn fingertips(&self) -> impl Iterator<Item = &Landmark> + '_ {
        hand_index::FINGERTIPS.iter().filter_map(move |&i| self.get(i))
    }
}

/// One detected face mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Face {
    pub landmarks: Vec<Landmark>,
}

impl Face {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Face { landmarks }
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }

    /// Inner upper and lower lip, if both are present.
    pub fn lips(&self) -> Option<(Landmark, Landmark)> {
        Some((*self.get(face_index::UPPER_LIP)?, *self.get(face_index::LOWER_LIP)?))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Detections: one perception result
// ════════════════════════════════════════════════════════════════════════════

/// Hands and face found in one camera frame.
///
/// Hand order is whatever the tracker reported; "first hand" is positional,
/// not a stable identity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Detections {
    pub hands: Vec<Hand>,
    pub face:  Option<Face>,
}

impl Detections {
    pub fn new(hands: Vec<Hand>, face: Option<Face>) -> Self {
        Detections { hands, face }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty() && self.face.is_none()
    }

    pub fn first_hand(&self) -> Option<&Hand> {
        self.hands.first()
    }

    /// Drop hands beyond `max_hands`.
    pub fn limit_hands(mut self, max_hands: usize) -> Self {
        self.hands.truncate(max_hands);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finger_joint_indices() {
        assert_eq!(Finger::Thumb.joints(), (1, 2, 3));
        assert_eq!(Finger::Index.joints(), (5, 6, 7));
        assert_eq!(Finger::Pinky.joints(), (17, 18, 19));
        assert_eq!(Finger::Index.tip(), 8);
        assert_eq!(Finger::Pinky.tip(), 20);
    }

    #[test]
    fn landmark_scales_to_canvas() {
        let p = Landmark::new(0.25, 0.5).to_canvas(640.0, 480.0);
        assert_eq!(p, Point::new(160.0, 240.0));
    }

    #[test]
    fn with_length_keeps_direction() {
        let v = Point::new(3.0, 4.0).with_length(10.0);
        assert!((v.x - 6.0).abs() < 1e-5);
        assert!((v.y - 8.0).abs() < 1e-5);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert_eq!(Point::ZERO.with_length(50.0), Point::ZERO);
    }

    #[test]
    fn truncated_hand_lookups() {
        let hand = Hand::new(vec![Landmark::default(); 6]);
        assert!(hand.get(5).is_some());
        assert!(hand.get(8).is_none());
        assert_eq!(hand.fingertips().count(), 1); // thumb tip only
    }

    #[test]
    fn face_lips_require_both_points() {
        let short = Face::new(vec![Landmark::default(); 14]);
        assert!(short.lips().is_none());
        let full = Face::new(vec![Landmark::default(); face_index::COUNT]);
        assert!(full.lips().is_some());
    }

    #[test]
    fn limit_hands_truncates() {
        let d = Detections::new(vec![Hand::default(); 4], None).limit_hands(2);
        assert_eq!(d.hands.len(), 2);
        assert!(!d.is_empty());
        assert!(Detections::default().is_empty());
    }

    #[test]
    fn hand_deserializes_from_landmark_array() {
        let hand: Hand = serde_json::from_str(r#"[{"x":0.1,"y":0.2},{"x":0.3,"y":0.4,"z":-0.1}]"#)
            .unwrap();
        assert_eq!(hand.len(), 2);
        assert_eq!(hand.get(1).unwrap().z, -0.1);
    }
}
