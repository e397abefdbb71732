//! Finger drawing: the index fingertip leaves a trail, a fist wipes it.

use std::collections::VecDeque;

use landmark_feed::{hand_index, Hand, Point};

use crate::gesture::is_fist;

/// What one frame did to the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stroke {
    Cleared,
    Extended,
    Unchanged,
}

/// Ordered trail of canvas points, rendered as a polyline.
///
/// With a cap, the oldest point is dropped once the cap is reached.
#[derive(Clone, Debug, Default)]
pub struct DrawingPath {
    points:     VecDeque<Point>,
    max_points: Option<usize>,
}

impl DrawingPath {
    /// `max_points == 0` keeps every point.
    pub fn new(max_points: usize) -> Self {
        DrawingPath {
            points:     VecDeque::new(),
            max_points: (max_points > 0).then_some(max_points),
        }
    }

    pub fn push(&mut self, p: Point) {
        if let Some(cap) = self.max_points {
            while self.points.len() >= cap {
                self.points.pop_front();
            }
        }
        self.points.push_back(p);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> + '_ {
        self.points.iter()
    }

    /// Consecutive point pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.points.iter().zip(self.points.iter().skip(1)).map(|(a, b)| (*a, *b))
    }

    /// Apply one frame's first hand.
    ///
    /// No hand leaves the path alone.  A fist clears it; otherwise the index
    /// fingertip is appended (if the detection has one).
    pub fn update(&mut self, hand: Option<&Hand>, canvas: (f32, f32)) -> Stroke {
        let Some(hand) = hand else {
            return Stroke::Unchanged;
        };
        if is_fist(hand) {
            if !self.is_empty() {
                log::debug!("fist: clearing {} points", self.len());
            }
            self.clear();
            return Stroke::Cleared;
        }
        match hand.get(hand_index::INDEX_TIP) {
            Some(tip) => {
                self.push(tip.to_canvas(canvas.0, canvas.1));
                Stroke::Extended
            }
            None => Stroke::Unchanged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use landmark_feed::sim::{synth_hand, SimPose};

    const CANVAS: (f32, f32) = (640.0, 480.0);

    fn pointing(x: f32) -> Hand { synth_hand(x, 0.5, SimPose::Point) }
    fn fist() -> Hand { synth_hand(0.5, 0.5, SimPose::Fist) }

    #[test]
    fn n_samples_make_n_points() {
        let mut path = DrawingPath::new(0);
        for i in 0..25 {
            assert_eq!(path.update(Some(&pointing(i as f32 / 30.0)), CANVAS), Stroke::Extended);
        }
        assert_eq!(path.len(), 25);
        assert_eq!(path.segments().count(), 24);
    }

    #[test]
    fn fist_resets_to_empty() {
        let mut path = DrawingPath::new(0);
        for _ in 0..10 { path.update(Some(&pointing(0.4)), CANVAS); }
        assert_eq!(path.update(Some(&fist()), CANVAS), Stroke::Cleared);
        assert!(path.is_empty());
        assert_eq!(path.update(Some(&fist()), CANVAS), Stroke::Cleared);
    }

    #[test]
    fn no_hand_leaves_path_alone() {
        let mut path = DrawingPath::new(0);
        for _ in 0..3 { path.update(Some(&pointing(0.4)), CANVAS); }
        assert_eq!(path.update(None, CANVAS), Stroke::Unchanged);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn truncated_hand_without_index_tip() {
        let mut path = DrawingPath::new(0);
        let mut hand = synth_hand(0.5, 0.5, SimPose::OpenPalm);
        hand.landmarks.truncate(8); // fingers still read open, tip 8 gone
        assert_eq!(path.update(Some(&hand), CANVAS), Stroke::Unchanged);
        assert!(path.is_empty());
    }

    #[test]
    fn appended_point_is_index_tip_in_pixels() {
        let mut path = DrawingPath::new(0);
        let hand = pointing(0.25);
        path.update(Some(&hand), CANVAS);
        let tip = hand.get(hand_index::INDEX_TIP).unwrap().to_canvas(640.0, 480.0);
        assert_eq!(path.points().next(), Some(&tip));
    }

    #[test]
    fn cap_drops_oldest() {
        let mut path = DrawingPath::new(3);
        for i in 0..5 { path.push(Point::new(i as f32, 0.0)); }
        assert_eq!(path.len(), 3);
        assert_eq!(path.points().next(), Some(&Point::new(2.0, 0.0)));
    }
}
