//! Render mode cycle and the two-hands camera override.

use std::time::Duration;

use landmark_feed::Hand;

use crate::gesture::{GestureEvent, ModeTrigger};

// ════════════════════════════════════════════════════════════════════════════
// Mode
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Ascii,
    Particle,
    Draw,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Ascii, Mode::Particle, Mode::Draw];

    pub fn next(self) -> Mode {
        Mode::ALL[(self.index() + 1) % Mode::ALL.len()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ascii    => "ascii",
            Mode::Particle => "particle",
            Mode::Draw     => "draw",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ModeController
// ════════════════════════════════════════════════════════════════════════════

/// Current mode plus the V-sign trigger that advances it.
#[derive(Clone, Debug, Default)]
pub struct ModeController {
    mode:    Mode,
    trigger: ModeTrigger,
}

impl ModeController {
    pub fn new(cooldown: Duration) -> Self {
        ModeController { mode: Mode::default(), trigger: ModeTrigger::new(cooldown) }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Check this frame's hands; returns the new mode if it changed.
    pub fn update(&mut self, hands: &[Hand], now: Duration) -> Option<Mode> {
        match self.trigger.poll(hands, now)? {
            GestureEvent::VSign { hand } => {
                self.mode = self.mode.next();
                log::info!("V sign on hand {}, mode now {}", hand, self.mode.name());
                Some(self.mode)
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandBox: axis-aligned bounds in canvas pixels
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandBox {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl HandBox {
    /// Bounds over every landmark of `hand`; `None` for an empty hand.
    pub fn of(hand: &Hand, width: f32, height: f32) -> Option<HandBox> {
        let mut points = hand.landmarks.iter().map(|l| l.to_canvas(width, height));
        let first = points.next()?;
        let init = HandBox { min_x: first.x, max_x: first.x, min_y: first.y, max_y: first.y };
        Some(points.fold(init, |b, p| HandBox {
            min_x: b.min_x.min(p.x),
            max_x: b.max_x.max(p.x),
            min_y: b.min_y.min(p.y),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Strict on both axes: boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &HandBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }
}

/// True when the first two hands' boxes intersect.  Hands past the second
/// are not considered.
pub fn camera_override(hands: &[Hand], width: f32, height: f32) -> bool {
    match hands {
        [a, b, ..] => match (HandBox::of(a, width, height), HandBox::of(b, width, height)) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        },
        _ => false,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use landmark_feed::sim::{synth_hand, SimPose};
    use landmark_feed::Landmark;

    fn bx(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> HandBox {
        HandBox { min_x, max_x, min_y, max_y }
    }

    fn square_hand(x0: f32, y0: f32, side: f32) -> Hand {
        Hand::new(vec![Landmark::new(x0, y0), Landmark::new(x0 + side, y0 + side)])
    }

    // ── Mode ─────────────────────────────────────────────────────────────
    #[test]
    fn mode_cycles_through_three() {
        let mut m = Mode::Ascii;
        let mut seen = Vec::new();
        for _ in 0..7 {
            seen.push(m.index());
            m = m.next();
        }
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
        assert!(Mode::ALL.iter().all(|m| m.index() < 3));
    }

    #[test]
    fn controller_advances_on_v_sign() {
        let mut c = ModeController::default();
        let v = [synth_hand(0.5, 0.5, SimPose::VSign)];
        assert_eq!(c.update(&v, Duration::ZERO), Some(Mode::Particle));
        assert_eq!(c.update(&v, Duration::from_millis(500)), None);
        assert_eq!(c.update(&v, Duration::from_millis(1000)), Some(Mode::Draw));
        assert_eq!(c.update(&v, Duration::from_millis(2000)), Some(Mode::Ascii));
        assert_eq!(c.mode(), Mode::Ascii);
    }

    // ── HandBox ──────────────────────────────────────────────────────────
    #[test]
    fn identical_boxes_overlap() {
        let a = bx(10.0, 50.0, 10.0, 50.0);
        assert!(a.overlaps(&a));
    }

    #[test]
    fn separated_on_one_axis_does_not_overlap() {
        let a = bx(0.0, 10.0, 0.0, 10.0);
        assert!(!a.overlaps(&bx(20.0, 30.0, 0.0, 10.0)));
        assert!(!a.overlaps(&bx(0.0, 10.0, 20.0, 30.0)));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = bx(0.0, 10.0, 0.0, 10.0);
        assert!(!a.overlaps(&bx(10.0, 20.0, 0.0, 10.0)));
        assert!(!a.overlaps(&bx(0.0, 10.0, 10.0, 20.0)));
        assert!(a.overlaps(&bx(9.9, 20.0, 9.9, 20.0)));
    }

    #[test]
    fn box_scales_to_canvas() {
        let b = HandBox::of(&square_hand(0.1, 0.2, 0.1), 100.0, 200.0).unwrap();
        assert!((b.min_x - 10.0).abs() < 1e-4);
        assert!((b.max_x - 20.0).abs() < 1e-4);
        assert!((b.min_y - 40.0).abs() < 1e-4);
        assert!((b.max_y - 60.0).abs() < 1e-4);
        assert!(HandBox::of(&Hand::default(), 100.0, 100.0).is_none());
    }

    // ── camera_override ──────────────────────────────────────────────────
    #[test]
    fn override_needs_two_hands() {
        let h = square_hand(0.1, 0.1, 0.3);
        assert!(!camera_override(&[], 640.0, 480.0));
        assert!(!camera_override(&[h.clone()], 640.0, 480.0));
        assert!(camera_override(&[h.clone(), h], 640.0, 480.0));
    }

    #[test]
    fn override_ignores_third_hand() {
        let a = square_hand(0.0, 0.0, 0.1);
        let b = square_hand(0.5, 0.5, 0.1);
        let c = square_hand(0.0, 0.0, 0.1);
        assert!(!camera_override(&[a, b, c], 640.0, 480.0));
    }
}
