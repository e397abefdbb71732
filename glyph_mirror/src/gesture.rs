//! Hand-pose classification.
//!
//! Each finger is judged open or closed from the vertical order of three
//! joints; the V sign and the fist are built from those five booleans.  The
//! V sign is the mode trigger and goes through a process-wide cooldown; the
//! fist is a plain per-frame test used by the drawing canvas.

use std::time::Duration;

use landmark_feed::{Finger, Hand};

/// Minimum interval between two mode triggers.
pub const GESTURE_COOLDOWN: Duration = Duration::from_millis(1000);

// ════════════════════════════════════════════════════════════════════════════
// Finger state
// ════════════════════════════════════════════════════════════════════════════

/// True iff the finger's tip-side joint is strictly above its middle joint,
/// which is strictly above its base joint (smaller `y` is higher on screen).
///
/// A missing joint reads as closed.
pub fn is_finger_open(hand: &Hand, finger: Finger) -> bool {
    let (base, mid, tip) = finger.joints();
    match (hand.get(base), hand.get(mid), hand.get(tip)) {
        (Some(base), Some(mid), Some(tip)) => tip.y < mid.y && mid.y < base.y,
        _ => false,
    }
}

/// Open/closed for all five fingers of one hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerStates {
    pub thumb:  bool,
    pub index:  bool,
    pub middle: bool,
    pub ring:   bool,
    pub pinky:  bool,
}

impl FingerStates {
    pub fn of(hand: &Hand) -> Self {
        FingerStates {
            thumb:  is_finger_open(hand, Finger::Thumb),
            index:  is_finger_open(hand, Finger::Index),
            middle: is_finger_open(hand, Finger::Middle),
            ring:   is_finger_open(hand, Finger::Ring),
            pinky:  is_finger_open(hand, Finger::Pinky),
        }
    }

    /// Index and middle up, ring and pinky down; thumb ignored.
    pub fn is_v_sign(&self) -> bool {
        self.index && self.middle && !self.ring && !self.pinky
    }

    pub fn is_fist(&self) -> bool {
        !(self.thumb || self.index || self.middle || self.ring || self.pinky)
    }
}

pub fn is_v_sign(hand: &Hand) -> bool {
    FingerStates::of(hand).is_v_sign()
}

pub fn is_fist(hand: &Hand) -> bool {
    FingerStates::of(hand).is_fist()
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEvent / ModeTrigger
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    /// A V sign passed the cooldown; `hand` is its position in the frame's
    /// hand list.
    VSign { hand: usize },
}

/// Edge trigger for the V sign with one cooldown shared by all hands.
///
/// Holding the pose fires again once per cooldown interval.  When several
/// hands show it in the same frame, the first one in list order fires and
/// the rest fall inside the fresh cooldown.
#[derive(Clone, Debug)]
pub struct ModeTrigger {
    cooldown:   Duration,
    last_fired: Option<Duration>,
}

impl Default for ModeTrigger {
    fn default() -> Self {
        ModeTrigger::new(GESTURE_COOLDOWN)
    }
}

impl ModeTrigger {
    pub fn new(cooldown: Duration) -> Self {
        ModeTrigger { cooldown, last_fired: None }
    }

    /// `now` is time since session start.
    pub fn ready(&self, now: Duration) -> bool {
        match self.last_fired {
            None       => true,
            Some(last) => now.saturating_sub(last) >= self.cooldown,
        }
    }

    pub fn poll(&mut self, hands: &[Hand], now: Duration) -> Option<GestureEvent> {
        for (i, hand) in hands.iter().enumerate() {
            if is_v_sign(hand) && self.ready(now) {
                self.last_fired = Some(now);
                return Some(GestureEvent::VSign { hand: i });
            }
        }
        None
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
