//! Camera-to-glyph backdrop.
//!
//! Every camera pixel becomes one glyph chosen from a brightness ramp and
//! placed at the pixel's position scaled up to the canvas.  The pass is
//! throttled: it runs every `update_rate` frames and the visualizer keeps
//! drawing the last pass's cells in between.

use landmark_feed::{CameraFrame, Face, Point};
use rand::Rng;

use crate::mode::Mode;

/// Densest to sparsest.
pub const GLYPH_RAMP: [char; 11] = ['@', '#', '$', '%', '&', '*', '+', '=', '-', '.', ' '];

/// Remapped brightness never drops below this, so pure black lands one step
/// into the ramp.
pub const BRIGHTNESS_FLOOR: f32 = 50.0;

/// Lip gap in canvas pixels above which the mouth counts as open.
pub const MOUTH_OPEN_PX: f32 = 30.0;

/// Enlarged glyphs near an open mouth shake by up to this many pixels.
pub const JITTER_PX: f32 = 5.0;

const LAST_GLYPH: usize = GLYPH_RAMP.len() - 1;

// ════════════════════════════════════════════════════════════════════════════
// Brightness → glyph
// ════════════════════════════════════════════════════════════════════════════

/// Map luma `0..=255` onto `BRIGHTNESS_FLOOR..=255`.
pub fn remap_brightness(luma: f32) -> f32 {
    BRIGHTNESS_FLOOR + luma * (255.0 - BRIGHTNESS_FLOOR) / 255.0
}

/// Ramp index for a remapped brightness.
pub fn glyph_index(brightness: f32) -> usize {
    let i = (brightness / 255.0 * LAST_GLYPH as f32).floor();
    i.clamp(0.0, LAST_GLYPH as f32) as usize
}

pub fn glyph_for_luma(luma: f32) -> char {
    GLYPH_RAMP[glyph_index(remap_brightness(luma))]
}

// ════════════════════════════════════════════════════════════════════════════
// Mouth
// ════════════════════════════════════════════════════════════════════════════

/// Inner-lip geometry in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mouth {
    pub center: Point,
    pub gap:    f32,
}

impl Mouth {
    /// Lip midpoint and gap, if the face has both lip landmarks.
    pub fn measure(face: &Face, width: f32, height: f32) -> Option<Mouth> {
        let (upper, lower) = face.lips()?;
        let upper = upper.to_canvas(width, height);
        let lower = lower.to_canvas(width, height);
        Some(Mouth { center: upper.midpoint(lower), gap: upper.distance(lower) })
    }

    pub fn is_open(&self) -> bool {
        self.gap > MOUTH_OPEN_PX
    }

    /// Radius of the distortion / repulsion zone.
    pub fn radius(&self) -> f32 {
        3.0 * self.gap
    }

    pub fn contains(&self, p: Point) -> bool {
        self.center.distance(p) < self.radius()
    }
}

/// The mouth, only when a face is present and its mouth is open.
pub fn open_mouth(face: Option<&Face>, width: f32, height: f32) -> Option<Mouth> {
    face.and_then(|f| Mouth::measure(f, width, height))
        .filter(Mouth::is_open)
}

// ════════════════════════════════════════════════════════════════════════════
// Glyph cells
// ════════════════════════════════════════════════════════════════════════════

/// One glyph to draw, centred on `pos`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphCell {
    pub glyph: char,
    pub pos:   Point,
    /// Glyph height in pixels.
    pub size:  f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    Red,
    Gray,
}

impl Tint {
    /// Red backdrop in ASCII mode, gray behind the other layers.
    pub fn for_mode(mode: Mode) -> Tint {
        if mode == Mode::Ascii { Tint::Red } else { Tint::Gray }
    }

    pub fn argb(self) -> u32 {
        match self {
            Tint::Red  => 0xFFFF0000,
            Tint::Gray => 0xFF323232,
        }
    }
}

/// Full per-pixel pass over one camera frame.
///
/// Cells inside `mouth`'s zone are drawn at double size and jittered.
pub fn render_cells<R: Rng>(
    frame:     &CameraFrame,
    canvas:    (f32, f32),
    text_size: f32,
    mouth:     Option<&Mouth>,
    rng:       &mut R,
) -> Vec<GlyphCell> {
    let (fw, fh) = (frame.width(), frame.height());
    let (cw, ch) = canvas;
    let mut cells = Vec::with_capacity(fw * fh);

    for y in 0..fh {
        for x in 0..fw {
            let luma = frame.luma(x, y).unwrap_or(0.0);
            let pos = Point::new(x as f32 / fw as f32 * cw, y as f32 / fh as f32 * ch);
            let glyph = glyph_for_luma(luma);

            let cell = match mouth {
                Some(m) if m.contains(pos) => GlyphCell {
                    glyph,
                    pos: pos + Point::new(
                        rng.gen_range(-JITTER_PX..=JITTER_PX),
                        rng.gen_range(-JITTER_PX..=JITTER_PX),
                    ),
                    size: text_size * 2.0,
                },
                _ => GlyphCell { glyph, pos, size: text_size },
            };
            cells.push(cell);
        }
    }
    cells
}

// ════════════════════════════════════════════════════════════════════════════
// AsciiLayer: throttled pass + cached cells
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct AsciiLayer {
    update_rate: u32,
    text_size:   f32,
    frame:       u64,
    cells:       Vec<GlyphCell>,
}

impl AsciiLayer {
    pub fn new(update_rate: u32, text_size: f32) -> Self {
        AsciiLayer { update_rate: update_rate.max(1), text_size, frame: 0, cells: Vec::new() }
    }

    /// Count one frame; on every `update_rate`-th frame rerun the pass.
    ///
    /// Returns true if the cells were rebuilt.  With no camera frame yet the
    /// previous cells are kept.
    pub fn update<R: Rng>(
        &mut self,
        camera: Option<&CameraFrame>,
        canvas: (f32, f32),
        mouth:  Option<&Mouth>,
        rng:    &mut R,
    ) -> bool {
        let due = self.frame % self.update_rate as u64 == 0;
        self.frame += 1;
        match camera {
            Some(frame) if due => {
                self.cells = render_cells(frame, canvas, self.text_size, mouth, rng);
                true
            }
            _ => false,
        }
    }

    pub fn cells(&self) -> &[GlyphCell] {
        &self.cells
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
