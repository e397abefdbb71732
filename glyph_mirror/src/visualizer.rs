//! Software-rendered visualizer using `minifb`.
//!
//! Layer order each frame:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  gray background                             │
//! │  glyph backdrop (red in ASCII mode)          │
//! │  particles  |  drawing path   (by mode)      │
//! │  fingertip dots                              │
//! │  status / key legend                         │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! With the two-hands override active the whole canvas is the camera image.

use std::sync::mpsc::Sender;

use landmark_feed::{CameraFrame, Point, SimInput, SimPose};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::app::{AppState, FrameKind};
use crate::ascii::Tint;
use crate::error::Result;
use crate::mode::Mode;

// ════════════════════════════════════════════════════════════════════════════
// Colors
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:        u32 = 0xFFC8C8C8;
const PARTICLE_COLOR:  u32 = 0xFF323232;
const FINGERTIP_COLOR: u32 = 0xFFFF0000;
const PATH_COLOR:      u32 = 0xFF0000FF;
const LABEL_COLOR:     u32 = 0xFF202020;

/// Fingertip dot diameter in pixels.
const FINGERTIP_D: f32 = 10.0;

const SIM_LEGEND: &str = "1=palm 2/v=v 3=fist 4=point  h=hands t=two f=face m=mouth  q=quit";

// ════════════════════════════════════════════════════════════════════════════
// Canvas: framebuffer + drawing primitives
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas { buf: vec![BG_COLOR; width * height], width, height }
    }

    pub fn width(&self)  -> usize  { self.width }
    pub fn height(&self) -> usize  { self.height }
    pub fn pixels(&self) -> &[u32] { &self.buf }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buf[y * self.width + x])
    }

    pub fn clear(&mut self, color: u32) {
        self.buf.fill(color);
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    fn fill_rect(&mut self, x: isize, y: isize, w: usize, h: usize, color: u32) {
        for row in y..y + h as isize {
            for col in x..x + w as isize {
                self.set_pixel(col, row, color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, diameter: f32, color: u32) {
        let r = diameter / 2.0;
        let r2 = r * r;
        let (x0, x1) = ((center.x - r).floor() as isize, (center.x + r).ceil() as isize);
        let (y0, y1) = ((center.y - r).floor() as isize, (center.y + r).ceil() as isize);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Bresenham line, clipped to the canvas first.
    pub fn draw_line(&mut self, a: Point, b: Point, color: u32) {
        let max = Point::new(self.width as f32 - 1.0, self.height as f32 - 1.0);
        let Some((a, b)) = clip_segment(a, b, max) else { return; };
        let (mut x, mut y) = (a.x.round() as isize, a.y.round() as isize);
        let (x1, y1) = (b.x.round() as isize, b.y.round() as isize);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    /// Draw `ch` centred on `center`, roughly `size` pixels tall.
    pub fn draw_glyph(&mut self, ch: char, center: Point, size: f32, color: u32) {
        if ch == ' ' { return; }
        let s = glyph_scale(size);
        let x0 = (center.x - 1.5 * s as f32).round() as isize;
        let y0 = (center.y - 2.5 * s as f32).round() as isize;
        for (row, &bits) in char_glyph(ch).iter().enumerate() {
            for col in 0..3usize {
                if bits & (1 << (2 - col)) != 0 {
                    self.fill_rect(x0 + (col * s) as isize, y0 + (row * s) as isize, s, s, color);
                }
            }
        }
    }

    /// Small left-aligned label, one font pixel per screen pixel.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            for (row, &bits) in char_glyph(ch).iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as isize, (y + row) as isize, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > self.width { break; }
        }
    }

    /// Nearest-neighbour scale of a camera frame to the whole canvas.
    pub fn blit(&mut self, frame: &CameraFrame) {
        if frame.width() == 0 || frame.height() == 0 { return; }
        for y in 0..self.height {
            let sy = y * frame.height() / self.height;
            for x in 0..self.width {
                let sx = x * frame.width() / self.width;
                if let Some([r, g, b]) = frame.pixel(sx, sy) {
                    self.buf[y * self.width + x] =
                        0xFF000000 | (r as u32) << 16 | (g as u32) << 8 | b as u32;
                }
            }
        }
    }
}

/// Liang-Barsky clip of segment `a`-`b` to the box `(0, 0)..=max`.
///
/// `None` when the segment misses the box or has a non-finite endpoint.
fn clip_segment(a: Point, b: Point, max: Point) -> Option<(Point, Point)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) || max.x < 0.0 || max.y < 0.0 {
        return None;
    }
    let d = b - a;
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for (p, q) in [(-d.x, a.x), (d.x, max.x - a.x), (-d.y, a.y), (d.y, max.y - a.y)] {
        if p == 0.0 {
            if q < 0.0 { return None; }
        } else {
            let t = q / p;
            if p < 0.0 { t0 = t0.max(t); } else { t1 = t1.min(t); }
            if t0 > t1 { return None; }
        }
    }
    Some((a + d * t0, a + d * t1))
}

/// Font-pixel size for a nominal text height.
pub fn glyph_scale(size: f32) -> usize {
    ((size / 8.0).round() as usize).max(1)
}

// ════════════════════════════════════════════════════════════════════════════
// Frame painting
// ════════════════════════════════════════════════════════════════════════════

/// Paint one frame of `app` into `canvas`.
pub fn paint(canvas: &mut Canvas, app: &AppState, kind: FrameKind, camera: Option<&CameraFrame>) {
    canvas.clear(BG_COLOR);

    let mode = match kind {
        FrameKind::CameraOverride => {
            if let Some(frame) = camera {
                canvas.blit(frame);
            }
            return;
        }
        FrameKind::Layers(mode) => mode,
    };

    // ── Glyph backdrop ────────────────────────────────────────────────────
    let tint = Tint::for_mode(mode).argb();
    for cell in app.ascii().cells() {
        canvas.draw_glyph(cell.glyph, cell.pos, cell.size, tint);
    }

    // ── Mode layer ────────────────────────────────────────────────────────
    match mode {
        Mode::Ascii => {}
        Mode::Particle => {
            let size = app.particles().glyph_size();
            for p in app.particles().particles() {
                canvas.draw_glyph(p.glyph, p.pos, size, PARTICLE_COLOR);
            }
        }
        Mode::Draw => {
            for (a, b) in app.drawing().segments() {
                canvas.draw_line(a, b, PATH_COLOR);
            }
        }
    }

    // ── Fingertips ────────────────────────────────────────────────────────
    for &tip in app.fingertips() {
        canvas.fill_circle(tip, FINGERTIP_D, FINGERTIP_COLOR);
    }

    // ── Status ────────────────────────────────────────────────────────────
    let y = canvas.height().saturating_sub(10);
    canvas.draw_label(&app.status, 6, y, LABEL_COLOR);
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:       Window,
    canvas:       Canvas,
    sim_tx:       Option<Sender<SimInput>>,
    last_pointer: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Option<Sender<SimInput>>) -> Result<Self> {
        let mut window = Window::new(
            "Glyph Mirror",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            canvas: Canvas::new(width, height),
            sim_tx,
            last_pointer: None,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Handle quit keys and, in simulation mode, forward pointer and pose
    /// keys to the simulator.  Returns false when the window should close.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return false;
        }

        let Some(tx) = &self.sim_tx else { return true; };

        let mut inputs = Vec::new();
        for (key, input) in [
            (Key::Key1, SimInput::Pose(SimPose::OpenPalm)),
            (Key::Key2, SimInput::Pose(SimPose::VSign)),
            (Key::Key3, SimInput::Pose(SimPose::Fist)),
            (Key::Key4, SimInput::Pose(SimPose::Point)),
            (Key::V,    SimInput::Pose(SimPose::VSign)),
            (Key::H,    SimInput::ToggleHands),
            (Key::T,    SimInput::ToggleSecondHand),
            (Key::F,    SimInput::ToggleFace),
            (Key::M,    SimInput::ToggleMouth),
        ] {
            if one_shot(key) { inputs.push(input); }
        }

        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let pointer = (mx / self.canvas.width() as f32, my / self.canvas.height() as f32);
            if self.last_pointer != Some(pointer) {
                self.last_pointer = Some(pointer);
                inputs.push(SimInput::PointerMoved { x: pointer.0, y: pointer.1 });
            }
        }

        for input in inputs {
            // The simulator only goes away at shutdown.
            if tx.send(input).is_err() { return false; }
        }
        true
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState, kind: FrameKind, camera: Option<&CameraFrame>) -> Result<()> {
        paint(&mut self.canvas, app, kind, camera);
        if self.sim_tx.is_some() && kind != FrameKind::CameraOverride {
            let y = self.canvas.height().saturating_sub(20);
            self.canvas.draw_label(SIM_LEGEND, 6, y, LABEL_COLOR);
        }
        self.window.update_with_buffer(self.canvas.pixels(), self.canvas.width(), self.canvas.height())?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b111, 0b001, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        // glyph ramp
        '@' => [0b010, 0b101, 0b111, 0b100, 0b011],
        '#' => [0b101, 0b111, 0b101, 0b111, 0b101],
        '$' => [0b011, 0b110, 0b010, 0b011, 0b110],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '&' => [0b010, 0b101, 0b010, 0b101, 0b011],
        '*' => [0b000, 0b101, 0b010, 0b101, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ascii::GLYPH_RAMP;
    use crate::config::Config;
    use crate::particles::PARTICLE_GLYPHS;
    use landmark_feed::Detections;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn count(canvas: &Canvas, color: u32) -> usize {
        canvas.pixels().iter().filter(|&&c| c == color).count()
    }

    #[test]
    fn every_ramp_glyph_has_ink() {
        for &c in GLYPH_RAMP.iter().chain(PARTICLE_GLYPHS.iter()) {
            if c == ' ' { continue; }
            assert!(char_glyph(c).iter().any(|&row| row != 0), "glyph {:?} is blank", c);
        }
    }

    #[test]
    fn glyph_scale_never_zero() {
        assert_eq!(glyph_scale(0.0), 1);
        assert_eq!(glyph_scale(6.7), 1);
        assert_eq!(glyph_scale(20.0), 3);
        assert_eq!(glyph_scale(40.0), 5);
    }

    #[test]
    fn line_hits_both_endpoints() {
        let mut c = Canvas::new(50, 50);
        c.draw_line(Point::new(2.0, 3.0), Point::new(40.0, 30.0), PATH_COLOR);
        assert_eq!(c.get(2, 3), Some(PATH_COLOR));
        assert_eq!(c.get(40, 30), Some(PATH_COLOR));
    }

    #[test]
    fn far_off_canvas_endpoint_is_clipped() {
        let mut c = Canvas::new(50, 50);
        c.draw_line(Point::new(10.0, 10.0), Point::new(1e9, 10.0), PATH_COLOR);
        assert_eq!(c.get(10, 10), Some(PATH_COLOR));
        assert_eq!(c.get(49, 10), Some(PATH_COLOR));
        assert_eq!(count(&c, PATH_COLOR), 40);
    }

    #[test]
    fn segments_outside_or_non_finite_draw_nothing() {
        let mut c = Canvas::new(50, 50);
        c.draw_line(Point::new(-1e9, -5.0), Point::new(1e9, -5.0), PATH_COLOR);
        c.draw_line(Point::new(f32::NAN, 3.0), Point::new(10.0, 3.0), PATH_COLOR);
        c.draw_line(Point::new(3.0, 3.0), Point::new(f32::INFINITY, 3.0), PATH_COLOR);
        assert_eq!(count(&c, PATH_COLOR), 0);
    }

    #[test]
    fn primitives_clip_at_edges() {
        let mut c = Canvas::new(20, 20);
        c.fill_circle(Point::new(0.0, 0.0), 10.0, FINGERTIP_COLOR);
        c.draw_line(Point::new(-10.0, -10.0), Point::new(30.0, 30.0), PATH_COLOR);
        c.draw_glyph('#', Point::new(19.0, 19.0), 40.0, PARTICLE_COLOR);
        assert!(count(&c, FINGERTIP_COLOR) > 0);
        assert_eq!(c.pixels().len(), 400);
    }

    #[test]
    fn blit_scales_camera_to_canvas() {
        let mut frame = CameraFrame::blank(2, 2);
        frame.set_pixel(1, 1, [255, 0, 0]);
        let mut c = Canvas::new(10, 10);
        c.blit(&frame);
        assert_eq!(c.get(9, 9), Some(0xFFFF0000));
        assert_eq!(c.get(0, 0), Some(0xFF000000));
        assert_eq!(count(&c, 0xFFFF0000), 25);
    }

    #[test]
    fn override_frame_is_camera_only() {
        let cfg = Config::default();
        let app = AppState::with_rng(&cfg, StdRng::seed_from_u64(3));
        let mut c = Canvas::new(cfg.canvas.width, cfg.canvas.height);
        let frame = CameraFrame::new(1, 1, vec![1, 2, 3]).unwrap();
        paint(&mut c, &app, FrameKind::CameraOverride, Some(&frame));
        assert_eq!(count(&c, 0xFF010203), c.pixels().len());
    }

    #[test]
    fn fingertips_painted_red() {
        use landmark_feed::sim::{synth_hand, SimPose};
        let cfg = Config::default();
        let mut app = AppState::with_rng(&cfg, StdRng::seed_from_u64(3));
        let d = Detections::new(vec![synth_hand(0.5, 0.5, SimPose::OpenPalm)], None);
        let kind = app.tick(&d, None, Duration::ZERO);
        let mut c = Canvas::new(cfg.canvas.width, cfg.canvas.height);
        paint(&mut c, &app, kind, None);
        assert!(count(&c, FINGERTIP_COLOR) > 5 * 40);
    }
}
