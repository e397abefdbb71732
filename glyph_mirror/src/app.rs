//! Top-level session state and the render loop.
//!
//! `AppState` owns everything that survives between frames: the mode
//! controller, the ASCII layer, the particle field, and the drawing path.
//! Each tick reads the latest perception values, updates that state, and
//! tells the visualizer which layers to draw.

use std::sync::mpsc;
use std::time::{Duration, Instant};

use landmark_feed::{
    spawn_perception_source, CameraFrame, Detections, Feed, Point, SimInput,
    SimPerceptionSource, UdpPerceptionSource,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ascii::{open_mouth, AsciiLayer};
use crate::config::{Config, SourceKind};
use crate::drawing::{DrawingPath, Stroke};
use crate::error::Result;
use crate::mode::{camera_override, Mode, ModeController};
use crate::particles::{fingertip_repulsors, ForceLaw, ParticleField, Repulsor};
use crate::visualizer::Visualizer;

/// What the visualizer should draw this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameKind {
    /// Two hands overlap: raw camera image only.
    CameraOverride,
    /// Backdrop, fingertips, and the given mode's layer.
    Layers(Mode),
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    canvas: (f32, f32),

    // ── modes ─────────────────────────────────────────────────────────────
    modes: ModeController,

    // ── layers ────────────────────────────────────────────────────────────
    ascii:           AsciiLayer,
    particles:       ParticleField,
    drawing:         DrawingPath,
    mouth_repulsion: bool,

    // ── per-frame ─────────────────────────────────────────────────────────
    fingertips: Vec<Point>,
    rng:        StdRng,
    frames:     u64,

    pub status: String,
}

impl AppState {
    pub fn new(cfg: &Config) -> Self {
        Self::with_rng(cfg, StdRng::from_entropy())
    }

    /// Build with a caller-supplied RNG (particle glyphs, mouth jitter).
    pub fn with_rng(cfg: &Config, mut rng: StdRng) -> Self {
        let canvas = (cfg.canvas.width as f32, cfg.canvas.height as f32);
        let p = &cfg.particles;
        let law = ForceLaw {
            max_force:    p.max_force,
            min_force:    p.min_force,
            touch_radius: p.touch_radius,
            rest_range:   p.rest_range,
        };
        let particles = ParticleField::new(
            (cfg.canvas.width, cfg.canvas.height),
            p.resolution,
            p.particle_size,
            law,
            &mut rng,
        );

        AppState {
            canvas,
            modes:           ModeController::new(Duration::from_millis(cfg.gesture.cooldown_ms)),
            ascii:           AsciiLayer::new(cfg.ascii.update_rate, cfg.ascii.text_size),
            particles,
            drawing:         DrawingPath::new(cfg.drawing.max_points),
            mouth_repulsion: p.mouth_repulsion,
            fingertips:      Vec::new(),
            rng,
            frames:          0,
            status:          format!("Ready, mode: {}", Mode::default().name()),
        }
    }

    // ── Per-frame tick ────────────────────────────────────────────────────

    /// Advance one frame.  `now` is time since session start.
    ///
    /// When the first two hands overlap the frame is the raw camera image
    /// and nothing else runs, including the V-sign check.
    pub fn tick(
        &mut self,
        detections: &Detections,
        camera:     Option<&CameraFrame>,
        now:        Duration,
    ) -> FrameKind {
        self.frames += 1;
        let (w, h) = self.canvas;
        let hands = &detections.hands;
        let mode = self.modes.mode();

        self.fingertips = hands
            .iter()
            .flat_map(|hand| hand.fingertips())
            .map(|tip| tip.to_canvas(w, h))
            .collect();

        let mouth = open_mouth(detections.face.as_ref(), w, h);

        // The mouth distortion belongs to ASCII mode only.
        let ascii_mouth = mouth.filter(|_| mode == Mode::Ascii);
        self.ascii.update(camera, self.canvas, ascii_mouth.as_ref(), &mut self.rng);

        if camera_override(hands, w, h) {
            return FrameKind::CameraOverride;
        }

        match mode {
            Mode::Ascii => {}
            Mode::Particle => {
                let mut repulsors = fingertip_repulsors(hands, self.canvas, self.particles.law().touch_radius);
                if self.mouth_repulsion {
                    repulsors.extend(mouth.as_ref().map(Repulsor::from));
                }
                self.particles.step(&repulsors);
            }
            Mode::Draw => {
                if self.drawing.update(detections.first_hand(), self.canvas) == Stroke::Cleared {
                    self.status = "Fist: drawing cleared".to_string();
                }
            }
        }

        if let Some(next) = self.modes.update(hands, now) {
            self.status = format!("V sign, mode: {}", next.name());
        }

        FrameKind::Layers(mode)
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn mode(&self)          -> Mode           { self.modes.mode() }
    pub fn canvas(&self)        -> (f32, f32)     { self.canvas }
    pub fn ascii(&self)         -> &AsciiLayer    { &self.ascii }
    pub fn particles(&self)     -> &ParticleField { &self.particles }
    pub fn drawing(&self)       -> &DrawingPath   { &self.drawing }
    pub fn fingertips(&self)    -> &[Point]       { &self.fingertips }
    pub fn frames(&self)        -> u64            { self.frames }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Starts the perception source named in the config (simulator by default),
/// opens the window, and drives tick/render at ~60 fps until the window
/// closes.
pub fn run(cfg: Config) -> Result<()> {
    cfg.validate()?;

    // ── Perception feed ───────────────────────────────────────────────────
    let (sim_tx, feed): (Option<mpsc::Sender<SimInput>>, Feed) = match cfg.feed.source {
        SourceKind::Sim => {
            let (tx, rx) = mpsc::channel::<SimInput>();
            let feed = spawn_perception_source(SimPerceptionSource {
                rx,
                camera_width:  cfg.camera.width,
                camera_height: cfg.camera.height,
            });
            (Some(tx), feed)
        }
        SourceKind::Udp => {
            let source = UdpPerceptionSource::bind(cfg.feed.bind.as_str(), cfg.feed.max_hands)?;
            (None, spawn_perception_source(source))
        }
    };

    // ── Window + state ────────────────────────────────────────────────────
    let mut vis = Visualizer::new(cfg.canvas.width, cfg.canvas.height, sim_tx)?;
    let mut app = AppState::new(&cfg);
    let no_detections = Detections::default();
    let start = Instant::now();

    log::info!("canvas {}x{}, {} particles", cfg.canvas.width, cfg.canvas.height, app.particles().len());

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        if !vis.poll_input() { break; }

        let detections = feed.detections.get();
        let camera = feed.camera.get();
        let detections = detections.as_deref().unwrap_or(&no_detections);

        let kind = app.tick(detections, camera.as_deref(), start.elapsed());
        vis.render(&app, kind, camera.as_deref())?;
    }

    log::info!("window closed after {} frames", app.frames());
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
