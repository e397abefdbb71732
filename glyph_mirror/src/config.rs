//! TOML configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration:
//!
//! ```toml
//! [canvas]
//! width = 800
//! height = 600
//!
//! [feed]
//! source = "udp"
//! bind = "0.0.0.0:4000"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas:    CanvasConfig,
    pub camera:    CameraConfig,
    pub ascii:     AsciiConfig,
    pub particles: ParticleConfig,
    pub gesture:   GestureConfig,
    pub drawing:   DrawingConfig,
    pub feed:      FeedConfig,
}

/// Output window size in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width:  usize,
    pub height: usize,
}

/// Capture resolution requested from the simulator.  The UDP source uses
/// whatever size the tracker sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width:  usize,
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsciiConfig {
    /// Run the per-pixel pass every Nth frame.
    pub update_rate: u32,
    /// Nominal glyph height in pixels.
    pub text_size:   f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Grid spacing in pixels.
    pub resolution:      usize,
    pub particle_size:   f32,
    pub max_force:       f32,
    pub min_force:       f32,
    /// Fingertip repulsion radius in pixels.
    pub touch_radius:    f32,
    /// Distance over which attraction ramps from min to max force.
    pub rest_range:      f32,
    /// Open mouth pushes particles away too.
    pub mouth_repulsion: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum interval between mode changes.
    pub cooldown_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    /// Oldest points are dropped past this many; `0` keeps everything.
    pub max_points: usize,
}

/// Where landmarks come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Keyboard and mouse drive a synthetic hand and face.
    Sim,
    /// JSON datagrams from an external tracker process.
    Udp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source:    SourceKind,
    /// UDP listen address.
    pub bind:      String,
    pub max_hands: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 640, height: 480 }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { width: landmark_feed::CAMERA_W, height: landmark_feed::CAMERA_H }
    }
}

impl Default for AsciiConfig {
    fn default() -> Self {
        Self { update_rate: 3, text_size: 20.0 }
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            resolution:      10,
            particle_size:   10.0,
            max_force:       100.0,
            min_force:       0.0,
            touch_radius:    100.0,
            rest_range:      500.0,
            mouth_repulsion: true,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self { cooldown_ms: 1000 }
    }
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self { max_points: 20_000 }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source:    SourceKind::Sim,
            bind:      format!("127.0.0.1:{}", landmark_feed::DEFAULT_PORT),
            max_hands: 2,
        }
    }
}

impl Config {
    /// Load and validate a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));

        if self.canvas.width == 0 || self.canvas.height == 0 {
            return invalid("canvas size must be non-zero");
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return invalid("camera size must be non-zero");
        }
        if self.ascii.update_rate == 0 {
            return invalid("ascii.update_rate must be at least 1");
        }
        if self.particles.resolution == 0 {
            return invalid("particles.resolution must be at least 1");
        }
        if self.particles.touch_radius <= 0.0 || self.particles.rest_range <= 0.0 {
            return invalid("particle force ranges must be positive");
        }
        if self.feed.max_hands == 0 {
            return invalid("feed.max_hands must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.ascii.update_rate, 3);
        assert_eq!(cfg.gesture.cooldown_ms, 1000);
        assert_eq!(cfg.feed.source, SourceKind::Sim);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [particles]
            max_force = 50.0

            [feed]
            source = "udp"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.particles.max_force, 50.0);
        assert_eq!(cfg.particles.resolution, 10);
        assert_eq!(cfg.feed.source, SourceKind::Udp);
        assert_eq!(cfg.feed.max_hands, 2);
    }

    #[test]
    fn zero_update_rate_rejected() {
        let err = Config::from_toml_str("[ascii]\nupdate_rate = 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = Config::from_toml_str("[canvas\nwidth = 1").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Config::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
