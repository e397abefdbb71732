//! # glyph_mirror
//!
//! A camera art piece steered by hand landmarks.  The camera image is drawn
//! as a backdrop of brightness glyphs; on top of it one of three modes runs.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Action |
//! |---|---|---|
//! | V sign (index + middle up, ring + pinky down) | Any | Next mode, at most once per second |
//! | Two hands whose boxes overlap | Two | Show the raw camera image only |
//! | Fingertips near particles | Any | Push particles away (Particle mode) |
//! | Index finger | First | Extend the drawn path (Draw mode) |
//! | Fist | First | Clear the drawn path (Draw mode) |
//! | Open mouth | Face | Enlarge + jitter nearby backdrop glyphs (ASCII mode) |
//!
//! Modes cycle ASCII → Particle → Draw → ASCII.
//!
//! ## Perception sources
//!
//! * `sim` (default): keyboard and mouse drive a synthetic hand and face.
//! * `udp`: an external tracker sends JSON datagrams (see
//!   [`landmark_feed::FeedMessage`]).
//!
//! ### Simulation keyboard shortcuts
//!
//! | Key | Effect |
//! |---|---|
//! | mouse | Move the simulated hand |
//! | `1` | Open palm |
//! | `2` / `V` | V sign |
//! | `3` | Fist |
//! | `4` | Pointing |
//! | `H` | Show / hide hands |
//! | `T` | Second (mirrored) hand |
//! | `F` | Show / hide face |
//! | `M` | Open / close mouth |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod ascii;
pub mod config;
pub mod drawing;
pub mod error;
pub mod gesture;
pub mod mode;
pub mod particles;
pub mod visualizer;

pub use error::{Error, Result};
