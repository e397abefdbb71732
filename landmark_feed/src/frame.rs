//! Low-resolution camera frames.

use crate::error::{FeedError, Result};

/// Default capture size; the ASCII renderer maps one pixel to one glyph.
pub const CAMERA_W: usize = 64;
pub const CAMERA_H: usize = 48;

/// Packed RGB8 pixel buffer, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraFrame {
    width:  usize,
    height: usize,
    rgb:    Vec<u8>,
}

impl CameraFrame {
    /// Wrap a pixel buffer, rejecting one whose length does not match.
    pub fn new(width: usize, height: usize, rgb: Vec<u8>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or_else(|| FeedError::Malformed(format!("frame {}x{} is too large", width, height)))?;
        if rgb.len() != expected {
            return Err(FeedError::Malformed(format!(
                "frame {}x{} needs {} bytes, got {}",
                width, height, expected, rgb.len()
            )));
        }
        Ok(CameraFrame { width, height, rgb })
    }

    /// A black frame.
    pub fn blank(width: usize, height: usize) -> Self {
        CameraFrame { width, height, rgb: vec![0; width * height * 3] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn rgb(&self)    -> &[u8] { &self.rgb }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        Some([self.rgb[i], self.rgb[i + 1], self.rgb[i + 2]])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        if x < self.width && y < self.height {
            let i = (y * self.width + x) * 3;
            self.rgb[i..i + 3].copy_from_slice(&rgb);
        }
    }

    /// Mean of the three channels, `0.0..=255.0`.
    pub fn luma(&self, x: usize, y: usize) -> Option<f32> {
        self.pixel(x, y)
            .map(|[r, g, b]| (r as f32 + g as f32 + b as f32) / 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        assert!(CameraFrame::new(4, 4, vec![0; 47]).is_err());
        assert!(CameraFrame::new(4, 4, vec![0; 48]).is_ok());
    }

    #[test]
    fn oversized_dimensions_are_malformed() {
        let half = 1usize << (usize::BITS - 1);
        assert!(matches!(CameraFrame::new(half, 2, Vec::new()), Err(FeedError::Malformed(_))));
        assert!(matches!(CameraFrame::new(usize::MAX, 2, Vec::new()), Err(FeedError::Malformed(_))));
    }

    #[test]
    fn luma_is_channel_mean() {
        let mut f = CameraFrame::blank(2, 2);
        f.set_pixel(1, 1, [30, 60, 90]);
        assert_eq!(f.luma(1, 1), Some(60.0));
        assert_eq!(f.luma(0, 0), Some(0.0));
        assert_eq!(f.luma(2, 0), None);
    }
}
