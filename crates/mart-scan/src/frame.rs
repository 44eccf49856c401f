//! # Frame Source
//!
//! The camera seam. Real hardware, a test pattern, and the mocks in the
//! scanner tests all sit behind [`FrameSource`].

use crate::error::{ScanError, ScanResult};

// =============================================================================
// Frame
// =============================================================================

/// A single captured video frame, as 8-bit luma.
///
/// Decoders only need luminance; sources that produce color frames
/// convert before handing them over.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Row-major luma bytes, `width * height` long.
    pub luma: Vec<u8>,
}

impl Frame {
    /// Creates a frame from raw luma bytes.
    pub fn new(width: u32, height: u32, luma: Vec<u8>) -> Self {
        debug_assert_eq!(luma.len(), (width * height) as usize);
        Frame {
            width,
            height,
            luma,
        }
    }
}

// =============================================================================
// Frame Source
// =============================================================================

/// A camera-like source of frames.
///
/// ## Contract
/// - `open` requests device access and may fail (missing camera,
///   permission denied)
/// - `capture` returns the current frame; only called between a
///   successful `open` and `release`
/// - `release` stops every underlying track and MUST be idempotent -
///   the scan loop calls it on every exit path, and a manual close may
///   race a detection
pub trait FrameSource: Send + Sync {
    /// Requests access to the device and starts the stream.
    fn open(&mut self) -> ScanResult<()>;

    /// Captures the current frame.
    fn capture(&mut self) -> ScanResult<Frame>;

    /// Stops all tracks and releases the device. Idempotent.
    fn release(&mut self);
}

// =============================================================================
// Test Pattern
// =============================================================================

/// A synthetic frame source producing a fixed gradient pattern.
///
/// Stands in for the camera wherever real capture hardware is absent:
/// demos, tests, and the server's scan endpoint.
#[derive(Debug)]
pub struct TestPattern {
    width: u32,
    height: u32,
    open: bool,
}

impl TestPattern {
    /// Creates a test pattern source at a small default resolution.
    pub fn new() -> Self {
        TestPattern {
            width: 64,
            height: 48,
            open: false,
        }
    }

    /// Whether the source is currently open.
    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl Default for TestPattern {
    fn default() -> Self {
        TestPattern::new()
    }
}

impl FrameSource for TestPattern {
    fn open(&mut self) -> ScanResult<()> {
        self.open = true;
        Ok(())
    }

    fn capture(&mut self) -> ScanResult<Frame> {
        if !self.open {
            return Err(ScanError::Capture("source is not open".to_string()));
        }

        let mut luma = Vec::with_capacity((self.width * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                luma.push(((x + y) % 256) as u8);
            }
        }
        Ok(Frame::new(self.width, self.height, luma))
    }

    fn release(&mut self) {
        self.open = false;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_pattern_lifecycle() {
        let mut source = TestPattern::new();
        assert!(!source.is_open());
        assert!(source.capture().is_err());

        source.open().unwrap();
        let frame = source.capture().unwrap();
        assert_eq!(frame.luma.len(), (frame.width * frame.height) as usize);

        source.release();
        assert!(!source.is_open());

        // release is idempotent
        source.release();
        assert!(!source.is_open());
    }
}
