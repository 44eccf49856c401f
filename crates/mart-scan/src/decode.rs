//! # Decode Strategies
//!
//! Barcode decoding sits behind [`DecodeStrategy`], selected when the
//! scanner is constructed. The scan loop calls `try_decode` once per tick
//! and never branches on platform capability:
//!
//! - a platform with a real decoder supplies its own implementation;
//! - without one, [`SimulatedDecoder`] keeps the checkout flow
//!   demonstrable by "detecting" a demo code after a fixed delay.

use tokio::time::{Duration, Instant};

use crate::frame::Frame;

/// How a scanner turns frames into codes.
pub trait DecodeStrategy: Send + Sync {
    /// Attempts to decode a barcode from the frame.
    ///
    /// Returns `Some(code)` on detection; `None` means keep scanning.
    fn try_decode(&mut self, frame: &Frame) -> Option<String>;
}

// =============================================================================
// Simulated Decoder
// =============================================================================

/// Codes the simulated decoder picks from. They match the demo catalog
/// seeded by `mart-db`'s seed binary, so a simulated detection always
/// resolves to a product.
pub const SIMULATED_CODES: [&str; 3] = ["8901234567890", "8902345678901", "8903456789012"];

/// The fixed fallback delay before the simulation "detects" a code.
pub const SIMULATED_DELAY: Duration = Duration::from_millis(5000);

/// A decode strategy that performs no real decoding.
///
/// Ignores frame contents entirely: returns `None` until [`SIMULATED_DELAY`]
/// has elapsed since the first frame, then yields one pseudo-randomly
/// chosen code from [`SIMULATED_CODES`]. Exists only so the UI flow is
/// demonstrable without platform decode support.
#[derive(Debug)]
pub struct SimulatedDecoder {
    delay: Duration,
    first_frame: Option<Instant>,
}

impl SimulatedDecoder {
    /// Creates a simulated decoder with the standard 5 s delay.
    pub fn new() -> Self {
        SimulatedDecoder {
            delay: SIMULATED_DELAY,
            first_frame: None,
        }
    }

    /// Overrides the delay (tests).
    pub fn with_delay(delay: Duration) -> Self {
        SimulatedDecoder {
            delay,
            first_frame: None,
        }
    }

    /// Picks a candidate. Millisecond clock modulo the set size - the
    /// original demo rolled `Math.random()` over the same three codes.
    fn pick_candidate() -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let idx = (millis.unsigned_abs() as usize) % SIMULATED_CODES.len();
        SIMULATED_CODES[idx].to_string()
    }
}

impl Default for SimulatedDecoder {
    fn default() -> Self {
        SimulatedDecoder::new()
    }
}

impl DecodeStrategy for SimulatedDecoder {
    fn try_decode(&mut self, _frame: &Frame) -> Option<String> {
        let started = *self.first_frame.get_or_insert_with(Instant::now);

        if started.elapsed() < self.delay {
            return None;
        }

        Some(Self::pick_candidate())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
