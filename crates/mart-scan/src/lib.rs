//! # mart-scan: Barcode Capture Loop for Smart Mart POS
//!
//! Acquires a video frame source, samples frames on a fixed tick, attempts
//! barcode decoding, and emits a detected code - or, with the simulated
//! strategy, times out to a demo code.
//!
//! ## State Machine
//! ```text
//!  Idle ──► Initializing ──► Scanning ──► Detected ──► Closed
//!               │                │                       ▲
//!               │ open failed    │ manual close          │
//!               ▼                └───────────────────────┤
//!             Error ──── manual close ───────────────────┘
//! ```
//!
//! Every path into `Closed` releases the frame source (all tracks stopped,
//! pending ticks cancelled). Manual close is idempotent.
//!
//! ## Modules
//!
//! - [`frame`] - `Frame`, the `FrameSource` trait, the `TestPattern` source
//! - [`decode`] - the `DecodeStrategy` trait and `SimulatedDecoder`
//! - [`scanner`] - the tick loop, its handle, and scan events
//! - [`error`] - scan error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use mart_scan::{Scanner, ScannerConfig, NoOpEvents, SimulatedDecoder, TestPattern};
//!
//! let (scanner, handle) = Scanner::new(
//!     ScannerConfig::default(),
//!     Box::new(TestPattern::new()),
//!     Box::new(SimulatedDecoder::new()),
//!     Arc::new(NoOpEvents),
//! );
//! let code = scanner.run().await?; // Some(code) or None after manual close
//! ```

pub mod decode;
pub mod error;
pub mod frame;
pub mod scanner;

pub use decode::{DecodeStrategy, SimulatedDecoder, SIMULATED_CODES};
pub use error::{ScanError, ScanResult};
pub use frame::{Frame, FrameSource, TestPattern};
pub use scanner::{NoOpEvents, ScanEvents, Scanner, ScannerConfig, ScannerHandle, ScannerState};
