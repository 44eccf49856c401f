//! # Scanner
//!
//! The tick-driven capture loop.
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
//! ## Resource Contract
//! The frame source is released on EVERY path into `Closed`: detection,
//! capture failure, camera-access failure, manual close. No camera track
//! survives the loop, and no partial-detection state does either.
//!
//! ## Cancellation
//! [`ScannerHandle::close`] is idempotent: closing an already-closed (or
//! already-finished) scanner is a no-op.

use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::decode::DecodeStrategy;
use crate::error::{ScanError, ScanResult};
use crate::frame::FrameSource;

// =============================================================================
// Scanner State
// =============================================================================

/// Capture loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    /// Constructed, not yet started.
    Idle,
    /// Requesting camera access.
    Initializing,
    /// Sampling frames on each tick.
    Scanning,
    /// A code was decoded; resources are being released.
    Detected,
    /// Camera or capture failure; waiting for manual close.
    Error,
    /// Terminal. All resources released.
    Closed,
}

impl std::fmt::Display for ScannerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScannerState::Idle => write!(f, "idle"),
            ScannerState::Initializing => write!(f, "initializing"),
            ScannerState::Scanning => write!(f, "scanning"),
            ScannerState::Detected => write!(f, "detected"),
            ScannerState::Error => write!(f, "error"),
            ScannerState::Closed => write!(f, "closed"),
        }
    }
}

// =============================================================================
// Scan Events
// =============================================================================

/// Callbacks surfaced to the UI layer during a scan session.
pub trait ScanEvents: Send + Sync {
    /// A code was decoded; the confirmation tone should play.
    fn on_tone(&self);

    /// Emits the decoded value.
    fn on_detected(&self, code: &str);

    /// Emits a user-facing error message (camera access, capture failure).
    fn on_error(&self, message: &str);
}

/// No-op event sink for tests and headless runs.
pub struct NoOpEvents;

impl ScanEvents for NoOpEvents {
    fn on_tone(&self) {}
    fn on_detected(&self, _code: &str) {}
    fn on_error(&self, _message: &str) {}
}

// =============================================================================
// Configuration
// =============================================================================

/// Scanner configuration.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Interval between frame samples. Default 16 ms - a display refresh
    /// cadence, matching the per-frame scheduling of the original loop.
    pub tick_interval: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            tick_interval: Duration::from_millis(16),
        }
    }
}

// =============================================================================
// Scanner Handle
// =============================================================================

/// Handle to a running scanner: query state, request close.
#[derive(Debug, Clone)]
pub struct ScannerHandle {
    state: Arc<RwLock<ScannerState>>,
    close_tx: mpsc::Sender<()>,
}

impl ScannerHandle {
    /// Current loop state.
    pub async fn state(&self) -> ScannerState {
        *self.state.read().await
    }

    /// Requests a manual close.
    ///
    /// Idempotent: duplicate calls, or calls after the loop has already
    /// finished, are no-ops.
    pub fn close(&self) {
        // A full or disconnected channel both mean the loop no longer
        // needs the signal.
        let _ = self.close_tx.try_send(());
    }
}

// =============================================================================
// Scanner
// =============================================================================

/// The capture loop. Construct with [`Scanner::new`], then `await`
/// [`Scanner::run`] (usually inside `tokio::spawn`), keeping the handle
/// for cancellation.
pub struct Scanner {
    config: ScannerConfig,
    source: Box<dyn FrameSource>,
    decoder: Box<dyn DecodeStrategy>,
    events: Arc<dyn ScanEvents>,
    state: Arc<RwLock<ScannerState>>,
    close_rx: mpsc::Receiver<()>,
}

impl Scanner {
    /// Creates a scanner and its handle.
    ///
    /// The frame source and decode strategy are chosen here, at
    /// construction - the loop itself has no capability branches.
    pub fn new(
        config: ScannerConfig,
        source: Box<dyn FrameSource>,
        decoder: Box<dyn DecodeStrategy>,
        events: Arc<dyn ScanEvents>,
    ) -> (Self, ScannerHandle) {
        let state = Arc::new(RwLock::new(ScannerState::Idle));
        let (close_tx, close_rx) = mpsc::channel(1);

        let handle = ScannerHandle {
            state: state.clone(),
            close_tx,
        };

        let scanner = Scanner {
            config,
            source,
            decoder,
            events,
            state,
            close_rx,
        };

        (scanner, handle)
    }

    /// Runs the capture loop to completion.
    ///
    /// ## Returns
    /// * `Ok(Some(code))` - a barcode was detected
    /// * `Ok(None)` - manually closed before any detection
    /// * `Err(ScanError)` - camera or capture failure (after the session
    ///   was manually closed out of the `Error` state)
    pub async fn run(mut self) -> ScanResult<Option<String>> {
        self.set_state(ScannerState::Initializing).await;

        if let Err(e) = self.source.open() {
            warn!(error = %e, "Camera access failed");
            self.events
                .on_error("Couldn't access the camera. Please check permissions.");
            return self.fail(e).await;
        }

        self.set_state(ScannerState::Scanning).await;
        info!("Scanner started");

        let mut ticks = interval(self.config.tick_interval);
        // A stalled consumer should not cause a burst of stale captures.
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                // Manual close wins over a tick that is ready at the
                // same instant; no partial-detection state survives.
                biased;

                _ = self.close_rx.recv() => {
                    info!("Scanner closed manually");
                    return self.finish(None).await;
                }

                _ = ticks.tick() => {
                    let frame = match self.source.capture() {
                        Ok(frame) => frame,
                        Err(e) => {
                            warn!(error = %e, "Frame capture failed");
                            self.events.on_error("Camera stream failed.");
                            return self.fail(e).await;
                        }
                    };

                    if let Some(code) = self.decoder.try_decode(&frame) {
                        debug!(code = %code, "Barcode detected");
                        self.events.on_tone();
                        self.events.on_detected(&code);
                        self.set_state(ScannerState::Detected).await;
                        return self.finish(Some(code)).await;
                    }
                }
            }
        }
    }

    /// Releases resources and lands in `Closed`.
    async fn finish(mut self, code: Option<String>) -> ScanResult<Option<String>> {
        self.source.release();
        self.set_state(ScannerState::Closed).await;
        Ok(code)
    }

    /// Error path: park in `Error`, wait for the manual close, then
    /// release and land in `Closed`.
    async fn fail(mut self, error: ScanError) -> ScanResult<Option<String>> {
        self.set_state(ScannerState::Error).await;

        // `None` means every handle is gone; treat that as the close.
        let _ = self.close_rx.recv().await;

        self.source.release();
        self.set_state(ScannerState::Closed).await;
        Err(error)
    }

    async fn set_state(&self, next: ScannerState) {
        let mut state = self.state.write().await;
        debug!(from = %*state, to = %next, "Scanner state transition");
        *state = next;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{SimulatedDecoder, SIMULATED_CODES, SIMULATED_DELAY};
    use crate::frame::{Frame, TestPattern};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // -------------------------------------------------------------------------
    // Mocks
    // -------------------------------------------------------------------------

    /// Shared counters for asserting the resource contract.
    #[derive(Default)]
    struct SourceStats {
        opens: AtomicUsize,
        releases: AtomicUsize,
    }

    /// A mock camera with two tracks worth of release bookkeeping.
    struct MockSource {
        stats: Arc<SourceStats>,
        fail_open: bool,
        fail_capture_after: Option<usize>,
        captures: usize,
    }

    impl MockSource {
        fn new(stats: Arc<SourceStats>) -> Self {
            MockSource {
                stats,
                fail_open: false,
                fail_capture_after: None,
                captures: 0,
            }
        }

        fn failing_open(stats: Arc<SourceStats>) -> Self {
            MockSource {
                fail_open: true,
                ..MockSource::new(stats)
            }
        }
    }

    impl FrameSource for MockSource {
        fn open(&mut self) -> ScanResult<()> {
            if self.fail_open {
                return Err(ScanError::CameraAccess("permission denied".to_string()));
            }
            self.stats.opens.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn capture(&mut self) -> ScanResult<Frame> {
            self.captures += 1;
            if let Some(limit) = self.fail_capture_after {
                if self.captures > limit {
                    return Err(ScanError::Capture("stream ended".to_string()));
                }
            }
            Ok(Frame::new(2, 2, vec![0; 4]))
        }

        fn release(&mut self) {
            self.stats.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Decodes successfully on the n-th frame.
    struct DecodeOnNth {
        n: usize,
        seen: usize,
        code: String,
    }

    impl DecodeStrategy for DecodeOnNth {
        fn try_decode(&mut self, _frame: &Frame) -> Option<String> {
            self.seen += 1;
            (self.seen >= self.n).then(|| self.code.clone())
        }
    }

    /// Never decodes.
    struct NeverDecode;

    impl DecodeStrategy for NeverDecode {
        fn try_decode(&mut self, _frame: &Frame) -> Option<String> {
            None
        }
    }

    /// Records events in order.
    #[derive(Default)]
    struct RecordingEvents {
        log: Mutex<Vec<String>>,
    }

    impl RecordingEvents {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl ScanEvents for RecordingEvents {
        fn on_tone(&self) {
            self.log.lock().unwrap().push("tone".to_string());
        }
        fn on_detected(&self, code: &str) {
            self.log.lock().unwrap().push(format!("detected:{code}"));
        }
        fn on_error(&self, message: &str) {
            self.log.lock().unwrap().push(format!("error:{message}"));
        }
    }

    // -------------------------------------------------------------------------
    // Tests
    // -------------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn test_detection_releases_source_and_emits_in_order() {
        let stats = Arc::new(SourceStats::default());
        let events = Arc::new(RecordingEvents::default());

        let (scanner, handle) = Scanner::new(
            ScannerConfig::default(),
            Box::new(MockSource::new(stats.clone())),
            Box::new(DecodeOnNth {
                n: 3,
                seen: 0,
                code: "8901234567890".to_string(),
            }),
            events.clone(),
        );

        let result = scanner.run().await.unwrap();
        assert_eq!(result.as_deref(), Some("8901234567890"));

        assert_eq!(handle.state().await, ScannerState::Closed);
        assert_eq!(stats.releases.load(Ordering::SeqCst), 1);
        assert_eq!(
            events.entries(),
            vec!["tone".to_string(), "detected:8901234567890".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_close_while_scanning() {
        let stats = Arc::new(SourceStats::default());

        let (scanner, handle) = Scanner::new(
            ScannerConfig::default(),
            Box::new(MockSource::new(stats.clone())),
            Box::new(NeverDecode),
            Arc::new(NoOpEvents),
        );

        let task = tokio::spawn(scanner.run());

        // Let a few ticks elapse, then close mid-scan.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(handle.state().await, ScannerState::Scanning);
        handle.close();

        let result = task.await.unwrap().unwrap();
        assert_eq!(result, None);
        assert_eq!(handle.state().await, ScannerState::Closed);
        assert_eq!(stats.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_is_idempotent() {
        let stats = Arc::new(SourceStats::default());

        let (scanner, handle) = Scanner::new(
            ScannerConfig::default(),
            Box::new(MockSource::new(stats.clone())),
            Box::new(NeverDecode),
            Arc::new(NoOpEvents),
        );

        let task = tokio::spawn(scanner.run());
        tokio::time::sleep(Duration::from_millis(50)).await;

        handle.close();
        handle.close();

        let result = task.await.unwrap().unwrap();
        assert_eq!(result, None);

        // Closing after the loop has finished is a no-op too.
        handle.close();
        assert_eq!(handle.state().await, ScannerState::Closed);
        assert_eq!(stats.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_camera_failure_waits_for_close_then_releases() {
        let stats = Arc::new(SourceStats::default());
        let events = Arc::new(RecordingEvents::default());

        let (scanner, handle) = Scanner::new(
            ScannerConfig::default(),
            Box::new(MockSource::failing_open(stats.clone())),
            Box::new(NeverDecode),
            events.clone(),
        );

        let task = tokio::spawn(scanner.run());
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Parked in Error with the user-facing message emitted.
        assert_eq!(handle.state().await, ScannerState::Error);
        assert!(events.entries()[0].starts_with("error:Couldn't access the camera"));

        handle.close();
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, ScanError::CameraAccess(_)));

        assert_eq!(handle.state().await, ScannerState::Closed);
        assert_eq!(stats.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_capture_failure_mid_scan() {
        let stats = Arc::new(SourceStats::default());
        let events = Arc::new(RecordingEvents::default());

        let mut source = MockSource::new(stats.clone());
        source.fail_capture_after = Some(2);

        let (scanner, handle) = Scanner::new(
            ScannerConfig::default(),
            Box::new(source),
            Box::new(NeverDecode),
            events.clone(),
        );

        let task = tokio::spawn(scanner.run());
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(handle.state().await, ScannerState::Error);
        handle.close();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, ScanError::Capture(_)));
        assert_eq!(stats.releases.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulated_fallback_detects_after_five_seconds() {
        let (scanner, handle) = Scanner::new(
            ScannerConfig::default(),
            Box::new(TestPattern::new()),
            Box::new(SimulatedDecoder::new()),
            Arc::new(NoOpEvents),
        );

        let started = tokio::time::Instant::now();
        let result = scanner.run().await.unwrap();

        let code = result.expect("fallback should emit a code");
        assert!(SIMULATED_CODES.contains(&code.as_str()));
        assert!(started.elapsed() >= SIMULATED_DELAY);
        assert_eq!(handle.state().await, ScannerState::Closed);
    }
}
