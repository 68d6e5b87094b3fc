//! Metering lifecycle and the background read cycle
//!
//! [`LevelMeter`] is the public surface consumed by the UI shell: `start`,
//! `stop`, and a `reading` accessor. One worker thread per session performs
//! blocking reads, converts each block with `meter-level`, and publishes the
//! result. The recording flag is the sole cancellation signal; the bounded
//! blocking read inside [`InputSource::read`] paces the loop without
//! busy-waiting.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use meter_level::{display_reading, SILENCE_READING};

use crate::cell::LevelCell;
use crate::cpal_input::CpalBackend;
use crate::error::{CaptureError, Result};
use crate::source::{InputBackend, InputConfig, InputSource};

/// Display-scale level above which [`LevelMeter::is_alert`] fires.
pub const DEFAULT_ALERT_THRESHOLD: f64 = 70.0;

/// Microphone level meter: owns the device lifecycle and publishes the
/// latest loudness reading.
///
/// Single writer (the worker thread) / any number of readers. `stop` is
/// idempotent and joins the worker before releasing the device, so no
/// reader ever observes a released device as open.
pub struct LevelMeter {
    backend: Box<dyn InputBackend>,
    config: InputConfig,
    level: LevelCell,
    recording: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    alert_threshold: f64,
}

impl LevelMeter {
    /// Meter backed by the default CPAL input device.
    pub fn new() -> Self {
        Self::with_backend(CpalBackend::new())
    }

    /// Meter backed by an arbitrary input backend (tests use scripted ones).
    pub fn with_backend(backend: impl InputBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            config: InputConfig::default(),
            level: LevelCell::new(),
            recording: Arc::new(AtomicBool::new(false)),
            worker: None,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }

    /// Start a metering session.
    ///
    /// The OS permission flow belongs to the caller; `permission_granted`
    /// reports its outcome. Without an affirmative grant this refuses to
    /// touch the device. Calling `start` while already recording is a no-op.
    ///
    /// # Errors
    /// [`CaptureError::PermissionDenied`] without a grant;
    /// [`CaptureError::DeviceUnavailable`] (or a stream variant) when the
    /// device cannot be opened — in both cases no partial state is left
    /// behind.
    pub fn start(&mut self, permission_granted: bool) -> Result<()> {
        if !permission_granted {
            return Err(CaptureError::PermissionDenied);
        }
        if self.recording.load(Ordering::Acquire) {
            return Ok(());
        }

        let source = self.backend.open(&self.config)?;

        self.recording.store(true, Ordering::Release);

        let recording = Arc::clone(&self.recording);
        let level = self.level.clone();
        let handle = thread::Builder::new()
            .name("meter-capture".to_string())
            .spawn(move || read_cycle(source, &recording, &level))
            .map_err(|err| {
                self.recording.store(false, Ordering::Release);
                CaptureError::WorkerSpawn(err.to_string())
            })?;

        self.worker = Some(handle);
        tracing::debug!(
            "Metering started at {} Hz, {} channel(s)",
            self.config.sample_rate,
            self.config.channels
        );
        Ok(())
    }

    /// End the metering session and release the device.
    ///
    /// Idempotent: a no-op when not recording. Otherwise clears the
    /// recording flag, waits for the worker to observe it and exit (bounded
    /// by one in-flight blocking read), then resets the published reading to
    /// the silence value.
    pub fn stop(&mut self) {
        if !self.recording.swap(false, Ordering::AcqRel) {
            return;
        }

        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("Capture thread panicked during shutdown");
            }
        }

        self.level.set(SILENCE_READING);
        tracing::debug!("Metering stopped");
    }

    /// Latest published reading; safe from any thread at any time.
    ///
    /// Returns the silence value before the first `start` and after `stop`.
    pub fn reading(&self) -> f64 {
        self.level.get()
    }

    /// Whether a metering session is active.
    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    /// Handle to the published-reading slot for observers that outlive a
    /// borrow of the meter.
    pub fn level_cell(&self) -> LevelCell {
        self.level.clone()
    }

    /// Set the display-scale level at which [`Self::is_alert`] fires.
    pub fn set_alert_threshold(&mut self, threshold: f64) {
        self.alert_threshold = threshold;
    }

    /// Current alert threshold.
    pub fn alert_threshold(&self) -> f64 {
        self.alert_threshold
    }

    /// Whether the latest reading is at or above the alert threshold.
    pub fn is_alert(&self) -> bool {
        self.reading() >= self.alert_threshold
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LevelMeter {
    fn drop(&mut self) {
        self.stop();
    }
}

/// One read-compute-publish cycle per successful block, in order, until the
/// recording flag clears. The source is stopped and released here, on the
/// worker, after the final iteration.
fn read_cycle(mut source: Box<dyn InputSource>, recording: &AtomicBool, level: &LevelCell) {
    let mut block = vec![0_i16; source.block_capacity().max(1)];

    while recording.load(Ordering::Acquire) {
        match source.read(&mut block) {
            // Nothing arrived in time; skip publication and retry
            Ok(0) => {}
            Ok(n) => {
                let n = n.min(block.len());
                level.set(display_reading(&block[..n]));
            }
            // Transient device failure: treated as an empty read
            Err(err) => {
                tracing::warn!("Input read failed, retrying: {}", err);
            }
        }
    }

    source.stop();
}
