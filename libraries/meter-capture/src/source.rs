//! Input device abstraction
//!
//! Four operations are the entire contract the loop needs from a platform
//! audio subsystem: open, blocking read, stop, release (release is `Drop`).
//! [`crate::CpalBackend`] is the production implementation; tests script
//! their own sources.

use crate::Result;

/// Fixed acquisition configuration for a metering session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of input channels
    pub channels: u16,
}

impl Default for InputConfig {
    /// 44.1 kHz mono, 16-bit signed PCM — the standard metering configuration.
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 1,
        }
    }
}

/// An open microphone channel.
///
/// Exclusively owned by the read cycle; never shared or cloned. Dropping the
/// source releases the underlying device.
pub trait InputSource: Send {
    /// Blocking read of up to `block.len()` samples into `block`.
    ///
    /// Returns the number of samples written. `Ok(0)` means nothing arrived
    /// in time (or a transient device hiccup); the caller skips publication
    /// and retries. Implementations must bound the blocking time so a
    /// cooperative cancellation flag is observed promptly.
    fn read(&mut self, block: &mut [i16]) -> Result<usize>;

    /// Stop the stream. Reads after this return `Ok(0)`.
    fn stop(&mut self);

    /// Preferred sample-block capacity for this source, derived from the
    /// device's minimum buffer for the configuration.
    fn block_capacity(&self) -> usize;
}

/// Factory for input sources; the seam between the loop and the platform.
pub trait InputBackend: Send {
    /// Open an input source at the given configuration.
    ///
    /// # Errors
    /// Returns [`crate::CaptureError::DeviceUnavailable`] (or a stream
    /// build/start variant) when the device cannot be opened; no partial
    /// state is retained in that case.
    fn open(&self, config: &InputConfig) -> Result<Box<dyn InputSource>>;
}
