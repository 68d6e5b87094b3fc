//! CPAL-backed microphone input
//!
//! CPAL delivers samples through a callback on its own audio thread; the
//! read cycle wants a blocking read. The bridge is a bounded channel: the
//! callback pushes each buffer in, [`CpalSource::read`] pops with a timeout.
//! The timeout doubles as the cancellation latency bound for `stop`.

use std::collections::VecDeque;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Stream, StreamConfig, SupportedBufferSize};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError};

use crate::error::{CaptureError, Result};
use crate::source::{InputBackend, InputConfig, InputSource};

/// Upper bound on one blocking read; also bounds how long a cooperative
/// cancellation can remain unobserved.
const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Callback buffers queued between the audio thread and the reader. At 8
/// buffers the audio thread never blocks; a stalled reader just loses the
/// oldest cadence, which is fine for a live meter.
const CHANNEL_CAPACITY: usize = 8;

/// Smallest block capacity we will meter over; very small blocks make the
/// RMS jumpy.
const MIN_BLOCK_CAPACITY: usize = 256;

/// Block capacity when the device does not report a buffer-size range.
const FALLBACK_BLOCK_CAPACITY: usize = 4096;

/// Production [`InputBackend`] using the default CPAL host and input device.
#[derive(Debug, Default)]
pub struct CpalBackend;

impl CpalBackend {
    /// Create a backend bound to the default host.
    pub fn new() -> Self {
        Self
    }
}

impl InputBackend for CpalBackend {
    fn open(&self, config: &InputConfig) -> Result<Box<dyn InputSource>> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no input device found".to_string()))?;

        let name = device.name().unwrap_or_else(|_| "<unknown>".to_string());
        let supported = device.default_input_config()?;

        // "Minimum required buffer" in CPAL terms: the low end of the
        // device's reported range, when it reports one.
        let block_capacity = match supported.buffer_size() {
            SupportedBufferSize::Range { min, .. } => (*min as usize).max(MIN_BLOCK_CAPACITY),
            SupportedBufferSize::Unknown => FALLBACK_BLOCK_CAPACITY,
        };

        let stream_config = StreamConfig {
            channels: config.channels,
            sample_rate: config.sample_rate,
            buffer_size: BufferSize::Default,
        };

        let (tx, rx) = bounded::<Vec<i16>>(CHANNEL_CAPACITY);

        let stream = device.build_input_stream::<i16, _, _>(
            &stream_config,
            move |data, _info| {
                // A full channel means the reader is behind; drop the buffer
                // rather than stall the audio thread.
                let _ = tx.try_send(data.to_vec());
            },
            |err| {
                tracing::warn!("Input stream error: {}", err);
            },
            None,
        )?;

        stream.play()?;

        tracing::debug!(
            "Opened input device '{}' at {} Hz, {} channel(s), block capacity {}",
            name,
            config.sample_rate,
            config.channels,
            block_capacity
        );

        Ok(Box::new(CpalSource {
            stream,
            rx,
            pending: VecDeque::new(),
            block_capacity,
            stopped: false,
        }))
    }
}

/// An open CPAL input stream plus the channel it feeds.
///
/// Dropping the source drops the stream, which closes the device.
pub struct CpalSource {
    /// Keeps the stream alive; also pausable via `stop`
    stream: Stream,

    /// Buffers pushed by the audio callback
    rx: Receiver<Vec<i16>>,

    /// Samples received but not yet consumed by `read`
    pending: VecDeque<i16>,

    /// Capacity reads should use for their sample blocks
    block_capacity: usize,

    /// Set by `stop`; subsequent reads return `Ok(0)`
    stopped: bool,
}

// SAFETY: CpalSource is safe to send to the capture thread because:
// - rx and pending are Send
// - stream is CPAL's Stream, which internally uses thread-safe primitives
//   (the PhantomData<*mut ()> is just a marker, not actually unsafe); the
//   source is exclusively owned by one thread at a time, never shared
#[allow(unsafe_code)]
unsafe impl Send for CpalSource {}

impl InputSource for CpalSource {
    fn read(&mut self, block: &mut [i16]) -> Result<usize> {
        if self.stopped {
            return Ok(0);
        }

        if self.pending.is_empty() {
            match self.rx.recv_timeout(READ_TIMEOUT) {
                Ok(chunk) => self.pending.extend(chunk),
                // Timeout or a torn-down callback both read as "nothing
                // arrived"; the loop retries or exits on its flag.
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return Ok(0),
            }
        }

        let n = self.pending.len().min(block.len());
        for (dst, src) in block.iter_mut().zip(self.pending.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }

    fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        if let Err(err) = self.stream.pause() {
            tracing::warn!("Failed to pause input stream: {}", err);
        }
    }

    fn block_capacity(&self) -> usize {
        self.block_capacity
    }
}
