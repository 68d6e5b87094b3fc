/// Capture errors
use thiserror::Error;

/// Result type for capture operations
pub type Result<T> = std::result::Result<T, CaptureError>;

/// Errors surfaced by the acquisition loop.
///
/// Transient read failures are deliberately absent: the read cycle treats
/// them as empty reads and retries, so they never reach the caller.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// `start` was called without an affirmative permission grant
    #[error("Microphone permission not granted")]
    PermissionDenied,

    /// Input device failed to open
    #[error("Audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Failed to build the input stream
    #[error("Failed to build input stream: {0}")]
    StreamBuild(String),

    /// Failed to start the input stream
    #[error("Failed to start input stream: {0}")]
    StreamStart(String),

    /// Failed to spawn the capture worker thread
    #[error("Failed to spawn capture thread: {0}")]
    WorkerSpawn(String),
}

impl From<cpal::BuildStreamError> for CaptureError {
    fn from(err: cpal::BuildStreamError) -> Self {
        CaptureError::StreamBuild(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for CaptureError {
    fn from(err: cpal::PlayStreamError) -> Self {
        CaptureError::StreamStart(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for CaptureError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        CaptureError::DeviceUnavailable(err.to_string())
    }
}
