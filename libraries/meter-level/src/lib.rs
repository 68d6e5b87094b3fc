//! Block loudness estimation for Mic Meter
//!
//! This crate converts one block of 16-bit PCM samples into one loudness
//! reading suitable for a level-meter display:
//!
//! ```text
//! ┌──────────────┐     ┌─────────┐     ┌────────────────┐
//! │ Sample Block │ ──► │   RMS   │ ──► │ dBFS + rescale │
//! └──────────────┘     └─────────┘     └────────────────┘
//! ```
//!
//! Everything here is pure math: no I/O, no shared state, no concurrency.
//! The acquisition side (`meter-capture`) feeds blocks in at whatever cadence
//! the input device produces them.
//!
//! # Example
//!
//! ```
//! use meter_level::display_reading;
//!
//! let block: Vec<i16> = vec![8000, -8000, 8000, -8000];
//! let reading = display_reading(&block);
//! assert!(reading.is_finite());
//! assert!(reading >= 0.0);
//! ```

#![deny(unsafe_code)]

mod estimator;

pub use estimator::{dbfs, display_reading, rms};

/// Full-scale amplitude for 16-bit signed PCM; the 0 dBFS reference.
pub const REFERENCE_AMPLITUDE: f64 = 32767.0;

/// Substitute dBFS value for a block with zero RMS, avoiding `log10(0)`.
pub const SILENCE_FLOOR_DBFS: f64 = -120.0;

/// Offset mapping the practical dBFS range into a roughly [0, 80+] display scale.
pub const DISPLAY_OFFSET_DB: f64 = 80.0;

/// Display value meaning "silence"; also the floor applied to every reading.
pub const SILENCE_READING: f64 = 0.0;
