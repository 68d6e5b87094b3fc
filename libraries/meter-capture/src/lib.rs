//! Microphone acquisition loop for Mic Meter
//!
//! This crate owns the audio input device and drives the `meter-level`
//! estimator at the device's natural buffer cadence:
//!
//! ```text
//! ┌────────────┐     ┌─────────────┐     ┌─────────────┐     ┌───────────┐
//! │ Microphone │ ──► │ InputSource │ ──► │ meter-level │ ──► │ LevelCell │
//! └────────────┘     └─────────────┘     └─────────────┘     └───────────┘
//!                     blocking reads        per-block           latest
//!                     on a worker           conversion          reading
//!                     thread
//! ```
//!
//! The device sits behind the [`InputSource`]/[`InputBackend`] traits so the
//! loop logic is testable with a scripted input; [`CpalBackend`] is the
//! production implementation. Consumers interact with [`LevelMeter`]:
//! `start` / `stop` plus a `reading` accessor that is safe from any thread.
//!
//! # Example
//!
//! ```no_run
//! use meter_capture::LevelMeter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // The caller is responsible for the OS microphone-permission flow;
//! // pass the outcome here.
//! let mut meter = LevelMeter::new();
//! meter.start(true)?;
//!
//! let level = meter.reading(); // roughly [0, 80], 0.0 = silence
//! println!("level: {level:.1}");
//!
//! meter.stop();
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod cell;
mod cpal_input;
mod error;
mod meter;
mod source;

pub use cell::LevelCell;
pub use cpal_input::CpalBackend;
pub use error::{CaptureError, Result};
pub use meter::{LevelMeter, DEFAULT_ALERT_THRESHOLD};
pub use source::{InputBackend, InputConfig, InputSource};
