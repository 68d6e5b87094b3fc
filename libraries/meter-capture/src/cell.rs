//! Thread-safe published-reading slot
//!
//! The read cycle is the single writer; any number of observers read the
//! latest value. Storing the f64 bit pattern in an `AtomicU64` makes torn
//! reads impossible without a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use meter_level::SILENCE_READING;

/// Shared slot holding the most recent loudness reading.
///
/// Cloning is cheap and yields a handle to the same slot, so the worker
/// thread and any number of UI observers can hold their own copies.
#[derive(Clone, Debug)]
pub struct LevelCell {
    bits: Arc<AtomicU64>,
}

impl LevelCell {
    /// Create a cell initialized to the silence reading.
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(SILENCE_READING.to_bits())),
        }
    }

    /// Publish a new reading.
    pub fn set(&self, reading: f64) {
        self.bits.store(reading.to_bits(), Ordering::Relaxed);
    }

    /// Latest published reading.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for LevelCell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_silence() {
        let cell = LevelCell::new();
        assert_eq!(cell.get(), SILENCE_READING);
    }

    #[test]
    fn set_then_get_round_trips_exactly() {
        let cell = LevelCell::new();
        cell.set(63.7);
        assert_eq!(cell.get(), 63.7);
    }

    #[test]
    fn clones_share_the_slot() {
        let writer = LevelCell::new();
        let reader = writer.clone();
        writer.set(42.0);
        assert_eq!(reader.get(), 42.0);
    }
}
