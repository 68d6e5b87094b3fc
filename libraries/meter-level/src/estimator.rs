//! RMS and decibel conversion for sample blocks
//!
//! The conversion chain is `rms` → `dbfs` → `display_reading`. Each stage is
//! a standalone function so callers can stop at the raw dBFS value if they
//! want the unscaled measurement.

use crate::{DISPLAY_OFFSET_DB, REFERENCE_AMPLITUDE, SILENCE_FLOOR_DBFS, SILENCE_READING};

/// Root-mean-square amplitude of a sample block.
///
/// Accumulates in f64 so a full-scale block of any realistic length cannot
/// overflow (i16 squares fit comfortably in the f64 mantissa). An empty block
/// yields `0.0`, which downstream stages treat as silence.
pub fn rms(block: &[i16]) -> f64 {
    if block.is_empty() {
        return 0.0;
    }

    let sum: f64 = block
        .iter()
        .map(|&s| {
            let s = f64::from(s);
            s * s
        })
        .sum();

    (sum / block.len() as f64).sqrt()
}

/// Convert a linear RMS amplitude to dBFS (decibels relative to full scale).
///
/// For any positive RMS the result is `20·log10(rms / 32767)`, a value in
/// `(-inf, 0]` for in-range signals. Zero RMS takes the silence-floor branch
/// instead of evaluating `log10(0)`.
pub fn dbfs(rms: f64) -> f64 {
    if rms > 0.0 {
        20.0 * (rms / REFERENCE_AMPLITUDE).log10()
    } else {
        SILENCE_FLOOR_DBFS
    }
}

/// Convert one sample block into one display reading.
///
/// The dBFS value is shifted by [`DISPLAY_OFFSET_DB`] so the practical
/// dynamic range lands on a roughly `[0, 80+]` scale, then floored at
/// [`SILENCE_READING`] so the consumer never sees a negative level.
///
/// Always finite, never NaN, deterministic for a given block.
pub fn display_reading(block: &[i16]) -> f64 {
    (dbfs(rms(block)) + DISPLAY_OFFSET_DB).max(SILENCE_READING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_block_is_silence() {
        assert_eq!(rms(&[]), 0.0);
        assert_eq!(display_reading(&[]), SILENCE_READING);
    }

    #[test]
    fn all_zero_block_takes_silence_floor() {
        for len in [1, 7, 1024] {
            let block = vec![0_i16; len];
            assert_eq!(rms(&block), 0.0);
            // Pre-floor value is -120 + 80 = -40, floored to the silence reading
            assert_eq!(display_reading(&block), SILENCE_READING);
        }
    }

    #[test]
    fn dbfs_of_zero_rms_is_floor() {
        assert_eq!(dbfs(0.0), SILENCE_FLOOR_DBFS);
    }

    #[test]
    fn full_scale_square_wave_reads_near_top_of_scale() {
        let block: Vec<i16> = (0..4096)
            .map(|i| if i % 2 == 0 { i16::MAX } else { i16::MIN })
            .collect();

        let r = rms(&block);
        assert!(
            (r - REFERENCE_AMPLITUDE).abs() < 1.0,
            "full-scale square wave RMS should sit at the reference amplitude, got {r}"
        );

        let reading = display_reading(&block);
        assert!(
            (reading - DISPLAY_OFFSET_DB).abs() < 0.1,
            "expected a reading near 80.0, got {reading}"
        );
    }

    #[test]
    fn half_scale_sine_reads_below_full_scale() {
        let block: Vec<i16> = (0..4410)
            .map(|i| {
                let t = f64::from(i) / 44100.0;
                (16384.0 * (2.0 * std::f64::consts::PI * 440.0 * t).sin()) as i16
            })
            .collect();

        let reading = display_reading(&block);
        // Half-scale sine: RMS = 16384/sqrt(2), about -9 dBFS, so ~71 on the display scale
        assert!(
            reading > 65.0 && reading < 75.0,
            "expected a reading around 71, got {reading}"
        );
    }

    #[test]
    fn reading_is_deterministic() {
        let block: Vec<i16> = (0..1000).map(|i| (i % 251) as i16 - 125).collect();
        assert_eq!(display_reading(&block), display_reading(&block));
    }

    #[test]
    fn minimum_sample_value_does_not_overflow() {
        // i16::MIN squared exceeds i32; the f64 accumulator must absorb it
        let block = vec![i16::MIN; 8192];
        let reading = display_reading(&block);
        assert!(reading.is_finite());
        assert!(reading > DISPLAY_OFFSET_DB, "i16::MIN is just over full scale");
    }

    proptest! {
        #[test]
        fn reading_is_always_finite_and_non_negative(block in proptest::collection::vec(any::<i16>(), 0..8192)) {
            let reading = display_reading(&block);
            prop_assert!(reading.is_finite());
            prop_assert!(!reading.is_nan());
            prop_assert!(reading >= SILENCE_READING);
        }

        #[test]
        fn dbfs_never_exceeds_zero_for_in_range_blocks(block in proptest::collection::vec(-32767_i16..=32767, 1..4096)) {
            let db = dbfs(rms(&block));
            prop_assert!(db.is_finite());
            prop_assert!(db <= 0.0);
        }
    }
}
