use log::debug;

use crate::delay_line::DelayLine;
use crate::error::{FirError, Result};
use crate::filter::Filter;

/// Fixed-length FIR filter engine
///
/// Holds `N` tap coefficients, a circular history of the last `N` input
/// samples, and a scalar output gain. Each call to [`process`] stores the
/// incoming sample, convolves the history against the taps, and returns the
/// gain-scaled sum — one output sample per input sample, in O(N).
///
/// Tap 0 multiplies the newest sample; tap `i` multiplies the sample `i`
/// steps older. Swapping that convention would time-reverse the impulse
/// response, so the impulse-response tests pin it down.
///
/// Accumulation runs in f64 to limit rounding drift over long tap lists;
/// the result is truncated back to f32 on return. Non-finite inputs
/// propagate per IEEE-754 — there is no clamping or saturation.
///
/// The engine mutates its history and write position on every `process`
/// call and the setters are not synchronized against it, so a single
/// instance must be driven from one thread (or behind an external lock).
///
/// [`process`]: FirFilter::process
#[derive(Debug, Clone)]
pub struct FirFilter<const N: usize> {
    taps: [f32; N],
    gain: f32,
    delay: DelayLine<N>,
}

impl<const N: usize> FirFilter<N> {
    /// Create a filter with unit gain and all-zero taps.
    ///
    /// Outputs silence until taps are configured.
    pub fn new() -> Self {
        Self::with_taps(1.0, [0.0; N])
    }

    /// Create a filter from a gain and a full tap array
    pub fn with_taps(gain: f32, taps: [f32; N]) -> Self {
        Self {
            taps,
            gain,
            delay: DelayLine::new(),
        }
    }

    /// Create a filter from a gain and a tap slice
    ///
    /// # Errors
    /// Returns `FirError::TapCountMismatch` unless the slice holds exactly
    /// `N` values.
    pub fn from_slice(gain: f32, taps: &[f32]) -> Result<Self> {
        let taps: [f32; N] = taps
            .try_into()
            .map_err(|_| FirError::TapCountMismatch {
                expected: N,
                actual: taps.len(),
            })?;
        Ok(Self::with_taps(gain, taps))
    }

    /// Replace the output gain
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }

    /// Replace all taps at once
    ///
    /// Takes effect for the next `process` call; the history is untouched.
    /// Nothing is written on a length mismatch.
    ///
    /// # Errors
    /// Returns `FirError::TapCountMismatch` unless the slice holds exactly
    /// `N` values.
    pub fn set_taps(&mut self, taps: &[f32]) -> Result<()> {
        self.taps = taps.try_into().map_err(|_| FirError::TapCountMismatch {
            expected: N,
            actual: taps.len(),
        })?;
        debug!("replaced all {} taps", N);
        Ok(())
    }

    /// Replace the tap at `index`
    ///
    /// # Errors
    /// Returns `FirError::TapIndexOutOfRange` unless `index < N`.
    pub fn set_tap(&mut self, index: usize, tap: f32) -> Result<()> {
        if index >= N {
            return Err(FirError::TapIndexOutOfRange { index, len: N });
        }
        self.taps[index] = tap;
        Ok(())
    }

    /// Process a single sample through the filter
    pub fn process(&mut self, sample: f32) -> f32 {
        self.delay.push(sample);

        let sum: f64 = self
            .delay
            .newest_first()
            .zip(self.taps.iter())
            .map(|(s, &tap)| s as f64 * tap as f64)
            .sum();

        (self.gain as f64 * sum) as f32
    }

    /// Zero the sample history, keeping taps and gain
    pub fn reset(&mut self) {
        self.delay.clear();
        debug!("history reset");
    }

    /// Get the current output gain
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Get access to the tap coefficients
    pub fn taps(&self) -> &[f32; N] {
        &self.taps
    }

    /// Get the number of taps (filter length)
    pub const fn num_taps(&self) -> usize {
        N
    }

    /// Get the group delay in samples (half the filter length for linear phase)
    pub const fn group_delay_samples(&self) -> usize {
        (N - 1) / 2
    }
}

impl<const N: usize> Default for FirFilter<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Filter for FirFilter<N> {
    fn process(&mut self, sample: f32) -> f32 {
        FirFilter::process(self, sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_is_silent() {
        let mut filter = FirFilter::<5>::new();
        assert_eq!(filter.gain(), 1.0);
        for s in [1.0, -3.0, 0.5, 100.0] {
            assert_eq!(filter.process(s), 0.0);
        }
    }

    #[test]
    fn test_from_slice_validates_length() {
        let filter = FirFilter::<5>::from_slice(1.0, &[0.2; 4]);
        assert!(matches!(
            filter,
            Err(FirError::TapCountMismatch {
                expected: 5,
                actual: 4
            })
        ));

        let filter = FirFilter::<5>::from_slice(1.0, &[0.2; 5]);
        assert!(filter.is_ok());
    }

    #[test]
    fn test_set_taps_rejects_wrong_length_without_writing() {
        let mut filter = FirFilter::<3>::with_taps(1.0, [1.0, 2.0, 3.0]);
        let result = filter.set_taps(&[9.0, 9.0]);
        assert!(matches!(
            result,
            Err(FirError::TapCountMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert_eq!(filter.taps(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_set_tap_bounds() {
        let mut filter = FirFilter::<3>::new();
        assert!(filter.set_tap(2, 0.5).is_ok());
        assert!(matches!(
            filter.set_tap(3, 0.5),
            Err(FirError::TapIndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_reset_clears_history_only() {
        let mut filter = FirFilter::<3>::with_taps(2.0, [1.0, 1.0, 1.0]);
        filter.process(1.0);
        filter.process(1.0);
        filter.reset();
        assert_eq!(filter.taps(), &[1.0, 1.0, 1.0]);
        assert_eq!(filter.gain(), 2.0);
        // Only the new sample remains in the window after reset
        assert_eq!(filter.process(1.0), 2.0);
    }

    #[test]
    fn test_group_delay() {
        let filter = FirFilter::<63>::new();
        assert_eq!(filter.group_delay_samples(), 31);
    }

    #[test]
    fn test_non_finite_samples_propagate() {
        let mut filter = FirFilter::<3>::with_taps(1.0, [1.0, 0.0, 0.0]);
        assert!(filter.process(f32::NAN).is_nan());
    }
}
