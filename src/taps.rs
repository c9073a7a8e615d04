use std::path::Path;

use serde::Deserialize;

use crate::error::{FirError, Result};
use crate::fir::FirFilter;

/// Tap set produced by an offline filter-design tool
///
/// Loaded from a small TOML document:
///
/// ```toml
/// gain = 0.5   # optional, defaults to 1.0
/// taps = [0.1, 0.2, 0.4, 0.2, 0.1]
/// ```
///
/// The tap list length is whatever the design tool produced; converting
/// into a [`FirFilter`] checks it against the engine's compile-time length.
#[derive(Debug, Clone, Deserialize)]
pub struct TapSet {
    #[serde(default = "default_gain")]
    pub gain: f32,
    pub taps: Vec<f32>,
}

fn default_gain() -> f32 {
    1.0
}

impl TapSet {
    /// Parse a tap set from TOML text
    ///
    /// # Errors
    /// Returns `FirError::TapSet` if the document does not parse, the tap
    /// list is empty, or any value is non-finite.
    pub fn parse(text: &str) -> Result<Self> {
        let set: TapSet =
            toml::from_str(text).map_err(|e| FirError::TapSet(e.to_string()))?;
        set.validate()?;
        Ok(set)
    }

    /// Load a tap set from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.taps.is_empty() {
            return Err(FirError::TapSet("tap list is empty".to_string()));
        }
        if !self.gain.is_finite() {
            return Err(FirError::TapSet(format!("gain is not finite: {}", self.gain)));
        }
        if let Some(idx) = self.taps.iter().position(|t| !t.is_finite()) {
            return Err(FirError::TapSet(format!("tap {} is not finite", idx)));
        }
        Ok(())
    }

    /// Number of taps in the set
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Sum of the taps (the filter's DC response before gain)
    pub fn dc_sum(&self) -> f32 {
        self.taps.iter().sum()
    }

    /// Build a filter engine from this tap set
    ///
    /// # Errors
    /// Returns `FirError::TapCountMismatch` unless the set holds exactly
    /// `N` taps.
    pub fn build_filter<const N: usize>(&self) -> Result<FirFilter<N>> {
        FirFilter::from_slice(self.gain, &self.taps)
    }
}
