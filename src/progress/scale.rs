//! # Progress unit normalization.
//!
//! Presentation surfaces accept values in `[0, PRESENTATION_MAX]`. A task may
//! report in any unit; [`ProgressScale`] maps its raw range onto that window:
//!
//! ```text
//! raw_max > PRESENTATION_MAX  ──► ratio = PRESENTATION_MAX / raw_max, presented_max = PRESENTATION_MAX
//! raw_max <= PRESENTATION_MAX ──► ratio = 1.0,                        presented_max = raw_max
//! present(raw) = clamp(round(raw * ratio), 0, presented_max)
//! ```

/// Largest value a presentation surface is ever given.
pub const PRESENTATION_MAX: u32 = 10_000;

/// Mapping from a task's raw progress range to presented values.
///
/// # Example
/// ```
/// use lifeline::{ProgressScale, PRESENTATION_MAX};
///
/// let s = ProgressScale::new(50_000);
/// assert_eq!(s.presented_max(), PRESENTATION_MAX);
/// assert_eq!(s.present(25_000), 5_000);
/// assert_eq!(s.present(80_000), PRESENTATION_MAX);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressScale {
    raw_max: u64,
    ratio: f64,
    presented_max: u32,
}

impl ProgressScale {
    /// Builds the scale for a raw maximum.
    pub fn new(raw_max: u64) -> Self {
        let limit = u64::from(PRESENTATION_MAX);
        if raw_max > limit {
            Self {
                raw_max,
                ratio: f64::from(PRESENTATION_MAX) / raw_max as f64,
                presented_max: PRESENTATION_MAX,
            }
        } else {
            Self {
                raw_max,
                ratio: 1.0,
                presented_max: raw_max as u32,
            }
        }
    }

    /// Maps a raw value into `[0, presented_max]`.
    pub fn present(&self, raw: u64) -> u32 {
        let scaled = (raw as f64 * self.ratio).round();
        scaled.clamp(0.0, f64::from(self.presented_max)) as u32
    }

    /// Raw maximum this scale was built for.
    pub fn raw_max(&self) -> u64 {
        self.raw_max
    }

    /// Multiplier applied to raw values.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Maximum handed to the surface.
    pub fn presented_max(&self) -> u32 {
        self.presented_max
    }
}

impl Default for ProgressScale {
    /// Identity scale over `[0, PRESENTATION_MAX]`, used until a task declares its range.
    fn default() -> Self {
        Self::new(u64::from(PRESENTATION_MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_ranges_pass_through() {
        let s = ProgressScale::new(250);
        assert_eq!(s.ratio(), 1.0);
        assert_eq!(s.presented_max(), 250);
        assert_eq!(s.present(100), 100);
        assert_eq!(s.present(400), 250);
    }

    #[test]
    fn large_ranges_are_compressed() {
        let s = ProgressScale::new(50_000);
        assert_eq!(s.presented_max(), PRESENTATION_MAX);
        assert_eq!(s.present(25_000), 5_000);
        assert_eq!(s.present(50_000), PRESENTATION_MAX);
        assert_eq!(s.present(u64::MAX), PRESENTATION_MAX);
    }

    #[test]
    fn presented_values_are_monotonic_and_bounded() {
        for raw_max in [0u64, 1, 9_999, 10_000, 10_001, 33_333, 1 << 40] {
            let s = ProgressScale::new(raw_max);
            assert!(s.presented_max() <= PRESENTATION_MAX);
            let step = (raw_max / 97).max(1);
            let mut last = 0;
            let mut raw = 0;
            while raw <= raw_max.saturating_add(step) {
                let v = s.present(raw);
                assert!(v >= last, "raw_max={raw_max} raw={raw}");
                assert!(v <= s.presented_max());
                last = v;
                raw = match raw.checked_add(step) {
                    Some(r) => r,
                    None => break,
                };
            }
        }
    }

    #[test]
    fn zero_range_presents_zero() {
        let s = ProgressScale::new(0);
        assert_eq!(s.present(5), 0);
    }

    #[test]
    fn default_is_identity_over_presentation_window() {
        let s = ProgressScale::default();
        assert_eq!(s.presented_max(), PRESENTATION_MAX);
        assert_eq!(s.present(1234), 1234);
    }
}
