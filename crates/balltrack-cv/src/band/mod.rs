//! Target color bands

pub mod file;

pub use file::BandFile;

use balltrack_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Largest hue value; hue lives on the cyclic domain 0..180.
pub const HUE_MAX: u8 = 179;

/// Accepted HSV range, bounds inclusive.
///
/// When `low[0] > high[0]` the hue range wraps through 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorBand {
    #[serde(rename = "low_hsv")]
    pub low: [u8; 3],
    #[serde(rename = "upper_hsv")]
    pub high: [u8; 3],
}

impl ColorBand {
    pub fn new(low: [u8; 3], high: [u8; 3]) -> Self {
        Self { low, high }
    }

    /// Band centered on `target` with per-channel `tolerance`.
    ///
    /// Hue bounds wrap modulo 180, saturation and value are clamped.
    pub fn around(target: [u8; 3], tolerance: [u8; 3]) -> Self {
        let hue_span = HUE_MAX as i32 + 1;
        let wrap = |h: i32| h.rem_euclid(hue_span) as u8;
        let clamp = |v: i32| v.clamp(0, 255) as u8;

        let [h, s, v] = target.map(i32::from);
        let [th, ts, tv] = tolerance.map(i32::from);

        Self {
            low: [wrap(h - th), clamp(s - ts), clamp(v - tv)],
            high: [wrap(h + th), clamp(s + ts), clamp(v + tv)],
        }
    }

    /// Blue practice ball under the lab lights.
    pub fn blue_ball() -> Self {
        Self::around([110, 200, 90], [30, 45, 25])
    }

    pub fn validate(&self, camera: &str) -> Result<(), ConfigError> {
        for value in [self.low[0], self.high[0]] {
            if value > HUE_MAX {
                return Err(ConfigError::BandBound {
                    camera: camera.to_string(),
                    channel: "hue",
                    value: value as u16,
                    max: HUE_MAX as u16,
                });
            }
        }
        Ok(())
    }

    pub fn wraps_hue(&self) -> bool {
        self.low[0] > self.high[0]
    }

    pub fn hue_matches(&self, h: u8) -> bool {
        let (low, high) = (self.low[0], self.high[0]);
        if low <= high {
            (low..=high).contains(&h)
        } else {
            (low..=HUE_MAX).contains(&h) || h <= high
        }
    }

    pub fn saturation_matches(&self, s: u8) -> bool {
        (self.low[1]..=self.high[1]).contains(&s)
    }

    pub fn value_matches(&self, v: u8) -> bool {
        (self.low[2]..=self.high[2]).contains(&v)
    }

    /// Per-channel test results for one HSV pixel.
    pub fn channel_matches(&self, hsv: [u8; 3]) -> [bool; 3] {
        [
            self.hue_matches(hsv[0]),
            self.saturation_matches(hsv[1]),
            self.value_matches(hsv[2]),
        ]
    }
}

impl Default for ColorBand {
    fn default() -> Self {
        Self::blue_ball()
    }
}

/// Shared handle to one camera's band.
///
/// Readers copy the whole band, writers replace the whole band, so a reader
/// never sees lower and upper bounds from different writes.
#[derive(Debug, Clone, Default)]
pub struct BandHandle {
    inner: Arc<RwLock<ColorBand>>,
}

impl BandHandle {
    pub fn new(band: ColorBand) -> Self {
        Self {
            inner: Arc::new(RwLock::new(band)),
        }
    }

    pub fn snapshot(&self) -> ColorBand {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn replace(&self, band: ColorBand) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = band;
    }
}
