//! HSV statistics for choosing a band
//!
//! Aim the camera so the ball fills a disc at the frame center, sample the
//! disc, and read off per-channel quartiles.

use crate::band::ColorBand;
use crate::HsvFrame;
use serde::{Deserialize, Serialize};

/// Order statistics of one channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub min: u8,
    pub q1: u8,
    pub median: u8,
    pub q3: u8,
    pub mean: u8,
    pub max: u8,
    pub count: usize,
}

impl ChannelStats {
    /// Statistics of `values`; all zero when empty.
    pub fn from_values(mut values: Vec<u8>) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        values.sort_unstable();

        let sum: u64 = values.iter().map(|&v| v as u64).sum();
        Self {
            min: values[0],
            q1: percentile(&values, 0.25),
            median: percentile(&values, 0.5),
            q3: percentile(&values, 0.75),
            mean: (sum / values.len() as u64) as u8,
            max: values[values.len() - 1],
            count: values.len(),
        }
    }
}

/// Linear-interpolated percentile of sorted values, truncated.
fn percentile(sorted: &[u8], p: f64) -> u8 {
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    let value = sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac;
    value as u8
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvStats {
    pub hue: ChannelStats,
    pub saturation: ChannelStats,
    pub value: ChannelStats,
}

impl HsvStats {
    /// Band spanning the interquartile range of each channel.
    pub fn suggest_band(&self) -> ColorBand {
        ColorBand::new(
            [self.hue.q1, self.saturation.q1, self.value.q1],
            [self.hue.q3, self.saturation.q3, self.value.q3],
        )
    }
}

/// Sample the pixels inside a disc of `radius` around `center`.
pub fn sample_disc_stats(frame: &HsvFrame, center: (u32, u32), radius: u32) -> HsvStats {
    let (cx, cy) = (center.0 as i64, center.1 as i64);
    let r = radius as i64;

    let mut channels: [Vec<u8>; 3] = Default::default();
    let y_range = (cy - r).max(0)..=(cy + r).min(frame.height() as i64 - 1);
    let x_range = (cx - r).max(0)..=(cx + r).min(frame.width() as i64 - 1);

    for y in y_range {
        for x in x_range.clone() {
            let (dx, dy) = (x - cx, y - cy);
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let pixel = frame.get_pixel(x as u32, y as u32);
            for (channel, &v) in channels.iter_mut().zip(pixel.0.iter()) {
                channel.push(v);
            }
        }
    }

    let [hue, saturation, value] = channels.map(ChannelStats::from_values);
    log::debug!("Sampled {} pixels around {:?}", hue.count, center);
    HsvStats {
        hue,
        saturation,
        value,
    }
}

/// Sample a disc at the frame center.
pub fn sample_center_stats(frame: &HsvFrame, radius: u32) -> HsvStats {
    sample_disc_stats(frame, (frame.width() / 2, frame.height() / 2), radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_channel_stats() {
        let stats = ChannelStats::from_values(vec![10, 20, 30, 40, 50]);
        assert_eq!(stats.min, 10);
        assert_eq!(stats.q1, 20);
        assert_eq!(stats.median, 30);
        assert_eq!(stats.q3, 40);
        assert_eq!(stats.mean, 30);
        assert_eq!(stats.max, 50);
        assert_eq!(stats.count, 5);

        // rank 0.75 between 1 and 2
        let stats = ChannelStats::from_values(vec![2, 1, 4, 3]);
        assert_eq!(stats.q1, 1);
        assert_eq!(stats.median, 2);
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(ChannelStats::from_values(Vec::new()), ChannelStats::default());
        let frame = HsvFrame::new(0, 0);
        assert_eq!(sample_center_stats(&frame, 5).hue.count, 0);
    }

    #[test]
    fn test_disc_sampling_ignores_outside_pixels() {
        let mut frame = HsvFrame::from_pixel(21, 21, Rgb([0, 0, 0]));
        for y in 0..21 {
            for x in 0..21 {
                let (dx, dy) = (x as i64 - 10, y as i64 - 10);
                if dx * dx + dy * dy <= 25 {
                    frame.put_pixel(x, y, Rgb([110, 200, 90]));
                }
            }
        }

        let stats = sample_center_stats(&frame, 5);
        assert_eq!(stats.hue.min, 110);
        assert_eq!(stats.hue.max, 110);
        assert_eq!(stats.value.median, 90);

        let band = stats.suggest_band();
        assert_eq!(band, ColorBand::new([110, 200, 90], [110, 200, 90]));
    }

    #[test]
    fn test_disc_clipped_at_border() {
        let frame = HsvFrame::from_pixel(4, 4, Rgb([50, 60, 70]));
        let stats = sample_disc_stats(&frame, (0, 0), 10);
        assert_eq!(stats.saturation.count, 16);
    }
}
