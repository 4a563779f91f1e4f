//! HSV band segmentation with speckle removal

use super::SegmentConfig;
use crate::band::ColorBand;
use crate::{HsvFrame, Mask};
use image::Luma;
use imageproc::distance_transform::Norm;
use imageproc::morphology;

const SET: Luma<u8> = Luma([255]);

/// Turns HSV frames into binary masks of band-matching pixels
#[derive(Debug, Clone, Default)]
pub struct ColorSegmenter {
    config: SegmentConfig,
}

impl ColorSegmenter {
    pub fn new(config: SegmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Mask of pixels accepted by the combine rule, after opening.
    pub fn segment(&self, frame: &HsvFrame, band: &ColorBand) -> Mask {
        let mut mask = Mask::new(frame.width(), frame.height());

        for (out, pixel) in mask.pixels_mut().zip(frame.pixels()) {
            if self.config.combine.accepts(band.channel_matches(pixel.0)) {
                *out = SET;
            }
        }

        if self.config.open_radius == 0 || mask.width() == 0 || mask.height() == 0 {
            return mask;
        }
        morphology::open(&mask, Norm::LInf, self.config.open_radius)
    }

    /// Separate hue, saturation and value masks, for inspecting a band.
    pub fn channel_masks(&self, frame: &HsvFrame, band: &ColorBand) -> [Mask; 3] {
        let mut masks: [Mask; 3] =
            std::array::from_fn(|_| Mask::new(frame.width(), frame.height()));

        for (x, y, pixel) in frame.enumerate_pixels() {
            for (mask, matched) in masks.iter_mut().zip(band.channel_matches(pixel.0)) {
                if matched {
                    mask.put_pixel(x, y, SET);
                }
            }
        }

        masks
    }
}
