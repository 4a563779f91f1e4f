//! Image loading and HSV conversion
//!
//! Hue is stored halved (0..180) so it fits a byte; saturation and value use
//! the full 0..=255 range.

use crate::{HsvFrame, Mask, Result};
use anyhow::Context;
use image::{Rgb, RgbImage};
use palette::{FromColor, Hsv, RgbHue, Srgb};
use std::path::Path;

/// Image utility functions
pub struct ImageUtils;

impl ImageUtils {
    /// Load an image file and convert it to an HSV frame
    pub fn load_hsv<P: AsRef<Path>>(path: P) -> Result<HsvFrame> {
        let rgb = image::open(&path)
            .with_context(|| format!("Failed to open image: {:?}", path.as_ref()))?
            .to_rgb8();

        Ok(Self::rgb_to_hsv(&rgb))
    }

    /// Save an HSV frame as an ordinary RGB image
    pub fn save_hsv<P: AsRef<Path>>(frame: &HsvFrame, path: P) -> Result<()> {
        Self::hsv_to_rgb(frame)
            .save(&path)
            .with_context(|| format!("Failed to save image: {:?}", path.as_ref()))
    }

    /// Save a mask as a grayscale image
    pub fn save_mask<P: AsRef<Path>>(mask: &Mask, path: P) -> Result<()> {
        mask.save(&path)
            .with_context(|| format!("Failed to save mask: {:?}", path.as_ref()))
    }

    pub fn rgb_to_hsv(rgb: &RgbImage) -> HsvFrame {
        let mut hsv = HsvFrame::new(rgb.width(), rgb.height());
        for (out, pixel) in hsv.pixels_mut().zip(rgb.pixels()) {
            *out = Rgb(rgb_pixel_to_hsv(pixel.0));
        }
        hsv
    }

    pub fn hsv_to_rgb(hsv: &HsvFrame) -> RgbImage {
        let mut rgb = RgbImage::new(hsv.width(), hsv.height());
        for (out, pixel) in rgb.pixels_mut().zip(hsv.pixels()) {
            *out = Rgb(hsv_pixel_to_rgb(pixel.0));
        }
        rgb
    }
}

/// Convert one RGB pixel to HSV with hue in 0..180
pub fn rgb_pixel_to_hsv([r, g, b]: [u8; 3]) -> [u8; 3] {
    let hsv: Hsv = Hsv::from_color(Srgb::new(r, g, b).into_format::<f32>());

    // 359.x halves and rounds to 180, which is the same angle as 0
    let hue = (hsv.hue.to_positive_degrees() / 2.0).round() as u16 % 180;
    [
        hue as u8,
        (hsv.saturation * 255.0).round() as u8,
        (hsv.value * 255.0).round() as u8,
    ]
}

/// Convert one HSV pixel (hue 0..180) back to RGB
pub fn hsv_pixel_to_rgb([h, s, v]: [u8; 3]) -> [u8; 3] {
    let hsv: Hsv = Hsv::new(
        RgbHue::from_degrees(h as f32 * 2.0),
        s as f32 / 255.0,
        v as f32 / 255.0,
    );
    let rgb: Srgb = Srgb::from_color(hsv);
    let rgb: Srgb<u8> = rgb.into_format();
    [rgb.red, rgb.green, rgb.blue]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colors() {
        assert_eq!(rgb_pixel_to_hsv([255, 0, 0]), [0, 255, 255]);
        assert_eq!(rgb_pixel_to_hsv([0, 255, 0]), [60, 255, 255]);
        assert_eq!(rgb_pixel_to_hsv([0, 0, 255]), [120, 255, 255]);
        assert_eq!(rgb_pixel_to_hsv([0, 0, 0]), [0, 0, 0]);
        assert_eq!(rgb_pixel_to_hsv([128, 128, 128]), [0, 0, 128]);
    }

    #[test]
    fn test_hsv_back_to_rgb() {
        for rgb in [[255, 0, 0], [0, 255, 0], [0, 0, 255], [10, 40, 200], [200, 180, 20]] {
            let back = hsv_pixel_to_rgb(rgb_pixel_to_hsv(rgb));
            for (a, b) in rgb.iter().zip(back.iter()) {
                assert!((*a as i32 - *b as i32).abs() <= 5, "{:?} -> {:?}", rgb, back);
            }
        }
    }

    #[test]
    fn test_load_and_save() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("blue.png");
        RgbImage::from_pixel(4, 3, Rgb([0, 0, 255])).save(&path)?;

        let frame = ImageUtils::load_hsv(&path)?;
        assert_eq!(frame.dimensions(), (4, 3));
        assert_eq!(frame.get_pixel(0, 0).0, [120, 255, 255]);

        ImageUtils::save_hsv(&frame, dir.path().join("copy.png"))?;
        ImageUtils::save_mask(&Mask::new(4, 3), dir.path().join("mask.png"))?;
        Ok(())
    }
}
