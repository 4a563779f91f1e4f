//! Utility modules

pub mod image;

pub use self::image::{hsv_pixel_to_rgb, rgb_pixel_to_hsv, ImageUtils};
