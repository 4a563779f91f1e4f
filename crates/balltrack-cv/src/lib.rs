//! Balltrack Computer Vision Library
//!
//! Color-band segmentation, blob extraction and the stereo pipeline that turns
//! two HSV camera streams into 3D ball positions.

pub mod band;
pub mod blob;
pub mod calibrate;
pub mod pipeline;
pub mod segment;
pub mod source;
pub mod utils;

// Re-export commonly used types
pub use band::{BandFile, BandHandle, ColorBand};
pub use blob::{Blob, BlobCollection, BlobConfig, BlobExtractor};
pub use pipeline::{PipelineConfig, SideOutcome, StereoTargetPipeline, TickReport};
pub use segment::{ColorSegmenter, CombineRule, SegmentConfig};
pub use source::{ImageDirSource, ReplaySource};

/// A frame whose three channels hold hue (0..180), saturation and value.
pub type HsvFrame = image::RgbImage;

/// Binary image: 255 where the pixel matched the band, 0 elsewhere.
pub type Mask = image::GrayImage;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Core traits for the CV system
pub mod traits {
    use super::*;

    /// A camera that hands out oriented, HSV-converted frames.
    ///
    /// Implementations must bound their own wait; any acquisition failure is
    /// reported as `None`.
    pub trait FrameSource: Send {
        fn get_frame(&mut self) -> Option<HsvFrame>;

        fn name(&self) -> &str {
            "camera"
        }
    }
}
