//! One-shot stereo detection per tick

use super::config::PipelineConfig;
use crate::band::{file::CAMERA_IDS, BandFile, BandHandle, ColorBand};
use crate::blob::{Blob, BlobExtractor};
use crate::segment::ColorSegmenter;
use crate::traits::FrameSource;
use crate::Result;
use anyhow::Context;
use balltrack_core::{ConfigError, Position3D};
use log::{debug, warn};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// What one camera contributed to a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SideOutcome {
    /// The camera returned no frame
    NoFrame,
    /// The frame held no blob passing the filters
    NoBlob,
    /// First discovered blob, and how many blobs were found in total
    Found { blob: Blob, candidates: usize },
}

impl SideOutcome {
    pub fn blob(&self) -> Option<&Blob> {
        match self {
            SideOutcome::Found { blob, .. } => Some(blob),
            _ => None,
        }
    }
}

/// Full result of one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub position: Option<Position3D>,
    pub left: SideOutcome,
    pub right: SideOutcome,
    pub processing_time_ms: u64,
}

struct Camera {
    source: Box<dyn FrameSource>,
    band: BandHandle,
}

/// Locates the ball from a left and a right camera
pub struct StereoTargetPipeline {
    config: PipelineConfig,
    left: Camera,
    right: Camera,
    segmenter: ColorSegmenter,
    extractor: BlobExtractor,
}

impl StereoTargetPipeline {
    /// Create a pipeline; an invalid rig is refused.
    pub fn new(
        config: PipelineConfig,
        left: Box<dyn FrameSource>,
        left_band: ColorBand,
        right: Box<dyn FrameSource>,
        right_band: ColorBand,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        left_band.validate(left.name())?;
        right_band.validate(right.name())?;

        Ok(Self {
            segmenter: ColorSegmenter::new(config.segment.clone()),
            extractor: BlobExtractor::new(config.blob.clone()),
            config,
            left: Camera {
                source: left,
                band: BandHandle::new(left_band),
            },
            right: Camera {
                source: right,
                band: BandHandle::new(right_band),
            },
        })
    }

    /// Create a pipeline taking `camera_0` as left and `camera_1` as right.
    pub fn from_band_file(
        config: PipelineConfig,
        left: Box<dyn FrameSource>,
        right: Box<dyn FrameSource>,
        bands: &BandFile,
    ) -> std::result::Result<Self, ConfigError> {
        let left_band = bands.band(CAMERA_IDS[0])?;
        let right_band = bands.band(CAMERA_IDS[1])?;
        Self::new(config, left, left_band, right, right_band)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Handle for changing a camera's band between ticks.
    pub fn band_handle(&self, side: Side) -> BandHandle {
        match side {
            Side::Left => self.left.band.clone(),
            Side::Right => self.right.band.clone(),
        }
    }

    /// Position of the ball this tick, if both cameras see it.
    pub fn tick(&mut self) -> Option<Position3D> {
        self.tick_report().position
    }

    pub fn tick_report(&mut self) -> TickReport {
        let start_time = Instant::now();

        let segmenter = &self.segmenter;
        let extractor = &self.extractor;
        let left_camera = &mut self.left;
        let right_camera = &mut self.right;

        #[cfg(feature = "parallel")]
        let (left, right) = rayon::join(
            || detect(left_camera, Side::Left, segmenter, extractor),
            || detect(right_camera, Side::Right, segmenter, extractor),
        );

        #[cfg(not(feature = "parallel"))]
        let (left, right) = (
            detect(left_camera, Side::Left, segmenter, extractor),
            detect(right_camera, Side::Right, segmenter, extractor),
        );

        let position = match (left.blob(), right.blob()) {
            (Some(l), Some(r)) => {
                let position = self.config.rig.locate(l.center, r.center);
                if position.is_none() {
                    debug!(
                        "Triangulation degenerate for left {:?} right {:?}",
                        l.center, r.center
                    );
                }
                position
            }
            _ => None,
        };

        TickReport {
            position,
            left,
            right,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    /// Export a tick report in JSON format
    pub fn export_json(&self, report: &TickReport, output_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize tick report")?;

        std::fs::write(output_path, json)
            .with_context(|| format!("Failed to write JSON to: {:?}", output_path))?;

        Ok(())
    }
}

fn detect(
    camera: &mut Camera,
    side: Side,
    segmenter: &ColorSegmenter,
    extractor: &BlobExtractor,
) -> SideOutcome {
    let Some(frame) = camera.source.get_frame() else {
        warn!("{} ({}): failed to get frame", side, camera.source.name());
        return SideOutcome::NoFrame;
    };

    let band = camera.band.snapshot();
    let mask = segmenter.segment(&frame, &band);
    let blobs = extractor.extract(&mask);

    let Some(&blob) = blobs.first() else {
        debug!("{}: no target", side);
        return SideOutcome::NoBlob;
    };

    if blobs.len() > 1 {
        warn!(
            "{} ({}): {} targets found, expected 1; using the first",
            side,
            camera.source.name(),
            blobs.len()
        );
    }

    SideOutcome::Found {
        blob,
        candidates: blobs.len(),
    }
}
