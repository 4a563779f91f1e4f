//! Pipeline configuration

use crate::blob::BlobConfig;
use crate::segment::SegmentConfig;
use balltrack_core::{ConfigError, StereoRig};
use serde::{Deserialize, Serialize};

/// Main pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub rig: StereoRig,
    pub segment: SegmentConfig,
    pub blob: BlobConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rig: StereoRig::bench(),
            segment: SegmentConfig::default(),
            blob: BlobConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Strict AND segmentation, as the first deployments ran
    pub fn with_legacy_segmentation() -> Self {
        Self {
            segment: SegmentConfig::legacy(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rig.validate()
    }
}
