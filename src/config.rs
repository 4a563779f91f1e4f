//! Run configuration for the tracker binary

use crate::client::ClientConfig;
use crate::Result;
use anyhow::Context;
use balltrack_cv::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub pipeline: PipelineConfig,
    /// Band file keyed by `camera_0` and `camera_1`
    pub band_file: PathBuf,
    /// Frame directory replayed as the left camera
    pub left_frames: PathBuf,
    /// Frame directory replayed as the right camera
    pub right_frames: PathBuf,
    pub client: ClientConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            band_file: PathBuf::from("bands.json"),
            left_frames: PathBuf::from("frames/camera_0"),
            right_frames: PathBuf::from("frames/camera_1"),
            client: ClientConfig::default(),
        }
    }
}

impl RunConfig {
    /// Load and validate a JSON run configuration; missing keys take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read run config: {:?}", path))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse run config: {:?}", path))?;
        config.validate()?;

        log::info!("Loaded run config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        anyhow::ensure!(self.client.port != 0, "Client port must be non-zero");
        anyhow::ensure!(
            self.client.queue_capacity > 0,
            "Client queue capacity must be positive"
        );
        Ok(())
    }
}
