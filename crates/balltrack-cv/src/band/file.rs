//! Per-camera band configuration file
//!
//! ```json
//! { "camera_0": { "low_hsv": [80, 155, 65], "upper_hsv": [140, 245, 115] },
//!   "camera_1": { "low_hsv": [80, 155, 65], "upper_hsv": [140, 245, 115] } }
//! ```

use super::ColorBand;
use crate::Result;
use anyhow::Context;
use balltrack_core::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Camera identifiers used as keys in the band file.
pub const CAMERA_IDS: [&str; 2] = ["camera_0", "camera_1"];

/// Bands keyed by camera identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandFile {
    cameras: BTreeMap<String, ColorBand>,
}

impl BandFile {
    pub fn new() -> Self {
        Self {
            cameras: BTreeMap::new(),
        }
    }

    /// Load and validate a band file. Any problem here is fatal for the caller.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read band file: {:?}", path))?;
        let file: BandFile = serde_json::from_str(&text)
            .with_context(|| format!("Malformed band file: {:?}", path))?;

        for (camera, band) in &file.cameras {
            band.validate(camera)?;
        }

        log::info!("Loaded {} camera bands from {:?}", file.cameras.len(), path);
        Ok(file)
    }

    /// Write the file atomically: temp file in the same directory, then rename.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize band file")?;

        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write band file: {:?}", tmp))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("Failed to move band file into place: {:?}", path))?;

        log::info!("Saved {} camera bands to {:?}", self.cameras.len(), path);
        Ok(())
    }

    pub fn band(&self, camera: &str) -> std::result::Result<ColorBand, ConfigError> {
        self.cameras
            .get(camera)
            .copied()
            .ok_or_else(|| ConfigError::MissingCamera(camera.to_string()))
    }

    pub fn set_band(&mut self, camera: &str, band: ColorBand) {
        self.cameras.insert(camera.to_string(), band);
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

impl Default for BandFile {
    fn default() -> Self {
        let mut file = Self::new();
        for camera in CAMERA_IDS {
            file.set_band(camera, ColorBand::default());
        }
        file
    }
}
