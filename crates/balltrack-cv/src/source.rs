//! Frame sources standing in for camera hardware

use crate::traits::FrameSource;
use crate::utils::ImageUtils;
use crate::{HsvFrame, Result};
use anyhow::{bail, Context};
use std::fs;
use std::path::{Path, PathBuf};

pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Replays the images of a directory in file-name order, cycling forever.
///
/// Each call decodes one file; an unreadable file yields `None` for that call.
pub struct ImageDirSource {
    name: String,
    files: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    pub fn new<P: AsRef<Path>>(name: &str, dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read frame directory: {:?}", dir))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(extension) = path.extension() {
                let ext = extension.to_string_lossy().to_lowercase();
                if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                    files.push(path);
                }
            }
        }
        files.sort();

        if files.is_empty() {
            bail!("No frames found in {:?}", dir);
        }

        log::info!("{}: replaying {} frames from {:?}", name, files.len(), dir);
        Ok(Self {
            name: name.to_string(),
            files,
            next: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn get_frame(&mut self) -> Option<HsvFrame> {
        let path = &self.files[self.next];
        self.next = (self.next + 1) % self.files.len();

        match ImageUtils::load_hsv(path) {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn!("{}: failed to get frame: {:#}", self.name, e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory frame sequence; `None` entries simulate acquisition failures.
pub struct ReplaySource {
    name: String,
    frames: Vec<Option<HsvFrame>>,
    next: usize,
}

impl ReplaySource {
    pub fn new(name: &str, frames: Vec<Option<HsvFrame>>) -> Self {
        Self {
            name: name.to_string(),
            frames,
            next: 0,
        }
    }

    /// The same frame on every call
    pub fn constant(name: &str, frame: HsvFrame) -> Self {
        Self::new(name, vec![Some(frame)])
    }
}

impl FrameSource for ReplaySource {
    fn get_frame(&mut self) -> Option<HsvFrame> {
        if self.frames.is_empty() {
            return None;
        }
        let frame = self.frames[self.next].clone();
        self.next = (self.next + 1) % self.frames.len();
        frame
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_dir_source_cycles_in_name_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        RgbImage::from_pixel(2, 2, Rgb([0, 0, 255])).save(dir.path().join("b.png"))?;
        RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])).save(dir.path().join("a.png"))?;
        fs::write(dir.path().join("notes.txt"), "not a frame")?;

        let mut source = ImageDirSource::new("camera_0", dir.path())?;
        assert_eq!(source.len(), 2);
        assert_eq!(source.name(), "camera_0");

        let hues: Vec<u8> = (0..3)
            .map(|_| source.get_frame().map(|f| f.get_pixel(0, 0)[0]))
            .collect::<Option<_>>()
            .unwrap();
        assert_eq!(hues, vec![0, 120, 0]);
        Ok(())
    }

    #[test]
    fn test_dir_source_reports_bad_frame_as_none() -> Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("broken.png"), b"definitely not a png")?;

        let mut source = ImageDirSource::new("camera_1", dir.path())?;
        assert!(source.get_frame().is_none());
        Ok(())
    }

    #[test]
    fn test_dir_source_requires_frames() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(ImageDirSource::new("camera_0", dir.path()).is_err());
        assert!(ImageDirSource::new("camera_0", dir.path().join("missing")).is_err());
        Ok(())
    }

    #[test]
    fn test_replay_source() {
        let frame = HsvFrame::new(1, 1);
        let mut source = ReplaySource::new("left", vec![Some(frame), None]);
        assert!(source.get_frame().is_some());
        assert!(source.get_frame().is_none());
        assert!(source.get_frame().is_some());

        assert!(ReplaySource::new("empty", Vec::new()).get_frame().is_none());
    }
}
