//! Pixel to boresight angle projection

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Angular offset from a camera boresight, in degrees.
///
/// Positive yaw is to the right of the boresight, positive pitch is below it
/// (image rows grow downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngularOffset {
    pub yaw: f64,
    pub pitch: f64,
}

impl AngularOffset {
    pub fn new(yaw: f64, pitch: f64) -> Self {
        Self { yaw, pitch }
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite()
    }
}

impl Add for AngularOffset {
    type Output = AngularOffset;

    fn add(self, rhs: AngularOffset) -> AngularOffset {
        AngularOffset::new(self.yaw + rhs.yaw, self.pitch + rhs.pitch)
    }
}

/// Fixed optical constants of one camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraGeometry {
    /// Horizontal field of view in degrees
    pub horizontal_fov: f64,
    /// Vertical field of view in degrees
    pub vertical_fov: f64,
    pub width: u32,
    pub height: u32,
    /// Rotation of the boresight relative to the baseline normal
    pub mount: AngularOffset,
}

impl CameraGeometry {
    pub const PICAM_HORIZONTAL_FOV: f64 = 55.281_689_77;
    pub const PICAM_VERTICAL_FOV: f64 = 32.827_697_98;

    /// Create a validated geometry.
    pub fn new(
        camera: &str,
        horizontal_fov: f64,
        vertical_fov: f64,
        width: u32,
        height: u32,
        mount: AngularOffset,
    ) -> Result<Self, ConfigError> {
        let geometry = Self {
            horizontal_fov,
            vertical_fov,
            width,
            height,
            mount,
        };
        geometry.validate(camera)?;
        Ok(geometry)
    }

    /// Pi camera module in 640x480 video mode.
    pub fn picam_640x480(mount: AngularOffset) -> Self {
        Self {
            horizontal_fov: Self::PICAM_HORIZONTAL_FOV,
            vertical_fov: Self::PICAM_VERTICAL_FOV,
            width: 640,
            height: 480,
            mount,
        }
    }

    /// Reject geometries that would make every projection meaningless.
    pub fn validate(&self, camera: &str) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Resolution {
                camera: camera.to_string(),
                width: self.width,
                height: self.height,
            });
        }

        let fov_ok = |fov: f64| fov.is_finite() && fov > 0.0 && fov < 180.0;
        if !fov_ok(self.horizontal_fov) || !fov_ok(self.vertical_fov) {
            return Err(ConfigError::FieldOfView {
                camera: camera.to_string(),
                horizontal: self.horizontal_fov,
                vertical: self.vertical_fov,
            });
        }

        if !self.mount.is_finite() {
            return Err(ConfigError::MountOffset {
                camera: camera.to_string(),
                yaw: self.mount.yaw,
                pitch: self.mount.pitch,
            });
        }

        Ok(())
    }

    /// Map a pixel position linearly across the field of view.
    ///
    /// The frame center maps to (0, 0); no lens distortion is modelled.
    pub fn project(&self, x: f64, y: f64) -> AngularOffset {
        let yaw = self.horizontal_fov * (x / self.width as f64) - self.horizontal_fov / 2.0;
        let pitch = self.vertical_fov * (y / self.height as f64) - self.vertical_fov / 2.0;
        AngularOffset::new(yaw, pitch)
    }

    /// Projection plus the fixed mount rotation.
    pub fn project_mounted(&self, x: f64, y: f64) -> AngularOffset {
        self.project(x, y) + self.mount
    }
}

impl Default for CameraGeometry {
    fn default() -> Self {
        Self::picam_640x480(AngularOffset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_center_projects_to_boresight() {
        for (w, h, hf, vf) in [(640, 480, 55.28, 32.83), (1920, 1080, 62.0, 48.8), (7, 3, 10.0, 5.0)] {
            let geometry = CameraGeometry::new("cam", hf, vf, w, h, AngularOffset::default()).unwrap();
            let angle = geometry.project(w as f64 / 2.0, h as f64 / 2.0);
            assert_abs_diff_eq!(angle.yaw, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(angle.pitch, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_edges_project_to_half_fov() {
        let geometry = CameraGeometry::picam_640x480(AngularOffset::default());
        let half = CameraGeometry::PICAM_HORIZONTAL_FOV / 2.0;

        assert_abs_diff_eq!(geometry.project(0.0, 240.0).yaw, -half, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.project(640.0, 240.0).yaw, half, epsilon = 1e-12);
        assert_abs_diff_eq!(
            geometry.project(320.0, 0.0).pitch,
            -CameraGeometry::PICAM_VERTICAL_FOV / 2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_mount_offset_is_added() {
        let geometry = CameraGeometry::picam_640x480(AngularOffset::new(10.8, 10.0));
        let angle = geometry.project_mounted(320.0, 240.0);
        assert_abs_diff_eq!(angle.yaw, 10.8, epsilon = 1e-12);
        assert_abs_diff_eq!(angle.pitch, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let mount = AngularOffset::default();
        assert!(matches!(
            CameraGeometry::new("cam", 55.0, 32.0, 0, 480, mount),
            Err(ConfigError::Resolution { .. })
        ));
        assert!(matches!(
            CameraGeometry::new("cam", -1.0, 32.0, 640, 480, mount),
            Err(ConfigError::FieldOfView { .. })
        ));
        assert!(matches!(
            CameraGeometry::new("cam", 55.0, f64::NAN, 640, 480, mount),
            Err(ConfigError::FieldOfView { .. })
        ));
        assert!(matches!(
            CameraGeometry::new("cam", 55.0, 32.0, 640, 480, AngularOffset::new(f64::INFINITY, 0.0)),
            Err(ConfigError::MountOffset { .. })
        ));
    }
}
