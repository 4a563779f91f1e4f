//! Two-camera triangulation
//!
//! Both cameras sit on the x axis, `separation` apart, looking down +z. The
//! origin is the midpoint of the baseline, y points up. The horizontal fix is
//! the law of sines on the triangle (left camera, right camera, target); the
//! height comes from the mean pitch of both cameras.

use crate::error::ConfigError;
use crate::geometry::{AngularOffset, CameraGeometry};
use serde::{Deserialize, Serialize};

/// `|sin(c)|` below this means the two rays are (nearly) parallel.
pub const DEGENERATE_SIN: f64 = 1e-6;

/// Target position in centimeters relative to the baseline midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Triangulate from mount-corrected angles of the left and right camera.
///
/// Returns `None` when the rays do not intersect in front of the baseline
/// closely enough to be solved (parallel or divergent views), or when any
/// input is non-finite.
pub fn triangulate(left: AngularOffset, right: AngularOffset, separation: f64) -> Option<Position3D> {
    let a = 90.0 - left.yaw;
    let b = 90.0 + right.yaw;
    let c = 180.0 - (a + b);
    let d = (left.pitch + right.pitch) / 2.0;

    let sin_c = c.to_radians().sin();
    if !sin_c.is_finite() || sin_c.abs() < DEGENERATE_SIN {
        return None;
    }

    let r1 = separation * b.to_radians().sin() / sin_c;
    let z = r1 * a.to_radians().sin();
    let x = -(separation / 2.0) + r1 * a.to_radians().cos();
    let y = -z * d.to_radians().tan();

    let position = Position3D::new(x, y, z);
    if position.x.is_finite() && position.y.is_finite() && position.z.is_finite() {
        Some(position)
    } else {
        None
    }
}

/// Both cameras plus the baseline between them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StereoRig {
    /// Distance between the two camera origins in centimeters
    pub separation: f64,
    pub left: CameraGeometry,
    pub right: CameraGeometry,
}

impl StereoRig {
    pub fn new(separation: f64, left: CameraGeometry, right: CameraGeometry) -> Result<Self, ConfigError> {
        let rig = Self {
            separation,
            left,
            right,
        };
        rig.validate()?;
        Ok(rig)
    }

    /// The two-Pi-camera bench rig: 10 cm baseline, cameras toed by
    /// 10.8 / -11.1 degrees and tilted 10 degrees.
    pub fn bench() -> Self {
        Self {
            separation: 10.0,
            left: CameraGeometry::picam_640x480(AngularOffset::new(10.8, 10.0)),
            right: CameraGeometry::picam_640x480(AngularOffset::new(-11.1, 10.0)),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.separation.is_finite() || self.separation <= 0.0 {
            return Err(ConfigError::Separation(self.separation));
        }
        self.left.validate("left")?;
        self.right.validate("right")
    }

    /// Triangulate from raw boresight angles, applying each mount offset.
    pub fn triangulate_raw(&self, left: AngularOffset, right: AngularOffset) -> Option<Position3D> {
        triangulate(left + self.left.mount, right + self.right.mount, self.separation)
    }

    /// Triangulate from pixel centers in the left and right frames.
    pub fn locate(&self, left: (f64, f64), right: (f64, f64)) -> Option<Position3D> {
        self.triangulate_raw(
            self.left.project(left.0, left.1),
            self.right.project(right.0, right.1),
        )
    }
}

impl Default for StereoRig {
    fn default() -> Self {
        Self::bench()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_straight_ahead_of_midpoint() {
        // Symmetric inward view of 45 degrees meets at z = s/2.
        let p = triangulate(AngularOffset::new(45.0, 0.0), AngularOffset::new(-45.0, 0.0), 10.0).unwrap();
        assert_abs_diff_eq!(p.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.z, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.distance(), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_positive_pitch_is_below() {
        let p = triangulate(AngularOffset::new(45.0, 10.0), AngularOffset::new(-45.0, 10.0), 10.0).unwrap();
        assert!(p.y < 0.0);
    }

    #[test]
    fn test_parallel_rays_are_degenerate() {
        assert!(triangulate(AngularOffset::new(0.0, 0.0), AngularOffset::new(0.0, 0.0), 10.0).is_none());
        assert!(triangulate(AngularOffset::new(-20.0, 0.0), AngularOffset::new(-20.0, 0.0), 10.0).is_none());
        assert!(triangulate(AngularOffset::new(f64::NAN, 0.0), AngularOffset::new(-20.0, 0.0), 10.0).is_none());
    }

    #[test]
    fn test_rig_validation() {
        assert!(StereoRig::bench().validate().is_ok());

        let mut rig = StereoRig::bench();
        rig.separation = 0.0;
        assert_eq!(rig.validate(), Err(ConfigError::Separation(0.0)));

        let mut rig = StereoRig::bench();
        rig.right.height = 0;
        assert!(matches!(rig.validate(), Err(ConfigError::Resolution { .. })));
    }
}
