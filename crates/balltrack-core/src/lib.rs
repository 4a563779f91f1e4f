//! Balltrack core geometry
//!
//! Camera angle projection and two-camera triangulation, free of any image
//! handling.

pub mod error;
pub mod geometry;
pub mod triangulation;

pub use error::ConfigError;
pub use geometry::{AngularOffset, CameraGeometry};
pub use triangulation::{triangulate, Position3D, StereoRig};
