use thiserror::Error;

/// Configuration problems that must stop the process before any frame is
/// processed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{camera}: resolution must be positive, got {width}x{height}")]
    Resolution {
        camera: String,
        width: u32,
        height: u32,
    },

    #[error("{camera}: field of view must be finite and in (0, 180), got {horizontal}x{vertical}")]
    FieldOfView {
        camera: String,
        horizontal: f64,
        vertical: f64,
    },

    #[error("{camera}: mount offset must be finite, got yaw {yaw} pitch {pitch}")]
    MountOffset { camera: String, yaw: f64, pitch: f64 },

    #[error("baseline separation must be finite and positive, got {0}")]
    Separation(f64),

    #[error("{camera}: {channel} bound {value} out of range 0..={max}")]
    BandBound {
        camera: String,
        channel: &'static str,
        value: u16,
        max: u16,
    },

    #[error("band configuration has no entry for {0}")]
    MissingCamera(String),
}
