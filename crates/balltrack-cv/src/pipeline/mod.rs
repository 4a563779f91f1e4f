//! Stereo targeting pipeline

pub mod config;
pub mod stereo;

pub use config::PipelineConfig;
pub use stereo::{Side, SideOutcome, StereoTargetPipeline, TickReport};
