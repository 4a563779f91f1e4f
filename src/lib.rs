//! Stereo ball tracker: runs the two-camera pipeline and streams positions.

pub mod client;
pub mod config;

pub use client::{ClientConfig, ClientHandle, Message, ShutdownReport};
pub use config::RunConfig;

pub type Result<T> = anyhow::Result<T>;
