use anyhow::Context;
use balltrack::client::{self, ClientHandle};
use balltrack::{Result, RunConfig};
use balltrack_cv::{BandFile, ImageDirSource, StereoTargetPipeline};
use log::{error, info, warn};
use std::thread;
use std::time::Duration;

fn main() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&filters)
        .init();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::load(&path)?,
        None => {
            info!("No run config given, using defaults");
            RunConfig::default()
        }
    };

    let bands = BandFile::load(&config.band_file)
        .with_context(|| format!("Could not load bands from {:?}", config.band_file))?;

    let left = ImageDirSource::new("camera_0", &config.left_frames)?;
    let right = ImageDirSource::new("camera_1", &config.right_frames)?;
    info!(
        "Replaying {} left and {} right frames",
        left.len(),
        right.len()
    );

    let pipeline = StereoTargetPipeline::from_band_file(
        config.pipeline.clone(),
        Box::new(left),
        Box::new(right),
        &bands,
    )?;

    let transport = client::connect(&config.client)?;
    let handle = client::start(pipeline, transport, &config.client)?;
    monitor(&handle);

    let report = handle.shutdown();
    if !report.timed_out.is_empty() {
        warn!("Threads still running at exit: {:?}", report.timed_out);
    }
    info!(
        "Done: {} ticks, {} positions sent",
        report.ticks.unwrap_or_default(),
        report.messages_sent.unwrap_or_default()
    );
    Ok(())
}

/// Block until the producer stops. A lost connection is reported once; the
/// pipeline keeps ticking without delivering.
fn monitor(handle: &ClientHandle) {
    let mut reported = false;
    while !handle.producer_finished() {
        if !reported && handle.transport_closed() {
            warn!("Connection lost; positions are no longer delivered, tracking continues");
            reported = true;
        }
        thread::sleep(Duration::from_millis(50));
    }
}
