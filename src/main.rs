// src/main.rs
// Entry point for Argus: records navigation metrics for one robot run and
// writes the end-of-run report at shutdown.

use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use argus::ros_interface::{await_initial_pose, PoseLookup, PoseSource, RosInterface};
use argus::{MetricsAggregator, MetricsConfig, ReportGenerator};
use log::{error, info};

/// Cadence of the periodic pose tick (10 Hz).
const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Startup retry budget for the first pose estimate.
const INITIAL_POSE_ATTEMPTS: u32 = 600;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("starting Argus metrics node...");

    // Resolve configuration once; a missing goal is fatal before any
    // processing begins.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "argus.yaml".to_string());
    let config = match MetricsConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("cannot start without a valid configuration: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "goal ({}, {}), report -> {}",
        config.goal.x, config.goal.y, config.output_file
    );

    let mut ros = RosInterface::new("argus_metrics")?;
    let mut pose_source = ros.pose_source(&config)?;

    // Localization may not be up yet; poll with bounded backoff.
    let initial_pose = match await_initial_pose(
        &mut pose_source,
        |interval| ros.spin_once(interval),
        INITIAL_POSE_ATTEMPTS,
        TICK_PERIOD,
    ) {
        Ok(pose) => pose,
        Err(e) => {
            error!("never received an initial pose: {}", e);
            return Err(e.into());
        }
    };
    info!(
        "got initial pose: x = {:.3}, y = {:.3}",
        initial_pose.x, initial_pose.y
    );

    let start_time = Instant::now();
    let aggregator = Arc::new(Mutex::new(MetricsAggregator::new(
        initial_pose,
        &config,
        start_time,
    )));
    ros.subscribe_streams(aggregator.clone(), &config)?;

    // Ctrl-C requests shutdown; the loop finishes its current cycle, then
    // finalize runs exactly once.
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;
    info!("recording; press Ctrl-C to stop and write the report");

    while running.load(Ordering::SeqCst) {
        ros.spin_once(TICK_PERIOD);
        match pose_source.lookup()? {
            PoseLookup::Available(pose) => {
                aggregator.lock().unwrap().tick(pose, Instant::now());
            }
            // Transient: localization dropped out, retry on the next cycle.
            PoseLookup::NotYetAvailable => {}
        }
    }

    info!("stopped, generating report");
    let last_pose = match pose_source.lookup() {
        Ok(PoseLookup::Available(pose)) => Some(pose),
        _ => None,
    };
    let report = aggregator
        .lock()
        .unwrap()
        .finalize(last_pose, Instant::now());

    let generator = ReportGenerator::new(&config.output_file);
    match generator.write(&report) {
        Ok(()) => info!("report exported successfully: {}", config.output_file),
        Err(e) => error!("could not save report: {}", e),
    }

    Ok(())
}
