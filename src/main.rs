use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Instant};

use body_tracker_rs::config::AppConfig;
use body_tracker_rs::live_status::{LiveStatus, TrackerSnapshot};
use body_tracker_rs::sensors::{self, SimulatedImu, TrackerPacket};
use body_tracker_rs::skeleton::SkeletonConfigValue;
use body_tracker_rs::tracker::{
    CalibrationState, ComputedTracker, Device, ImuTracker, ReferenceAdjustedTracker, Tracker,
    TrackerStatus,
};
use body_tracker_rs::types::{to_angles, wrap_angle};

#[derive(Parser, Debug)]
#[command(name = "body_tracker")]
#[command(about = "Simulated IMU session driving reference-adjusted trackers", long_about = None)]
struct Args {
    /// Duration in seconds (0 = continuous)
    #[arg(long, default_value = "0")]
    duration: u64,

    /// Config file (JSON)
    #[arg(long, default_value = "body_tracker.json")]
    config: PathBuf,

    /// Number of simulated IMU trackers
    #[arg(long, default_value = "3")]
    trackers: u32,

    /// Heading drift of each simulated IMU
    #[arg(long, default_value = "0.2")]
    drift_deg_per_sec: f64,

    /// Seconds between yaw resets, overrides the config value
    #[arg(long)]
    yaw_reset_interval: Option<f64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output directory for live status snapshots
    #[arg(long, default_value = "body_tracker_sessions")]
    output_dir: PathBuf,

    /// Write tracker and skeleton settings back to the config file on exit
    #[arg(long)]
    save_config: bool,
}

type AdjustedImu = ReferenceAdjustedTracker<ImuTracker>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(interval_secs) = args.yaw_reset_interval {
        config.yaw_reset_interval_secs = interval_secs;
    }
    // CLI overrides go through the same checks as the file
    config.validate()?;

    log::info!("Body Tracker starting");
    log::info!("  Duration: {} seconds (0=continuous)", args.duration);
    log::info!("  Trackers: {}", args.trackers);
    log::info!("  Tick rate: {} Hz", config.tick_rate_hz);
    log::info!("  Yaw reset interval: {} s", config.yaw_reset_interval_secs);

    let skeleton = config.skeleton_config();
    log::info!(
        "  Skeleton: chest {:.2} m, waist {:.2} m, upper leg {:.2} m",
        skeleton.value(SkeletonConfigValue::Chest),
        skeleton.value(SkeletonConfigValue::Waist),
        skeleton.value(SkeletonConfigValue::LeftUpperLeg),
    );

    std::fs::create_dir_all(&args.output_dir)?;

    // HMD stands in for the headset driver and supplies the reset reference
    let mut hmd = ComputedTracker::new("HMD", true, true);
    hmd.set_status(TrackerStatus::Ok);
    if let Some(hmd_config) = config.tracker_config("HMD") {
        hmd.load_config(hmd_config);
    }

    // One adjusted IMU per slot, restoring saved settings by name
    let mut trackers: Vec<AdjustedImu> = (0..args.trackers)
        .map(|num| {
            let name = format!("sim/{}", num);
            let mut imu = ImuTracker::new(num, &name, Some(Device::new(num, "simulated")));
            if let Some(tracker_config) = config.tracker_config(&name) {
                imu.load_config(tracker_config);
            }
            let mut adjusted = ReferenceAdjustedTracker::new(imu);
            adjusted.set_confidence_multiplier(config.confidence_multiplier);
            adjusted
        })
        .collect();

    // Spawn simulated IMU tasks, all feeding one channel
    let (packet_tx, mut packet_rx) = mpsc::channel::<TrackerPacket>(256);
    let _imu_handles: Vec<_> = (0..args.trackers)
        .map(|num| {
            let imu = SimulatedImu::new(num, args.drift_deg_per_sec);
            tokio::spawn(sensors::orientation_loop(packet_tx.clone(), imu, config.tick_rate_hz))
        })
        .collect();
    drop(packet_tx); // Drop original sender so the channel closes with the tasks

    let mut status = LiveStatus::new();
    let start = Instant::now();
    let mut last_yaw_reset = Instant::now();
    let mut last_report = Instant::now();
    let mut ticker = interval(sensors::tick_period(config.tick_rate_hz));

    log::info!("Waiting for tracker data...");

    loop {
        ticker.tick().await;
        let elapsed = start.elapsed();

        if args.duration > 0 && elapsed.as_secs() >= args.duration {
            log::info!("Duration reached, stopping...");
            break;
        }

        // Drain packets that arrived since the last tick
        while let Ok(packet) = packet_rx.try_recv() {
            match trackers.get_mut(packet.tracker_num as usize) {
                Some(tracker) => tracker.tracker_mut().data_received(packet.sample),
                None => log::warn!("Packet for unknown tracker {}", packet.tracker_num),
            }
        }

        // Latch the newest sample of every tracker
        hmd.set_rotation(sensors::hmd_rotation_at(elapsed.as_secs_f64()));
        for tracker in trackers.iter_mut() {
            tracker.tick();
        }
        status.ticks += 1;

        let Some(reference) = hmd.rotation() else {
            continue;
        };

        // Full reset once every tracker has data, then periodic yaw resets
        let all_reporting = trackers.iter().all(|t| t.rotation().is_some());
        let uncalibrated = trackers
            .iter()
            .any(|t| t.calibration_state() == CalibrationState::Uncalibrated);
        if all_reporting && uncalibrated {
            for tracker in trackers.iter_mut() {
                tracker.reset_full(&reference);
            }
            status.full_resets += 1;
            last_yaw_reset = Instant::now();
            log::info!("Full reset against HMD yaw {:.1}°", to_angles(&reference).yaw.to_degrees());
        } else if config.yaw_reset_interval_secs > 0.0
            && last_yaw_reset.elapsed().as_secs_f64() >= config.yaw_reset_interval_secs
        {
            for tracker in trackers.iter_mut() {
                tracker.reset_yaw(&reference);
            }
            status.yaw_resets += 1;
            last_yaw_reset = Instant::now();
            log::info!("Yaw reset against HMD yaw {:.1}°", to_angles(&reference).yaw.to_degrees());
        }

        // Per-second report and status file
        if last_report.elapsed() >= Duration::from_secs(1) {
            let hmd_yaw = to_angles(&reference).yaw;
            for tracker in trackers.iter().filter(|t| !t.tracker().is_hidden()) {
                if let Some(rotation) = tracker.rotation() {
                    let error = wrap_angle(to_angles(&rotation).yaw - hmd_yaw);
                    log::info!(
                        "[{}] yaw error {:+.2}° confidence {:.2}",
                        tracker.name(),
                        error.to_degrees(),
                        tracker.confidence_level()
                    );
                }
            }

            let live_path = args.output_dir.join("live_status.json");
            write_status(&mut status, &trackers, elapsed.as_secs(), &live_path);
            last_report = Instant::now();
        }
    }

    let final_path = args
        .output_dir
        .join(format!("live_status_{}_final.json", ts_now_clean()));
    write_status(&mut status, &trackers, start.elapsed().as_secs(), &final_path);
    log::info!(
        "Final status: {} ticks, {} full resets, {} yaw resets -> {}",
        status.ticks,
        status.full_resets,
        status.yaw_resets,
        final_path.display()
    );

    // Persist tracker settings and body measurements
    if args.save_config {
        for tracker in &trackers {
            tracker.save_config(config.tracker_config_mut(&tracker.tracker().name()));
        }
        config.set_skeleton_config(&skeleton);
        config
            .save(&args.config)
            .with_context(|| format!("saving {}", args.config.display()))?;
        log::info!("Saved config to {}", args.config.display());
    }

    Ok(())
}

fn write_status(status: &mut LiveStatus, trackers: &[AdjustedImu], uptime: u64, path: &Path) {
    status.timestamp = sensors::current_timestamp();
    status.uptime_seconds = uptime;
    status.trackers = trackers.iter().map(TrackerSnapshot::capture).collect();
    if let Err(e) = status.save(path) {
        log::warn!("Failed to write {}: {}", path.display(), e);
    }
}

fn ts_now_clean() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}
