use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{TrackerError, TrackerResult};
use crate::sensors::{MAX_TICK_RATE_HZ, MIN_TICK_RATE_HZ};
use crate::skeleton::SkeletonConfig;
use crate::tracker::TrackerConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Processing cycles per second
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: f64,
    /// Seconds between automatic yaw resets (0 = never)
    #[serde(default = "default_yaw_reset_interval_secs")]
    pub yaw_reset_interval_secs: f64,
    /// Applied to every reference-adjusted tracker
    #[serde(default = "default_confidence_multiplier")]
    pub confidence_multiplier: f64,
    #[serde(default)]
    pub trackers: Vec<TrackerConfig>,
    /// Body measurements keyed by `body.*` config key
    #[serde(default)]
    pub skeleton: BTreeMap<String, f32>,
}

fn default_tick_rate_hz() -> f64 { 100.0 }
fn default_yaw_reset_interval_secs() -> f64 { 0.0 }
fn default_confidence_multiplier() -> f64 { 1.0 }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
            yaw_reset_interval_secs: default_yaw_reset_interval_secs(),
            confidence_multiplier: default_confidence_multiplier(),
            trackers: Vec::new(),
            skeleton: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load from JSON; a missing file yields defaults
    pub fn load<P: AsRef<Path>>(path: P) -> TrackerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the processing loop cannot run with
    pub fn validate(&self) -> TrackerResult<()> {
        if !(MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.tick_rate_hz) {
            return Err(TrackerError::InvalidConfig(format!(
                "tick_rate_hz {} outside {}..={} Hz",
                self.tick_rate_hz, MIN_TICK_RATE_HZ, MAX_TICK_RATE_HZ
            )));
        }
        if !self.yaw_reset_interval_secs.is_finite() || self.yaw_reset_interval_secs < 0.0 {
            return Err(TrackerError::InvalidConfig(format!(
                "yaw_reset_interval_secs {} must be finite and non-negative",
                self.yaw_reset_interval_secs
            )));
        }
        if !self.confidence_multiplier.is_finite() {
            return Err(TrackerError::InvalidConfig(format!(
                "confidence_multiplier {} must be finite",
                self.confidence_multiplier
            )));
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> TrackerResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn tracker_config(&self, tracker_name: &str) -> Option<&TrackerConfig> {
        self.trackers.iter().find(|t| t.tracker_name == tracker_name)
    }

    /// Find the entry for `tracker_name`, creating it if needed
    pub fn tracker_config_mut(&mut self, tracker_name: &str) -> &mut TrackerConfig {
        let idx = match self.trackers.iter().position(|t| t.tracker_name == tracker_name) {
            Some(idx) => idx,
            None => {
                self.trackers.push(TrackerConfig::new(tracker_name));
                self.trackers.len() - 1
            }
        };
        &mut self.trackers[idx]
    }

    pub fn skeleton_config(&self) -> SkeletonConfig {
        let mut skeleton = SkeletonConfig::new();
        skeleton.load_map(&self.skeleton);
        skeleton
    }

    pub fn set_skeleton_config(&mut self, skeleton: &SkeletonConfig) {
        self.skeleton = skeleton.to_map();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::SkeletonConfigValue;
    use crate::tracker::TrackerPosition;
    use std::env;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "tick_rate_hz": 50.0 }"#).unwrap();
        assert_eq!(config.tick_rate_hz, 50.0);
        assert_eq!(config.confidence_multiplier, 1.0);
        assert!(config.trackers.is_empty());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = env::temp_dir().join("body_tracker_missing_config.json");
        let _ = fs::remove_file(&path);
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.tick_rate_hz, 100.0);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = env::temp_dir().join("body_tracker_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        let mut config = AppConfig::default();
        config.confidence_multiplier = 0.5;
        config
            .tracker_config_mut("imu/0")
            .set_body_position(Some(TrackerPosition::Chest));
        let mut skeleton = SkeletonConfig::new();
        skeleton.set(SkeletonConfigValue::Chest, 0.35);
        config.set_skeleton_config(&skeleton);
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.confidence_multiplier, 0.5);
        assert_eq!(
            loaded.tracker_config("imu/0").unwrap().body_position().unwrap(),
            Some(TrackerPosition::Chest)
        );
        assert_eq!(loaded.skeleton_config().value(SkeletonConfigValue::Chest), 0.35);
    }

    #[test]
    fn test_tracker_config_mut_reuses_entry() {
        let mut config = AppConfig::default();
        config.tracker_config_mut("imu/1").hide = true;
        config.tracker_config_mut("imu/1").custom_name = Some("Hip".to_string());
        assert_eq!(config.trackers.len(), 1);
        assert!(config.trackers[0].hide);
    }

    #[test]
    fn test_out_of_range_tick_rate_is_rejected() {
        let dir = env::temp_dir().join("body_tracker_tick_rate_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");

        for body in [r#"{ "tick_rate_hz": 1e12 }"#, r#"{ "tick_rate_hz": 0.0 }"#] {
            fs::write(&path, body).unwrap();
            assert!(matches!(
                AppConfig::load(&path),
                Err(crate::error::TrackerError::InvalidConfig(_))
            ));
        }

        fs::write(&path, r#"{ "tick_rate_hz": 10000.0 }"#).unwrap();
        assert_eq!(AppConfig::load(&path).unwrap().tick_rate_hz, 10_000.0);
    }

    #[test]
    fn test_negative_yaw_reset_interval_is_rejected() {
        let mut config = AppConfig::default();
        config.yaw_reset_interval_secs = -1.0;
        assert!(config.validate().is_err());
        config.yaw_reset_interval_secs = 5.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = env::temp_dir().join("body_tracker_bad_config_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(crate::error::TrackerError::Json(_))
        ));
    }
}
