use std::collections::{BTreeMap, HashMap};

use super::bone::BoneType;
use super::config_value::SkeletonConfigValue;
use crate::error::{TrackerError, TrackerResult};

/// Current body measurements; values not set explicitly fall back to the
/// registry default.
#[derive(Clone, Debug, Default)]
pub struct SkeletonConfig {
    values: HashMap<SkeletonConfigValue, f32>,
}

impl SkeletonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, config: SkeletonConfigValue) -> f32 {
        self.values
            .get(&config)
            .copied()
            .unwrap_or_else(|| config.default_value())
    }

    /// Set a measurement, returning the bones the solver has to rebuild
    pub fn set(&mut self, config: SkeletonConfigValue, value: f32) -> &'static [BoneType] {
        self.values.insert(config, value);
        config.affected_bones()
    }

    pub fn set_by_name(&mut self, name: &str, value: f32) -> TrackerResult<&'static [BoneType]> {
        let config = SkeletonConfigValue::by_name(name)
            .ok_or_else(|| TrackerError::UnknownConfigValue(name.to_string()))?;
        Ok(self.set(config, value))
    }

    pub fn reset(&mut self, config: SkeletonConfigValue) -> &'static [BoneType] {
        self.values.remove(&config);
        config.affected_bones()
    }

    pub fn reset_all(&mut self) {
        self.values.clear();
    }

    pub fn is_default(&self, config: SkeletonConfigValue) -> bool {
        !self.values.contains_key(&config)
    }

    /// Every measurement keyed by its persisted config key
    pub fn to_map(&self) -> BTreeMap<String, f32> {
        SkeletonConfigValue::ALL
            .iter()
            .map(|v| (v.config_key().to_string(), self.value(*v)))
            .collect()
    }

    /// Apply persisted values; unknown keys and non-finite values are skipped
    pub fn load_map(&mut self, map: &BTreeMap<String, f32>) {
        for (key, value) in map {
            let Some(config) = SkeletonConfigValue::by_config_key(key) else {
                log::debug!("Ignoring unknown skeleton config key {}", key);
                continue;
            };
            if !value.is_finite() {
                log::warn!("Ignoring non-finite value for {}: {}", key, value);
                continue;
            }
            self.values.insert(config, *value);
        }
    }
}
