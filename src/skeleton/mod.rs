pub mod bone;
pub mod config;
pub mod config_value;

pub use bone::BoneType;
pub use config::SkeletonConfig;
pub use config_value::{ConfigEntry, SkeletonConfigValue, CONFIG_PREFIX};
