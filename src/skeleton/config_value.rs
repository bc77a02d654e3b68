//! Configurable body measurements
//!
//! Each [`SkeletonConfigValue`] names one measurement, its persisted config
//! key, default length in meters and the bones it moves. The table is fixed
//! at compile time; the lookup maps are built once on first use.

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::bone::BoneType;

pub const CONFIG_PREFIX: &str = "body.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkeletonConfigValue {
    Head,
    Neck,
    Chest,
    Waist,
    Hip,
    HipOffset,
    HipsWidth,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    FootLength,
    FootShift,
    SkeletonOffset,
    ControllerZ,
    ControllerY,
    LowerArm,
    ShouldersDistance,
    ShouldersWidth,
    UpperArm,
    ElbowOffset,
}

/// Static description of one measurement
#[derive(Debug)]
pub struct ConfigEntry {
    pub id: u32,
    pub name: &'static str,
    pub config_key: &'static str,
    pub label: &'static str,
    pub default_value: f32,
    pub affected_bones: &'static [BoneType],
}

use super::bone::BoneType as B;

// Indexed by `SkeletonConfigValue as usize`. Keys keep their historical
// spelling so existing config files still load. Skeleton offset differs from
// the historical table, which listed the right knee tracker twice: its sixth
// bone is the right foot tracker.
static ENTRIES: [ConfigEntry; 21] = [
    ConfigEntry {
        id: 1,
        name: "Head",
        config_key: "body.headShift",
        label: "Head shift",
        default_value: 0.1,
        affected_bones: &[B::Head],
    },
    ConfigEntry {
        id: 2,
        name: "Neck",
        config_key: "body.neckLength",
        label: "Neck length",
        default_value: 0.1,
        affected_bones: &[B::Neck],
    },
    ConfigEntry {
        id: 3,
        name: "Chest",
        config_key: "body.chestLength",
        label: "Chest length",
        default_value: 0.32,
        affected_bones: &[B::Chest],
    },
    ConfigEntry {
        id: 4,
        name: "Waist",
        config_key: "body.waistLength",
        label: "Waist length",
        default_value: 0.2,
        affected_bones: &[B::Waist],
    },
    ConfigEntry {
        id: 5,
        name: "Hip",
        config_key: "body.hipLength",
        label: "Hip length",
        default_value: 0.04,
        affected_bones: &[B::Hip],
    },
    ConfigEntry {
        id: 6,
        name: "Hip offset",
        config_key: "body.hipOffset",
        label: "Hip offset",
        default_value: 0.0,
        affected_bones: &[B::HipTracker],
    },
    ConfigEntry {
        id: 7,
        name: "Hips width",
        config_key: "body.hipsWidth",
        label: "Hips width",
        default_value: 0.26,
        affected_bones: &[B::LeftHip, B::RightHip],
    },
    ConfigEntry {
        id: 8,
        name: "Left upper leg length",
        config_key: "body.leftUpperLegLength",
        label: "Left upper leg length",
        default_value: 0.42,
        affected_bones: &[B::LeftUpperLeg],
    },
    ConfigEntry {
        id: 9,
        name: "Right upper leg length",
        config_key: "body.rightUpperLegLength",
        label: "Right upper leg length",
        default_value: 0.42,
        affected_bones: &[B::RightUpperLeg],
    },
    ConfigEntry {
        id: 10,
        name: "Left lower leg length",
        config_key: "body.leftLowerLegLength",
        label: "Left lower leg length",
        default_value: 0.50,
        affected_bones: &[B::LeftLowerLeg],
    },
    ConfigEntry {
        id: 11,
        name: "Right lower leg length",
        config_key: "body.rightLowerLegLength",
        label: "Right lower leg length",
        default_value: 0.50,
        affected_bones: &[B::RightLowerLeg],
    },
    ConfigEntry {
        id: 12,
        name: "Foot length",
        config_key: "body.footLength",
        label: "Foot length",
        default_value: 0.05,
        affected_bones: &[B::LeftFoot, B::RightFoot],
    },
    ConfigEntry {
        id: 13,
        name: "Foot shift",
        config_key: "body.footShift",
        label: "Foot shift",
        default_value: -0.05,
        affected_bones: &[B::LeftLowerLeg, B::RightLowerLeg],
    },
    ConfigEntry {
        id: 14,
        name: "Skeleton offset",
        config_key: "body.skeletonOffset",
        label: "Skeleton offset",
        default_value: 0.0,
        affected_bones: &[
            B::ChestTracker,
            B::HipTracker,
            B::LeftKneeTracker,
            B::RightKneeTracker,
            B::LeftFootTracker,
            B::RightFootTracker,
        ],
    },
    ConfigEntry {
        id: 15,
        name: "Controller distance z",
        config_key: "body.controllerDistanceZ",
        label: "Controller distance z",
        default_value: 0.13,
        affected_bones: &[B::LeftController, B::RightController, B::LeftHand, B::RightHand],
    },
    ConfigEntry {
        id: 16,
        name: "Controller distance y",
        config_key: "body.controllerDistanceY",
        label: "Controller distance y",
        default_value: 0.035,
        affected_bones: &[B::LeftController, B::RightController, B::LeftHand, B::RightHand],
    },
    ConfigEntry {
        id: 17,
        name: "Lower arm length",
        config_key: "body.lowerArmLength",
        label: "Lower arm length",
        default_value: 0.25,
        affected_bones: &[B::LeftLowerArm, B::RightLowerArm],
    },
    ConfigEntry {
        id: 18,
        name: "Shoulders distance",
        config_key: "body.shoulersDistance",
        label: "Shoulders distance",
        default_value: 0.08,
        affected_bones: &[B::LeftShoulder, B::RightShoulder],
    },
    ConfigEntry {
        id: 19,
        name: "Shoulders width",
        config_key: "body.shoulersWidth",
        label: "Shoulders width",
        default_value: 0.36,
        affected_bones: &[B::LeftShoulder, B::RightShoulder],
    },
    ConfigEntry {
        id: 20,
        name: "Upper arm length",
        config_key: "body.upperArmLength",
        label: "Upper arm length",
        default_value: 0.25,
        affected_bones: &[B::LeftUpperArm, B::RightUpperArm],
    },
    ConfigEntry {
        id: 21,
        name: "Elbow offset",
        config_key: "body.elbowOffset",
        label: "Elbow offset",
        default_value: 0.0,
        affected_bones: &[B::LeftElbowTracker, B::RightElbowTracker],
    },
];

lazy_static! {
    static ref BY_ID: HashMap<u32, SkeletonConfigValue> = SkeletonConfigValue::ALL
        .iter()
        .map(|v| (v.id(), *v))
        .collect();
    static ref BY_NAME: HashMap<String, SkeletonConfigValue> = SkeletonConfigValue::ALL
        .iter()
        .map(|v| (v.name().to_lowercase(), *v))
        .collect();
    static ref BY_CONFIG_KEY: HashMap<&'static str, SkeletonConfigValue> = SkeletonConfigValue::ALL
        .iter()
        .map(|v| (v.config_key(), *v))
        .collect();
}

impl SkeletonConfigValue {
    pub const ALL: [SkeletonConfigValue; 21] = [
        SkeletonConfigValue::Head,
        SkeletonConfigValue::Neck,
        SkeletonConfigValue::Chest,
        SkeletonConfigValue::Waist,
        SkeletonConfigValue::Hip,
        SkeletonConfigValue::HipOffset,
        SkeletonConfigValue::HipsWidth,
        SkeletonConfigValue::LeftUpperLeg,
        SkeletonConfigValue::RightUpperLeg,
        SkeletonConfigValue::LeftLowerLeg,
        SkeletonConfigValue::RightLowerLeg,
        SkeletonConfigValue::FootLength,
        SkeletonConfigValue::FootShift,
        SkeletonConfigValue::SkeletonOffset,
        SkeletonConfigValue::ControllerZ,
        SkeletonConfigValue::ControllerY,
        SkeletonConfigValue::LowerArm,
        SkeletonConfigValue::ShouldersDistance,
        SkeletonConfigValue::ShouldersWidth,
        SkeletonConfigValue::UpperArm,
        SkeletonConfigValue::ElbowOffset,
    ];

    pub fn entry(self) -> &'static ConfigEntry {
        &ENTRIES[self as usize]
    }

    pub fn id(self) -> u32 {
        self.entry().id
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn config_key(self) -> &'static str {
        self.entry().config_key
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn default_value(self) -> f32 {
        self.entry().default_value
    }

    pub fn affected_bones(self) -> &'static [BoneType] {
        self.entry().affected_bones
    }

    pub fn by_id(id: u32) -> Option<Self> {
        BY_ID.get(&id).copied()
    }

    /// Case-insensitive lookup by display name
    pub fn by_name(name: &str) -> Option<Self> {
        BY_NAME.get(&name.to_lowercase()).copied()
    }

    pub fn by_config_key(key: &str) -> Option<Self> {
        BY_CONFIG_KEY.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_matches_enum_order() {
        for (idx, value) in SkeletonConfigValue::ALL.iter().enumerate() {
            assert_eq!(*value as usize, idx);
            assert_eq!(value.id() as usize, idx + 1);
        }
    }

    #[test]
    fn test_ids_names_and_keys_are_unique() {
        let ids: HashSet<_> = SkeletonConfigValue::ALL.iter().map(|v| v.id()).collect();
        let names: HashSet<_> = SkeletonConfigValue::ALL
            .iter()
            .map(|v| v.name().to_lowercase())
            .collect();
        let keys: HashSet<_> = SkeletonConfigValue::ALL.iter().map(|v| v.config_key()).collect();
        assert_eq!(ids.len(), 21);
        assert_eq!(names.len(), 21);
        assert_eq!(keys.len(), 21);
    }

    #[test]
    fn test_config_keys_are_prefixed() {
        for value in SkeletonConfigValue::ALL {
            assert!(value.config_key().starts_with(CONFIG_PREFIX));
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let value = SkeletonConfigValue::by_id(7).unwrap();
        assert_eq!(value, SkeletonConfigValue::HipsWidth);
        assert_eq!(value.default_value(), 0.26);
        assert_eq!(value.affected_bones(), &[BoneType::LeftHip, BoneType::RightHip]);
        assert!(SkeletonConfigValue::by_id(0).is_none());
        assert!(SkeletonConfigValue::by_id(22).is_none());
    }

    #[test]
    fn test_lookup_by_name_ignores_case() {
        assert_eq!(
            SkeletonConfigValue::by_name("LEFT UPPER LEG LENGTH"),
            Some(SkeletonConfigValue::LeftUpperLeg)
        );
        assert_eq!(
            SkeletonConfigValue::by_name("foot shift"),
            Some(SkeletonConfigValue::FootShift)
        );
        assert!(SkeletonConfigValue::by_name("tail length").is_none());
    }

    #[test]
    fn test_lookup_by_config_key() {
        assert_eq!(
            SkeletonConfigValue::by_config_key("body.shoulersWidth"),
            Some(SkeletonConfigValue::ShouldersWidth)
        );
        assert!(SkeletonConfigValue::by_config_key("headShift").is_none());
    }

    #[test]
    fn test_skeleton_offset_moves_every_body_tracker() {
        let bones = SkeletonConfigValue::SkeletonOffset.affected_bones();
        let unique: HashSet<_> = bones.iter().collect();
        assert_eq!(unique.len(), bones.len());
        assert!(bones.contains(&BoneType::RightFootTracker));
    }
}
