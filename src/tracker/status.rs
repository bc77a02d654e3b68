use serde::{Deserialize, Serialize};

use crate::error::{TrackerError, TrackerResult};

/// Connection state reported by a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TrackerStatus {
    #[default]
    Disconnected,
    Ok,
    Busy,
    Error,
    Occluded,
}

impl TrackerStatus {
    /// Whether a tracker in this state still produces readings
    pub fn sends_data(self) -> bool {
        matches!(self, TrackerStatus::Ok | TrackerStatus::Busy | TrackerStatus::Occluded)
    }
}

/// Body location a tracker is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackerPosition {
    Hmd,
    Chest,
    Waist,
    Hip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
    LeftFoot,
    RightFoot,
    LeftController,
    RightController,
    LeftElbow,
    RightElbow,
}

impl TrackerPosition {
    pub const ALL: [TrackerPosition; 14] = [
        TrackerPosition::Hmd,
        TrackerPosition::Chest,
        TrackerPosition::Waist,
        TrackerPosition::Hip,
        TrackerPosition::LeftKnee,
        TrackerPosition::RightKnee,
        TrackerPosition::LeftAnkle,
        TrackerPosition::RightAnkle,
        TrackerPosition::LeftFoot,
        TrackerPosition::RightFoot,
        TrackerPosition::LeftController,
        TrackerPosition::RightController,
        TrackerPosition::LeftElbow,
        TrackerPosition::RightElbow,
    ];

    /// Designation string used in persisted tracker config
    pub fn designation(self) -> &'static str {
        match self {
            TrackerPosition::Hmd => "HMD",
            TrackerPosition::Chest => "body:chest",
            TrackerPosition::Waist => "body:waist",
            TrackerPosition::Hip => "body:hip",
            TrackerPosition::LeftKnee => "body:left_knee",
            TrackerPosition::RightKnee => "body:right_knee",
            TrackerPosition::LeftAnkle => "body:left_ankle",
            TrackerPosition::RightAnkle => "body:right_ankle",
            TrackerPosition::LeftFoot => "body:left_foot",
            TrackerPosition::RightFoot => "body:right_foot",
            TrackerPosition::LeftController => "body:left_controller",
            TrackerPosition::RightController => "body:right_controller",
            TrackerPosition::LeftElbow => "body:left_elbow",
            TrackerPosition::RightElbow => "body:right_elbow",
        }
    }

    /// Case-insensitive lookup by designation
    pub fn from_designation(designation: &str) -> TrackerResult<Self> {
        TrackerPosition::ALL
            .iter()
            .copied()
            .find(|p| p.designation().eq_ignore_ascii_case(designation))
            .ok_or_else(|| TrackerError::UnknownDesignation(designation.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designation_lookup_ignores_case() {
        assert_eq!(
            TrackerPosition::from_designation("BODY:Left_Knee").unwrap(),
            TrackerPosition::LeftKnee
        );
        assert_eq!(TrackerPosition::from_designation("hmd").unwrap(), TrackerPosition::Hmd);
    }

    #[test]
    fn test_every_designation_resolves_to_itself() {
        for position in TrackerPosition::ALL {
            assert_eq!(
                TrackerPosition::from_designation(position.designation()).unwrap(),
                position
            );
        }
    }

    #[test]
    fn test_unknown_designation() {
        let err = TrackerPosition::from_designation("body:tail").unwrap_err();
        assert!(matches!(err, TrackerError::UnknownDesignation(_)));
    }

    #[test]
    fn test_sends_data() {
        assert!(TrackerStatus::Ok.sends_data());
        assert!(TrackerStatus::Occluded.sends_data());
        assert!(!TrackerStatus::Disconnected.sends_data());
        assert!(!TrackerStatus::Error.sends_data());
    }
}
