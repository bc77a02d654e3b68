use serde::{Deserialize, Serialize};

/// Bones and tracker nodes of the skeleton graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BoneType {
    Head,
    Neck,
    Chest,
    ChestTracker,
    Waist,
    Hip,
    HipTracker,
    LeftHip,
    RightHip,
    LeftUpperLeg,
    RightUpperLeg,
    LeftKneeTracker,
    RightKneeTracker,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
    LeftFootTracker,
    RightFootTracker,
    LeftController,
    RightController,
    LeftHand,
    RightHand,
    LeftLowerArm,
    RightLowerArm,
    LeftElbowTracker,
    RightElbowTracker,
    LeftUpperArm,
    RightUpperArm,
    LeftShoulder,
    RightShoulder,
}
