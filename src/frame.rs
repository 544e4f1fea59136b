use std::sync::Arc;

use crate::joint::{Joint, Pose, FINGER_COUNT, JOINT_COUNT};
use crate::pose::PoseDefinition;

/// One frame of evidence for a single hand, as produced by the tracking provider.
#[derive(Debug, Clone)]
pub struct HandFrame {
    pub tracked: bool,
    /// Indexed by [`Joint::index`]; `None` when the provider did not report the joint.
    pub joints: [Option<Pose>; JOINT_COUNT],
    pub is_pinching: bool,
    pub is_pointing: bool,
    pub is_gripping: bool,
    pub grip_strength: f32,
    /// Indexed by [`crate::joint::Finger::index`], 0 = open, 1 = fully curled.
    pub finger_curl_strengths: [f32; FINGER_COUNT],
    pub pointer_pose: Pose,
    pub tracked_pose: Option<Arc<PoseDefinition>>,
    pub timestamp: f32, // in seconds
}

impl HandFrame {
    #[inline]
    pub fn joint(&self, joint: Joint) -> Option<&Pose> {
        self.joints[joint.index()].as_ref()
    }

    #[inline]
    pub fn set_joint(&mut self, joint: Joint, pose: Pose) {
        self.joints[joint.index()] = Some(pose);
    }

    #[inline]
    pub fn iter_joints(&self) -> impl Iterator<Item = (Joint, &Pose)> {
        Joint::ALL
            .iter()
            .zip(self.joints.iter())
            .filter_map(|(j, p)| p.as_ref().map(|p| (*j, p)))
    }

    #[inline]
    pub fn tracked_pose_id(&self) -> Option<&str> {
        self.tracked_pose.as_deref().map(PoseDefinition::id)
    }
}

impl Default for HandFrame {
    fn default() -> Self {
        Self {
            tracked: false,
            joints: [None; JOINT_COUNT],
            is_pinching: false,
            is_pointing: false,
            is_gripping: false,
            grip_strength: 0.0,
            finger_curl_strengths: [0.0; FINGER_COUNT],
            pointer_pose: Pose::identity(),
            tracked_pose: None,
            timestamp: 0.0,
        }
    }
}
