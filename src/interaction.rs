use std::sync::Arc;

use serde_derive::{Deserialize, Serialize};

use crate::joint::Pose;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum MappingInput {
    SpatialPointer,
    Select,
    Point,
    SpatialGrip,
    IndexFinger,
    TrackedPose,
}

impl MappingInput {
    pub const ALL: [MappingInput; 6] = [
        MappingInput::SpatialPointer,
        MappingInput::Select,
        MappingInput::Point,
        MappingInput::SpatialGrip,
        MappingInput::IndexFinger,
        MappingInput::TrackedPose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpatialPointer => "spatial-pointer",
            Self::Select => "select",
            Self::Point => "point",
            Self::SpatialGrip => "spatial-grip",
            Self::IndexFinger => "index-finger",
            Self::TrackedPose => "tracked-pose",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MappingValue {
    Pose(Pose),
    Digital(bool),
    PoseId(Option<Arc<str>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    Down,
    Up,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMapping {
    pub input: MappingInput,
    pub value: MappingValue,
    /// Whether `value` differs from the previous tick.
    pub changed: bool,
}

impl InteractionMapping {
    pub fn new(input: MappingInput) -> Self {
        let value = match input {
            MappingInput::Select | MappingInput::Point => MappingValue::Digital(false),
            MappingInput::TrackedPose => MappingValue::PoseId(None),
            _ => MappingValue::Pose(Pose::identity()),
        };

        Self {
            input,
            value,
            changed: false,
        }
    }

    pub fn set(&mut self, value: MappingValue) -> bool {
        self.changed = self.value != value;
        if self.changed {
            self.value = value;
        }
        self.changed
    }

    #[inline]
    pub fn digital(&self) -> Option<bool> {
        match self.value {
            MappingValue::Digital(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn pose(&self) -> Option<&Pose> {
        match &self.value {
            MappingValue::Pose(p) => Some(p),
            _ => None,
        }
    }

    #[inline]
    pub fn pose_id(&self) -> Option<&str> {
        match &self.value {
            MappingValue::PoseId(id) => id.as_deref(),
            _ => None,
        }
    }
}
