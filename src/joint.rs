use nalgebra as na;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Joint {
    Wrist,
    Palm,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexKnuckle,
    IndexMiddle,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleKnuckle,
    MiddleMiddle,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingKnuckle,
    RingMiddle,
    RingDistal,
    RingTip,
    LittleMetacarpal,
    LittleKnuckle,
    LittleMiddle,
    LittleDistal,
    LittleTip,
}

pub const JOINT_COUNT: usize = 26;

impl Joint {
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::Wrist,
        Joint::Palm,
        Joint::ThumbMetacarpal,
        Joint::ThumbProximal,
        Joint::ThumbDistal,
        Joint::ThumbTip,
        Joint::IndexMetacarpal,
        Joint::IndexKnuckle,
        Joint::IndexMiddle,
        Joint::IndexDistal,
        Joint::IndexTip,
        Joint::MiddleMetacarpal,
        Joint::MiddleKnuckle,
        Joint::MiddleMiddle,
        Joint::MiddleDistal,
        Joint::MiddleTip,
        Joint::RingMetacarpal,
        Joint::RingKnuckle,
        Joint::RingMiddle,
        Joint::RingDistal,
        Joint::RingTip,
        Joint::LittleMetacarpal,
        Joint::LittleKnuckle,
        Joint::LittleMiddle,
        Joint::LittleDistal,
        Joint::LittleTip,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Finger this joint belongs to; `None` for wrist and palm.
    pub fn finger(self) -> Option<Finger> {
        match self.index() {
            2..=5 => Some(Finger::Thumb),
            6..=10 => Some(Finger::Index),
            11..=15 => Some(Finger::Middle),
            16..=20 => Some(Finger::Ring),
            21..=25 => Some(Finger::Little),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

pub const FINGER_COUNT: usize = 5;

impl Finger {
    pub const ALL: [Finger; FINGER_COUNT] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn tip(self) -> Joint {
        match self {
            Finger::Thumb => Joint::ThumbTip,
            Finger::Index => Joint::IndexTip,
            Finger::Middle => Joint::MiddleTip,
            Finger::Ring => Joint::RingTip,
            Finger::Little => Joint::LittleTip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: na::Vector3<f32>,
    pub rotation: na::UnitQuaternion<f32>,
}

impl Pose {
    #[inline]
    pub fn new(position: na::Vector3<f32>, rotation: na::UnitQuaternion<f32>) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn from_position(position: na::Vector3<f32>) -> Self {
        Self::new(position, na::UnitQuaternion::identity())
    }

    #[inline]
    pub fn identity() -> Self {
        Self::from_position(na::Vector3::zeros())
    }

    /// Local +Y rotated into tracking space; for the palm this is its normal.
    #[inline]
    pub fn up(&self) -> na::Vector3<f32> {
        self.rotation * na::Vector3::y()
    }

    #[inline]
    pub fn forward(&self) -> na::Vector3<f32> {
        self.rotation * na::Vector3::z()
    }

    #[inline]
    pub fn right(&self) -> na::Vector3<f32> {
        self.rotation * na::Vector3::x()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
