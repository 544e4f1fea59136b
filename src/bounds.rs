use std::collections::HashMap;

use log::trace;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::Aabb;
use crate::joint::{Finger, Joint, Pose, JOINT_COUNT};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HandBoundsMode {
    #[default]
    None,
    /// One box around every known joint.
    Hand,
    /// Boxes around the palm bones and each finger segment.
    Fingers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundsRegion {
    Hand,
    Palm,
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl From<Finger> for BoundsRegion {
    fn from(finger: Finger) -> Self {
        match finger {
            Finger::Thumb => BoundsRegion::Thumb,
            Finger::Index => BoundsRegion::Index,
            Finger::Middle => BoundsRegion::Middle,
            Finger::Ring => BoundsRegion::Ring,
            Finger::Little => BoundsRegion::Little,
        }
    }
}

const PALM_BONES: [(Joint, Joint); 4] = [
    (Joint::IndexMetacarpal, Joint::IndexKnuckle),
    (Joint::MiddleMetacarpal, Joint::MiddleKnuckle),
    (Joint::RingMetacarpal, Joint::RingKnuckle),
    (Joint::LittleMetacarpal, Joint::LittleKnuckle),
];

/// The two segments boxed for each finger region.
fn finger_segments(finger: Finger) -> [(Joint, Joint); 2] {
    match finger {
        Finger::Thumb => [
            (Joint::ThumbMetacarpal, Joint::ThumbProximal),
            (Joint::ThumbProximal, Joint::ThumbTip),
        ],
        Finger::Index => [
            (Joint::IndexKnuckle, Joint::IndexMiddle),
            (Joint::IndexMiddle, Joint::IndexTip),
        ],
        Finger::Middle => [
            (Joint::MiddleKnuckle, Joint::MiddleMiddle),
            (Joint::MiddleMiddle, Joint::MiddleTip),
        ],
        Finger::Ring => [
            (Joint::RingKnuckle, Joint::RingMiddle),
            (Joint::RingMiddle, Joint::RingTip),
        ],
        Finger::Little => [
            (Joint::LittleKnuckle, Joint::LittleMiddle),
            (Joint::LittleMiddle, Joint::LittleTip),
        ],
    }
}

/// Per-region bounds with last-good-value semantics: a region is only
/// overwritten when every joint it needs is known.
#[derive(Debug, Clone, Default)]
pub struct HandBounds {
    regions: HashMap<BoundsRegion, Vec<Aabb>>,
}

impl HandBounds {
    pub fn new() -> Self {
        Self {
            regions: HashMap::with_capacity(7),
        }
    }

    pub fn update(&mut self, mode: HandBoundsMode, joints: &[Option<Pose>; JOINT_COUNT]) {
        match mode {
            HandBoundsMode::None => {}
            HandBoundsMode::Hand => self.update_hand(joints),
            HandBoundsMode::Fingers => {
                self.update_palm(joints);
                for finger in Finger::ALL {
                    self.update_finger(finger, joints);
                }
            }
        }
    }

    #[inline]
    pub fn get(&self, region: BoundsRegion) -> Option<&[Aabb]> {
        self.regions.get(&region).map(Vec::as_slice)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    fn update_hand(&mut self, joints: &[Option<Pose>; JOINT_COUNT]) {
        let palm = match position(joints, Joint::Palm) {
            Some(p) => p,
            None => {
                trace!("hand bounds skipped, palm unresolved");
                return;
            }
        };

        let mut bbox = Aabb::from_point(palm);
        for joint in Joint::ALL.iter().filter(|j| **j != Joint::Palm) {
            if let Some(p) = position(joints, *joint) {
                bbox.encapsulate(&p);
            }
        }

        self.store(BoundsRegion::Hand, std::iter::once(Some(bbox)));
    }

    fn update_palm(&mut self, joints: &[Option<Pose>; JOINT_COUNT]) {
        self.store(
            BoundsRegion::Palm,
            PALM_BONES.iter().map(|(a, b)| segment(joints, *a, *b)),
        );
    }

    fn update_finger(&mut self, finger: Finger, joints: &[Option<Pose>; JOINT_COUNT]) {
        self.store(
            finger.into(),
            finger_segments(finger)
                .iter()
                .map(|(a, b)| segment(joints, *a, *b)),
        );
    }

    /// Replaces the boxes of `region` in place, unless any of them is missing.
    fn store<I: IntoIterator<Item = Option<Aabb>>>(&mut self, region: BoundsRegion, boxes: I) {
        let mut computed: [Option<Aabb>; 4] = [None; 4];
        let mut count = 0;

        for bbox in boxes {
            match bbox {
                Some(b) if count < computed.len() => {
                    computed[count] = Some(b);
                    count += 1;
                }
                _ => {
                    trace!("{:?} bounds skipped, joints unresolved", region);
                    return;
                }
            }
        }

        let entry = self.regions.entry(region).or_insert_with(|| Vec::with_capacity(count));
        entry.clear();
        entry.extend(computed.iter().take(count).flatten());
    }
}

#[inline]
fn position(joints: &[Option<Pose>; JOINT_COUNT], joint: Joint) -> Option<na::Vector3<f32>> {
    joints[joint.index()].as_ref().map(|p| p.position)
}

#[inline]
fn segment(joints: &[Option<Pose>; JOINT_COUNT], from: Joint, to: Joint) -> Option<Aabb> {
    Some(Aabb::from_points(position(joints, from)?, position(joints, to)?))
}
