use std::sync::Arc;

use crate::frame::HandFrame;
use crate::joint::FINGER_COUNT;

/// Maximum grip strength difference still considered a match.
pub const GRIP_STRENGTH_THRESHOLD: f32 = 0.02;

/// Maximum per-finger curl difference still considered a match.
pub const CURL_STRENGTH_THRESHOLD: f32 = 0.01;

const TOTAL_TESTS: usize = 1 + FINGER_COUNT;

/// A named reference pose. Only baked definitions (those carrying a captured
/// [`HandFrame`]) can take part in classification.
#[derive(Debug, Clone)]
pub struct PoseDefinition {
    id: Arc<str>,
    description: Option<String>,
    data: Option<HandFrame>,
}

impl PoseDefinition {
    pub fn baked(id: impl Into<Arc<str>>, data: HandFrame) -> Self {
        Self {
            id: id.into(),
            description: None,
            data: Some(data),
        }
    }

    pub fn unbaked(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            description: None,
            data: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn shared_id(&self) -> Arc<str> {
        self.id.clone()
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn is_baked(&self) -> bool {
        self.data.is_some()
    }

    #[inline]
    pub fn data(&self) -> Option<&HandFrame> {
        self.data.as_ref()
    }
}

/// Similarity of `runtime` to `baked` in `[0, 1]`.
///
/// Grip state is a hard gate; otherwise the score is the fraction of the grip
/// strength and finger curl tests that fall within tolerance.
pub fn compare(runtime: &HandFrame, baked: &HandFrame) -> f32 {
    if runtime.is_gripping != baked.is_gripping {
        return 0.0;
    }

    let mut passed = 0;

    if (runtime.grip_strength - baked.grip_strength).abs() <= GRIP_STRENGTH_THRESHOLD {
        passed += 1;
    }

    passed += runtime
        .finger_curl_strengths
        .iter()
        .zip(baked.finger_curl_strengths.iter())
        .filter(|(r, b)| (*r - *b).abs() <= CURL_STRENGTH_THRESHOLD)
        .count();

    passed as f32 / TOTAL_TESTS as f32
}
