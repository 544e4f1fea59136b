use std::collections::HashMap;

use log::debug;

use crate::classifier::PoseClassifier;
use crate::config::{HandProfile, HandStateConfig};
use crate::error::Error;
use crate::frame::HandFrame;
use crate::hand_state::{HandState, Handedness};

/// Owns the [`HandState`] of each hand in a session.
///
/// States are created on the first frame for a hand, each with its own copy
/// of the classifier, and closed when removed.
pub struct HandTracker {
    config: HandStateConfig,
    classifier: Option<PoseClassifier>,
    hands: HashMap<Handedness, HandState>,
}

impl HandTracker {
    pub fn new(config: HandStateConfig) -> Self {
        Self {
            config,
            classifier: None,
            hands: HashMap::with_capacity(2),
        }
    }

    pub fn from_profile(profile: &HandProfile) -> Result<Self, Error> {
        let classifier = profile.classifier()?;

        Ok(Self::new(profile.hand.clone()).with_classifier(classifier))
    }

    pub fn with_classifier(mut self, classifier: PoseClassifier) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// State for `hand`, created on first use.
    pub fn hand_or_insert(&mut self, hand: Handedness) -> &mut HandState {
        let config = &self.config;
        let classifier = &self.classifier;

        self.hands.entry(hand).or_insert_with(|| {
            debug!("{} hand state created", hand.as_str());
            let state = HandState::new(hand, config.clone());
            match classifier {
                Some(c) => state.with_classifier(c.clone()),
                None => state,
            }
        })
    }

    pub fn update(&mut self, hand: Handedness, frame: &mut HandFrame) -> &HandState {
        let state = self.hand_or_insert(hand);
        state.update(frame);
        state
    }

    #[inline]
    pub fn hand(&self, hand: Handedness) -> Option<&HandState> {
        self.hands.get(&hand)
    }

    #[inline]
    pub fn hand_mut(&mut self, hand: Handedness) -> Option<&mut HandState> {
        self.hands.get_mut(&hand)
    }

    /// Closes and returns the state of `hand`.
    pub fn remove(&mut self, hand: Handedness) -> Option<HandState> {
        let mut state = self.hands.remove(&hand)?;
        state.close();
        debug!("{} hand state removed", hand.as_str());

        Some(state)
    }

    pub fn close_all(&mut self) {
        for (_, mut state) in self.hands.drain() {
            state.close();
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }
}

impl Default for HandTracker {
    fn default() -> Self {
        Self::new(HandStateConfig::default())
    }
}
