use std::sync::Arc;

use log::debug;

use crate::error::Error;
use crate::frame::HandFrame;
use crate::pose::{self, PoseDefinition};

/// Number of tracked ticks between two classification passes.
pub const RECOGNITION_INTERVAL: u32 = 10;

/// Throttled nearest-match classifier over a fixed set of baked poses.
///
/// Cloning is cheap (definitions are shared) and gives an independent
/// throttle counter and last result, so each hand should own its own clone.
#[derive(Debug, Clone)]
pub struct PoseClassifier {
    definitions: Arc<[Arc<PoseDefinition>]>,
    counter: u32,
    recognized: Option<Arc<PoseDefinition>>,
}

impl PoseClassifier {
    pub fn new<I>(definitions: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = PoseDefinition>,
    {
        let definitions = definitions
            .into_iter()
            .map(|def| {
                if def.is_baked() {
                    Ok(Arc::new(def))
                } else {
                    Err(Error::UnbakedPose(def.id().to_string()))
                }
            })
            .collect::<Result<Arc<[_]>, _>>()?;

        debug!("pose classifier ready with {} definitions", definitions.len());

        Ok(Self {
            definitions,
            counter: 0,
            recognized: None,
        })
    }

    pub fn process(&mut self, frame: &mut HandFrame) {
        if !frame.tracked {
            self.reset();
            frame.tracked_pose = None;
            return;
        }

        if self.counter >= RECOGNITION_INTERVAL {
            self.counter = 0;
            self.recognized = self.best_match(frame);
        }

        self.counter += 1;
        frame.tracked_pose = self.recognized.clone();
    }

    fn best_match(&self, frame: &HandFrame) -> Option<Arc<PoseDefinition>> {
        let mut best_score = 0.0;
        let mut best = None;

        for def in self.definitions.iter() {
            let baked = match def.data() {
                Some(data) => data,
                None => continue,
            };

            let score = pose::compare(frame, baked);
            if score > best_score {
                best_score = score;
                best = Some(def);
            }
        }

        best.cloned()
    }

    pub fn reset(&mut self) {
        self.counter = 0;
        self.recognized = None;
    }

    #[inline]
    pub fn recognized(&self) -> Option<&Arc<PoseDefinition>> {
        self.recognized.as_ref()
    }

    #[inline]
    pub fn definitions(&self) -> &[Arc<PoseDefinition>] {
        &self.definitions
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
