pub mod bbox;
pub mod bounds;
pub mod classifier;
pub mod config;
pub mod error;
pub mod frame;
pub mod hand_state;
pub mod interaction;
pub mod joint;
pub mod math;
pub mod pose;
pub mod tracker;
pub mod velocity;

mod circular_queue;
mod debounce;

pub use bbox::Aabb;
pub use bounds::{BoundsRegion, HandBoundsMode};
pub use classifier::PoseClassifier;
pub use config::{HandProfile, HandStateConfig};
pub use frame::HandFrame;
pub use hand_state::{HandListener, HandState, Handedness, TrackingState};
pub use joint::{Finger, Joint, Pose};
pub use pose::PoseDefinition;
pub use tracker::HandTracker;

use std::time::Instant;

/// Source of unscaled, monotonic time in seconds.
pub trait Clock {
    fn unscaled_time(&self) -> f32;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn unscaled_time(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}
