use log::warn;
use nalgebra as na;

use crate::joint::Pose;
use crate::math;

/// Last tick of a velocity window; the window spans ticks `0..=VELOCITY_UPDATE_INTERVAL`.
pub const VELOCITY_UPDATE_INTERVAL: u32 = 9;

pub const VELOCITY_SMOOTHING: f32 = 0.8;

/// Palm velocity estimated over fixed tick windows.
///
/// The first tick of a window records the palm pose and time, the last one
/// measures against it. Linear velocity is exponentially smoothed, angular
/// velocity is replaced outright.
#[derive(Debug, Clone)]
pub struct VelocityEstimator {
    frame: u32,
    start_time: f32,
    start_position: Option<na::Vector3<f32>>,
    start_normal: na::Vector3<f32>,
    velocity: na::Vector3<f32>,
    angular_velocity: na::Vector3<f32>,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        Self {
            frame: 0,
            start_time: 0.0,
            start_position: None,
            start_normal: na::Vector3::y(),
            velocity: na::Vector3::zeros(),
            angular_velocity: na::Vector3::zeros(),
        }
    }

    /// Advances one tick. `palm` is `None` when the palm joint is unknown, in
    /// which case this tick does no velocity work. `now` is only sampled on
    /// the first and last tick of a window.
    pub fn update<T: FnOnce() -> f32>(&mut self, palm: Option<&Pose>, now: T) {
        match (palm, self.frame) {
            (Some(palm), 0) => {
                self.start_time = now();
                self.start_position = Some(palm.position);
                self.start_normal = palm.up();
            }
            (None, 0) => self.start_position = None,
            (Some(palm), VELOCITY_UPDATE_INTERVAL) => self.measure(palm, now()),
            _ => {}
        }

        self.frame += 1;
        if self.frame > VELOCITY_UPDATE_INTERVAL {
            self.frame = 0;
        }
    }

    fn measure(&mut self, palm: &Pose, now: f32) {
        let start = match self.start_position {
            Some(p) => p,
            None => return,
        };

        let dt = now - self.start_time;
        if dt <= 0.0 {
            warn!("velocity window has non-positive duration {}", dt);
            return;
        }

        let moved = (palm.position - start) / dt;
        self.velocity = math::blend(&self.velocity, &moved, VELOCITY_SMOOTHING);

        let rotation = math::shortest_arc(&self.start_normal, &palm.up());
        self.angular_velocity = math::euler_radians(&rotation) / dt;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    pub fn velocity(&self) -> &na::Vector3<f32> {
        &self.velocity
    }

    #[inline]
    pub fn angular_velocity(&self) -> &na::Vector3<f32> {
        &self.angular_velocity
    }
}

impl Default for VelocityEstimator {
    fn default() -> Self {
        Self::new()
    }
}
