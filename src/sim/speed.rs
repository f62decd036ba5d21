//! Difficulty ramp
//!
//! A single scalar that only grows, one increment per period, up to a cap.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedController {
    current: f32,
    increment: f32,
    max: f32,
}

impl SpeedController {
    pub fn new(initial: f32, increment: f32, max: f32) -> Self {
        Self {
            current: initial.min(max),
            increment,
            max,
        }
    }

    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.initial_speed, tuning.speed_increment, tuning.max_speed)
    }

    /// Periodic raise, saturating at the ceiling
    pub fn tick(&mut self) {
        self.current = (self.current + self.increment).min(self.max);
    }

    /// Foreground speed (px/s)
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Speed scaled for a layer moving at `factor` of the foreground
    #[inline]
    pub fn scaled(&self, factor: f32) -> f32 {
        self.current * factor
    }

    #[inline]
    pub fn at_max(&self) -> bool {
        self.current >= self.max
    }
}
