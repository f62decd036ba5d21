//! Score and combo multiplier

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    score: u64,
    multiplier: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, points: u64) {
        self.score += points;
    }

    /// Extend the combo; returns the new multiplier
    pub fn bump_multiplier(&mut self) -> u32 {
        self.multiplier = if self.multiplier > 0 {
            self.multiplier + 1
        } else {
            1
        };
        self.multiplier
    }

    /// Called once per frame; landing ends the combo
    pub fn reset_multiplier_if_grounded(&mut self, is_grounded: bool) {
        if is_grounded && self.multiplier != 0 {
            log::debug!("combo x{} ended on landing", self.multiplier);
            self.multiplier = 0;
        }
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// HUD text for the score label
    pub fn label(&self) -> String {
        format!("SCORE: {}", self.score)
    }
}
