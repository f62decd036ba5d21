//! Ring Runner - gameplay core of an endless side-scroller
//!
//! Core modules:
//! - `sim`: Deterministic gameplay core (spawning, scrolling, collisions, scoring)
//! - `platform`: Capabilities the core consumes from its host (render, physics, audio, scenes)
//! - `audio`: Named audio cues
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Simulation ticks per second
    pub const TICKS_PER_SEC: u32 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Left edge of the visible area (world x)
    pub const VIEWPORT_LEFT: f32 = 0.0;
    /// Visible area size
    pub const VIEWPORT_WIDTH: f32 = 1920.0;
    pub const VIEWPORT_HEIGHT: f32 = 1080.0;

    /// Player spawn position
    pub const PLAYER_START_X: f32 = 200.0;
    pub const PLAYER_START_Y: f32 = 745.0;

    /// Scene the core hands off to when the player is defeated
    pub const GAME_OVER_SCENE: &str = "gameover";
    /// State bus key carrying the final score
    pub const SCORE_BUS_KEY: &str = "current-score";
}

/// Convert a duration in seconds to whole simulation ticks (at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    ((secs * consts::TICKS_PER_SEC as f32).round() as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secs_to_ticks() {
        assert_eq!(secs_to_ticks(1.0), 120);
        assert_eq!(secs_to_ticks(0.5), 60);
        assert_eq!(secs_to_ticks(2.5), 300);
        // Never schedules for the current tick
        assert_eq!(secs_to_ticks(0.0), 1);
    }
}
