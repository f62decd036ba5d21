//! Player/actor collision handling
//!
//! A single gate is shared by every actor kind. Once an event has been
//! handled the gate closes for a fixed cooldown and every overlap reported in
//! the meantime is dropped, so several simultaneous contacts collapse into
//! one scoring (or one defeat) event.

use serde::{Deserialize, Serialize};

use super::score::ScoreTracker;
use super::state::CollisionTag;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Open,
    Closed,
}

/// Debounce gate for collision events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionGate {
    state: GateState,
    /// Seconds the gate stays closed after an accepted event
    cooldown: f32,
}

impl CollisionGate {
    pub fn new(cooldown: f32) -> Self {
        Self {
            state: GateState::Open,
            cooldown,
        }
    }

    /// Close the gate if it is open. Returns whether the caller may handle the event.
    pub fn try_close(&mut self) -> bool {
        match self.state {
            GateState::Open => {
                self.state = GateState::Closed;
                true
            }
            GateState::Closed => false,
        }
    }

    /// Cooldown expired; reopens regardless of which event closed it
    pub fn reopen(&mut self) {
        self.state = GateState::Open;
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == GateState::Open
    }

    #[inline]
    pub fn state(&self) -> GateState {
        self.state
    }

    #[inline]
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }
}

/// What a collision event turned into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Gate closed, event dropped
    Ignored,
    /// Airborne stomp on an enemy
    EnemyDefeated {
        multiplier: u32,
        points: u64,
        callout: String,
    },
    /// Collectible picked up
    Collected { points: u64, callout: String },
    /// Grounded contact with an enemy ends the run
    PlayerDefeated { final_score: u64 },
}

impl Resolution {
    /// Whether the gate must be scheduled to reopen
    pub fn needs_reopen(&self) -> bool {
        matches!(
            self,
            Resolution::EnemyDefeated { .. } | Resolution::Collected { .. }
        )
    }

    /// Callout text to show, if any
    pub fn callout(&self) -> Option<&str> {
        match self {
            Resolution::EnemyDefeated { callout, .. } | Resolution::Collected { callout, .. } => {
                Some(callout.as_str())
            }
            _ => None,
        }
    }
}

/// Gate plus the scoring rules applied behind it
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResolver {
    gate: CollisionGate,
    enemy_points: u64,
    collectible_points: u64,
}

impl CollisionResolver {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            gate: CollisionGate::new(tuning.gate_cooldown),
            enemy_points: tuning.enemy_points,
            collectible_points: tuning.collectible_points,
        }
    }

    /// Handle one overlap. Score is updated here; side effects on the world
    /// (recycling, cues, timers, scene change) are left to the caller.
    pub fn resolve(
        &mut self,
        tag: CollisionTag,
        player_grounded: bool,
        score: &mut ScoreTracker,
    ) -> Resolution {
        if !self.gate.try_close() {
            log::debug!("gate closed, dropping {} collision", tag.label());
            return Resolution::Ignored;
        }

        match tag {
            CollisionTag::Enemy if !player_grounded => {
                let multiplier = score.bump_multiplier();
                let points = self.enemy_points * multiplier as u64;
                score.add(points);
                let callout = if multiplier == 1 {
                    self.enemy_points.to_string()
                } else {
                    format!("x{multiplier}")
                };
                Resolution::EnemyDefeated {
                    multiplier,
                    points,
                    callout,
                }
            }
            CollisionTag::Enemy => Resolution::PlayerDefeated {
                final_score: score.score(),
            },
            CollisionTag::Ring => {
                score.add(self.collectible_points);
                Resolution::Collected {
                    points: self.collectible_points,
                    callout: format!("+{}", self.collectible_points),
                }
            }
        }
    }

    pub fn reopen_gate(&mut self) {
        log::debug!("collision gate reopened");
        self.gate.reopen();
    }

    pub fn gate(&self) -> &CollisionGate {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> CollisionResolver {
        CollisionResolver::new(&Tuning::default())
    }

    #[test]
    fn test_gate_closes_once() {
        let mut gate = CollisionGate::new(0.5);
        assert!(gate.try_close());
        assert!(!gate.try_close());
        gate.reopen();
        assert!(gate.is_open());
    }

    #[test]
    fn test_collectible_scores_one() {
        let mut r = resolver();
        let mut score = ScoreTracker::new();
        let res = r.resolve(CollisionTag::Ring, true, &mut score);
        assert_eq!(res.callout(), Some("+1"));
        assert!(res.needs_reopen());
        assert_eq!(score.score(), 1);
        assert_eq!(r.gate().state(), GateState::Closed);

        // Second pickup inside the cooldown is dropped
        assert_eq!(r.resolve(CollisionTag::Ring, true, &mut score), Resolution::Ignored);
        assert_eq!(score.score(), 1);
    }

    #[test]
    fn test_airborne_combo() {
        let mut r = resolver();
        let mut score = ScoreTracker::new();

        let first = r.resolve(CollisionTag::Enemy, false, &mut score);
        assert_eq!(
            first,
            Resolution::EnemyDefeated {
                multiplier: 1,
                points: 10,
                callout: "10".to_string()
            }
        );
        assert_eq!(score.score(), 10);

        r.reopen_gate();
        let second = r.resolve(CollisionTag::Enemy, false, &mut score);
        assert_eq!(second.callout(), Some("x2"));
        assert_eq!(score.multiplier(), 2);
        assert_eq!(score.score(), 30);
    }

    #[test]
    fn test_grounded_enemy_defeats_player() {
        let mut r = resolver();
        let mut score = ScoreTracker::new();
        score.add(42);

        let res = r.resolve(CollisionTag::Enemy, true, &mut score);
        assert_eq!(res, Resolution::PlayerDefeated { final_score: 42 });
        assert!(!res.needs_reopen());
        assert_eq!(score.score(), 42);
        assert!(!r.gate().is_open());
    }
}
