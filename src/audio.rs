//! Audio cues
//!
//! The core never synthesizes or mixes sound; it names a cue and lets the
//! host's audio backend play it (see [`crate::platform::Audio`]).

use serde::{Deserialize, Serialize};

use crate::tuning::CueVolumes;

/// Sound cues used by the gameplay core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// Looping city ambience for the whole run
    City,
    /// Enemy destroyed by a jump attack
    Destroy,
    /// Combo sparkle layered over `Destroy`
    HyperRing,
    /// Player hit while grounded
    Hurt,
    /// Collectible picked up
    Ring,
}

impl Cue {
    /// Asset name the host resolves
    pub fn name(&self) -> &'static str {
        match self {
            Cue::City => "city",
            Cue::Destroy => "destroy",
            Cue::HyperRing => "hyper-ring",
            Cue::Hurt => "hurt",
            Cue::Ring => "ring",
        }
    }

    pub fn looping(&self) -> bool {
        matches!(self, Cue::City)
    }

    pub fn volume(&self, volumes: &CueVolumes) -> f32 {
        match self {
            Cue::City => volumes.ambient,
            _ => volumes.effects,
        }
    }
}

/// Opaque handle to a playing cue, threaded through scene transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioHandle(pub u32);

/// Fully resolved playback request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    pub cue: Cue,
    pub volume: f32,
    pub looping: bool,
}

impl PlayRequest {
    pub fn new(cue: Cue, volumes: &CueVolumes) -> Self {
        Self {
            cue,
            volume: cue.volume(volumes),
            looping: cue.looping(),
        }
    }
}
