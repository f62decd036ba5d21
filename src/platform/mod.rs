//! Platform abstraction layer
//!
//! The gameplay core does not draw, simulate bodies, play sound or own other
//! scenes. It asks the host for those capabilities through these traits:
//! - Rendering/placement of sprites and text labels
//! - Physics (gravity, ground, grounded query, overlap events)
//! - Audio cue playback
//! - Cross-scene state bus
//! - Scene transitions

pub mod headless;

pub use headless::HeadlessHost;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::audio::{AudioHandle, PlayRequest};
use crate::sim::state::{ActorId, CollisionTag};

/// Host-side handle to a visual element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(pub u32);

/// Request to create a sprite
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSpec {
    pub sprite: String,
    pub pos: Vec2,
    pub scale: f32,
    pub opacity: f32,
}

/// Text labels owned by the gameplay HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextLabel {
    /// "SCORE: n" in the top-left corner
    Score,
    /// Short-lived callout next to the player ("+1", "10", "x2")
    Callout,
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && other.pos.x < self.pos.x + self.size.x
            && self.pos.y < other.pos.y + other.size.y
            && other.pos.y < self.pos.y + self.size.y
    }
}

/// An overlap between the player and a tagged actor, as reported by physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    pub actor: ActorId,
    pub tag: CollisionTag,
}

/// Sprite and text placement
pub trait Renderer {
    fn spawn_sprite(&mut self, spec: &SpriteSpec) -> VisualId;
    fn move_to(&mut self, id: VisualId, pos: Vec2);
    fn despawn(&mut self, id: VisualId);
    fn set_text(&mut self, label: TextLabel, text: &str);
}

/// Body simulation and overlap detection
pub trait Physics {
    fn set_gravity(&mut self, gravity: f32);
    /// Invisible static collider the player stands on
    fn add_static_ground(&mut self, rect: Rect);
    /// Is the controlled player standing on something
    fn is_grounded(&self) -> bool;
    /// Create or move the trigger collider for an actor
    fn sync_collider(&mut self, actor: ActorId, tag: CollisionTag, pos: Vec2);
    fn remove_collider(&mut self, actor: ActorId);
    /// Overlaps that started since the last call
    fn drain_overlaps(&mut self) -> Vec<Overlap>;
    /// Jump animation and impulse after stomping an enemy
    fn bounce_player(&mut self);
}

/// Fire-and-forget cue playback
pub trait Audio {
    fn play(&mut self, request: PlayRequest) -> AudioHandle;
}

/// Values handed from one scene to the next
pub trait StateBus {
    fn set(&mut self, key: &str, value: serde_json::Value);
}

/// Payload carried into the next scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransitionPayload {
    /// Ambient loop the next scene takes ownership of
    pub ambient: Option<AudioHandle>,
}

pub trait SceneTransition {
    fn transition_to(&mut self, scene: &str, payload: TransitionPayload);
}

/// Everything a gameplay session needs from its host
pub trait Host: Renderer + Physics + Audio + StateBus + SceneTransition {}

impl<T: Renderer + Physics + Audio + StateBus + SceneTransition> Host for T {}
