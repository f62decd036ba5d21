//! In-memory host
//!
//! Implements every capability without a window or sound device. It keeps
//! just enough world to run a session end to end: a player body falling
//! under gravity onto the ground, box overlaps against actor colliders, and
//! an optional autopilot that jumps over incoming enemies. Everything the
//! core asks for is recorded so it can be inspected.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use glam::Vec2;

use super::{
    Audio, Overlap, Physics, Rect, Renderer, SceneTransition, SpriteSpec, StateBus, TextLabel,
    TransitionPayload, VisualId,
};
use crate::audio::{AudioHandle, PlayRequest};
use crate::consts::{PLAYER_START_X, PLAYER_START_Y};
use crate::sim::state::{ActorId, CollisionTag};

/// Jump impulse (px/s, upward)
pub const JUMP_FORCE: f32 = 1700.0;
/// Player collision box
pub const PLAYER_SIZE: Vec2 = Vec2::new(60.0, 60.0);
/// Actor collision box
pub const ACTOR_SIZE: Vec2 = Vec2::new(60.0, 60.0);
/// Autopilot jumps when an enemy is this close ahead
const AUTOPILOT_LOOKAHEAD: f32 = 260.0;

/// Vertical body of the controlled player
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBody {
    pub pos: Vec2,
    pub vel_y: f32,
    pub grounded: bool,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel_y: 0.0,
            grounded: false,
        }
    }
}

impl PlayerBody {
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, PLAYER_SIZE)
    }

    pub fn jump(&mut self) {
        self.vel_y = -JUMP_FORCE;
        self.grounded = false;
    }
}

/// A scene transition the core requested
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub scene: String,
    pub payload: TransitionPayload,
}

#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_visual: u32,
    next_audio: u32,
    /// Live sprites (position kept current by `move_to`)
    pub sprites: HashMap<VisualId, SpriteSpec>,
    pub texts: HashMap<TextLabel, String>,
    pub gravity: f32,
    pub ground: Option<Rect>,
    pub player: PlayerBody,
    colliders: BTreeMap<ActorId, (CollisionTag, Vec2)>,
    touching: BTreeSet<ActorId>,
    injected: Vec<Overlap>,
    /// Detect overlaps from collider boxes (off: only injected overlaps are reported)
    pub auto_overlaps: bool,
    /// Overrides the body's grounded state when set
    pub forced_grounded: Option<bool>,
    /// Jump over enemies automatically
    pub autopilot: bool,
    pub cues: Vec<PlayRequest>,
    pub bus: HashMap<String, serde_json::Value>,
    pub transitions: Vec<Transition>,
    pub bounces: u32,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            auto_overlaps: true,
            ..Default::default()
        }
    }

    /// Host with the player pinned grounded or airborne and no box overlaps;
    /// collisions only happen through [`HeadlessHost::inject_overlap`]
    pub fn scripted(grounded: bool) -> Self {
        Self {
            auto_overlaps: false,
            forced_grounded: Some(grounded),
            ..Default::default()
        }
    }

    /// Queue an overlap for the next `drain_overlaps`
    pub fn inject_overlap(&mut self, actor: ActorId, tag: CollisionTag) {
        self.injected.push(Overlap { actor, tag });
    }

    /// Integrate the player body for one step (host-side physics)
    pub fn step_physics(&mut self, dt: f32) {
        if self.autopilot && self.player.grounded && self.enemy_ahead() {
            self.player.jump();
        }

        self.player.vel_y += self.gravity * dt;
        self.player.pos.y += self.player.vel_y * dt;
        self.player.grounded = false;

        if let Some(ground) = self.ground {
            let feet = self.player.pos.y + PLAYER_SIZE.y * 0.5;
            if feet >= ground.pos.y && self.player.vel_y >= 0.0 {
                self.player.pos.y = ground.pos.y - PLAYER_SIZE.y * 0.5;
                self.player.vel_y = 0.0;
                self.player.grounded = true;
            }
        }
    }

    fn enemy_ahead(&self) -> bool {
        self.colliders.values().any(|(tag, pos)| {
            *tag == CollisionTag::Enemy
                && pos.x > self.player.pos.x
                && pos.x - self.player.pos.x < AUTOPILOT_LOOKAHEAD
        })
    }

    pub fn sprite_count(&self, sprite: &str) -> usize {
        self.sprites.values().filter(|s| s.sprite == sprite).count()
    }

    pub fn sprite(&self, id: VisualId) -> Option<&SpriteSpec> {
        self.sprites.get(&id)
    }

    pub fn text(&self, label: TextLabel) -> &str {
        self.texts.get(&label).map(String::as_str).unwrap_or("")
    }

    pub fn has_collider(&self, actor: ActorId) -> bool {
        self.colliders.contains_key(&actor)
    }

    pub fn cue_count(&self, name: &str) -> usize {
        self.cues.iter().filter(|c| c.cue.name() == name).count()
    }
}

impl Renderer for HeadlessHost {
    fn spawn_sprite(&mut self, spec: &SpriteSpec) -> VisualId {
        self.next_visual += 1;
        let id = VisualId(self.next_visual);
        self.sprites.insert(id, spec.clone());
        id
    }

    fn move_to(&mut self, id: VisualId, pos: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.pos = pos;
        }
    }

    fn despawn(&mut self, id: VisualId) {
        self.sprites.remove(&id);
    }

    fn set_text(&mut self, label: TextLabel, text: &str) {
        self.texts.insert(label, text.to_string());
    }
}

impl Physics for HeadlessHost {
    fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    fn add_static_ground(&mut self, rect: Rect) {
        self.ground = Some(rect);
    }

    fn is_grounded(&self) -> bool {
        self.forced_grounded.unwrap_or(self.player.grounded)
    }

    fn sync_collider(&mut self, actor: ActorId, tag: CollisionTag, pos: Vec2) {
        self.colliders.insert(actor, (tag, pos));
    }

    fn remove_collider(&mut self, actor: ActorId) {
        self.colliders.remove(&actor);
        self.touching.remove(&actor);
    }

    fn drain_overlaps(&mut self) -> Vec<Overlap> {
        let mut overlaps = std::mem::take(&mut self.injected);
        if !self.auto_overlaps {
            return overlaps;
        }

        let player = self.player.rect();
        let now: BTreeSet<ActorId> = self
            .colliders
            .iter()
            .filter(|(_, (_, pos))| Rect::centered(*pos, ACTOR_SIZE).overlaps(&player))
            .map(|(id, _)| *id)
            .collect();

        // Only contacts that began this step
        for id in now.difference(&self.touching) {
            if let Some((tag, _)) = self.colliders.get(id) {
                overlaps.push(Overlap { actor: *id, tag: *tag });
            }
        }
        self.touching = now;
        overlaps
    }

    fn bounce_player(&mut self) {
        self.bounces += 1;
        self.player.jump();
    }
}

impl Audio for HeadlessHost {
    fn play(&mut self, request: PlayRequest) -> AudioHandle {
        self.next_audio += 1;
        self.cues.push(request);
        AudioHandle(self.next_audio)
    }
}

impl StateBus for HeadlessHost {
    fn set(&mut self, key: &str, value: serde_json::Value) {
        self.bus.insert(key.to_string(), value);
    }
}

impl SceneTransition for HeadlessHost {
    fn transition_to(&mut self, scene: &str, payload: TransitionPayload) {
        self.transitions.push(Transition {
            scene: scene.to_string(),
            payload,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_host() -> HeadlessHost {
        let mut host = HeadlessHost::new();
        host.set_gravity(3100.0);
        host.add_static_ground(Rect::new(0.0, 832.0, 1920.0, 300.0));
        host
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut host = grounded_host();
        for _ in 0..120 {
            host.step_physics(1.0 / 120.0);
        }
        assert!(host.is_grounded());
        assert_eq!(host.player.pos.y, 802.0);
    }

    #[test]
    fn test_overlap_reported_once_per_contact() {
        let mut host = grounded_host();
        let id = ActorId(7);
        host.sync_collider(id, CollisionTag::Ring, host.player.pos);
        assert_eq!(host.drain_overlaps(), vec![Overlap { actor: id, tag: CollisionTag::Ring }]);
        // Still touching: no new event
        assert!(host.drain_overlaps().is_empty());

        host.sync_collider(id, CollisionTag::Ring, Vec2::new(1500.0, 745.0));
        assert!(host.drain_overlaps().is_empty());
        host.sync_collider(id, CollisionTag::Ring, host.player.pos);
        assert_eq!(host.drain_overlaps().len(), 1);
    }

    #[test]
    fn test_autopilot_jumps_enemies() {
        let mut host = grounded_host();
        host.autopilot = true;
        for _ in 0..120 {
            host.step_physics(1.0 / 120.0);
        }
        host.sync_collider(ActorId(1), CollisionTag::Enemy, Vec2::new(400.0, 773.0));
        host.step_physics(1.0 / 120.0);
        assert!(!host.is_grounded());
        assert!(host.player.vel_y < 0.0);
    }

    #[test]
    fn test_scripted_host_only_reports_injected() {
        let mut host = HeadlessHost::scripted(false);
        host.sync_collider(ActorId(1), CollisionTag::Enemy, host.player.pos);
        assert!(host.drain_overlaps().is_empty());
        host.inject_overlap(ActorId(1), CollisionTag::Enemy);
        assert_eq!(host.drain_overlaps().len(), 1);
        assert!(!host.is_grounded());
    }
}
