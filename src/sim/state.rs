//! Actor model and session phase
//!
//! Actors are plain data tagged by kind. What an actor can do is expressed
//! through the capability traits below rather than closures attached to
//! each instance; the frame driver calls them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::platform::VisualId;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Constructed but not yet wired to a host
    Idle,
    /// Active gameplay
    Running,
    /// Player defeated, scene handed off; nothing may mutate state any more
    GameOver,
}

impl SessionPhase {
    /// Whether deferred callbacks and events may still act on the session
    #[inline]
    pub fn is_live(&self) -> bool {
        matches!(self, SessionPhase::Running)
    }
}

/// Recyclable actor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Enemy,
    Collectible,
}

impl ActorKind {
    pub const ALL: [ActorKind; 2] = [ActorKind::Enemy, ActorKind::Collectible];

    pub fn tag(&self) -> CollisionTag {
        match self {
            ActorKind::Enemy => CollisionTag::Enemy,
            ActorKind::Collectible => CollisionTag::Ring,
        }
    }
}

/// Category label attached to colliders and overlap events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionTag {
    Enemy,
    Ring,
}

impl CollisionTag {
    pub fn label(&self) -> &'static str {
        match self {
            CollisionTag::Enemy => "enemy",
            CollisionTag::Ring => "ring",
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            CollisionTag::Enemy => ActorKind::Enemy,
            CollisionTag::Ring => ActorKind::Collectible,
        }
    }
}

/// Stable actor identity, kept across recycling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Hands out session-unique actor ids
#[derive(Debug, Clone, Default)]
pub struct ActorIds {
    last: u32,
}

impl ActorIds {
    pub fn next(&mut self) -> ActorId {
        self.last += 1;
        ActorId(self.last)
    }
}

/// Something the frame driver scrolls left with the world
pub trait Movable {
    fn step(&mut self, speed: f32, dt: f32);
}

/// Something an [`EntityPool`](super::pool::EntityPool) can recycle
pub trait Poolable {
    /// Bring back into the world at `spawn`
    fn reset(&mut self, spawn: Vec2);
    /// Mark idle
    fn retire(&mut self);
    fn is_active(&self) -> bool;
}

/// Something the physics collaborator reports overlaps for
pub trait Collidable {
    fn actor_id(&self) -> ActorId;
    fn collision_tag(&self) -> CollisionTag;
}

/// Horizontal scroll of a world position by `speed` px/s over `dt`
#[inline]
pub fn motion_step(pos: Vec2, speed: f32, dt: f32) -> Vec2 {
    Vec2::new(pos.x - speed * dt, pos.y)
}

/// A pooled obstacle or collectible
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub pos: Vec2,
    pub active: bool,
    /// Host visual while in the world
    pub visual: Option<VisualId>,
}

impl Actor {
    pub fn new(id: ActorId, kind: ActorKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            active: true,
            visual: None,
        }
    }

    /// Past the recycle threshold on the left
    #[inline]
    pub fn has_exited(&self, threshold: f32) -> bool {
        self.pos.x < threshold
    }
}

impl Movable for Actor {
    fn step(&mut self, speed: f32, dt: f32) {
        // Released in the same tick: nothing to move
        if !self.active {
            return;
        }
        self.pos = motion_step(self.pos, speed, dt);
    }
}

impl Poolable for Actor {
    fn reset(&mut self, spawn: Vec2) {
        self.pos = spawn;
        self.active = true;
    }

    fn retire(&mut self) {
        self.active = false;
        self.visual = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Collidable for Actor {
    fn actor_id(&self) -> ActorId {
        self.id
    }

    fn collision_tag(&self) -> CollisionTag {
        self.kind.tag()
    }
}
