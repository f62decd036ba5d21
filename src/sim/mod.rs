//! Deterministic gameplay core
//!
//! All run logic lives here. This module must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Delays measured in simulation ticks
//! - Host access only through `platform` traits

pub mod collision;
pub mod pool;
pub mod score;
pub mod scroll;
pub mod session;
pub mod spawn;
pub mod speed;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{CollisionGate, CollisionResolver, GateState, Resolution};
pub use pool::EntityPool;
pub use score::ScoreTracker;
pub use scroll::{ScrollManager, ScrollRing};
pub use session::GameSession;
pub use spawn::Spawner;
pub use speed::SpeedController;
pub use state::{
    Actor, ActorId, ActorKind, Collidable, CollisionTag, Movable, Poolable, SessionPhase,
    motion_step,
};
pub use tick::{FrameDriver, tick};
pub use timers::{Fired, Interval, TimerTask, Timers};

use crate::platform::Host;
use crate::tuning::Tuning;

/// Build and wire a session with the stock tuning and a fresh seed
pub fn game<H: Host + ?Sized>(host: &mut H) -> GameSession {
    GameSession::launch(host, Tuning::default(), rand::random())
}
