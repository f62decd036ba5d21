//! Recycling pool for world actors
//!
//! Idle actors are kept on a stack: the most recently released one is the
//! next one handed out. An empty pool is not an error, it builds a new
//! actor through the caller's constructor.

use glam::Vec2;

use super::state::Poolable;

/// Stack of idle, reusable actors of one kind
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    /// Idle actors (last released on top)
    idle: Vec<T>,
    /// Actors ever constructed through this pool
    constructed: usize,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self {
            idle: Vec::new(),
            constructed: 0,
        }
    }
}

impl<T: Poolable> EntityPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the last released actor reset to `spawn`, or build one with `make`
    pub fn acquire(&mut self, spawn: Vec2, make: impl FnOnce(Vec2) -> T) -> T {
        match self.idle.pop() {
            Some(mut item) => {
                item.reset(spawn);
                item
            }
            None => {
                self.constructed += 1;
                make(spawn)
            }
        }
    }

    /// Return an actor; it is marked idle and reused before older ones
    pub fn release(&mut self, mut item: T) {
        item.retire();
        self.idle.push(item);
    }

    /// Number of idle actors waiting for reuse
    #[inline]
    pub fn idle_count(&self) -> usize {
        self.idle.len()
    }

    /// Total actors this pool has ever allocated
    #[inline]
    pub fn constructed(&self) -> usize {
        self.constructed
    }

    pub fn idle(&self) -> impl Iterator<Item = &T> {
        self.idle.iter()
    }
}
