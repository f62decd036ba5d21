//! Per-kind spawn loop
//!
//! Each spawner owns the pool and the in-world list for one actor kind, so an
//! actor is always in exactly one of the two. Actors enter at a fixed point
//! off the right edge, scroll left with the game speed and go back to the
//! pool once they pass the exit threshold.

use glam::Vec2;

use super::pool::EntityPool;
use super::state::{Actor, ActorId, ActorIds, ActorKind, Collidable, Movable};
use super::timers::Interval;
use crate::platform::{Physics, Renderer, SpriteSpec};
use crate::tuning::SpawnTuning;

#[derive(Debug, Clone)]
pub struct Spawner {
    kind: ActorKind,
    sprite: String,
    scale: f32,
    opacity: f32,
    spawn_pos: Vec2,
    interval: Interval,
    exit_threshold: f32,
    pool: EntityPool<Actor>,
    /// Actors currently in the world, in spawn order
    active: Vec<Actor>,
}

impl Spawner {
    pub fn new(kind: ActorKind, tuning: &SpawnTuning, exit_threshold: f32) -> Self {
        let (lo, hi) = tuning.interval;
        Self {
            kind,
            sprite: tuning.sprite.clone(),
            scale: tuning.scale,
            opacity: tuning.opacity,
            spawn_pos: Vec2::new(tuning.spawn_x, tuning.spawn_y),
            interval: Interval::Uniform(lo, hi),
            exit_threshold,
            pool: EntityPool::new(),
            active: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Delay range until the next spawn
    #[inline]
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Put one actor into the world at the spawn point
    pub fn spawn_once<H>(&mut self, ids: &mut ActorIds, host: &mut H) -> ActorId
    where
        H: Renderer + Physics + ?Sized,
    {
        let kind = self.kind;
        let mut actor = self
            .pool
            .acquire(self.spawn_pos, |pos| Actor::new(ids.next(), kind, pos));

        actor.visual = Some(host.spawn_sprite(&SpriteSpec {
            sprite: self.sprite.clone(),
            pos: actor.pos,
            scale: self.scale,
            opacity: self.opacity,
        }));
        host.sync_collider(actor.id, actor.collision_tag(), actor.pos);

        log::debug!(
            "spawned {:?} {:?} ({} idle, {} built)",
            kind,
            actor.id,
            self.pool.idle_count(),
            self.pool.constructed()
        );

        let id = actor.id;
        self.active.push(actor);
        id
    }

    /// Scroll every in-world actor and recycle the ones past the exit threshold.
    /// Returns how many were recycled.
    pub fn advance<H>(&mut self, speed: f32, dt: f32, host: &mut H) -> usize
    where
        H: Renderer + Physics + ?Sized,
    {
        let mut recycled = 0;
        let mut i = 0;
        while i < self.active.len() {
            let actor = &mut self.active[i];
            actor.step(speed, dt);

            if actor.has_exited(self.exit_threshold) {
                let actor = self.active.remove(i);
                self.recycle(actor, host);
                recycled += 1;
            } else {
                if let Some(visual) = actor.visual {
                    host.move_to(visual, actor.pos);
                }
                host.sync_collider(actor.id, actor.collision_tag(), actor.pos);
                i += 1;
            }
        }
        recycled
    }

    /// Send an in-world actor back to the pool. False if it is not in the world.
    pub fn release<H>(&mut self, id: ActorId, host: &mut H) -> bool
    where
        H: Renderer + Physics + ?Sized,
    {
        match self.active.iter().position(|a| a.id == id) {
            Some(index) => {
                let actor = self.active.remove(index);
                self.recycle(actor, host);
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> &[Actor] {
        &self.active
    }

    pub fn pool(&self) -> &EntityPool<Actor> {
        &self.pool
    }

    fn recycle<H>(&mut self, actor: Actor, host: &mut H)
    where
        H: Renderer + Physics + ?Sized,
    {
        if let Some(visual) = actor.visual {
            host.despawn(visual);
        }
        host.remove_collider(actor.id);
        log::debug!("recycled {:?} {:?}", self.kind, actor.id);
        self.pool.release(actor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessHost;
    use crate::tuning::Tuning;

    fn enemy_spawner() -> Spawner {
        let tuning = Tuning::default();
        Spawner::new(ActorKind::Enemy, &tuning.enemy, tuning.exit_threshold)
    }

    #[test]
    fn test_spawn_places_actor_off_screen_right() {
        let mut host = HeadlessHost::new();
        let mut ids = ActorIds::default();
        let mut spawner = enemy_spawner();

        let id = spawner.spawn_once(&mut ids, &mut host);
        let actor = &spawner.active()[0];
        assert_eq!(actor.id, id);
        assert_eq!(actor.pos, Vec2::new(1950.0, 773.0));
        assert_eq!(host.sprite_count("motobug"), 1);
        assert!(host.has_collider(id));
        assert_eq!(spawner.interval(), Interval::Uniform(0.5, 2.5));
    }

    #[test]
    fn test_spawn_uses_tuned_scale_and_opacity() {
        let mut host = HeadlessHost::new();
        let mut ids = ActorIds::default();
        let tuning = SpawnTuning {
            scale: 2.0,
            opacity: 0.5,
            ..SpawnTuning::collectible()
        };
        let mut spawner = Spawner::new(ActorKind::Collectible, &tuning, -100.0);

        spawner.spawn_once(&mut ids, &mut host);
        let visual = spawner.active()[0].visual.expect("spawned visual");
        let sprite = host.sprite(visual).expect("live sprite");
        assert_eq!(sprite.sprite, "ring");
        assert_eq!(sprite.scale, 2.0);
        assert_eq!(sprite.opacity, 0.5);
    }

    #[test]
    fn test_actor_recycled_past_threshold_then_reused() {
        let mut host = HeadlessHost::new();
        let mut ids = ActorIds::default();
        let mut spawner = enemy_spawner();
        let id = spawner.spawn_once(&mut ids, &mut host);

        // 1950 -> 1950 - 2000 = -50: still inside the margin
        assert_eq!(spawner.advance(2000.0, 1.0, &mut host), 0);
        assert_eq!(spawner.active()[0].pos.x, -50.0);

        assert_eq!(spawner.advance(100.0, 1.0, &mut host), 1);
        assert!(spawner.active().is_empty());
        assert_eq!(spawner.pool().idle_count(), 1);
        assert_eq!(host.sprite_count("motobug"), 0);
        assert!(!host.has_collider(id));

        let again = spawner.spawn_once(&mut ids, &mut host);
        assert_eq!(again, id);
        assert_eq!(spawner.active()[0].pos.x, 1950.0);
        assert_eq!(spawner.pool().constructed(), 1);
    }

    #[test]
    fn test_release_unknown_actor_is_noop() {
        let mut host = HeadlessHost::new();
        let mut ids = ActorIds::default();
        let mut spawner = enemy_spawner();
        let id = spawner.spawn_once(&mut ids, &mut host);

        assert!(spawner.release(id, &mut host));
        // Second release of the same actor (stale event) changes nothing
        assert!(!spawner.release(id, &mut host));
        assert_eq!(spawner.pool().idle_count(), 1);
    }
}
