//! Gameplay session
//!
//! Owns every piece of run state (speed, rings, spawners, score, gate,
//! timers) and wires them to the host. The host drives it through
//! [`tick`](super::tick::tick); nothing here is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde_json::json;

use super::collision::{CollisionResolver, Resolution};
use super::score::ScoreTracker;
use super::scroll::ScrollManager;
use super::spawn::Spawner;
use super::speed::SpeedController;
use super::state::{ActorIds, ActorKind, SessionPhase};
use super::timers::{Fired, Interval, TimerTask, Timers};
use crate::audio::{AudioHandle, Cue, PlayRequest};
use crate::consts::{GAME_OVER_SCENE, SCORE_BUS_KEY};
use crate::platform::{Host, Overlap, Rect, TextLabel, TransitionPayload};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct GameSession {
    tuning: Tuning,
    seed: u64,
    rng: Pcg32,
    phase: SessionPhase,
    pub(super) timers: Timers,
    speed: SpeedController,
    pub(super) scroll: ScrollManager,
    pub(super) enemies: Spawner,
    pub(super) collectibles: Spawner,
    ids: ActorIds,
    pub(super) score: ScoreTracker,
    resolver: CollisionResolver,
    /// Callout text currently shown
    callout: Option<String>,
    /// Looping ambience, handed to the game-over scene
    ambient: Option<AudioHandle>,
}

impl GameSession {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let enemies = Spawner::new(ActorKind::Enemy, &tuning.enemy, tuning.exit_threshold);
        let collectibles = Spawner::new(
            ActorKind::Collectible,
            &tuning.collectible,
            tuning.exit_threshold,
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SessionPhase::Idle,
            timers: Timers::new(),
            speed: SpeedController::from_tuning(&tuning),
            scroll: ScrollManager::new(&tuning.background, &tuning.platforms),
            enemies,
            collectibles,
            ids: ActorIds::default(),
            score: ScoreTracker::new(),
            resolver: CollisionResolver::new(&tuning),
            callout: None,
            ambient: None,
            tuning,
        }
    }

    /// Build a session and wire it to `host` in one go
    pub fn launch<H: Host + ?Sized>(host: &mut H, tuning: Tuning, seed: u64) -> Self {
        let mut session = Self::new(tuning, seed);
        session.start(host);
        session
    }

    /// Set up the scene on the host and start every loop
    pub fn start<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.phase != SessionPhase::Idle {
            log::warn!("session already started ({:?})", self.phase);
            return;
        }

        self.ambient = Some(host.play(PlayRequest::new(Cue::City, &self.tuning.volumes)));
        host.set_gravity(self.tuning.gravity);

        self.scroll
            .attach(host, &self.tuning.background, &self.tuning.platforms);
        host.set_text(TextLabel::Score, &self.score.label());
        host.set_text(TextLabel::Callout, "");

        host.add_static_ground(Rect::new(
            0.0,
            self.tuning.ground_y,
            self.tuning.ground_width,
            self.tuning.ground_height,
        ));

        self.phase = SessionPhase::Running;

        // First actor of each kind right away, then the self-rescheduling loop
        for kind in ActorKind::ALL {
            self.spawn(kind, host);
            let interval = self.spawner(kind).interval();
            self.timers
                .repeat(interval, TimerTask::Spawn(kind), &mut self.rng);
        }
        self.timers.repeat(
            Interval::Fixed(self.tuning.speed_period),
            TimerTask::SpeedTick,
            &mut self.rng,
        );

        log::info!(
            "session started (seed {}, speed {})",
            self.seed,
            self.speed.current()
        );
    }

    /// Execute a fired timer. Anything firing after the session ended is dropped.
    pub fn run_timer<H: Host + ?Sized>(&mut self, fired: Fired, host: &mut H) {
        if !self.phase.is_live() {
            log::debug!("dropping {:?} fired while {:?}", fired.task, self.phase);
            return;
        }

        match fired.task {
            TimerTask::SpeedTick => {
                self.speed.tick();
                log::debug!("speed -> {}", self.speed.current());
            }
            TimerTask::Spawn(kind) => {
                self.spawn(kind, host);
            }
            TimerTask::ClearCallout => {
                // Every event clears one duration later, even over newer text
                if self.callout.take().is_some() {
                    host.set_text(TextLabel::Callout, "");
                }
            }
            TimerTask::ReopenGate => self.resolver.reopen_gate(),
        }

        self.timers.rearm(&fired, &mut self.rng);
    }

    /// React to one player/actor overlap reported by physics
    pub fn handle_overlap<H: Host + ?Sized>(&mut self, overlap: Overlap, host: &mut H) {
        if !self.phase.is_live() {
            log::debug!("dropping {:?} after session ended", overlap);
            return;
        }

        let kind = overlap.tag.kind();
        if !self
            .spawner(kind)
            .active()
            .iter()
            .any(|a| a.id == overlap.actor)
        {
            log::warn!("overlap with {:?} which is not in the world", overlap.actor);
            return;
        }

        let grounded = host.is_grounded();
        let resolution = self.resolver.resolve(overlap.tag, grounded, &mut self.score);

        match &resolution {
            Resolution::Ignored => return,
            Resolution::EnemyDefeated {
                multiplier, points, ..
            } => {
                log::debug!("enemy {:?} defeated: x{} (+{})", overlap.actor, multiplier, points);
                self.play(Cue::Destroy, host);
                self.play(Cue::HyperRing, host);
                self.enemies.release(overlap.actor, host);
                host.bounce_player();
            }
            Resolution::Collected { points, .. } => {
                log::debug!("collected {:?} (+{})", overlap.actor, points);
                self.play(Cue::Ring, host);
                self.collectibles.release(overlap.actor, host);
            }
            Resolution::PlayerDefeated { final_score } => {
                self.game_over(*final_score, host);
                return;
            }
        }

        host.set_text(TextLabel::Score, &self.score.label());
        if let Some(text) = resolution.callout() {
            self.show_callout(text, host);
        }
        if resolution.needs_reopen() {
            self.timers
                .after(self.resolver.gate().cooldown(), TimerTask::ReopenGate);
        }
    }

    fn show_callout<H: Host + ?Sized>(&mut self, text: &str, host: &mut H) {
        self.callout = Some(text.to_string());
        host.set_text(TextLabel::Callout, text);
        self.timers
            .after(self.tuning.callout_duration, TimerTask::ClearCallout);
    }

    fn game_over<H: Host + ?Sized>(&mut self, final_score: u64, host: &mut H) {
        self.play(Cue::Hurt, host);
        host.set(SCORE_BUS_KEY, json!(final_score));
        self.phase = SessionPhase::GameOver;
        log::info!(
            "player defeated: score {} at speed {}",
            final_score,
            self.speed.current()
        );
        host.transition_to(
            GAME_OVER_SCENE,
            TransitionPayload {
                ambient: self.ambient,
            },
        );
    }

    fn spawn<H: Host + ?Sized>(&mut self, kind: ActorKind, host: &mut H) {
        let spawner = match kind {
            ActorKind::Enemy => &mut self.enemies,
            ActorKind::Collectible => &mut self.collectibles,
        };
        spawner.spawn_once(&mut self.ids, host);
    }

    fn play<H: Host + ?Sized>(&self, cue: Cue, host: &mut H) {
        host.play(PlayRequest::new(cue, &self.tuning.volumes));
    }

    pub fn spawner(&self, kind: ActorKind) -> &Spawner {
        match kind {
            ActorKind::Enemy => &self.enemies,
            ActorKind::Collectible => &self.collectibles,
        }
    }

    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.phase.is_live()
    }

    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    pub fn scroll(&self) -> &ScrollManager {
        &self.scroll
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn callout(&self) -> Option<&str> {
        self.callout.as_deref()
    }

    pub fn ambient(&self) -> Option<AudioHandle> {
        self.ambient
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}
