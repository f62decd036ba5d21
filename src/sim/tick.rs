//! Fixed timestep frame driver
//!
//! One call to [`tick`] is one simulation step. Order within a step:
//! 1. due timers (each checks session liveness itself)
//! 2. combo reset if the player is grounded
//! 3. scroll rings
//! 4. actor motion and recycling
//! 5. overlap events from physics

use super::session::GameSession;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::platform::Host;

/// Advance the session by one fixed timestep
pub fn tick<H: Host + ?Sized>(session: &mut GameSession, host: &mut H, dt: f32) {
    // Timers fire even after game over so stale ones are observed and dropped
    for fired in session.timers.advance() {
        session.run_timer(fired, host);
    }

    if !session.is_live() {
        return;
    }

    session
        .score
        .reset_multiplier_if_grounded(host.is_grounded());

    let speed = session.speed().current();
    session.scroll.advance(speed, dt);
    session.scroll.sync(host);

    session.enemies.advance(speed, dt, host);
    session.collectibles.advance(speed, dt, host);

    for overlap in host.drain_overlaps() {
        session.handle_overlap(overlap, host);
    }
}

/// Converts variable frame times into fixed simulation steps
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator: f32,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many fixed steps as `frame_dt` covers (capped). Returns the steps taken.
    pub fn update<H: Host + ?Sized>(
        &mut self,
        session: &mut GameSession,
        host: &mut H,
        frame_dt: f32,
    ) -> u32 {
        self.accumulator += frame_dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(session, host, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
