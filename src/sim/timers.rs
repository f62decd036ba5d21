//! Deferred and repeating tasks on the simulation clock
//!
//! Every delayed action (speed ramp, spawn loops, callout clear, gate
//! reopen) is a value in this queue rather than a stored closure. The frame
//! driver advances the clock one tick at a time and executes whatever fell
//! due. Nothing is ever cancelled: the executor decides, per fired task,
//! whether the session is still alive enough to act on it and whether a
//! repeating task gets re-armed.

use rand::Rng;

use super::state::ActorKind;
use crate::secs_to_ticks;

/// What to do when a timer fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Raise the game speed
    SpeedTick,
    /// Spawn the next actor of a kind
    Spawn(ActorKind),
    /// Clear the score callout
    ClearCallout,
    /// Reopen the collision gate
    ReopenGate,
}

/// Delay between firings of a repeating task (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interval {
    Fixed(f32),
    /// Uniformly sampled from `[lo, hi]` each time
    Uniform(f32, f32),
}

impl Interval {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        match *self {
            Interval::Fixed(secs) => secs,
            Interval::Uniform(lo, hi) if hi > lo => rng.random_range(lo..=hi),
            Interval::Uniform(lo, _) => lo,
        }
    }
}

/// A task handed back by [`Timers::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired {
    pub task: TimerTask,
    /// Set for repeating tasks; pass back to [`Timers::rearm`] to keep the loop going
    pub interval: Option<Interval>,
}

#[derive(Debug, Clone)]
struct Pending {
    due: u64,
    seq: u64,
    task: TimerTask,
    interval: Option<Interval>,
}

/// Tick-based timer queue
#[derive(Debug, Clone, Default)]
pub struct Timers {
    now: u64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation tick
    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Fire `task` once after `secs`
    pub fn after(&mut self, secs: f32, task: TimerTask) {
        self.push(secs_to_ticks(secs), task, None);
    }

    /// Fire `task` after a first sample of `interval`, then keep it repeating via [`Timers::rearm`]
    pub fn repeat<R: Rng>(&mut self, interval: Interval, task: TimerTask, rng: &mut R) {
        let delay = interval.sample(rng);
        self.push(secs_to_ticks(delay), task, Some(interval));
    }

    /// Re-register a fired repeating task with a fresh delay. Returns false for one-shot tasks.
    pub fn rearm<R: Rng>(&mut self, fired: &Fired, rng: &mut R) -> bool {
        match fired.interval {
            Some(interval) => {
                self.repeat(interval, fired.task, rng);
                true
            }
            None => false,
        }
    }

    /// Advance the clock one tick and take every task now due, in due/registration order
    pub fn advance(&mut self) -> Vec<Fired> {
        self.now += 1;
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|p| (p.due, p.seq));

        due.into_iter()
            .map(|p| Fired {
                task: p.task,
                interval: p.interval,
            })
            .collect()
    }

    /// Number of timers still waiting
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Ticks until the earliest pending instance of `task`
    pub fn ticks_until(&self, task: TimerTask) -> Option<u64> {
        self.pending
            .iter()
            .filter(|p| p.task == task)
            .map(|p| p.due - self.now)
            .min()
    }

    fn push(&mut self, delay_ticks: u64, task: TimerTask, interval: Option<Interval>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now + delay_ticks,
            seq,
            task,
            interval,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run_until_fired(timers: &mut Timers, max_ticks: u64) -> Vec<(u64, TimerTask)> {
        let mut log = Vec::new();
        for _ in 0..max_ticks {
            for fired in timers.advance() {
                log.push((timers.now(), fired.task));
            }
        }
        log
    }

    #[test]
    fn test_one_shot_fires_once_at_delay() {
        let mut timers = Timers::new();
        timers.after(0.5, TimerTask::ReopenGate);
        let log = run_until_fired(&mut timers, 200);
        assert_eq!(log, vec![(60, TimerTask::ReopenGate)]);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_same_tick_fires_in_registration_order() {
        let mut timers = Timers::new();
        timers.after(1.0, TimerTask::ClearCallout);
        timers.after(1.0, TimerTask::ReopenGate);
        let log = run_until_fired(&mut timers, 120);
        assert_eq!(
            log,
            vec![
                (120, TimerTask::ClearCallout),
                (120, TimerTask::ReopenGate)
            ]
        );
    }

    #[test]
    fn test_repeat_only_continues_when_rearmed() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut timers = Timers::new();
        timers.repeat(Interval::Fixed(1.0), TimerTask::SpeedTick, &mut rng);

        let mut fired_at = Vec::new();
        for _ in 0..360 {
            for fired in timers.advance() {
                fired_at.push(timers.now());
                if fired_at.len() < 2 {
                    assert!(timers.rearm(&fired, &mut rng));
                }
            }
        }
        assert_eq!(fired_at, vec![120, 240]);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_uniform_interval_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        let interval = Interval::Uniform(0.5, 2.5);
        for _ in 0..1000 {
            let secs = interval.sample(&mut rng);
            assert!((0.5..=2.5).contains(&secs));
        }
        assert_eq!(Interval::Uniform(1.0, 1.0).sample(&mut rng), 1.0);
    }

    #[test]
    fn test_ticks_until() {
        let mut timers = Timers::new();
        timers.after(0.5, TimerTask::ReopenGate);
        timers.advance();
        assert_eq!(timers.ticks_until(TimerTask::ReopenGate), Some(59));
        assert_eq!(timers.ticks_until(TimerTask::SpeedTick), None);
    }
}
