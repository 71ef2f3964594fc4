//! Lock-step driver advancing every active process one simulated day at a time.
use std::time::Duration;

use log::trace;

/// A schedulable process. Returning `false` removes it from all later ticks.
pub trait Step {
    fn step(&mut self, day: u64) -> bool;
}

impl<F> Step for F
where
    F: FnMut(u64) -> bool,
{
    fn step(&mut self, day: u64) -> bool {
        self(day)
    }
}

/// Wall-clock pacing between ticks. Has no effect on simulated time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pacing {
    pub period: Duration,
}

impl Pacing {
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            period: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn every(period: Duration) -> Self {
        Self { period }
    }

    fn pause(self) {
        if !self.period.is_zero() {
            std::thread::sleep(self.period);
        }
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Day every process observed during the tick.
    pub day: u64,
    /// Processes still active afterwards.
    pub remaining: usize,
}

/// Active set plus the shared day counter.
///
/// Processes are invoked in registration order on every tick; dropping a
/// finished process keeps the relative order of the others.
#[derive(Debug)]
pub struct Scheduler<S> {
    day: u64,
    active: Vec<S>,
}

impl<S: Step> Scheduler<S> {
    #[must_use]
    pub const fn new(processes: Vec<S>) -> Self {
        Self {
            day: 0,
            active: processes,
        }
    }

    /// Day the next tick will run.
    #[must_use]
    pub const fn day(&self) -> u64 {
        self.day
    }

    #[must_use]
    pub fn active(&self) -> usize {
        self.active.len()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.active.is_empty()
    }

    /// Run every active process for the current day, then advance the clock.
    pub fn tick(&mut self) -> TickOutcome {
        let day = self.day;
        self.active.retain_mut(|process| process.step(day));
        self.day += 1;
        trace!("day {day}: {} processes remain", self.active.len());
        TickOutcome {
            day,
            remaining: self.active.len(),
        }
    }

    /// Tick until nothing is active, pausing between ticks per `pacing`.
    /// Returns the number of ticks executed.
    pub fn run_to_completion(&mut self, pacing: Pacing) -> u64 {
        let mut ticks = 0;
        while !self.is_finished() {
            let outcome = self.tick();
            ticks += 1;
            if outcome.remaining > 0 {
                pacing.pause();
            }
        }
        ticks
    }
}

/// Drive `processes` to completion and fire `on_all_complete` exactly once
/// with the tick count.
pub fn run_all<S, F>(processes: Vec<S>, pacing: Pacing, on_all_complete: F) -> u64
where
    S: Step,
    F: FnOnce(u64),
{
    let mut scheduler = Scheduler::new(processes);
    let ticks = scheduler.run_to_completion(pacing);
    on_all_complete(ticks);
    ticks
}
