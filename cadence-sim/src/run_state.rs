//! Per-process mutable state and its daily step.
use std::sync::Arc;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ProcessParameters, RunParameters};
use crate::gaussian::GaussianSampler;
use crate::observer::{ProgressEvent, SimulationObserver};
use crate::position::{Point, PositionUpdater};

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    Continue,
    Complete,
}

impl StepSignal {
    #[must_use]
    pub const fn is_continue(self) -> bool {
        matches!(self, Self::Continue)
    }
}

/// A process that reached its goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub cadence: u32,
    pub tag: String,
    pub day: u64,
    pub iterations: u64,
}

/// Collaborators shared by every process of one run.
pub struct StepContext<'a, R: Rng + ?Sized> {
    pub updater: PositionUpdater,
    pub sampler: GaussianSampler,
    pub observer: &'a mut dyn SimulationObserver,
    pub completions: Vec<Completion>,
    pub rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> StepContext<'a, R> {
    pub fn new(
        updater: PositionUpdater,
        rng: &'a mut R,
        observer: &'a mut dyn SimulationObserver,
    ) -> Self {
        Self {
            updater,
            sampler: GaussianSampler::new(),
            observer,
            completions: Vec::new(),
            rng,
        }
    }
}

/// Mutable record of one process: position, clock and iteration count.
///
/// `distance_to_finish` is derived from `position` after every update and
/// cannot be set directly.
#[derive(Debug, Clone)]
pub struct RunState {
    position: Point,
    previous_position: Point,
    day: u64,
    iteration: u64,
    distance_to_finish: f64,
    completed_on: Option<u64>,
    run: Arc<RunParameters>,
    process: ProcessParameters,
}

impl RunState {
    #[must_use]
    pub fn new(run: Arc<RunParameters>, process: ProcessParameters) -> Self {
        let position = Point::ORIGIN;
        let distance_to_finish = position.distance_to(run.goal);
        Self {
            position,
            previous_position: position,
            day: 0,
            iteration: 0,
            distance_to_finish,
            completed_on: None,
            run,
            process,
        }
    }

    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    #[must_use]
    pub const fn previous_position(&self) -> Point {
        self.previous_position
    }

    #[must_use]
    pub const fn day(&self) -> u64 {
        self.day
    }

    #[must_use]
    pub const fn iteration(&self) -> u64 {
        self.iteration
    }

    #[must_use]
    pub const fn distance_to_finish(&self) -> f64 {
        self.distance_to_finish
    }

    #[must_use]
    pub const fn completed_on(&self) -> Option<u64> {
        self.completed_on
    }

    #[must_use]
    pub const fn process(&self) -> &ProcessParameters {
        &self.process
    }

    #[must_use]
    pub fn parameters(&self) -> &RunParameters {
        &self.run
    }

    /// Arrival is `distance_to_finish < goal_tolerance`; equality keeps going.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.distance_to_finish < self.run.goal_tolerance
    }

    fn move_to(&mut self, next: Point) {
        self.previous_position = self.position;
        self.position = next;
        self.distance_to_finish = next.distance_to(self.run.goal);
    }

    /// Advance to `day`. Moves only on cadence boundaries.
    pub fn step<R: Rng + ?Sized>(&mut self, day: u64, ctx: &mut StepContext<'_, R>) -> StepSignal {
        if self.completed_on.is_some() {
            return StepSignal::Complete;
        }
        self.day = day;
        let cadence = self.process.cadence;
        if day % u64::from(cadence) == 0 {
            self.iteration += 1;
            let next = ctx.updater.update(
                self.position,
                self.run.goal,
                cadence,
                &mut ctx.sampler,
                &mut *ctx.rng,
            );
            self.move_to(next);
            ctx.observer.on_progress(&ProgressEvent {
                tag: &self.process.tag,
                cadence,
                iteration: self.iteration,
                day,
                previous: self.previous_position,
                current: self.position,
                maximums: self.run.maximums,
                distance_to_finish: self.distance_to_finish,
            });
        }
        if !self.has_arrived() {
            return StepSignal::Continue;
        }
        self.completed_on = Some(day);
        debug!(
            "{} arrived on day {day} after {} iterations",
            self.process.tag, self.iteration
        );
        ctx.observer
            .on_process_complete(cadence, &self.process.tag, day);
        ctx.completions.push(Completion {
            cadence,
            tag: self.process.tag.clone(),
            day,
            iterations: self.iteration,
        });
        StepSignal::Complete
    }
}
