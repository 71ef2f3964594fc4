//! Run driver: builds fresh process states, schedules them, scores completions
//! and repeats on request.
use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{ProcessParameters, RunConfig, RunParameters};
use crate::direction::DirectionModel;
use crate::error::ConfigError;
use crate::observer::SimulationObserver;
use crate::position::PositionUpdater;
use crate::rng::run_stream;
use crate::run_state::{Completion, RunState, StepContext};
use crate::scheduler::{Pacing, run_all};
use crate::score::ScoreAggregator;

/// Cooperative stop flag, checked only between full runs.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Outcome of one full run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_index: u64,
    /// Ticks executed until the last process arrived.
    pub days: u64,
    /// Completions in arrival order.
    pub completions: Vec<Completion>,
    pub rng_draws: u64,
}

/// Why [`Simulation::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Repeat mode was off.
    SingleRun,
    /// The configured run limit was reached.
    RunLimit,
    /// The stop handle was triggered.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub runs: u64,
    pub total_days: u64,
    pub reason: StopReason,
}

/// Validated simulation ready to run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: RunConfig,
    params: Arc<RunParameters>,
    max_runs: Option<u64>,
    runs_completed: u64,
}

impl Simulation {
    /// Validate `config` and resolve its parameters. Nothing is scheduled on
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns the first configuration violation.
    pub fn new(config: RunConfig) -> Result<Self, ConfigError> {
        let params = Arc::new(RunParameters::from_config(&config)?);
        Ok(Self {
            config,
            params,
            max_runs: None,
            runs_completed: 0,
        })
    }

    /// Bound the number of runs in repeat mode. `None` repeats until stopped.
    #[must_use]
    pub const fn with_max_runs(mut self, max_runs: Option<u64>) -> Self {
        self.max_runs = max_runs;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RunConfig {
        &self.config
    }

    #[must_use]
    pub fn parameters(&self) -> &RunParameters {
        &self.params
    }

    #[must_use]
    pub const fn runs_completed(&self) -> u64 {
        self.runs_completed
    }

    fn fresh_states(&self) -> Vec<RunState> {
        self.config
            .cadences
            .iter()
            .map(|&cadence| {
                RunState::new(
                    Arc::clone(&self.params),
                    ProcessParameters::for_cadence(cadence),
                )
            })
            .collect()
    }

    /// Execute one run from day 0 until every process has arrived, recording
    /// each completion day under its cadence.
    pub fn run_once(
        &mut self,
        observer: &mut dyn SimulationObserver,
        scores: &mut ScoreAggregator,
    ) -> RunReport {
        let run_index = self.runs_completed;
        let mut rng = run_stream(self.config.seed, run_index);
        let updater =
            PositionUpdater::new(DirectionModel::new(self.params.interpretation_percent));
        let ctx = RefCell::new(StepContext::new(updater, &mut rng, &mut *observer));

        let processes: Vec<_> = self
            .fresh_states()
            .into_iter()
            .map(|mut state| {
                let ctx = &ctx;
                move |day: u64| {
                    let mut ctx = ctx.borrow_mut();
                    state.step(day, &mut *ctx).is_continue()
                }
            })
            .collect();
        let days = run_all(processes, Pacing::every(self.config.period()), |ticks| {
            debug!("run {run_index}: all processes arrived after {ticks} ticks");
        });
        let completions = ctx.into_inner().completions;

        for completion in &completions {
            scores.record(completion.cadence, completion.day);
        }
        self.runs_completed += 1;

        let report = RunReport {
            run_index,
            days,
            completions,
            rng_draws: rng.draws(),
        };
        info!(
            "run {run_index} finished in {days} days ({} draws)",
            report.rng_draws
        );
        observer.on_run_complete(&report);
        report
    }

    /// Run once, then keep restarting with fresh states while repeat mode is
    /// on. The stop handle and run limit are consulted only after a run has
    /// fully completed.
    pub fn run(
        &mut self,
        observer: &mut dyn SimulationObserver,
        scores: &mut ScoreAggregator,
        stop: &StopHandle,
    ) -> SimulationOutcome {
        let mut runs = 0;
        let mut total_days = 0;
        loop {
            let report = self.run_once(observer, scores);
            runs += 1;
            total_days += report.days;

            let reason = if !self.config.repeat {
                Some(StopReason::SingleRun)
            } else if self.max_runs.is_some_and(|max| runs >= max) {
                Some(StopReason::RunLimit)
            } else if stop.is_stopped() {
                warn!("repeat stopped after {runs} runs");
                Some(StopReason::Stopped)
            } else {
                None
            };

            if let Some(reason) = reason {
                return SimulationOutcome {
                    runs,
                    total_days,
                    reason,
                };
            }
        }
    }
}
