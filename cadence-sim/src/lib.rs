//! Cadence Simulation Engine
//!
//! Platform-agnostic core for simulating goal-seeking random walks that move
//! at different cadences, and for scoring how many days each cadence needs to
//! arrive. Rendering and text formatting live with the caller; this crate only
//! exposes observer hooks and summary data.

pub mod config;
pub mod direction;
pub mod error;
pub mod gaussian;
pub mod numbers;
pub mod observer;
pub mod position;
pub mod rng;
pub mod run_state;
pub mod scheduler;
pub mod score;
pub mod simulation;

// Re-export commonly used types
pub use config::{ProcessParameters, RunConfig, RunParameters};
pub use direction::DirectionModel;
pub use error::ConfigError;
pub use gaussian::GaussianSampler;
pub use observer::{
    NullObserver, ProgressEvent, ProgressRecord, RecordingObserver, SimulationObserver,
};
pub use position::{Point, PositionUpdater, advance};
pub use rng::{CountingRng, RunRng, run_stream};
pub use run_state::{Completion, RunState, StepContext, StepSignal};
pub use scheduler::{Pacing, Scheduler, Step, TickOutcome, run_all};
pub use score::{CadenceSummary, ScoreAggregator};
pub use simulation::{RunReport, Simulation, SimulationOutcome, StopHandle, StopReason};

/// Validate `config`, run it (repeating if requested) and return the scores.
///
/// # Errors
///
/// Returns the configuration error before anything runs.
pub fn simulate(
    config: RunConfig,
    observer: &mut dyn SimulationObserver,
    stop: &StopHandle,
) -> Result<(ScoreAggregator, SimulationOutcome), ConfigError> {
    let mut simulation = Simulation::new(config)?;
    let mut scores = ScoreAggregator::new();
    let outcome = simulation.run(observer, &mut scores, stop);
    Ok((scores, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_returns_scores_for_each_cadence() {
        let config = RunConfig {
            goal_distance: 40.0,
            goal_tolerance_percent: 10.0,
            cadences: vec![1, 2, 8],
            seed: Some(0xABCD),
            ..RunConfig::default()
        };
        let (scores, outcome) =
            simulate(config, &mut NullObserver, &StopHandle::new()).expect("valid config");
        assert_eq!(outcome.runs, 1);
        assert_eq!(outcome.reason, StopReason::SingleRun);
        let summary = scores.summarize();
        assert_eq!(summary.keys().copied().collect::<Vec<_>>(), vec![1, 2, 8]);
        assert!(summary.values().all(|s| s.count == 1 && s.variance.abs() < f64::EPSILON));
    }

    #[test]
    fn simulate_rejects_invalid_config() {
        let config = RunConfig {
            goal_distance: -5.0,
            ..RunConfig::default()
        };
        let err = simulate(config, &mut NullObserver, &StopHandle::new()).unwrap_err();
        assert!(err.to_string().contains("goal_distance"));
    }
}
