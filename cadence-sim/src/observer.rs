//! Observation hooks for renderers and score displays.
use serde::{Deserialize, Serialize};

use crate::position::Point;
use crate::simulation::RunReport;

/// Emitted once per cadence boundary per process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent<'a> {
    pub tag: &'a str,
    pub cadence: u32,
    pub iteration: u64,
    pub day: u64,
    pub previous: Point,
    pub current: Point,
    pub maximums: Point,
    pub distance_to_finish: f64,
}

/// Owned copy of a [`ProgressEvent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub tag: String,
    pub cadence: u32,
    pub iteration: u64,
    pub day: u64,
    pub previous: Point,
    pub current: Point,
    pub maximums: Point,
    pub distance_to_finish: f64,
}

impl From<&ProgressEvent<'_>> for ProgressRecord {
    fn from(event: &ProgressEvent<'_>) -> Self {
        Self {
            tag: event.tag.to_string(),
            cadence: event.cadence,
            iteration: event.iteration,
            day: event.day,
            previous: event.previous,
            current: event.current,
            maximums: event.maximums,
            distance_to_finish: event.distance_to_finish,
        }
    }
}

/// Display collaborator. Purely observational: nothing returned here feeds
/// back into the simulation.
pub trait SimulationObserver {
    fn on_progress(&mut self, _event: &ProgressEvent<'_>) {}

    fn on_process_complete(&mut self, _cadence: u32, _tag: &str, _day: u64) {}

    fn on_run_complete(&mut self, _report: &RunReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SimulationObserver for NullObserver {}

/// Observer that keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub progress: Vec<ProgressRecord>,
    pub completions: Vec<(u32, String, u64)>,
    pub runs: Vec<RunReport>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Progress events for one tag, in emission order.
    pub fn progress_for<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a ProgressRecord> {
        self.progress.iter().filter(move |record| record.tag == tag)
    }
}

impl SimulationObserver for RecordingObserver {
    fn on_progress(&mut self, event: &ProgressEvent<'_>) {
        self.progress.push(ProgressRecord::from(event));
    }

    fn on_process_complete(&mut self, cadence: u32, tag: &str, day: u64) {
        self.completions.push((cadence, tag.to_string(), day));
    }

    fn on_run_complete(&mut self, report: &RunReport) {
        self.runs.push(report.clone());
    }
}
