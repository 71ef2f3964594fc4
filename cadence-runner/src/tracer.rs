use cadence_sim::numbers::round_f64_to_i64;
use cadence_sim::{ProgressEvent, RunReport, SimulationObserver};
use colored::Colorize;
use std::io::Write;

/// Console observer printing one status line per cadence boundary when
/// verbose, and one line per finished run.
pub struct ConsoleTracer<W: Write> {
    out: W,
    verbose: bool,
}

impl<W: Write> ConsoleTracer<W> {
    pub const fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn status_line(event: &ProgressEvent<'_>) -> String {
    format!(
        "Tag: {}. Cadence: {}. Iteration: {}. Progress: {}. Days: {}",
        event.tag,
        event.cadence,
        event.iteration,
        round_f64_to_i64(event.current.x),
        event.day
    )
}

impl<W: Write> SimulationObserver for ConsoleTracer<W> {
    fn on_progress(&mut self, event: &ProgressEvent<'_>) {
        if self.verbose {
            let _ = writeln!(self.out, "  {}", status_line(event).dimmed());
        }
    }

    fn on_process_complete(&mut self, _cadence: u32, tag: &str, day: u64) {
        if self.verbose {
            let _ = writeln!(self.out, "  🏁 {} arrived on day {day}", tag.green());
        }
    }

    fn on_run_complete(&mut self, report: &RunReport) {
        let _ = writeln!(
            self.out,
            "✅ Run {} finished after {} days",
            (report.run_index + 1).to_string().bright_white(),
            report.days
        );
    }
}
