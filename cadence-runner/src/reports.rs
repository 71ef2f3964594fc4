use anyhow::Result;
use cadence_sim::{CadenceSummary, RunConfig, ScoreAggregator, SimulationOutcome, StopReason};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Everything a report renders: the configuration, how the loop ended and
/// the per-cadence summaries.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub generated_at: String,
    pub config: RunConfig,
    pub runs: u64,
    pub total_days: u64,
    pub stop_reason: StopReason,
    pub summaries: BTreeMap<u32, CadenceSummary>,
}

impl ScoreReport {
    pub fn new(
        generated_at: String,
        config: RunConfig,
        outcome: SimulationOutcome,
        scores: &ScoreAggregator,
    ) -> Self {
        Self {
            generated_at,
            config,
            runs: outcome.runs,
            total_days: outcome.total_days,
            stop_reason: outcome.reason,
            summaries: scores.summarize(),
        }
    }
}

const fn reason_label(reason: StopReason) -> &'static str {
    match reason {
        StopReason::SingleRun => "single run",
        StopReason::RunLimit => "run limit reached",
        StopReason::Stopped => "stopped",
    }
}

pub fn generate_console_report(out: &mut dyn Write, report: &ScoreReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Cadence Score Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "========================".cyan())?;
    writeln!(out, "Runs: {} ({})", report.runs, reason_label(report.stop_reason))?;
    writeln!(
        out,
        "Goal: {} | Tolerance: {}% | Interpretation: {}%",
        report.config.goal_distance,
        report.config.goal_tolerance_percent,
        report.config.interpretation_percent
    )?;
    writeln!(out)?;

    if report.summaries.is_empty() {
        writeln!(out, "No completions recorded.")?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>8} {:>6} {:>12} {:>12} {:>10}",
        "Cadence", "Runs", "Avg days", "Variance", "Std dev"
    )?;
    for (cadence, summary) in &report.summaries {
        writeln!(
            out,
            "{:>8} {:>6} {:>12.2} {:>12.2} {:>10.2}",
            cadence.to_string().bold(),
            summary.count,
            summary.average_days,
            summary.variance,
            summary.stddev
        )?;
    }

    let fastest = report
        .summaries
        .iter()
        .min_by(|a, b| a.1.average_days.total_cmp(&b.1.average_days));
    if let Some((cadence, summary)) = fastest {
        writeln!(out)?;
        writeln!(
            out,
            "Fastest cadence: {} ({:.2} days on average)",
            cadence.to_string().green(),
            summary.average_days
        )?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, report: &ScoreReport) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, report: &ScoreReport) -> Result<()> {
    writeln!(out, "# Cadence Score Report\n")?;
    writeln!(out, "- **Generated**: {}", report.generated_at)?;
    writeln!(
        out,
        "- **Runs**: {} ({})",
        report.runs,
        reason_label(report.stop_reason)
    )?;
    writeln!(out, "- **Goal distance**: {}", report.config.goal_distance)?;
    writeln!(
        out,
        "- **Goal tolerance**: {}%",
        report.config.goal_tolerance_percent
    )?;
    writeln!(
        out,
        "- **Interpretation**: {}%\n",
        report.config.interpretation_percent
    )?;

    if report.summaries.is_empty() {
        writeln!(out, "_No completions recorded._")?;
        return Ok(());
    }

    writeln!(out, "| Cadence | Runs | Avg days | Variance | Std dev |")?;
    writeln!(out, "|--------:|-----:|---------:|---------:|--------:|")?;
    for (cadence, summary) in &report.summaries {
        writeln!(
            out,
            "| {cadence} | {} | {:.2} | {:.2} | {:.2} |",
            summary.count, summary.average_days, summary.variance, summary.stddev
        )?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, report: &ScoreReport) -> Result<()> {
    writeln!(out, "cadence,count,average_days,variance,stddev")?;
    for (cadence, summary) in &report.summaries {
        writeln!(
            out,
            "{cadence},{},{:.4},{:.4},{:.4}",
            summary.count, summary.average_days, summary.variance, summary.stddev
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> ScoreReport {
        let mut scores = ScoreAggregator::new();
        scores.record(7, 10);
        scores.record(7, 20);
        scores.record(1, 12);
        ScoreReport::new(
            "2026-01-01T00:00:00Z".to_string(),
            RunConfig::default(),
            SimulationOutcome {
                runs: 2,
                total_days: 41,
                reason: StopReason::RunLimit,
            },
            &scores,
        )
    }

    fn render(f: fn(&mut dyn Write, &ScoreReport) -> Result<()>, report: &ScoreReport) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        f(&mut buf, report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn csv_lists_one_row_per_cadence() {
        let csv = render(generate_csv_report, &sample_report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "cadence,count,average_days,variance,stddev");
        assert_eq!(lines[1], "1,1,12.0000,0.0000,0.0000");
        assert_eq!(lines[2], "7,2,15.0000,25.0000,5.0000");
    }

    #[test]
    fn json_contains_summaries_and_reason() {
        let json = render(generate_json_report, &sample_report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["runs"], 2);
        assert_eq!(value["stop_reason"], "run_limit");
        assert_eq!(value["summaries"]["7"]["count"], 2);
        assert_eq!(value["summaries"]["7"]["stddev"], 5.0);
    }

    #[test]
    fn markdown_renders_table() {
        let md = render(generate_markdown_report, &sample_report());
        assert!(md.starts_with("# Cadence Score Report"));
        assert!(md.contains("| 7 | 2 | 15.00 | 25.00 | 5.00 |"));
    }

    #[test]
    fn console_names_fastest_cadence() {
        let console = render(generate_console_report, &sample_report());
        assert!(console.contains("Cadence Score Summary"));
        assert!(console.contains("run limit reached"));
        assert!(console.contains("Fastest cadence: 1 (12.00 days on average)"));
    }

    #[test]
    fn empty_scores_are_reported() {
        let report = ScoreReport::new(
            "now".to_string(),
            RunConfig::default(),
            SimulationOutcome {
                runs: 0,
                total_days: 0,
                reason: StopReason::Stopped,
            },
            &ScoreAggregator::new(),
        );
        assert!(render(generate_console_report, &report).contains("No completions recorded."));
        assert!(render(generate_markdown_report, &report).contains("_No completions recorded._"));
        assert_eq!(render(generate_csv_report, &report).lines().count(), 1);
    }
}
