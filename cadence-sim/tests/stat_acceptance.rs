use cadence_sim::{
    DirectionModel, GaussianSampler, NullObserver, RunConfig, ScoreAggregator, Simulation,
    StopHandle,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::convert::TryFrom;

const SAMPLE_SIZE: usize = 5000;
const TOLERANCE: f64 = 0.025;
const RUNS: u64 = 120;

fn repeated_scores(interpretation_percent: f64, cadences: Vec<u32>, seed: u64) -> ScoreAggregator {
    let config = RunConfig {
        goal_distance: 100.0,
        goal_tolerance_percent: 5.0,
        interpretation_percent,
        cadences,
        repeat: true,
        seed: Some(seed),
        ..RunConfig::default()
    };
    let mut simulation = Simulation::new(config)
        .expect("valid config")
        .with_max_runs(Some(RUNS));
    let mut scores = ScoreAggregator::new();
    let outcome = simulation.run(&mut NullObserver, &mut scores, &StopHandle::new());
    assert_eq!(outcome.runs, RUNS);
    scores
}

#[test]
fn gaussian_signal_matches_scaled_normal_quantiles() {
    let mut rng = SmallRng::seed_from_u64(0xBEEF);
    let mut sampler = GaussianSampler::new();
    let sigma = 1.0 / cadence_sim::gaussian::SCALE;
    let mut within_one = 0usize;
    let mut within_two = 0usize;
    for _ in 0..SAMPLE_SIZE {
        let value = sampler.sample(&mut rng).abs();
        if value <= sigma {
            within_one += 1;
        }
        if value <= 2.0 * sigma {
            within_two += 1;
        }
    }
    let total = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    let one = f64::from(u32::try_from(within_one).expect("count fits")) / total;
    let two = f64::from(u32::try_from(within_two).expect("count fits")) / total;
    assert!((one - 0.6827).abs() <= TOLERANCE, "1-sigma share drifted: {one:.4}");
    assert!((two - 0.9545).abs() <= TOLERANCE, "2-sigma share drifted: {two:.4}");
}

#[test]
fn full_fidelity_offsets_point_mostly_toward_goal() {
    let mut rng = SmallRng::seed_from_u64(0xFACE);
    let mut sampler = GaussianSampler::new();
    let model = DirectionModel::new(100.0);
    let total = f64::from(u32::try_from(SAMPLE_SIZE).expect("sample size fits"));
    let mean_cos = (0..SAMPLE_SIZE)
        .map(|_| model.next_offset(&mut sampler, &mut rng).cos())
        .sum::<f64>()
        / total;
    // E[cos(X)] = exp(-s^2 / 2) for X ~ N(0, s^2) with s = pi / 3.6.
    let s = std::f64::consts::PI / cadence_sim::gaussian::SCALE;
    let expected = (-s * s / 2.0).exp();
    assert!(
        (mean_cos - expected).abs() <= TOLERANCE,
        "drift toward goal changed: {mean_cos:.4} vs {expected:.4}"
    );
}

#[test]
fn completion_days_fall_on_cadence_boundaries() {
    let scores = repeated_scores(80.0, vec![3, 7, 12], 11);
    for cadence in [3_u32, 7, 12] {
        let history = scores.history(cadence).expect("cadence recorded");
        assert_eq!(history.len(), usize::try_from(RUNS).expect("fits"));
        assert!(
            history.iter().all(|day| day % u64::from(cadence) == 0),
            "cadence {cadence} completed off-boundary"
        );
    }
}

#[test]
fn completion_respects_minimum_travel_time() {
    // 95 units must be covered in steps of at most `cadence`, and the first
    // step happens on day 0.
    let scores = repeated_scores(100.0, vec![1, 5, 10], 23);
    for (cadence, min_day) in [(1_u32, 94_u64), (5, 90), (10, 90)] {
        let history = scores.history(cadence).expect("cadence recorded");
        assert!(
            history.iter().all(|&day| day >= min_day),
            "cadence {cadence} arrived faster than its step length allows"
        );
    }
}

#[test]
fn misinterpretation_slows_arrival() {
    let precise = repeated_scores(100.0, vec![5], 31).summarize()[&5];
    let noisy = repeated_scores(40.0, vec![5], 31).summarize()[&5];
    assert!(
        noisy.average_days > precise.average_days * 1.2,
        "noise did not slow runs: {:.1} vs {:.1}",
        noisy.average_days,
        precise.average_days
    );
}
