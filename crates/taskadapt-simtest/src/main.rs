//! Headless simulation harness.
//!
//! Validates the full task-adaptation engine in-process: no UI, no files
//! except an in-memory save buffer. Runs every subsystem with seeded
//! randomness and prints a pass/fail summary.
//!
//! Usage:
//!   cargo run -p taskadapt-simtest
//!   cargo run -p taskadapt-simtest -- --verbose

use rand::rngs::StdRng;
use rand::SeedableRng;

use taskadapt_logic::complexity::{approximate_complexity, approximate_frequency, determine_delta};
use taskadapt_logic::constants::CONVERGENCE_FACTOR;
use taskadapt_logic::dataset::{build_records, build_sequences, train_test_split, write_records_csv};
use taskadapt_logic::engine::Simulation;
use taskadapt_logic::model::dql_syntax_model;
use taskadapt_logic::persistence::{export_log_json, load_log, save_log};
use taskadapt_logic::population::create_learner_population;
use taskadapt_logic::sampling::{min_max_norm, rgnormal, rnorm, sum_capped};
use taskadapt_logic::task::ScaffoldTargetedPolicy;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Task Adaptation Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Sampling primitives
    results.extend(validate_sampling());

    // 2. Complexity curve
    results.extend(validate_complexity());

    // 3. Delta rule
    results.extend(validate_delta_rule());

    // 4. Population setup
    results.extend(validate_population());

    // 5. End-to-end simulation
    results.extend(validate_simulation());

    // 6. Persistence round-trip
    results.extend(validate_persistence());

    // 7. Dataset export
    results.extend(validate_dataset());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Sampling primitives ──────────────────────────────────────────────

fn validate_sampling() -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(1001);

    let counts_ok = [0usize, 1, 5, 500]
        .iter()
        .all(|&n| rnorm(&mut rng, n, 0.0, 1.0).len() == n);
    results.push(check(
        "rnorm_counts",
        counts_ok,
        "rnorm returns exactly n values, including n = 0".into(),
    ));

    let bounded = rgnormal(&mut rng, 2_000, 0.1, 0.002, 0.0, 0.2).unwrap();
    let in_bounds = bounded.iter().all(|&v| (0.0..=0.2).contains(&v));
    results.push(check(
        "rgnormal_bounds",
        in_bounds,
        format!("{} bounded draws all within [0, 0.2]", bounded.len()),
    ));

    let bad_mean = rgnormal(&mut rng, 4, 0.5, 0.01, 0.6, 1.0).is_err();
    let bad_variance = rgnormal(&mut rng, 4, 0.1, 0.01, 0.0, 0.2).is_err();
    results.push(check(
        "rgnormal_preconditions",
        bad_mean && bad_variance,
        "mean/variance precondition violations rejected".into(),
    ));

    let normed = min_max_norm(&[4.0, -2.0, 9.0]).unwrap();
    let spans_unit = normed.iter().copied().fold(f64::INFINITY, f64::min).abs() < 1e-12
        && (normed.iter().copied().fold(f64::NEG_INFINITY, f64::max) - 1.0).abs() < 1e-12;
    let degenerate_rejected = min_max_norm(&[3.0, 3.0]).is_err();
    results.push(check(
        "min_max_norm",
        spans_unit && degenerate_rejected,
        "normalized span is [0, 1]; zero-range input rejected".into(),
    ));

    let capped_ok = (sum_capped(&[0.3, 0.4], 1.0) - 0.7).abs() < 1e-12
        && (sum_capped(&[0.8, 0.5], 1.0) - 1.0).abs() < 1e-12;
    results.push(check(
        "sum_capped",
        capped_ok,
        "running sum pins at the cap".into(),
    ));

    results
}

// ── 2. Complexity curve ─────────────────────────────────────────────────

fn validate_complexity() -> Vec<TestResult> {
    let mut results = Vec::new();

    let zero_ok = approximate_complexity(0.0, CONVERGENCE_FACTOR) == 0.0;
    let mut monotonic = true;
    let mut bounded = true;
    let mut prev = 0.0;
    for f in 1..=100 {
        let c = approximate_complexity(f as f64, CONVERGENCE_FACTOR);
        monotonic &= c > prev;
        bounded &= c > 0.0 && c < 1.0;
        prev = c;
    }
    results.push(check(
        "complexity_curve",
        zero_ok && monotonic && bounded,
        "zero at 0, strictly increasing, bounded in (0, 1)".into(),
    ));

    let inverse_ok = (0..8).all(|f| {
        let c = approximate_complexity(f as f64, CONVERGENCE_FACTOR);
        (approximate_frequency(c, CONVERGENCE_FACTOR) - f as f64).abs() < 1e-9
    });
    results.push(check(
        "complexity_inverse",
        inverse_ok,
        "frequency recovered from complexity for all difficulty levels".into(),
    ));

    results
}

// ── 3. Delta rule ───────────────────────────────────────────────────────

fn validate_delta_rule() -> Vec<TestResult> {
    let cases = [
        (0.2, 0.0),
        (0.3, 0.0),
        (0.4, 0.1),
        (0.5, 0.0),
        (0.6, 0.0),
    ];
    let all_ok = cases
        .iter()
        .all(|&(c, expected)| (determine_delta(c, 0.3, 0.2) - expected).abs() < 1e-12);

    vec![check(
        "delta_rule",
        all_ok,
        "competence 0.3 + bonus 0.2: gain only strictly inside (0.3, 0.5)".into(),
    )]
}

// ── 4. Population setup ─────────────────────────────────────────────────

fn validate_population() -> Vec<TestResult> {
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(1002);
    let model = dql_syntax_model();

    let population = create_learner_population(&mut rng, 5, 7, &model).unwrap();
    let grid_ok = population.competencies.len() == 5
        && population.bonuses.len() == 7
        && population.bonuses.iter().all(|step| step.len() == 5);
    results.push(check(
        "population_grid",
        grid_ok,
        "5 learner profiles, 7x5 bonus grid".into(),
    ));

    let profiles_normalized = population.competencies.iter().all(|profile| {
        profile.entries.iter().all(|entry| {
            entry.values.iter().all(|&v| (0.0..=1.0).contains(&v))
        })
    });
    results.push(check(
        "population_profiles",
        profiles_normalized,
        "every starting competency within [0, 1]".into(),
    ));

    results
}

// ── 5. End-to-end simulation ────────────────────────────────────────────

fn validate_simulation() -> Vec<TestResult> {
    let mut results = Vec::new();
    let model = dql_syntax_model();

    let mut rng = StdRng::seed_from_u64(1003);
    let empty = Simulation::new(model.clone(), 0, 3).run(&mut rng).unwrap();
    let empty_ok = empty.learner_count() == 3
        && empty.learners.iter().all(|l| l.step_count() == 0);
    results.push(check(
        "zero_step_run",
        empty_ok,
        "0 steps: 3 learners with empty sequences".into(),
    ));

    let mut rng = StdRng::seed_from_u64(1004);
    let log = Simulation::new(model.clone(), 25, 8).run(&mut rng).unwrap();
    let lengths_ok = log.learners.iter().all(|l| {
        l.tasks.len() == 25
            && l.competencies.len() == 25
            && l.scaffolding_bonuses.len() == 25
            && l.deltas.len() == 25
    });
    results.push(check(
        "run_lengths",
        lengths_ok,
        "25 steps x 8 learners: all four sequences full length".into(),
    ));

    let mut recurrence_ok = true;
    for learner in &log.learners {
        for k in 1..learner.step_count() {
            let expected = learner.competencies[k - 1].add(&learner.deltas[k]).unwrap();
            recurrence_ok &= learner.competencies[k] == expected;
        }
    }
    results.push(check(
        "competency_recurrence",
        recurrence_ok,
        "competency[k] == competency[k-1] + delta[k] exactly".into(),
    ));

    let mut rng_a = StdRng::seed_from_u64(1005);
    let mut rng_b = StdRng::seed_from_u64(1005);
    let log_a = Simulation::new(model.clone(), 10, 2).run(&mut rng_a).unwrap();
    let log_b = Simulation::new(model.clone(), 10, 2).run(&mut rng_b).unwrap();
    results.push(check(
        "determinism",
        log_a == log_b,
        "identical seeds produce identical logs".into(),
    ));

    let mut rng = StdRng::seed_from_u64(1006);
    let targeted = Simulation::with_policy(model, 10, 2, ScaffoldTargetedPolicy)
        .run(&mut rng)
        .unwrap();
    results.push(check(
        "targeted_policy",
        targeted.learners.iter().all(|l| l.step_count() == 10),
        "scaffold-targeted policy runs through the same driver".into(),
    ));

    results
}

// ── 6. Persistence round-trip ───────────────────────────────────────────

fn validate_persistence() -> Vec<TestResult> {
    let mut results = Vec::new();
    let model = dql_syntax_model();
    let mut rng = StdRng::seed_from_u64(1007);
    let log = Simulation::new(model.clone(), 5, 3).run(&mut rng).unwrap();

    let mut buffer = Vec::new();
    let roundtrip_ok = save_log(&mut buffer, &model, &log).is_ok()
        && match load_log(buffer.as_slice()) {
            Ok(loaded) => loaded.model == model && loaded.log == log,
            Err(_) => false,
        };
    results.push(check(
        "save_load",
        roundtrip_ok,
        format!("binary round-trip through {} bytes", buffer.len()),
    ));

    let mut json_buffer = Vec::new();
    let json_ok = export_log_json(&mut json_buffer, &log).is_ok()
        && serde_json::from_slice::<taskadapt_logic::engine::SimulationLog>(&json_buffer)
            .map(|back| back == log)
            .unwrap_or(false);
    results.push(check(
        "json_export",
        json_ok,
        format!("JSON export parses back, {} bytes", json_buffer.len()),
    ));

    results
}

// ── 7. Dataset export ───────────────────────────────────────────────────

fn validate_dataset() -> Vec<TestResult> {
    let mut results = Vec::new();
    let model = dql_syntax_model();
    let mut rng = StdRng::seed_from_u64(1008);
    let log = Simulation::new(model.clone(), 12, 6).run(&mut rng).unwrap();

    let sequences = build_sequences(&log, &model);
    let sequences_ok = sequences.len() == 3 * 6
        && sequences
            .iter()
            .all(|s| s.task_ids.len() == 12 && s.solved.len() == 12);
    results.push(check(
        "sequences",
        sequences_ok,
        format!("{} category-learner sequences of 12 steps", sequences.len()),
    ));

    let total = sequences.len();
    let (train, test) = train_test_split(sequences, 0.7, &mut rng);
    results.push(check(
        "train_test_split",
        train.len() + test.len() == total && !train.is_empty() && !test.is_empty(),
        format!("{} train / {} test", train.len(), test.len()),
    ));

    let records = build_records(&log, &model);
    let mut csv = Vec::new();
    let csv_ok = write_records_csv(&records, &mut csv).is_ok()
        && records.len() == 6 * 12 * 9
        && String::from_utf8(csv)
            .map(|text| text.lines().count() == records.len() + 1)
            .unwrap_or(false);
    results.push(check(
        "records_csv",
        csv_ok,
        format!("{} flat records written as CSV", records.len()),
    ));

    results
}
