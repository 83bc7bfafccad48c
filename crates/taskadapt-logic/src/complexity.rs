//! Task complexity and the competence delta rule.
//!
//! Raw per-item difficulty counts are mapped through a saturating curve into
//! complexity values in [0,1). A learner then gains competence on exactly
//! those items whose complexity is strictly above their unaided competence
//! and strictly below their scaffolded reach (competence plus bonus, capped):
//! tasks at or below current competence teach nothing, and tasks beyond
//! reach even with scaffolding teach nothing either.

use crate::constants::{COMPETENCE_CAP, COMPLEXITY_SATURATION, CONVERGENCE_FACTOR};
use crate::error::SimulationError;
use crate::model::{CategoryValues, ValueStructure};
use crate::sampling::sum_capped;

/// Map a raw non-negative difficulty count to a complexity score in [0,1).
///
/// `frequency^(1/r) / (10 + frequency^(1/r))`: zero at zero, strictly
/// increasing, asymptotically approaching 1. `r` is the convergence factor
/// ([`CONVERGENCE_FACTOR`] in the simulation).
pub fn approximate_complexity(frequency: f64, r: f64) -> f64 {
    let powered = frequency.powf(1.0 / r);
    powered / (COMPLEXITY_SATURATION + powered)
}

/// Inverse of [`approximate_complexity`]: the raw difficulty count that
/// produces the given complexity. Saturates to infinity as `complexity`
/// approaches 1; callers clamp into the valid difficulty range.
pub fn approximate_frequency(complexity: f64, r: f64) -> f64 {
    if complexity <= 0.0 {
        return 0.0;
    }
    if complexity >= 1.0 {
        return f64::INFINITY;
    }
    (COMPLEXITY_SATURATION * complexity / (1.0 - complexity)).powf(r)
}

/// Apply [`approximate_complexity`] to every item of a raw-difficulty task
/// structure.
pub fn complexity_of_task(task: &ValueStructure, r: f64) -> ValueStructure {
    ValueStructure {
        entries: task
            .entries
            .iter()
            .map(|entry| CategoryValues {
                category: entry.category.clone(),
                values: entry
                    .values
                    .iter()
                    .map(|&frequency| approximate_complexity(frequency, r))
                    .collect(),
            })
            .collect(),
    }
}

/// Whether a task of `complexity` is strictly above the learner's unaided
/// `competence` and strictly below their scaffolded reach. Boundary
/// equality on either side yields `false`.
pub fn is_within_scaffolded_reach(complexity: f64, competence: f64, bonus: f64) -> bool {
    let scaffolded = sum_capped(&[competence, bonus], COMPETENCE_CAP);
    competence < complexity && scaffolded > complexity
}

/// Competence gained from one item of one task: `complexity - competence`
/// inside the scaffolded reach, exactly zero outside it.
pub fn determine_delta(complexity: f64, competence: f64, bonus: f64) -> f64 {
    if is_within_scaffolded_reach(complexity, competence, bonus) {
        complexity - competence
    } else {
        0.0
    }
}

/// Elementwise [`determine_delta`] across a whole task. All three structures
/// must share the taxonomy shape.
pub fn compare_competence_and_complexity(
    task_complexity: &ValueStructure,
    competencies: &ValueStructure,
    bonuses: &ValueStructure,
) -> Result<ValueStructure, SimulationError> {
    task_complexity.ensure_same_shape(competencies)?;
    task_complexity.ensure_same_shape(bonuses)?;

    Ok(ValueStructure {
        entries: task_complexity
            .entries
            .iter()
            .zip(&competencies.entries)
            .zip(&bonuses.entries)
            .map(|((task, competence), bonus)| CategoryValues {
                category: task.category.clone(),
                values: task
                    .values
                    .iter()
                    .zip(&competence.values)
                    .zip(&bonus.values)
                    .map(|((&c, &k), &b)| determine_delta(c, k, b))
                    .collect(),
            })
            .collect(),
    })
}
