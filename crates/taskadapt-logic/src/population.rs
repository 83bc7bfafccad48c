//! Learner population setup: initial competencies and scaffolding bonuses.
//!
//! Every learner's starting competency profile is sampled independently, and
//! every (step, learner) pair gets its own freshly drawn scaffolding bonus.
//! Nothing is shared or reused across learners or steps; each sampled
//! structure is an independently allocated container.

use rand::Rng;

use crate::constants::{BONUS_MAX, BONUS_MEAN, BONUS_MIN, BONUS_VARIANCE};
use crate::error::SimulationError;
use crate::model::{CategoryValues, SyntaxCategory, SyntaxModel, ValueStructure};
use crate::sampling::{min_max_norm, rgnormal, rnorm};

/// Standard-normal draws for one category's items, min-max normalized to
/// [0,1]. Categories need at least two items for the normalization to be
/// well defined.
pub fn sample_category_vector(
    rng: &mut (impl Rng + ?Sized),
    category: &SyntaxCategory,
    mean: f64,
    stdev: f64,
) -> Result<Vec<f64>, SimulationError> {
    min_max_norm(&rnorm(rng, category.items.len(), mean, stdev))
}

/// One learner's starting competency profile: an independent normalized
/// sample per category.
pub fn create_learner_competencies(
    rng: &mut (impl Rng + ?Sized),
    model: &SyntaxModel,
) -> Result<ValueStructure, SimulationError> {
    let entries = model
        .categories
        .iter()
        .map(|category| {
            Ok(CategoryValues {
                category: category.name.clone(),
                values: sample_category_vector(rng, category, 0.0, 1.0)?,
            })
        })
        .collect::<Result<Vec<_>, SimulationError>>()?;
    Ok(ValueStructure { entries })
}

/// One scaffolding bonus structure: bounded-normal draws with the fixed
/// global bonus distribution. The parameters are tunable constants, not
/// category-dependent.
pub fn create_scaffolding_bonus(
    rng: &mut (impl Rng + ?Sized),
    model: &SyntaxModel,
) -> Result<ValueStructure, SimulationError> {
    let entries = model
        .categories
        .iter()
        .map(|category| {
            Ok(CategoryValues {
                category: category.name.clone(),
                values: rgnormal(
                    rng,
                    category.items.len(),
                    BONUS_MEAN,
                    BONUS_VARIANCE,
                    BONUS_MIN,
                    BONUS_MAX,
                )?,
            })
        })
        .collect::<Result<Vec<_>, SimulationError>>()?;
    Ok(ValueStructure { entries })
}

/// Sampled initial state for a whole simulation run.
#[derive(Debug, Clone)]
pub struct LearnerPopulation {
    /// One starting competency profile per learner.
    pub competencies: Vec<ValueStructure>,
    /// Scaffolding bonuses indexed `[step][learner]`, one independent draw
    /// per pair.
    pub bonuses: Vec<Vec<ValueStructure>>,
}

/// Sample the initial competencies and the full per-step bonus grid. Any
/// sampling failure aborts setup before the simulation runs a single step.
pub fn create_learner_population(
    rng: &mut (impl Rng + ?Sized),
    learner_count: usize,
    step_count: usize,
    model: &SyntaxModel,
) -> Result<LearnerPopulation, SimulationError> {
    let competencies = (0..learner_count)
        .map(|_| create_learner_competencies(rng, model))
        .collect::<Result<Vec<_>, _>>()?;

    let bonuses = (0..step_count)
        .map(|_| {
            (0..learner_count)
                .map(|_| create_scaffolding_bonus(rng, model))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LearnerPopulation {
        competencies,
        bonuses,
    })
}
