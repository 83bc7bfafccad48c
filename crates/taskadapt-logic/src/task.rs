//! Task generation policies.
//!
//! The driver never decides what a task looks like; it asks a [`TaskPolicy`]
//! for one raw-difficulty structure per (step, learner) and feeds the result
//! through the complexity transform. Policies receive a read-only
//! [`LearnerSnapshot`] (current competencies, this step's bonus, and the
//! learner's task/delta history), which is exactly the information a future
//! adaptive selector is allowed to consume, so swapping policies never
//! touches the driver.

use rand::{Rng, RngCore};

use crate::complexity::approximate_frequency;
use crate::constants::{COMPETENCE_CAP, CONVERGENCE_FACTOR, MAX_TASK_DIFFICULTY};
use crate::model::{CategoryValues, SyntaxModel, ValueStructure};
use crate::sampling::sum_capped;

/// Read-only view of one learner at one step.
pub struct LearnerSnapshot<'a> {
    /// Competency profile going into this step.
    pub competencies: &'a ValueStructure,
    /// Scaffolding bonus sampled for this (step, learner) pair.
    pub scaffolding_bonus: &'a ValueStructure,
    /// Complexity structures of every task this learner has attempted.
    pub task_history: &'a [ValueStructure],
    /// Delta structures of every step so far.
    pub delta_history: &'a [ValueStructure],
}

/// A source of raw-difficulty task structures, aligned to the taxonomy.
pub trait TaskPolicy {
    fn generate(
        &mut self,
        model: &SyntaxModel,
        snapshot: LearnerSnapshot<'_>,
        rng: &mut dyn RngCore,
    ) -> ValueStructure;
}

/// Uniform random difficulty per item, ignoring the learner entirely. A
/// placeholder selection policy, kept as the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRandomPolicy;

impl TaskPolicy for UniformRandomPolicy {
    fn generate(
        &mut self,
        model: &SyntaxModel,
        _snapshot: LearnerSnapshot<'_>,
        rng: &mut dyn RngCore,
    ) -> ValueStructure {
        ValueStructure {
            entries: model
                .categories
                .iter()
                .map(|category| CategoryValues {
                    category: category.name.clone(),
                    values: (0..category.items.len())
                        .map(|_| rng.gen_range(0..MAX_TASK_DIFFICULTY) as f64)
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Deterministic policy that pitches every item at the middle of the
/// learner's scaffolded zone: the raw difficulty whose complexity lands
/// halfway between unaided competence and capped competence-plus-bonus,
/// clamped into the valid difficulty range. The delta rule excludes both
/// zone boundaries, so the midpoint guarantees a gain whenever the zone is
/// non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaffoldTargetedPolicy;

impl TaskPolicy for ScaffoldTargetedPolicy {
    fn generate(
        &mut self,
        _model: &SyntaxModel,
        snapshot: LearnerSnapshot<'_>,
        _rng: &mut dyn RngCore,
    ) -> ValueStructure {
        let max_difficulty = (MAX_TASK_DIFFICULTY - 1) as f64;
        ValueStructure {
            entries: snapshot
                .competencies
                .entries
                .iter()
                .zip(&snapshot.scaffolding_bonus.entries)
                .map(|(competence, bonus)| CategoryValues {
                    category: competence.category.clone(),
                    values: competence
                        .values
                        .iter()
                        .zip(&bonus.values)
                        .map(|(&k, &b)| {
                            let reach = sum_capped(&[k, b], COMPETENCE_CAP);
                            let target = 0.5 * (k + reach);
                            approximate_frequency(target, CONVERGENCE_FACTOR)
                                .clamp(0.0, max_difficulty)
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}
