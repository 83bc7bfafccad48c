//! Simulation driver: setup, the step loop, and the simulation log.
//!
//! A run is a single linear pass. Setup samples every learner's starting
//! competencies and the full `[step][learner]` scaffolding bonus grid; any
//! sampling error aborts there, before a single step executes, so a
//! misconfigured run never produces partial output. The step loop is
//! step-major and learner-minor: all learners attempt step 0, then all
//! attempt step 1, and so on. Each learner's state for step `i + 1` is
//! computed from their state at the end of step `i`.

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::complexity::{compare_competence_and_complexity, complexity_of_task};
use crate::constants::CONVERGENCE_FACTOR;
use crate::error::SimulationError;
use crate::model::{SyntaxModel, ValueStructure};
use crate::population::create_learner_population;
use crate::task::{LearnerSnapshot, TaskPolicy, UniformRandomPolicy};

/// One learner's full history: four parallel step-indexed sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearnerLog {
    /// Complexity structure of the task attempted at each step.
    pub tasks: Vec<ValueStructure>,
    /// Competency profile after each step's update.
    pub competencies: Vec<ValueStructure>,
    /// Scaffolding bonus available at each step.
    pub scaffolding_bonuses: Vec<ValueStructure>,
    /// Competence gained at each step.
    pub deltas: Vec<ValueStructure>,
}

impl LearnerLog {
    pub fn step_count(&self) -> usize {
        self.tasks.len()
    }

    /// Per-step mean competency for one category: the series the chart
    /// consumers plot.
    pub fn competency_series(&self, category_index: usize) -> Vec<f64> {
        self.competencies
            .iter()
            .filter_map(|c| c.category_mean(category_index))
            .collect()
    }
}

/// The sole externally visible artifact of a run: one [`LearnerLog`] per
/// learner, immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationLog {
    pub learners: Vec<LearnerLog>,
}

impl SimulationLog {
    pub fn learner_count(&self) -> usize {
        self.learners.len()
    }
}

/// A configured simulation, ready to run once.
pub struct Simulation<P: TaskPolicy> {
    model: SyntaxModel,
    step_count: usize,
    learner_count: usize,
    policy: P,
}

impl Simulation<UniformRandomPolicy> {
    /// Configure a run with the default uniform random task policy.
    pub fn new(model: SyntaxModel, step_count: usize, learner_count: usize) -> Self {
        Self::with_policy(model, step_count, learner_count, UniformRandomPolicy)
    }
}

impl<P: TaskPolicy> Simulation<P> {
    /// Configure a run with an explicit task policy.
    pub fn with_policy(
        model: SyntaxModel,
        step_count: usize,
        learner_count: usize,
        policy: P,
    ) -> Self {
        Self {
            model,
            step_count,
            learner_count,
            policy,
        }
    }

    /// Execute the run to completion and return the log.
    ///
    /// Consumes the simulation; a run is a single pass with no retry or
    /// resume. All randomness flows through `rng`.
    pub fn run(mut self, rng: &mut impl Rng) -> Result<SimulationLog, SimulationError> {
        let population =
            create_learner_population(rng, self.learner_count, self.step_count, &self.model)?;
        let mut competencies = population.competencies;
        let bonuses = population.bonuses;

        // Independently allocated log containers per learner.
        let mut learners: Vec<LearnerLog> = (0..self.learner_count)
            .map(|_| LearnerLog::default())
            .collect();

        info!(
            "simulation initialized: {} learner(s), {} step(s), {} item(s)",
            self.learner_count,
            self.step_count,
            self.model.item_count()
        );

        for step in 0..self.step_count {
            for learner in 0..self.learner_count {
                let bonus = &bonuses[step][learner];

                let task = self.policy.generate(
                    &self.model,
                    LearnerSnapshot {
                        competencies: &competencies[learner],
                        scaffolding_bonus: bonus,
                        task_history: &learners[learner].tasks,
                        delta_history: &learners[learner].deltas,
                    },
                    &mut *rng,
                );

                let task_complexity = complexity_of_task(&task, CONVERGENCE_FACTOR);
                let delta = compare_competence_and_complexity(
                    &task_complexity,
                    &competencies[learner],
                    bonus,
                )?;
                let updated = competencies[learner].add(&delta)?;

                let entry = &mut learners[learner];
                entry.tasks.push(task_complexity);
                entry.competencies.push(updated.clone());
                entry.scaffolding_bonuses.push(bonus.clone());
                entry.deltas.push(delta);

                // The old profile is discarded; only the log retains it.
                competencies[learner] = updated;
            }
            debug!("step {} complete", step);
        }

        info!("simulation complete");
        Ok(SimulationLog { learners })
    }
}

/// Run a simulation with the default configuration: uniform random tasks,
/// unseeded randomness.
pub fn run_simulation(
    step_count: usize,
    learner_count: usize,
    model: &SyntaxModel,
) -> Result<SimulationLog, SimulationError> {
    Simulation::new(model.clone(), step_count, learner_count).run(&mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dql_syntax_model;
    use crate::task::ScaffoldTargetedPolicy;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_steps_yield_empty_sequences() {
        let mut rng = StdRng::seed_from_u64(31);
        let log = Simulation::new(dql_syntax_model(), 0, 3)
            .run(&mut rng)
            .unwrap();

        assert_eq!(log.learner_count(), 3);
        for learner in &log.learners {
            assert_eq!(learner.step_count(), 0);
            assert!(learner.competencies.is_empty());
            assert!(learner.scaffolding_bonuses.is_empty());
            assert!(learner.deltas.is_empty());
        }
    }

    #[test]
    fn sequences_have_step_count_entries() {
        let mut rng = StdRng::seed_from_u64(32);
        let log = Simulation::new(dql_syntax_model(), 5, 1)
            .run(&mut rng)
            .unwrap();

        assert_eq!(log.learner_count(), 1);
        let learner = &log.learners[0];
        assert_eq!(learner.tasks.len(), 5);
        assert_eq!(learner.competencies.len(), 5);
        assert_eq!(learner.scaffolding_bonuses.len(), 5);
        assert_eq!(learner.deltas.len(), 5);
    }

    #[test]
    fn competency_recurrence_holds() {
        let mut rng = StdRng::seed_from_u64(33);
        let log = Simulation::new(dql_syntax_model(), 8, 2)
            .run(&mut rng)
            .unwrap();

        for learner in &log.learners {
            for k in 1..learner.step_count() {
                let expected = learner.competencies[k - 1]
                    .add(&learner.deltas[k])
                    .unwrap();
                assert_eq!(learner.competencies[k], expected);
            }
        }
    }

    #[test]
    fn deltas_are_nonnegative() {
        let mut rng = StdRng::seed_from_u64(34);
        let log = Simulation::new(dql_syntax_model(), 20, 4)
            .run(&mut rng)
            .unwrap();
        for learner in &log.learners {
            for delta in &learner.deltas {
                for entry in &delta.entries {
                    assert!(entry.values.iter().all(|&v| v >= 0.0));
                }
            }
        }
    }

    #[test]
    fn same_seed_same_log() {
        let model = dql_syntax_model();
        let mut rng_a = StdRng::seed_from_u64(35);
        let mut rng_b = StdRng::seed_from_u64(35);
        let log_a = Simulation::new(model.clone(), 6, 3).run(&mut rng_a).unwrap();
        let log_b = Simulation::new(model, 6, 3).run(&mut rng_b).unwrap();
        assert_eq!(log_a, log_b);
    }

    #[test]
    fn different_seeds_diverge() {
        let model = dql_syntax_model();
        let mut rng_a = StdRng::seed_from_u64(36);
        let mut rng_b = StdRng::seed_from_u64(37);
        let log_a = Simulation::new(model.clone(), 6, 3).run(&mut rng_a).unwrap();
        let log_b = Simulation::new(model, 6, 3).run(&mut rng_b).unwrap();
        assert_ne!(log_a, log_b);
    }

    #[test]
    fn targeted_policy_runs_through_driver() {
        let mut rng = StdRng::seed_from_u64(38);
        let log = Simulation::with_policy(dql_syntax_model(), 10, 1, ScaffoldTargetedPolicy)
            .run(&mut rng)
            .unwrap();
        assert_eq!(log.learners[0].step_count(), 10);
    }

    #[test]
    fn competency_series_length_matches_steps() {
        let mut rng = StdRng::seed_from_u64(39);
        let log = Simulation::new(dql_syntax_model(), 7, 1)
            .run(&mut rng)
            .unwrap();
        let series = log.learners[0].competency_series(0);
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|&v| v.is_finite()));
    }

    #[test]
    fn run_simulation_entry_point() {
        let log = run_simulation(2, 2, &dql_syntax_model()).unwrap();
        assert_eq!(log.learner_count(), 2);
        assert_eq!(log.learners[0].step_count(), 2);
    }
}
