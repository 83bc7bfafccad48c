//! Pure simulation logic for scaffolded task adaptation.
//!
//! Models how a population of learners' per-category competencies evolve
//! over a sequence of generated practice tasks. Each step a learner attempts
//! one task; they improve on exactly those items whose complexity lies
//! strictly between their unaided competence and their competence plus a
//! transient scaffolding bonus. Everything here is plain data in, results
//! out: no rendering, no UI, no database, and no ambient randomness - every
//! sampling call site takes an explicit [`rand::Rng`], so runs are
//! reproducible from a seeded generator.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`complexity`] | Difficulty-to-complexity transform and the competence delta rule |
//! | [`constants`] | Tunable simulation parameters (bonus distribution, difficulty bound) |
//! | [`dataset`] | Knowledge-tracing dataset export (task ids, learn-effect sequences, CSV) |
//! | [`engine`] | Simulation driver, log types, and the top-level entry point |
//! | [`error`] | Fatal error kinds (invalid parameters, degenerate range, shape mismatch) |
//! | [`model`] | Syntax taxonomy and the per-category/per-item value container |
//! | [`persistence`] | Versioned binary save/load and JSON export of simulation logs |
//! | [`population`] | Initial competency profiles and the per-step scaffolding bonus grid |
//! | [`sampling`] | Normal/bounded-normal draws, min-max normalization, capped sums |
//! | [`task`] | Swappable task-generation policies (uniform random, scaffold-targeted) |
//!
//! # Example
//!
//! ```
//! use taskadapt_logic::engine::Simulation;
//! use taskadapt_logic::model::dql_syntax_model;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let log = Simulation::new(dql_syntax_model(), 10, 3)
//!     .run(&mut rng)
//!     .expect("valid configuration");
//!
//! assert_eq!(log.learner_count(), 3);
//! assert_eq!(log.learners[0].step_count(), 10);
//! ```

pub mod complexity;
pub mod constants;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod model;
pub mod persistence;
pub mod population;
pub mod sampling;
pub mod task;

/// Commonly used types for convenient importing.
pub mod prelude {
    pub use crate::engine::{run_simulation, LearnerLog, Simulation, SimulationLog};
    pub use crate::error::SimulationError;
    pub use crate::model::{dql_syntax_model, SyntaxCategory, SyntaxModel, ValueStructure};
    pub use crate::task::{ScaffoldTargetedPolicy, TaskPolicy, UniformRandomPolicy};
}
