//! Knowledge-tracing dataset export.
//!
//! Turns a simulation log into the two training-data shapes the downstream
//! models consume: per-(category, learner) sequences of encoded task ids
//! with a binary learn-effect label, and a flat per-(step, item) record
//! table written as CSV. Raw difficulty counts are recovered from the
//! logged complexity values through the inverse complexity transform.

use rand::seq::SliceRandom;
use rand::Rng;
use std::io::Write;

use crate::complexity::approximate_frequency;
use crate::constants::{CONVERGENCE_FACTOR, MAX_TASK_DIFFICULTY};
use crate::engine::SimulationLog;
use crate::model::SyntaxModel;

/// Encode one category's raw difficulty counts as a single id by treating
/// them as base-8 digits (three items yield ids in [0, 512)).
pub fn encode_task_params(difficulties: &[f64]) -> u32 {
    let base = MAX_TASK_DIFFICULTY;
    difficulties.iter().fold(0u32, |acc, &d| {
        let digit = (d.round() as u32).min(base - 1);
        acc * base + digit
    })
}

/// Recover a category's raw difficulty counts from logged complexities.
fn decode_difficulties(complexities: &[f64]) -> Vec<f64> {
    complexities
        .iter()
        .map(|&c| {
            approximate_frequency(c, CONVERGENCE_FACTOR)
                .round()
                .clamp(0.0, (MAX_TASK_DIFFICULTY - 1) as f64)
        })
        .collect()
}

/// One (category, learner) training sequence: an encoded task id per step
/// and whether that step produced any competence gain in the category.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerSequence {
    pub category: String,
    pub learner_id: usize,
    pub task_ids: Vec<u32>,
    pub solved: Vec<bool>,
}

/// Build one sequence per (category, learner) pair, category-major.
pub fn build_sequences(log: &SimulationLog, model: &SyntaxModel) -> Vec<LearnerSequence> {
    let mut sequences = Vec::with_capacity(model.categories.len() * log.learner_count());

    for (category_index, category) in model.categories.iter().enumerate() {
        for (learner_id, learner) in log.learners.iter().enumerate() {
            let mut task_ids = Vec::with_capacity(learner.step_count());
            let mut solved = Vec::with_capacity(learner.step_count());

            for step in 0..learner.step_count() {
                let complexities = &learner.tasks[step].entries[category_index].values;
                let deltas = &learner.deltas[step].entries[category_index].values;

                task_ids.push(encode_task_params(&decode_difficulties(complexities)));
                solved.push(deltas.iter().any(|&d| d > 0.0));
            }

            sequences.push(LearnerSequence {
                category: category.name.clone(),
                learner_id,
                task_ids,
                solved,
            });
        }
    }

    sequences
}

/// Shuffle and split sequences into (train, test) at
/// `round(len * train_size)`.
pub fn train_test_split(
    mut sequences: Vec<LearnerSequence>,
    train_size: f64,
    rng: &mut (impl Rng + ?Sized),
) -> (Vec<LearnerSequence>, Vec<LearnerSequence>) {
    sequences.shuffle(rng);
    let boundary = (sequences.len() as f64 * train_size).round() as usize;
    let test = sequences.split_off(boundary.min(sequences.len()));
    (sequences, test)
}

/// One flat per-(step, item) observation. Ids are 1-based in the written
/// output; `skill_id` is the item's position across the whole taxonomy.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    pub order_id: u64,
    pub user_id: u64,
    pub skill_id: u32,
    pub correct: bool,
}

/// Flatten the log into records: one per (learner, step, item), ordered
/// learner-major then step, with `order_id` incremented once per task.
pub fn build_records(log: &SimulationLog, model: &SyntaxModel) -> Vec<DatasetRecord> {
    let mut records = Vec::new();
    let mut order_id: u64 = 0;

    for (learner_id, learner) in log.learners.iter().enumerate() {
        for step in 0..learner.step_count() {
            let mut skill_position: u32 = 0;
            for (category_index, category) in model.categories.iter().enumerate() {
                let deltas = &learner.deltas[step].entries[category_index].values;
                for item_index in 0..category.items.len() {
                    records.push(DatasetRecord {
                        order_id: order_id + 1,
                        user_id: learner_id as u64 + 1,
                        skill_id: skill_position + 1,
                        correct: deltas.get(item_index).copied().unwrap_or(0.0) > 0.0,
                    });
                    skill_position += 1;
                }
            }
            order_id += 1;
        }
    }

    records
}

/// Write records as CSV with zero-padded order/user ids. The sequence id
/// column duplicates the user id, one sequence per learner.
pub fn write_records_csv<W: Write>(records: &[DatasetRecord], mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "order_id,user_id,sequence_id,skill_id,correct")?;
    for record in records {
        writeln!(
            writer,
            "{:08},{:06},{:06},{},{}",
            record.order_id,
            record.user_id,
            record.user_id,
            record.skill_id,
            u8::from(record.correct)
        )?;
    }
    Ok(())
}
