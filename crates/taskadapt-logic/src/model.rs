//! Syntax taxonomy and the generic per-category value container.
//!
//! A [`SyntaxModel`] is an ordered list of categories, each with an ordered
//! list of named items. Order is significant: every [`ValueStructure`] in
//! the simulation (competency, task complexity, scaffolding bonus, delta) is
//! positionally aligned to the taxonomy it was built from, and combining two
//! structures of different shape is a fatal configuration error.
//!
//! The taxonomy is always passed explicitly. There is no module-level model
//! constant consumed behind the caller's back, so several simulations with
//! different taxonomies can run side by side.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// One syntax category: a name plus its ordered item names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxCategory {
    pub name: String,
    pub items: Vec<String>,
}

impl SyntaxCategory {
    pub fn new(name: &str, items: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Ordered taxonomy of syntax categories. Immutable for the duration of a
/// simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxModel {
    pub categories: Vec<SyntaxCategory>,
}

impl SyntaxModel {
    pub fn new(categories: Vec<SyntaxCategory>) -> Self {
        Self { categories }
    }

    /// Total number of items across all categories.
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

/// The simplified DQL partial-competency syntax map used by the reference
/// simulations: three categories of three syntax elements each.
pub fn dql_syntax_model() -> SyntaxModel {
    SyntaxModel::new(vec![
        SyntaxCategory::new("join", &["inner_join", "outer_join", "self_join"]),
        SyntaxCategory::new(
            "nesting",
            &["cte", "correlated_subquery", "uncorrelated_subquery"],
        ),
        SyntaxCategory::new(
            "predicates",
            &["basic_operators", "logical_operators", "set_operators"],
        ),
    ])
}

/// Per-category numeric values, positionally aligned to that category's
/// item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryValues {
    pub category: String,
    pub values: Vec<f64>,
}

/// The single generic container for competency, task complexity, scaffolding
/// bonus, and delta values. Same length and order as the taxonomy's category
/// list; each inner vector matches that category's item count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueStructure {
    pub entries: Vec<CategoryValues>,
}

impl ValueStructure {
    /// All-zero structure aligned to `model`. Identity element for [`add`].
    ///
    /// [`add`]: ValueStructure::add
    pub fn zeros(model: &SyntaxModel) -> Self {
        Self {
            entries: model
                .categories
                .iter()
                .map(|c| CategoryValues {
                    category: c.name.clone(),
                    values: vec![0.0; c.items.len()],
                })
                .collect(),
        }
    }

    /// Whether `self` and `other` share category order and item counts.
    pub fn shape_matches(&self, other: &ValueStructure) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.category == b.category && a.values.len() == b.values.len())
    }

    /// Fail with [`SimulationError::ShapeMismatch`] unless shapes agree.
    pub fn ensure_same_shape(&self, other: &ValueStructure) -> Result<(), SimulationError> {
        if self.shape_matches(other) {
            Ok(())
        } else {
            Err(SimulationError::ShapeMismatch {
                expected: self.shape_string(),
                found: other.shape_string(),
            })
        }
    }

    /// Pure elementwise addition. Neither input is mutated.
    pub fn add(&self, other: &ValueStructure) -> Result<ValueStructure, SimulationError> {
        self.ensure_same_shape(other)?;
        Ok(ValueStructure {
            entries: self
                .entries
                .iter()
                .zip(&other.entries)
                .map(|(a, b)| CategoryValues {
                    category: a.category.clone(),
                    values: a
                        .values
                        .iter()
                        .zip(&b.values)
                        .map(|(x, y)| x + y)
                        .collect(),
                })
                .collect(),
        })
    }

    /// Mean of one category's values, or `None` if the index is out of
    /// bounds or the category is empty. This is the aggregation the chart
    /// consumers plot per step.
    pub fn category_mean(&self, index: usize) -> Option<f64> {
        let entry = self.entries.get(index)?;
        if entry.values.is_empty() {
            return None;
        }
        Some(entry.values.iter().sum::<f64>() / entry.values.len() as f64)
    }

    /// Compact `name:count` shape description used in mismatch errors.
    fn shape_string(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}:{}", e.category, e.values.len()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_model() -> SyntaxModel {
        SyntaxModel::new(vec![
            SyntaxCategory::new("a", &["x", "y"]),
            SyntaxCategory::new("b", &["z"]),
        ])
    }

    fn structure(entries: &[(&str, &[f64])]) -> ValueStructure {
        ValueStructure {
            entries: entries
                .iter()
                .map(|(name, values)| CategoryValues {
                    category: name.to_string(),
                    values: values.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn dql_model_shape() {
        let model = dql_syntax_model();
        assert_eq!(model.categories.len(), 3);
        assert_eq!(model.item_count(), 9);
        assert_eq!(model.categories[0].name, "join");
        assert_eq!(model.categories[1].items.len(), 3);
    }

    #[test]
    fn zeros_matches_model_shape() {
        let model = small_model();
        let zeros = ValueStructure::zeros(&model);
        assert_eq!(zeros.entries.len(), 2);
        assert_eq!(zeros.entries[0].values, vec![0.0, 0.0]);
        assert_eq!(zeros.entries[1].values, vec![0.0]);
    }

    #[test]
    fn add_elementwise() {
        let a = structure(&[("a", &[0.1, 0.2]), ("b", &[0.3])]);
        let b = structure(&[("a", &[1.0, 1.0]), ("b", &[1.0])]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.entries[0].values, vec![1.1, 1.2]);
        assert_eq!(sum.entries[1].values, vec![1.3]);
    }

    #[test]
    fn add_does_not_mutate_inputs() {
        let a = structure(&[("a", &[0.1, 0.2]), ("b", &[0.3])]);
        let b = structure(&[("a", &[1.0, 1.0]), ("b", &[1.0])]);
        let a_before = a.clone();
        let b_before = b.clone();
        let _ = a.add(&b).unwrap();
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn add_zero_identity() {
        let model = small_model();
        let a = structure(&[("a", &[0.4, 0.5]), ("b", &[0.6])]);
        let sum = a.add(&ValueStructure::zeros(&model)).unwrap();
        assert_eq!(sum, a);
    }

    #[test]
    fn add_rejects_shape_mismatch() {
        let a = structure(&[("a", &[0.1, 0.2]), ("b", &[0.3])]);
        let b = structure(&[("a", &[0.1]), ("b", &[0.3])]);
        assert!(matches!(
            a.add(&b),
            Err(SimulationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn add_rejects_renamed_category() {
        let a = structure(&[("a", &[0.1, 0.2])]);
        let b = structure(&[("c", &[0.1, 0.2])]);
        assert!(a.add(&b).is_err());
    }

    #[test]
    fn category_mean_basic() {
        let a = structure(&[("a", &[0.2, 0.4]), ("b", &[0.9])]);
        assert!((a.category_mean(0).unwrap() - 0.3).abs() < 1e-12);
        assert!((a.category_mean(1).unwrap() - 0.9).abs() < 1e-12);
        assert_eq!(a.category_mean(2), None);
    }

    #[test]
    fn serde_roundtrip() {
        let a = structure(&[("a", &[0.25, 0.5]), ("b", &[0.75])]);
        let json = serde_json::to_string(&a).unwrap();
        let back: ValueStructure = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
