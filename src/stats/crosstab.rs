//! Frequency counts and contingency tables.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Occurrence count of one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frequency {
    pub label: String,
    pub count: usize,
}

/// Count labels, most frequent first.
///
/// Ties keep the order in which the labels were first seen, so the result
/// does not depend on hash ordering.
pub fn value_counts<I, S>(values: I) -> Vec<Frequency>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<Frequency> = Vec::new();

    for value in values {
        let value = value.as_ref();
        match index.get(value) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(value.to_string(), counts.len());
                counts.push(Frequency {
                    label: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Percentage share of each frequency in the total.
pub fn shares(frequencies: &[Frequency]) -> Vec<f64> {
    let total: usize = frequencies.iter().map(|f| f.count).sum();
    if total == 0 {
        return vec![0.0; frequencies.len()];
    }
    frequencies
        .iter()
        .map(|f| f.count as f64 / total as f64 * 100.0)
        .collect()
}

/// Distinct labels in ascending order.
pub fn sorted_labels<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Joint counts of two categorical variables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContingencyTable {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ContingencyTable {
    pub fn new(row_labels: Vec<String>, column_labels: Vec<String>) -> Self {
        let counts = vec![vec![0; column_labels.len()]; row_labels.len()];
        Self {
            row_labels,
            column_labels,
            counts,
        }
    }

    /// Build from `(row, column)` index pairs into the given label lists.
    pub fn tally<I>(row_labels: Vec<String>, column_labels: Vec<String>, observations: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut table = Self::new(row_labels, column_labels);
        for (row, column) in observations {
            table.counts[row][column] += 1;
        }
        table
    }

    /// Each row divided by its total, in percent. Rows without observations
    /// are left out.
    pub fn row_normalized(&self) -> RowPercentages {
        let mut row_labels = Vec::new();
        let mut percentages = Vec::new();

        for (label, row) in self.row_labels.iter().zip(&self.counts) {
            let total: usize = row.iter().sum();
            if total == 0 {
                continue;
            }
            row_labels.push(label.clone());
            percentages.push(
                row.iter()
                    .map(|&c| c as f64 / total as f64 * 100.0)
                    .collect(),
            );
        }

        RowPercentages {
            row_labels,
            column_labels: self.column_labels.clone(),
            percentages,
        }
    }
}

/// Row-normalized contingency table; every row sums to 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPercentages {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub percentages: Vec<Vec<f64>>,
}

#[cfg(test)]
impl RowPercentages {
    pub fn row_sum(&self, row: usize) -> f64 {
        self.percentages[row].iter().sum()
    }

    pub fn cell(&self, row_label: &str, column_label: &str) -> Option<f64> {
        let r = self.row_labels.iter().position(|l| l == row_label)?;
        let c = self.column_labels.iter().position(|l| l == column_label)?;
        Some(self.percentages[r][c])
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_counts_descending_with_first_seen_ties() {
        let counts = value_counts(["Go", "Rust", "C", "Rust", "C", "Zig", "Python", "Python", "Python"]);
        let ranked: Vec<(&str, usize)> = counts.iter().map(|f| (f.label.as_str(), f.count)).collect();
        assert_eq!(
            ranked,
            vec![("Python", 3), ("Rust", 2), ("C", 2), ("Go", 1), ("Zig", 1)]
        );
    }

    #[test]
    fn test_value_counts_repeatable() {
        let input: Vec<String> = (0..200).map(|i| format!("lang{}", i % 17)).collect();
        let first = value_counts(&input);
        for _ in 0..5 {
            assert_eq!(value_counts(&input), first);
        }
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let counts = value_counts(["a", "b", "b", "c", "c", "c"]);
        let pct = shares(&counts);
        assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        let rounded: f64 = pct.iter().map(|p| (p * 10.0).round() / 10.0).sum();
        assert!((rounded - 100.0).abs() <= 0.1 * pct.len() as f64);
    }

    #[test]
    fn test_row_normalized_sums_and_skips_empty_rows() {
        let table = ContingencyTable::tally(
            vec!["a".into(), "b".into(), "c".into()],
            vec!["x".into(), "y".into(), "z".into()],
            [(0, 0), (0, 1), (0, 1), (2, 2), (2, 0), (2, 0)],
        );
        assert_eq!(table.counts[1], vec![0, 0, 0]);
        assert_eq!(table.counts.iter().flatten().sum::<usize>(), 6);

        let pct = table.row_normalized();
        assert_eq!(pct.row_labels, vec!["a".to_string(), "c".to_string()]);
        for row in 0..pct.row_labels.len() {
            assert!((pct.row_sum(row) - 100.0).abs() < 0.1);
        }
        let a_y = pct.cell("a", "y").unwrap();
        assert!((a_y - 200.0 / 3.0).abs() < 1e-9);
        assert!(pct.cell("b", "y").is_none());
    }

    #[test]
    fn test_sorted_labels_distinct() {
        assert_eq!(
            sorted_labels(["Remote", "In-person", "Remote", "Hybrid"]),
            vec!["Hybrid", "In-person", "Remote"]
        );
    }
}
