//! Data Processor Module
//! Handles row filtering and derived columns (binning, tokenizing, parsing).

use polars::prelude::*;

use super::loader::COMPENSATION;

/// Separator between entries of a multi-value answer.
pub const LANGUAGE_DELIMITER: char = ';';

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Compensation present, positive and strictly below `ceiling`.
    pub fn valid_compensation(ceiling: f64) -> Expr {
        col(COMPENSATION)
            .is_not_null()
            .and(col(COMPENSATION).gt(lit(0.0)))
            .and(col(COMPENSATION).lt(lit(ceiling)))
    }

    /// Column has an answer.
    pub fn present(column: &str) -> Expr {
        col(column).is_not_null()
    }

    /// Split a `;`-separated answer into trimmed, non-empty tokens.
    ///
    /// Repeated tokens are kept as listed.
    pub fn tokenize_languages(raw: &str) -> Vec<&str> {
        raw.split(LANGUAGE_DELIMITER)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Parse a years answer, including the survey's open-ended sentinels.
    pub fn parse_years(raw: &str) -> Option<f64> {
        let raw = raw.trim();
        match raw {
            "Less than 1 year" => Some(0.5),
            "More than 50 years" => Some(50.0),
            _ => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Keep positions where both columns have a value.
    pub fn paired(left: &[Option<f64>], right: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
        left.iter()
            .zip(right)
            .filter_map(|(l, r)| Some(((*l)?, (*r)?)))
            .unzip()
    }
}

/// Ordered, non-overlapping ranges used to turn years into categories.
///
/// The first bucket is closed on both ends, the rest are open below and
/// closed above, so an edge value always lands in the lower bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceBins {
    edges: Vec<f64>,
    labels: Vec<&'static str>,
}

impl ExperienceBins {
    pub fn new(edges: Vec<f64>, labels: Vec<&'static str>) -> Self {
        debug_assert_eq!(edges.len(), labels.len() + 1);
        debug_assert!(edges.windows(2).all(|w| w[0] < w[1]));
        Self { edges, labels }
    }

    /// Career-stage buckets for the compensation analysis.
    pub fn compensation() -> Self {
        Self::new(
            vec![0.0, 2.0, 5.0, 10.0, 20.0, 100.0],
            vec![
                "0-2 years",
                "3-5 years",
                "6-10 years",
                "11-20 years",
                "20+ years",
            ],
        )
    }

    /// Coarser buckets for the AI sentiment cross-tabulation.
    pub fn ai_threat() -> Self {
        Self::new(
            vec![0.0, 5.0, 10.0, 20.0, 100.0],
            vec!["0-5 years", "6-10 years", "11-20 years", "20+ years"],
        )
    }

    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Bucket index for `years`, or `None` outside the covered range.
    pub fn assign(&self, years: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        if years == first {
            return Some(0);
        }
        self.edges
            .windows(2)
            .position(|w| years > w[0] && years <= w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::{table, Respondent};

    #[test]
    fn test_tokenize_trims_and_drops_empty() {
        assert_eq!(
            DataProcessor::tokenize_languages("Python;JavaScript; SQL "),
            vec!["Python", "JavaScript", "SQL"]
        );
        assert_eq!(
            DataProcessor::tokenize_languages("Rust;;Go;"),
            vec!["Rust", "Go"]
        );
        assert!(DataProcessor::tokenize_languages(" ; ").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_duplicates() {
        assert_eq!(
            DataProcessor::tokenize_languages("C;C"),
            vec!["C", "C"]
        );
    }

    #[test]
    fn test_bin_boundaries_belong_to_lower_bucket() {
        let bins = ExperienceBins::compensation();
        assert_eq!(bins.assign(0.0), Some(0));
        assert_eq!(bins.assign(2.0), Some(0));
        assert_eq!(bins.assign(2.5), Some(1));
        assert_eq!(bins.assign(5.0), Some(1));
        assert_eq!(bins.assign(10.0), Some(2));
        assert_eq!(bins.assign(20.0), Some(3));
        assert_eq!(bins.assign(100.0), Some(4));
    }

    #[test]
    fn test_bins_partition_covered_range() {
        let bins = ExperienceBins::compensation();
        let mut years = 0.0;
        while years <= 100.0 {
            assert!(bins.assign(years).is_some(), "{years} fell outside every bucket");
            years += 0.25;
        }
        assert_eq!(bins.assign(-1.0), None);
        assert_eq!(bins.assign(100.5), None);
        assert_eq!(bins.assign(f64::NAN), None);
    }

    #[test]
    fn test_ai_threat_bins() {
        let bins = ExperienceBins::ai_threat();
        assert_eq!(bins.len(), 4);
        assert_eq!(bins.assign(5.0), Some(0));
        assert_eq!(bins.assign(5.5), Some(1));
        assert_eq!(bins.assign(45.0), Some(3));
    }

    #[test]
    fn test_parse_years() {
        assert_eq!(DataProcessor::parse_years("12"), Some(12.0));
        assert_eq!(DataProcessor::parse_years(" 3.5 "), Some(3.5));
        assert_eq!(DataProcessor::parse_years("Less than 1 year"), Some(0.5));
        assert_eq!(DataProcessor::parse_years("More than 50 years"), Some(50.0));
        assert_eq!(DataProcessor::parse_years("a while"), None);
    }

    #[test]
    fn test_valid_compensation_filter() {
        let source = table(&[
            Respondent::paid(40000.0, 1.0),
            Respondent::paid(0.0, 1.0),
            Respondent::paid(-5.0, 1.0),
            Respondent::paid(500000.0, 1.0),
            Respondent::paid(499999.0, 1.0),
            Respondent::default(),
        ]);
        let filtered = source
            .filter(DataProcessor::valid_compensation(500_000.0))
            .unwrap();
        let values: Vec<f64> = filtered
            .numeric(COMPENSATION)
            .unwrap()
            .into_iter()
            .flatten()
            .collect();

        assert_eq!(values, vec![40000.0, 499999.0]);
        assert!(values.iter().all(|v| *v > 0.0 && *v < 500_000.0));
    }

    #[test]
    fn test_paired_drops_incomplete_rows() {
        let (a, b) = DataProcessor::paired(
            &[Some(1.0), None, Some(3.0), Some(4.0)],
            &[Some(10.0), Some(20.0), None, Some(40.0)],
        );
        assert_eq!(a, vec![1.0, 4.0]);
        assert_eq!(b, vec![10.0, 40.0]);
    }
}
