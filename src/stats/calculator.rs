//! Statistics Calculator Module
//! Handles descriptive statistics and Pearson correlation.
//!
//! Spread uses the sample convention (n - 1 denominator) everywhere, and
//! the correlation is built from the matching sample covariance.

use serde::Serialize;
use statrs::statistics::{Data, Median, Statistics};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("insufficient data: need at least {needed} values, found {found}")]
    InsufficientData { needed: usize, found: usize },
    #[error("zero variance")]
    ZeroVariance,
    #[error("length mismatch: {left} vs {right} values")]
    LengthMismatch { left: usize, right: usize },
}

/// A computed value, or the reason it could not be computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statistic {
    Defined(f64),
    Undefined(String),
}

impl Statistic {
    pub fn value(&self) -> Option<f64> {
        match self {
            Statistic::Defined(v) => Some(*v),
            Statistic::Undefined(_) => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Statistic::Defined(_))
    }
}

impl From<Result<f64, StatsError>> for Statistic {
    fn from(result: Result<f64, StatsError>) -> Self {
        match result {
            Ok(v) => Statistic::Defined(v),
            Err(e) => Statistic::Undefined(e.to_string()),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Defined(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Statistic::Undefined(reason) => write!(f, "undefined ({reason})"),
        }
    }
}

/// Statistics for a single group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub group_name: String,
    pub count: usize,
    pub mean: Statistic,
    pub median: Statistic,
    pub std: Statistic,
}

/// Handles statistical calculations.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(group_name: &str, values: &[f64]) -> GroupStats {
        GroupStats {
            group_name: group_name.to_string(),
            count: values.len(),
            mean: Self::mean(values).into(),
            median: Self::median(values).into(),
            std: Self::sample_std(values).into(),
        }
    }

    fn require(found: usize, needed: usize) -> Result<(), StatsError> {
        if found < needed {
            Err(StatsError::InsufficientData { needed, found })
        } else {
            Ok(())
        }
    }

    pub fn mean(values: &[f64]) -> Result<f64, StatsError> {
        Self::require(values.len(), 1)?;
        Ok(values.mean())
    }

    pub fn median(values: &[f64]) -> Result<f64, StatsError> {
        Self::require(values.len(), 1)?;
        Ok(Data::new(values.to_vec()).median())
    }

    /// Sample standard deviation (n - 1).
    pub fn sample_std(values: &[f64]) -> Result<f64, StatsError> {
        Self::require(values.len(), 2)?;
        Ok(values.std_dev())
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Pearson's r between two equally long samples.
    pub fn pearson(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
        if x.len() != y.len() {
            return Err(StatsError::LengthMismatch {
                left: x.len(),
                right: y.len(),
            });
        }
        Self::require(x.len(), 2)?;

        let sx = x.std_dev();
        let sy = y.std_dev();
        if !(sx > 0.0 && sy > 0.0) {
            return Err(StatsError::ZeroVariance);
        }

        let r = x.covariance(y) / (sx * sy);
        Ok(r.clamp(-1.0, 1.0))
    }

    /// Pairwise Pearson matrix over columns sharing the same rows.
    ///
    /// Only the upper triangle is computed; the lower one mirrors it, so the
    /// result is exactly symmetric.
    pub fn correlation_matrix(columns: &[Vec<f64>]) -> Vec<Vec<Statistic>> {
        let k = columns.len();
        let mut matrix = vec![vec![Statistic::Defined(1.0); k]; k];

        for i in 0..k {
            matrix[i][i] = Self::self_correlation(&columns[i]).into();
            for j in (i + 1)..k {
                let r: Statistic = Self::pearson(&columns[i], &columns[j]).into();
                matrix[j][i] = r.clone();
                matrix[i][j] = r;
            }
        }

        matrix
    }

    fn self_correlation(values: &[f64]) -> Result<f64, StatsError> {
        Self::require(values.len(), 2)?;
        if values.std_dev() > 0.0 {
            Ok(1.0)
        } else {
            Err(StatsError::ZeroVariance)
        }
    }
}
