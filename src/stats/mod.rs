//! Stats module - Descriptive statistics, correlation and cross-tabulation

mod calculator;
mod crosstab;

pub use calculator::{GroupStats, Statistic, StatsCalculator, StatsError};
pub use crosstab::{
    shares, sorted_labels, value_counts, ContingencyTable, Frequency, RowPercentages,
};
