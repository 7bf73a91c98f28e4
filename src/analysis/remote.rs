//! Remote work arrangement vs job satisfaction.

use super::{fixed, AnalysisError};
use crate::charts::{ChartData, ChartKind, ColorMap};
use crate::data::{DataProcessor, SurveyTable, JOB_SAT, REMOTE_WORK};
use crate::report::{format_count, TextTable};
use crate::stats::{sorted_labels, ContingencyTable, GroupStats, RowPercentages, StatsCalculator};
use log::debug;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct RemoteWorkReport {
    /// Share of each satisfaction score within a work arrangement
    pub distribution: RowPercentages,
    /// Satisfaction per arrangement, highest mean first
    pub satisfaction: Vec<GroupStats>,
}

/// Shortest text for a score: `7` or `7.5`.
fn score_label(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        score.to_string()
    }
}

pub(super) fn analyze(table: &SurveyTable) -> Result<RemoteWorkReport, AnalysisError> {
    let filtered = table.filter(
        DataProcessor::present(REMOTE_WORK).and(DataProcessor::present(JOB_SAT)),
    )?;
    let pairs: Vec<(String, f64)> = filtered
        .text(REMOTE_WORK)?
        .into_iter()
        .zip(filtered.numeric(JOB_SAT)?)
        .filter_map(|(remote, score)| Some((remote?, score?)))
        .collect();
    debug!("remote/satisfaction rows: {}", pairs.len());

    let arrangements = sorted_labels(pairs.iter().map(|(r, _)| r));
    let mut scores: Vec<f64> = pairs.iter().map(|(_, s)| *s).collect();
    scores.sort_by(f64::total_cmp);
    scores.dedup();

    let mut by_arrangement: Vec<Vec<f64>> = vec![Vec::new(); arrangements.len()];
    let mut observations = Vec::with_capacity(pairs.len());
    for (remote, score) in &pairs {
        let (Ok(row), Ok(column)) = (
            arrangements.binary_search(remote),
            scores.binary_search_by(|s| s.total_cmp(score)),
        ) else {
            continue;
        };
        by_arrangement[row].push(*score);
        observations.push((row, column));
    }

    let distribution = ContingencyTable::tally(
        arrangements.clone(),
        scores.iter().map(|s| score_label(*s)).collect(),
        observations,
    )
    .row_normalized();

    let mut satisfaction: Vec<GroupStats> = arrangements
        .iter()
        .zip(&by_arrangement)
        .map(|(name, values)| StatsCalculator::compute_descriptive_stats(name, values))
        .collect();
    // stable: equal means stay alphabetical
    satisfaction.sort_by(|a, b| {
        let a = a.mean.value().unwrap_or(f64::NEG_INFINITY);
        let b = b.mean.value().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    Ok(RemoteWorkReport {
        distribution,
        satisfaction,
    })
}

impl RemoteWorkReport {
    pub fn chart(&self) -> ChartData {
        let cells: Vec<Vec<Option<f64>>> = self
            .distribution
            .percentages
            .iter()
            .map(|row| row.iter().copied().map(Some).collect())
            .collect();
        let (low, high) = self
            .distribution
            .percentages
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        let value_range = if low <= high { (low, high) } else { (0.0, 100.0) };

        ChartData {
            title: "Job Satisfaction Distribution by Remote Work Arrangement".to_string(),
            x_desc: "Job Satisfaction Score (0=Lowest, 10=Highest)".to_string(),
            y_desc: "Remote Work Status".to_string(),
            figure_size: (12.0, 6.0),
            kind: ChartKind::Heatmap {
                rows: self.distribution.row_labels.clone(),
                columns: self.distribution.column_labels.clone(),
                cells,
                value_range,
                color_map: ColorMap::YellowGreenBlue,
                decimals: 1,
                legend: "Percentage (%)".to_string(),
            },
        }
    }
}

impl fmt::Display for RemoteWorkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Job Satisfaction by Remote Work Status (%):")?;
        let mut headers = vec!["Remote Work".to_string()];
        headers.extend(self.distribution.column_labels.iter().cloned());
        let mut table = TextTable::new(headers);
        for (label, row) in self
            .distribution
            .row_labels
            .iter()
            .zip(&self.distribution.percentages)
        {
            let mut cells = vec![label.clone()];
            cells.extend(row.iter().map(|p| format!("{p:.1}")));
            table.push_row(cells);
        }
        write!(f, "{table}")?;
        writeln!(f)?;

        writeln!(f, "Average Job Satisfaction Scores:")?;
        let mut table = TextTable::new(["Remote Work", "Count", "Mean", "Median"]);
        for g in &self.satisfaction {
            table.push_row([
                g.group_name.clone(),
                format_count(g.count),
                fixed(&g.mean, 2),
                fixed(&g.median, 2),
            ]);
        }
        write!(f, "{table}")
    }
}
