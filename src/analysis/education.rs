//! Compensation by education level.

use super::{money, AnalysisError};
use crate::charts::{ChartData, ChartKind, Series};
use crate::config::AnalysisConfig;
use crate::data::{DataProcessor, EducationLevel, SurveyTable, COMPENSATION, ED_LEVEL};
use crate::report::{format_count, TextTable};
use crate::stats::{GroupStats, StatsCalculator};
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct EducationReport {
    /// Education levels by descending median compensation
    pub groups: Vec<GroupStats>,
    #[serde(skip)]
    samples: Vec<Series>,
}

pub(super) fn analyze(
    table: &SurveyTable,
    config: &AnalysisConfig,
) -> Result<EducationReport, AnalysisError> {
    let filtered = table.filter(
        DataProcessor::valid_compensation(config.compensation_ceiling)
            .and(DataProcessor::present(ED_LEVEL)),
    )?;
    let pay = filtered.numeric(COMPENSATION)?;
    let education = filtered.text(ED_LEVEL)?;

    // BTreeMap keeps levels in label order, the tie-break for equal medians
    let mut by_level: BTreeMap<EducationLevel, Vec<f64>> = BTreeMap::new();
    for (p, raw) in pay.iter().zip(&education) {
        if let (Some(p), Some(raw)) = (p, raw) {
            by_level
                .entry(EducationLevel::from_raw(raw))
                .or_default()
                .push(*p);
        }
    }
    debug!("education levels with data: {}", by_level.len());

    let mut ranked: Vec<(GroupStats, Vec<f64>)> = by_level
        .into_iter()
        .map(|(level, values)| {
            (
                StatsCalculator::compute_descriptive_stats(level.label(), &values),
                values,
            )
        })
        .collect();
    ranked.sort_by(|(a, _), (b, _)| {
        let a = a.median.value().unwrap_or(f64::NEG_INFINITY);
        let b = b.median.value().unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });

    let samples = ranked
        .iter()
        .map(|(stats, values)| Series::new(stats.group_name.clone(), values.clone()))
        .collect();
    let groups = ranked.into_iter().map(|(stats, _)| stats).collect();

    Ok(EducationReport { groups, samples })
}

impl EducationReport {
    pub fn chart(&self, config: &AnalysisConfig) -> ChartData {
        ChartData {
            title: "Compensation Distribution by Education Level".to_string(),
            x_desc: "Education Level".to_string(),
            y_desc: "Annual Compensation (USD)".to_string(),
            figure_size: (12.0, 7.0),
            kind: ChartKind::Violin {
                groups: self.samples.clone(),
                y_range: (0.0, config.display_ceiling),
            },
        }
    }
}

impl fmt::Display for EducationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compensation by Education Level:")?;
        let mut table = TextTable::new(["Education", "Count", "Mean", "Median"]);
        for g in &self.groups {
            table.push_row([
                g.group_name.clone(),
                format_count(g.count),
                money(&g.mean),
                money(&g.median),
            ]);
        }
        write!(f, "{table}")
    }
}
