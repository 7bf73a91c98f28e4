//! Key dataset metrics printed at the end of a run.

use super::AnalysisError;
use crate::data::{SurveyTable, COMPENSATION, COUNTRY, DEV_TYPE, WORK_EXP};
use crate::report::{format_count, format_thousands};
use crate::stats::{Statistic, StatsCalculator};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_responses: usize,
    /// Responses with a compensation value
    pub with_compensation: usize,
    /// Distinct countries, missing excluded
    pub countries: usize,
    /// Median over every reported compensation, outliers included
    pub median_compensation: Statistic,
    pub median_work_exp: Statistic,
    /// Most frequent developer type; ties go to the smallest name
    pub top_dev_type: Option<String>,
}

impl DatasetSummary {
    pub fn compute(table: &SurveyTable) -> Result<Self, AnalysisError> {
        let compensation: Vec<f64> = table.numeric(COMPENSATION)?.into_iter().flatten().collect();
        let work_exp: Vec<f64> = table.numeric(WORK_EXP)?.into_iter().flatten().collect();
        let countries: BTreeSet<String> = table.text(COUNTRY)?.into_iter().flatten().collect();

        let mut dev_types: BTreeMap<String, usize> = BTreeMap::new();
        for dev_type in table.text(DEV_TYPE)?.into_iter().flatten() {
            *dev_types.entry(dev_type).or_default() += 1;
        }
        // iteration is alphabetical, so only a strictly larger count replaces
        let mut top_dev_type: Option<(String, usize)> = None;
        for (name, count) in dev_types {
            if top_dev_type.as_ref().map_or(true, |(_, best)| count > *best) {
                top_dev_type = Some((name, count));
            }
        }

        Ok(Self {
            total_responses: table.height(),
            with_compensation: compensation.len(),
            countries: countries.len(),
            median_compensation: StatsCalculator::median(&compensation).into(),
            median_work_exp: StatsCalculator::median(&work_exp).into(),
            top_dev_type: top_dev_type.map(|(name, _)| name),
        })
    }

    /// Share of responses reporting compensation, in percent.
    pub fn compensation_rate(&self) -> f64 {
        if self.total_responses == 0 {
            return 0.0;
        }
        self.with_compensation as f64 / self.total_responses as f64 * 100.0
    }

    /// Label/value pairs in print order.
    pub fn metrics(&self) -> Vec<(&'static str, String)> {
        let undefined = || "undefined (insufficient data)".to_string();
        vec![
            ("Total Responses", format_count(self.total_responses)),
            (
                "Response Rate (with compensation data)",
                format!("{:.1}%", self.compensation_rate()),
            ),
            ("Countries Represented", format_count(self.countries)),
            (
                "Median Compensation (USD)",
                self.median_compensation
                    .value()
                    .map(|v| format!("${}", format_thousands(v)))
                    .unwrap_or_else(undefined),
            ),
            (
                "Median Work Experience (years)",
                self.median_work_exp
                    .value()
                    .map(|v| format!("{v:.0}"))
                    .unwrap_or_else(undefined),
            ),
            (
                "Most Common Dev Type",
                self.top_dev_type.clone().unwrap_or_else(|| "N/A".to_string()),
            ),
        ]
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key Dataset Metrics:")?;
        for (key, value) in self.metrics() {
            writeln!(f, "  • {key}: {value}")?;
        }
        Ok(())
    }
}
