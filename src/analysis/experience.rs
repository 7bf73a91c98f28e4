//! Compensation by years of professional experience.

use super::{fixed, money, AnalysisError};
use crate::charts::{ChartData, ChartKind, Series};
use crate::config::AnalysisConfig;
use crate::data::{DataProcessor, ExperienceBins, SurveyTable, COMPENSATION, WORK_EXP};
use crate::report::{format_count, TextTable};
use crate::stats::{GroupStats, Statistic, StatsCalculator};
use log::debug;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct ExperienceReport {
    /// Rows left after the compensation and experience filters
    pub rows: usize,
    /// One entry per experience bucket, youngest first
    pub groups: Vec<GroupStats>,
    /// Pearson's r between raw experience and compensation
    pub correlation: Statistic,
    #[serde(skip)]
    samples: Vec<Series>,
}

pub(super) fn analyze(
    table: &SurveyTable,
    config: &AnalysisConfig,
) -> Result<ExperienceReport, AnalysisError> {
    let filtered = table.filter(
        DataProcessor::valid_compensation(config.compensation_ceiling)
            .and(DataProcessor::present(WORK_EXP)),
    )?;
    let (years, pay) = DataProcessor::paired(
        &filtered.numeric(WORK_EXP)?,
        &filtered.numeric(COMPENSATION)?,
    );
    debug!("experience/compensation rows: {}", years.len());

    let bins = ExperienceBins::compensation();
    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); bins.len()];
    for (&y, &p) in years.iter().zip(&pay) {
        if let Some(bucket) = bins.assign(y) {
            buckets[bucket].push(p);
        }
    }

    let groups = bins
        .labels()
        .iter()
        .zip(&buckets)
        .map(|(label, values)| StatsCalculator::compute_descriptive_stats(label, values))
        .collect();
    let samples = bins
        .labels()
        .iter()
        .zip(buckets)
        .map(|(label, values)| Series::new(*label, values))
        .collect();

    Ok(ExperienceReport {
        rows: years.len(),
        groups,
        correlation: StatsCalculator::pearson(&years, &pay).into(),
        samples,
    })
}

impl ExperienceReport {
    pub fn chart(&self, config: &AnalysisConfig) -> ChartData {
        ChartData {
            title: "Developer Compensation by Experience Level".to_string(),
            x_desc: "Years of Experience".to_string(),
            y_desc: "Annual Compensation (USD)".to_string(),
            figure_size: (10.0, 6.0),
            kind: ChartKind::BoxPlot {
                groups: self.samples.clone(),
                y_range: (0.0, config.display_ceiling),
            },
        }
    }
}

impl fmt::Display for ExperienceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Responses with valid compensation and experience: {}", format_count(self.rows))?;
        writeln!(f)?;
        writeln!(f, "Compensation by Experience Level:")?;
        let mut table = TextTable::new(["Experience", "Count", "Mean", "Median", "Std"]);
        for g in &self.groups {
            table.push_row([
                g.group_name.clone(),
                format_count(g.count),
                money(&g.mean),
                money(&g.median),
                money(&g.std),
            ]);
        }
        write!(f, "{table}")?;
        writeln!(f)?;
        writeln!(
            f,
            "Pearson correlation (Experience vs Compensation): {}",
            match &self.correlation {
                Statistic::Defined(_) => fixed(&self.correlation, 3),
                undefined => undefined.to_string(),
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::{table, Respondent};

    fn scenario() -> SurveyTable {
        table(&[
            Respondent::paid(40000.0, 1.0),
            Respondent::paid(60000.0, 4.0),
            Respondent::paid(9_999_999.0, 8.0),
            Respondent {
                work_exp: Some(12.0),
                ..Respondent::default()
            },
            Respondent::paid(50000.0, 25.0),
        ])
    }

    #[test]
    fn test_outliers_and_missing_excluded() {
        let report = analyze(&scenario(), &AnalysisConfig::default()).unwrap();
        assert_eq!(report.rows, 3);
        let total: usize = report.groups.iter().map(|g| g.count).sum();
        assert_eq!(total, 3);

        // r over (1, 40000), (4, 60000), (25, 50000)
        let x = [1.0, 4.0, 25.0];
        let y = [40000.0, 60000.0, 50000.0];
        let expected = StatsCalculator::pearson(&x, &y).unwrap();
        assert!((report.correlation.value().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_all_buckets_reported_in_order() {
        let report = analyze(&scenario(), &AnalysisConfig::default()).unwrap();
        let names: Vec<&str> = report.groups.iter().map(|g| g.group_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["0-2 years", "3-5 years", "6-10 years", "11-20 years", "20+ years"]
        );

        let empty = &report.groups[2];
        assert_eq!(empty.count, 0);
        assert!(!empty.mean.is_defined());

        let single = &report.groups[0];
        assert_eq!(single.count, 1);
        assert_eq!(single.mean, Statistic::Defined(40000.0));
        assert!(!single.std.is_defined());
    }

    #[test]
    fn test_correlation_undefined_without_variance() {
        let source = table(&[
            Respondent::paid(40000.0, 3.0),
            Respondent::paid(60000.0, 3.0),
            Respondent::paid(80000.0, 3.0),
        ]);
        let report = analyze(&source, &AnalysisConfig::default()).unwrap();
        assert!(!report.correlation.is_defined());
        assert!(report.to_string().contains("undefined (zero variance)"));
    }

    #[test]
    fn test_chart_clips_display_range() {
        let config = AnalysisConfig::default();
        let chart = analyze(&scenario(), &config).unwrap().chart(&config);
        match chart.kind {
            ChartKind::BoxPlot { groups, y_range } => {
                assert_eq!(groups.len(), 5);
                assert_eq!(y_range, (0.0, 250_000.0));
            }
            other => panic!("unexpected chart {other:?}"),
        }
    }
}
