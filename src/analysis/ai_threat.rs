//! Perceived AI threat to jobs, overall and by experience.

use super::AnalysisError;
use crate::charts::{ChartData, ChartKind, Series};
use crate::data::{DataProcessor, ExperienceBins, SurveyTable, AI_THREAT, WORK_EXP};
use crate::report::{format_count, TextTable};
use crate::stats::{shares, sorted_labels, value_counts, ContingencyTable, Frequency, RowPercentages};
use log::debug;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct AiThreatReport {
    /// Answers per category, most common first
    pub overall: Vec<Frequency>,
    /// Percentage share of each entry in `overall`
    pub shares: Vec<f64>,
    /// Category shares within each experience bucket
    pub by_experience: RowPercentages,
}

pub(super) fn analyze(table: &SurveyTable) -> Result<AiThreatReport, AnalysisError> {
    let answered = table.filter(DataProcessor::present(AI_THREAT))?;
    let threat = answered.text(AI_THREAT)?;
    let years = answered.numeric(WORK_EXP)?;

    let overall = value_counts(threat.iter().flatten());
    let overall_shares = shares(&overall);

    let bins = ExperienceBins::ai_threat();
    let binned: Vec<(usize, &str)> = threat
        .iter()
        .zip(&years)
        .filter_map(|(t, y)| Some((bins.assign((*y)?)?, t.as_deref()?)))
        .collect();
    debug!("ai threat rows: {}, with experience: {}", threat.len(), binned.len());

    let categories = sorted_labels(binned.iter().map(|(_, t)| *t));
    let observations: Vec<(usize, usize)> = binned
        .iter()
        .filter_map(|(bucket, t)| {
            let column = categories.binary_search_by(|c| c.as_str().cmp(*t)).ok()?;
            Some((*bucket, column))
        })
        .collect();
    let by_experience = ContingencyTable::tally(
        bins.labels().iter().map(|l| l.to_string()).collect(),
        categories,
        observations,
    )
    .row_normalized();

    Ok(AiThreatReport {
        overall,
        shares: overall_shares,
        by_experience,
    })
}

impl AiThreatReport {
    pub fn chart(&self) -> ChartData {
        let d = &self.by_experience;
        let stacks = d
            .column_labels
            .iter()
            .enumerate()
            .map(|(c, label)| Series::new(label.clone(), d.percentages.iter().map(|row| row[c]).collect()))
            .collect();

        ChartData {
            title: "AI Threat Perception by Developer Experience Level".to_string(),
            x_desc: "Years of Experience".to_string(),
            y_desc: "Percentage (%)".to_string(),
            figure_size: (12.0, 7.0),
            kind: ChartKind::StackedBar {
                categories: d.row_labels.clone(),
                stacks,
                legend: "AI Threat Level".to_string(),
            },
        }
    }
}

impl fmt::Display for AiThreatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AI Threat Perception:")?;
        let mut table = TextTable::new(["AI Threat", "Count", "Percentage"]);
        for (entry, share) in self.overall.iter().zip(&self.shares) {
            table.push_row([
                entry.label.clone(),
                format_count(entry.count),
                format!("{share:.1}%"),
            ]);
        }
        write!(f, "{table}")?;
        writeln!(f)?;

        writeln!(f, "AI Threat Perception by Experience (%):")?;
        let mut headers = vec!["Experience".to_string()];
        headers.extend(self.by_experience.column_labels.iter().cloned());
        let mut table = TextTable::new(headers);
        for (label, row) in self
            .by_experience
            .row_labels
            .iter()
            .zip(&self.by_experience.percentages)
        {
            let mut cells = vec![label.clone()];
            cells.extend(row.iter().map(|p| format!("{p:.1}")));
            table.push_row(cells);
        }
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::{table, Respondent};

    fn answer(threat: &'static str, work_exp: Option<f64>) -> Respondent {
        Respondent {
            ai_threat: Some(threat),
            work_exp,
            ..Respondent::default()
        }
    }

    fn sample() -> SurveyTable {
        table(&[
            answer("No", Some(1.0)),
            answer("No", Some(3.0)),
            answer("I'm not sure", Some(7.0)),
            answer("Yes", Some(15.0)),
            answer("No", None),
            answer("Yes", Some(30.0)),
            answer("I'm not sure", Some(30.0)),
            Respondent::paid(50000.0, 4.0),
        ])
    }

    #[test]
    fn test_overall_counts_and_shares() {
        let report = analyze(&sample()).unwrap();
        let ranked: Vec<(&str, usize)> = report
            .overall
            .iter()
            .map(|f| (f.label.as_str(), f.count))
            .collect();
        assert_eq!(ranked, vec![("No", 3), ("I'm not sure", 2), ("Yes", 2)]);

        assert!((report.shares.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        let displayed: f64 = report.shares.iter().map(|s| (s * 10.0).round() / 10.0).sum();
        assert!((displayed - 100.0).abs() <= 0.1 * report.shares.len() as f64);
    }

    #[test]
    fn test_by_experience_skips_empty_buckets() {
        let report = analyze(&sample()).unwrap();
        let d = &report.by_experience;
        assert_eq!(d.row_labels, vec!["0-5 years", "6-10 years", "11-20 years", "20+ years"]);
        assert_eq!(d.column_labels, vec!["I'm not sure", "No", "Yes"]);
        assert_eq!(d.cell("0-5 years", "No"), Some(100.0));
        assert_eq!(d.cell("20+ years", "Yes"), Some(50.0));
        for row in 0..d.row_labels.len() {
            assert!((d.row_sum(row) - 100.0).abs() < 0.1);
        }

        let sparse = table(&[answer("Yes", Some(2.0)), answer("No", Some(40.0))]);
        let report = analyze(&sparse).unwrap();
        assert_eq!(report.by_experience.row_labels, vec!["0-5 years", "20+ years"]);
    }

    #[test]
    fn test_stacks_follow_sorted_categories() {
        let chart = analyze(&sample()).unwrap().chart();
        match chart.kind {
            ChartKind::StackedBar { categories, stacks, .. } => {
                assert_eq!(categories.len(), 4);
                let labels: Vec<&str> = stacks.iter().map(|s| s.label.as_str()).collect();
                assert_eq!(labels, vec!["I'm not sure", "No", "Yes"]);
                for bar in 0..categories.len() {
                    let total: f64 = stacks.iter().map(|s| s.values[bar]).sum();
                    assert!((total - 100.0).abs() < 1e-9);
                }
            }
            other => panic!("unexpected chart {other:?}"),
        }
    }
}
