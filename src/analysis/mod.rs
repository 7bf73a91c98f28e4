//! Analysis module - One research question per submodule
//!
//! Every question reads the shared survey table, filters its own derived
//! copy, and returns a typed report that knows how to print itself and how
//! to describe its chart.

mod ai_threat;
mod correlation;
mod education;
mod experience;
mod languages;
mod remote;
mod summary;

pub use ai_threat::AiThreatReport;
pub use correlation::{CorrelationReport, CORRELATION_FIELDS};
pub use education::EducationReport;
pub use experience::ExperienceReport;
pub use languages::LanguageReport;
pub use remote::RemoteWorkReport;
pub use summary::DatasetSummary;

use crate::charts::ChartData;
use crate::config::AnalysisConfig;
use crate::data::{LoaderError, SurveyTable};
use crate::report::format_thousands;
use crate::stats::Statistic;
use polars::prelude::PolarsError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure that aborts a single question; the others still run.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Table error: {0}")]
    Table(#[from] LoaderError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// The research questions, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Question {
    ExperienceCompensation,
    LanguagePopularity,
    EducationCompensation,
    RemoteSatisfaction,
    AiThreat,
    Correlation,
}

impl Question {
    pub const ALL: [Question; 6] = [
        Question::ExperienceCompensation,
        Question::LanguagePopularity,
        Question::EducationCompensation,
        Question::RemoteSatisfaction,
        Question::AiThreat,
        Question::Correlation,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            Question::ExperienceCompensation => "Q1: How does experience level impact compensation?",
            Question::LanguagePopularity => "Q2: What are the most popular programming languages?",
            Question::EducationCompensation => "Q3: How does education level affect compensation?",
            Question::RemoteSatisfaction => "Q4: Remote work and job satisfaction relationship",
            Question::AiThreat => "Q5: Developer sentiment about AI threat to jobs",
            Question::Correlation => "BONUS: Correlation Analysis",
        }
    }

    /// File name of the chart written for this question.
    pub fn artifact(&self) -> &'static str {
        match self {
            Question::ExperienceCompensation => "plot1_compensation_experience.png",
            Question::LanguagePopularity => "plot2_top_languages.png",
            Question::EducationCompensation => "plot3_education_compensation.png",
            Question::RemoteSatisfaction => "plot4_remote_satisfaction_heatmap.png",
            Question::AiThreat => "plot5_ai_threat_experience.png",
            Question::Correlation => "plot6_correlation_matrix.png",
        }
    }

    pub fn analyze(
        &self,
        table: &SurveyTable,
        config: &AnalysisConfig,
    ) -> Result<QuestionReport, AnalysisError> {
        Ok(match self {
            Question::ExperienceCompensation => {
                QuestionReport::Experience(experience::analyze(table, config)?)
            }
            Question::LanguagePopularity => {
                QuestionReport::Languages(languages::analyze(table, config)?)
            }
            Question::EducationCompensation => {
                QuestionReport::Education(education::analyze(table, config)?)
            }
            Question::RemoteSatisfaction => QuestionReport::Remote(remote::analyze(table)?),
            Question::AiThreat => QuestionReport::AiThreat(ai_threat::analyze(table)?),
            Question::Correlation => QuestionReport::Correlation(correlation::analyze(table)?),
        })
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Typed result of one question.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "question", rename_all = "snake_case")]
pub enum QuestionReport {
    Experience(ExperienceReport),
    Languages(LanguageReport),
    Education(EducationReport),
    Remote(RemoteWorkReport),
    AiThreat(AiThreatReport),
    Correlation(CorrelationReport),
}

impl QuestionReport {
    /// Chart describing this report.
    pub fn chart(&self, config: &AnalysisConfig) -> ChartData {
        match self {
            QuestionReport::Experience(r) => r.chart(config),
            QuestionReport::Languages(r) => r.chart(),
            QuestionReport::Education(r) => r.chart(config),
            QuestionReport::Remote(r) => r.chart(),
            QuestionReport::AiThreat(r) => r.chart(),
            QuestionReport::Correlation(r) => r.chart(),
        }
    }
}

impl fmt::Display for QuestionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionReport::Experience(r) => fmt::Display::fmt(r, f),
            QuestionReport::Languages(r) => fmt::Display::fmt(r, f),
            QuestionReport::Education(r) => fmt::Display::fmt(r, f),
            QuestionReport::Remote(r) => fmt::Display::fmt(r, f),
            QuestionReport::AiThreat(r) => fmt::Display::fmt(r, f),
            QuestionReport::Correlation(r) => fmt::Display::fmt(r, f),
        }
    }
}

// Table cell helpers. Undefined statistics print as `undefined`.

fn money(stat: &Statistic) -> String {
    match stat.value() {
        Some(v) => format_thousands(v),
        None => "undefined".to_string(),
    }
}

fn fixed(stat: &Statistic, decimals: usize) -> String {
    match stat.value() {
        Some(v) => format!("{v:.decimals$}"),
        None => "undefined".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_artifacts_are_distinct_pngs() {
        let names: HashSet<&str> = Question::ALL.iter().map(|q| q.artifact()).collect();
        assert_eq!(names.len(), 6);
        assert!(names.iter().all(|n| n.ends_with(".png")));
    }

    #[test]
    fn test_cell_helpers() {
        assert_eq!(money(&Statistic::Defined(85000.4)), "85,000");
        assert_eq!(fixed(&Statistic::Defined(6.8712), 2), "6.87");
        assert_eq!(fixed(&Statistic::Undefined("x".into()), 2), "undefined");
    }
}
