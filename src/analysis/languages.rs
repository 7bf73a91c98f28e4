//! Programming language popularity.

use super::AnalysisError;
use crate::charts::{ChartData, ChartKind};
use crate::config::AnalysisConfig;
use crate::data::{DataProcessor, SurveyTable, LANGUAGES};
use crate::report::{format_count, TextTable};
use crate::stats::{value_counts, Frequency};
use log::debug;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct LanguageReport {
    /// Respondents who answered the language question
    pub respondents: usize,
    /// Most used languages, highest count first
    pub top: Vec<Frequency>,
}

pub(super) fn analyze(
    table: &SurveyTable,
    config: &AnalysisConfig,
) -> Result<LanguageReport, AnalysisError> {
    let answered = table.filter(DataProcessor::present(LANGUAGES))?;
    let answers = answered.text(LANGUAGES)?;

    let tokens = answers
        .iter()
        .flatten()
        .flat_map(|raw| DataProcessor::tokenize_languages(raw));
    let mut top = value_counts(tokens);
    debug!("distinct languages: {}", top.len());
    top.truncate(config.top_languages);

    Ok(LanguageReport {
        respondents: answers.iter().flatten().count(),
        top,
    })
}

impl LanguageReport {
    pub fn chart(&self) -> ChartData {
        ChartData {
            title: format!(
                "Top {} Most Used Programming Languages (2025)",
                self.top.len()
            ),
            x_desc: "Number of Developers".to_string(),
            y_desc: "Programming Language".to_string(),
            figure_size: (10.0, 8.0),
            kind: ChartKind::HorizontalBar {
                bars: self
                    .top
                    .iter()
                    .map(|f| (f.label.clone(), f.count as f64))
                    .collect(),
            },
        }
    }
}

impl fmt::Display for LanguageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Respondents listing languages: {}", format_count(self.respondents))?;
        writeln!(f)?;
        writeln!(f, "Top {} Programming Languages:", self.top.len())?;
        let mut table = TextTable::new(["Language", "Developers"]);
        for entry in &self.top {
            table.push_row([entry.label.clone(), format_count(entry.count)]);
        }
        write!(f, "{table}")
    }
}
