//! Sequential question runner.
//!
//! Each question goes through the same compute → print → render path. A
//! failing question is reported and skipped; the remaining ones still run.

use crate::analysis::{Question, QuestionReport};
use crate::charts::{RenderError, StaticChartRenderer};
use crate::config::AnalysisConfig;
use crate::data::SurveyTable;
use crate::report::section_header;
use log::{debug, info, warn};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

/// What happened to a question's chart image.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactStatus {
    Written(PathBuf),
    /// Rendering disabled, or no report to draw
    Skipped,
    /// The chart could not be drawn
    DrawFailed(String),
    /// The chart was drawn but the file could not be written
    WriteFailed(String),
}

impl ArtifactStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, ArtifactStatus::DrawFailed(_) | ArtifactStatus::WriteFailed(_))
    }
}

impl fmt::Display for ArtifactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactStatus::Written(path) => write!(f, "saved {}", path.display()),
            ArtifactStatus::Skipped => f.write_str("skipped"),
            ArtifactStatus::DrawFailed(reason) => write!(f, "not drawn: {reason}"),
            ArtifactStatus::WriteFailed(reason) => write!(f, "not written: {reason}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    pub question: Question,
    /// `None` when the analysis itself failed
    pub report: Option<QuestionReport>,
    pub artifact: ArtifactStatus,
}

pub struct Pipeline<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Run `questions` in order, writing the console report to `out`.
    pub fn run<W: Write>(
        &self,
        table: &SurveyTable,
        questions: &[Question],
        out: &mut W,
    ) -> io::Result<Vec<QuestionOutcome>> {
        if self.config.render_charts {
            if let Err(e) = fs::create_dir_all(&self.config.output_dir) {
                warn!(
                    "Could not create {}: {e}",
                    self.config.output_dir.display()
                );
            }
        }

        let mut outcomes = Vec::with_capacity(questions.len());
        for &question in questions {
            outcomes.push(self.run_question(table, question, out)?);
        }
        Ok(outcomes)
    }

    /// Analyze, print and render one question.
    pub fn run_question<W: Write>(
        &self,
        table: &SurveyTable,
        question: Question,
        out: &mut W,
    ) -> io::Result<QuestionOutcome> {
        writeln!(out)?;
        writeln!(out, "{}", section_header(question.heading()))?;
        writeln!(out)?;

        let report = match question.analyze(table, self.config) {
            Ok(report) => report,
            Err(e) => {
                warn!("{question:?} failed: {e}");
                writeln!(out, "Analysis failed: {e}")?;
                return Ok(QuestionOutcome {
                    question,
                    report: None,
                    artifact: ArtifactStatus::Skipped,
                });
            }
        };

        write!(out, "{report}")?;
        match serde_json::to_string(&report) {
            Ok(json) => debug!("{json}"),
            Err(e) => debug!("report not serializable: {e}"),
        }

        let artifact = self.render(question, &report);
        if let ArtifactStatus::Written(path) = &artifact {
            writeln!(out)?;
            writeln!(out, "✓ Plot saved: {}", path.display())?;
        }

        Ok(QuestionOutcome {
            question,
            report: Some(report),
            artifact,
        })
    }

    fn render(&self, question: Question, report: &QuestionReport) -> ArtifactStatus {
        if !self.config.render_charts {
            return ArtifactStatus::Skipped;
        }
        let chart = report.chart(self.config);
        let path = self.config.output_dir.join(question.artifact());
        match StaticChartRenderer::render_to_file(&chart, &self.config.style, &path) {
            Ok(()) => {
                info!("Wrote {}", path.display());
                ArtifactStatus::Written(path)
            }
            Err(e) => {
                warn!("Chart for {question:?} not written: {e}");
                match e {
                    RenderError::Image(_) => ArtifactStatus::WriteFailed(e.to_string()),
                    _ => ArtifactStatus::DrawFailed(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::{table, Respondent};

    fn config() -> AnalysisConfig {
        AnalysisConfig {
            render_charts: false,
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_every_question_runs_on_sparse_data() {
        let config = config();
        let source = table(&[Respondent::paid(50000.0, 3.0), Respondent::default()]);
        let mut out = Vec::new();
        let outcomes = Pipeline::new(&config)
            .run(&source, &Question::ALL, &mut out)
            .unwrap();

        assert_eq!(outcomes.len(), 6);
        assert!(outcomes.iter().all(|o| o.report.is_some()));
        assert!(outcomes.iter().all(|o| o.artifact == ArtifactStatus::Skipped));

        let text = String::from_utf8(out).unwrap();
        for question in Question::ALL {
            assert!(text.contains(question.heading()));
        }
    }

    #[test]
    fn test_chart_write_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("plots");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let config = AnalysisConfig {
            output_dir: blocker,
            ..AnalysisConfig::default()
        };

        let source = table(&[Respondent::paid(50000.0, 3.0)]);
        let mut out = Vec::new();
        let outcomes = Pipeline::new(&config)
            .run(
                &source,
                &[Question::LanguagePopularity, Question::ExperienceCompensation],
                &mut out,
            )
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(outcome.report.is_some());
            assert!(
                matches!(outcome.artifact, ArtifactStatus::WriteFailed(_)),
                "{}",
                outcome.artifact
            );
        }
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(Question::ExperienceCompensation.heading()));
        assert!(!text.contains("Plot saved"));
    }

    #[test]
    fn test_rendering_writes_one_file_per_question() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig {
            output_dir: dir.path().join("plots"),
            ..AnalysisConfig::default()
        };
        let respondent = |compensation: f64, work_exp: f64, remote: &'static str, sat: f64| Respondent {
            years_code: Some("10"),
            languages: Some("Python;Rust"),
            ed_level: Some("Bachelor's degree (B.A., B.S., B.Eng., etc.)"),
            remote_work: Some(remote),
            job_sat: Some(sat),
            ai_threat: Some("No"),
            tool_count: Some(work_exp / 2.0),
            ..Respondent::paid(compensation, work_exp)
        };
        let source = table(&[
            respondent(50000.0, 3.0, "Remote", 8.0),
            respondent(90000.0, 12.0, "In-person", 6.0),
            respondent(72000.0, 7.0, "Remote", 9.0),
            Respondent::default(),
        ]);
        let mut out = Vec::new();
        let outcomes = Pipeline::new(&config)
            .run(&source, &Question::ALL, &mut out)
            .unwrap();

        for outcome in &outcomes {
            let expected = config.output_dir.join(outcome.question.artifact());
            assert_eq!(outcome.artifact, ArtifactStatus::Written(expected));
        }
        let mut written: Vec<String> = std::fs::read_dir(&config.output_dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        written.sort();
        let mut expected: Vec<String> =
            Question::ALL.iter().map(|q| q.artifact().to_string()).collect();
        expected.sort();
        assert_eq!(written, expected);
        assert_eq!(
            String::from_utf8(out).unwrap().matches("✓ Plot saved:").count(),
            6
        );
    }
}
