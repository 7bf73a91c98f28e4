//! Survey EDA - Developer Survey Exploratory Analysis
//!
//! Loads the developer survey results once, answers a fixed set of research
//! questions with grouped statistics, correlations and cross-tabulations,
//! prints the tables and writes one static chart per question.

pub mod analysis;
pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use analysis::{Question, QuestionReport};
pub use config::{AnalysisConfig, ChartStyle};
pub use data::{DataLoader, SurveyTable};
pub use pipeline::{ArtifactStatus, Pipeline, QuestionOutcome};
