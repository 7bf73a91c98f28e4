//! Survey EDA - Developer Survey Exploratory Analysis
//!
//! Loads the survey results, prints one report per research question and
//! writes the charts to `./plots/`.

use anyhow::{Context, Result};
use log::{info, warn};
use std::io::{self, Write};
use survey_eda::analysis::DatasetSummary;
use survey_eda::pipeline::ArtifactStatus;
use survey_eda::report::{format_count, section_header};
use survey_eda::{AnalysisConfig, DataLoader, Pipeline, Question};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AnalysisConfig::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Loading Stack Overflow Developer Survey 2025...")?;
    let table = DataLoader::new()
        .load_csv(&config.input_path)
        .with_context(|| format!("Failed to load {}", config.input_path.display()))?;
    info!("Loaded {} responses", table.height());

    writeln!(out, "Total responses: {}", format_count(table.height()))?;
    writeln!(out, "Total variables: {}", table.source_width())?;

    let outcomes = Pipeline::new(&config).run(&table, &Question::ALL, &mut out)?;

    writeln!(out)?;
    writeln!(out, "{}", section_header("SUMMARY STATISTICS"))?;
    writeln!(out)?;
    let summary = DatasetSummary::compute(&table).context("Failed to summarize dataset")?;
    write!(out, "{summary}")?;

    writeln!(out)?;
    writeln!(out, "{}", section_header("Analysis complete!"))?;
    writeln!(out)?;
    writeln!(out, "Plots in {}:", config.output_dir.display())?;
    for (n, outcome) in outcomes.iter().enumerate() {
        let status = match &outcome.artifact {
            ArtifactStatus::Written(_) => "saved".to_string(),
            other => other.to_string(),
        };
        writeln!(out, "  {}. {} ({status})", n + 1, outcome.question.artifact())?;
    }
    let failed = outcomes.iter().filter(|o| o.artifact.is_failure()).count();
    if failed > 0 {
        warn!("{failed} chart(s) could not be produced");
    }

    Ok(())
}
