//! Pairwise correlation of the numeric developer metrics.

use super::{fixed, AnalysisError};
use crate::charts::{ChartData, ChartKind, ColorMap};
use crate::data::{
    DataProcessor, SurveyTable, COMPENSATION, JOB_SAT, TOOL_COUNT_WORK, WORK_EXP, YEARS_CODE,
};
use crate::report::{format_count, TextTable};
use crate::stats::{Statistic, StatsCalculator};
use log::debug;
use serde::Serialize;
use std::fmt;

/// Metrics in matrix order.
pub const CORRELATION_FIELDS: [&str; 5] =
    [WORK_EXP, YEARS_CODE, COMPENSATION, JOB_SAT, TOOL_COUNT_WORK];

#[derive(Debug, Clone, Serialize)]
pub struct CorrelationReport {
    pub fields: Vec<String>,
    /// Rows with all fields present
    pub rows: usize,
    /// Symmetric Pearson matrix over `fields`
    pub matrix: Vec<Vec<Statistic>>,
}

pub(super) fn analyze(table: &SurveyTable) -> Result<CorrelationReport, AnalysisError> {
    let work_exp = table.numeric(WORK_EXP)?;
    let years_code: Vec<Option<f64>> = table
        .text(YEARS_CODE)?
        .iter()
        .map(|raw| raw.as_deref().and_then(DataProcessor::parse_years))
        .collect();
    let compensation = table.numeric(COMPENSATION)?;
    let job_sat = table.numeric(JOB_SAT)?;
    let tools = table.numeric(TOOL_COUNT_WORK)?;
    let sources = [&work_exp, &years_code, &compensation, &job_sat, &tools];

    // one shared filter: a row counts only when every field is present
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); sources.len()];
    for row in 0..table.height() {
        let values: Option<Vec<f64>> = sources.iter().map(|column| column[row]).collect();
        if let Some(values) = values {
            for (column, value) in columns.iter_mut().zip(values) {
                column.push(value);
            }
        }
    }
    let rows = columns[0].len();
    debug!("complete rows for correlation: {rows}");

    Ok(CorrelationReport {
        fields: CORRELATION_FIELDS.iter().map(|f| f.to_string()).collect(),
        rows,
        matrix: StatsCalculator::correlation_matrix(&columns),
    })
}

impl CorrelationReport {
    /// Heatmap of the lower triangle; the diagonal and upper triangle are masked.
    pub fn chart(&self) -> ChartData {
        let cells: Vec<Vec<Option<f64>>> = self
            .matrix
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, r)| if j < i { r.value() } else { None })
                    .collect()
            })
            .collect();

        ChartData {
            title: "Correlation Matrix of Key Developer Metrics".to_string(),
            x_desc: String::new(),
            y_desc: String::new(),
            figure_size: (10.0, 8.0),
            kind: ChartKind::Heatmap {
                rows: self.fields.clone(),
                columns: self.fields.clone(),
                cells,
                value_range: (-1.0, 1.0),
                color_map: ColorMap::CoolWarm,
                decimals: 3,
                legend: "Pearson r".to_string(),
            },
        }
    }
}

impl fmt::Display for CorrelationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Complete rows: {}", format_count(self.rows))?;
        writeln!(f)?;
        writeln!(f, "Correlation Matrix:")?;
        let mut headers = vec![String::new()];
        headers.extend(self.fields.iter().cloned());
        let mut table = TextTable::new(headers);
        for (field, row) in self.fields.iter().zip(&self.matrix) {
            let mut cells = vec![field.clone()];
            cells.extend(row.iter().map(|r| fixed(r, 3)));
            table.push_row(cells);
        }
        write!(f, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixture::{table, Respondent};

    impl CorrelationReport {
        fn get(&self, a: &str, b: &str) -> Option<&Statistic> {
            let i = self.fields.iter().position(|f| f == a)?;
            let j = self.fields.iter().position(|f| f == b)?;
            Some(&self.matrix[i][j])
        }
    }

    fn metrics(
        work_exp: f64,
        years_code: &'static str,
        compensation: f64,
        job_sat: f64,
        tools: f64,
    ) -> Respondent {
        Respondent {
            work_exp: Some(work_exp),
            years_code: Some(years_code),
            compensation: Some(compensation),
            job_sat: Some(job_sat),
            tool_count: Some(tools),
            ..Respondent::default()
        }
    }

    #[test]
    fn test_shared_row_filter_and_symmetry() {
        let source = table(&[
            metrics(1.0, "Less than 1 year", 40000.0, 6.0, 3.0),
            metrics(5.0, "8", 65000.0, 7.0, 5.0),
            metrics(10.0, "15", 90000.0, 5.0, 4.0),
            metrics(20.0, "More than 50 years", 120000.0, 9.0, 8.0),
            metrics(3.0, "not sure", 50000.0, 8.0, 2.0),
            Respondent::paid(70000.0, 4.0),
        ]);
        let report = analyze(&source).unwrap();

        assert_eq!(report.rows, 4);
        assert_eq!(report.fields.len(), 5);
        for i in 0..5 {
            assert_eq!(report.matrix[i][i], Statistic::Defined(1.0));
            for j in 0..5 {
                assert_eq!(report.matrix[i][j], report.matrix[j][i]);
            }
        }
        let r = report.get(WORK_EXP, COMPENSATION).unwrap().value().unwrap();
        let expected =
            StatsCalculator::pearson(&[1.0, 5.0, 10.0, 20.0], &[40000.0, 65000.0, 90000.0, 120000.0])
                .unwrap();
        assert!((r - expected).abs() < 1e-12);
    }

    #[test]
    fn test_constant_field_is_undefined() {
        let source = table(&[
            metrics(1.0, "2", 40000.0, 7.0, 3.0),
            metrics(2.0, "4", 50000.0, 7.0, 4.0),
            metrics(3.0, "9", 70000.0, 7.0, 6.0),
        ]);
        let report = analyze(&source).unwrap();
        assert!(!report.get(JOB_SAT, WORK_EXP).unwrap().is_defined());
        assert!(!report.get(JOB_SAT, JOB_SAT).unwrap().is_defined());
        assert!(report.get(WORK_EXP, YEARS_CODE).unwrap().is_defined());
        assert!(report.to_string().contains("undefined"));
    }

    #[test]
    fn test_too_few_rows_is_undefined() {
        let report = analyze(&table(&[metrics(1.0, "2", 40000.0, 7.0, 3.0)])).unwrap();
        assert_eq!(report.rows, 1);
        assert!(report.matrix.iter().flatten().all(|r| !r.is_defined()));
    }

    #[test]
    fn test_heatmap_masks_diagonal_and_upper() {
        let source = table(&[
            metrics(1.0, "2", 40000.0, 6.0, 3.0),
            metrics(2.0, "4", 50000.0, 7.0, 4.0),
            metrics(3.0, "9", 70000.0, 9.0, 6.0),
        ]);
        match analyze(&source).unwrap().chart().kind {
            ChartKind::Heatmap {
                cells, value_range, ..
            } => {
                assert_eq!(value_range, (-1.0, 1.0));
                for (i, row) in cells.iter().enumerate() {
                    for (j, cell) in row.iter().enumerate() {
                        assert_eq!(cell.is_some(), j < i, "cell {i},{j}");
                    }
                }
            }
            other => panic!("unexpected chart {other:?}"),
        }
    }
}
