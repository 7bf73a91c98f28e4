//! CSV Data Loader Module
//! Handles survey file loading and typed column extraction using Polars.

use log::{debug, info};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const COMPENSATION: &str = "ConvertedCompYearly";
pub const WORK_EXP: &str = "WorkExp";
pub const YEARS_CODE: &str = "YearsCode";
pub const LANGUAGES: &str = "LanguageHaveWorkedWith";
pub const ED_LEVEL: &str = "EdLevel";
pub const REMOTE_WORK: &str = "RemoteWork";
pub const JOB_SAT: &str = "JobSat";
pub const AI_THREAT: &str = "AIThreat";
pub const COUNTRY: &str = "Country";
pub const DEV_TYPE: &str = "DevType";
pub const TOOL_COUNT_WORK: &str = "ToolCountWork";

/// Required columns stored as `Float64`.
pub const NUMERIC_COLUMNS: [&str; 4] = [COMPENSATION, WORK_EXP, JOB_SAT, TOOL_COUNT_WORK];

/// Required columns stored as `String`.
pub const TEXT_COLUMNS: [&str; 7] = [
    YEARS_CODE,
    LANGUAGES,
    ED_LEVEL,
    REMOTE_WORK,
    AI_THREAT,
    COUNTRY,
    DEV_TYPE,
];

/// Marker the survey export uses for unanswered questions.
const NA_MARKER: &str = "NA";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),
    #[error("Required column missing: {0}")]
    MissingColumn(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Read-only view of the survey restricted to the analysed columns.
///
/// Every operation that narrows the rows returns a new table; the frame a
/// table was built from is never modified.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    df: DataFrame,
    source_width: usize,
}

impl SurveyTable {
    /// Validate the required columns and normalise their types.
    pub fn from_dataframe(df: DataFrame) -> Result<Self, LoaderError> {
        let source_width = df.width();
        {
            let names = df.get_column_names();
            for required in NUMERIC_COLUMNS.iter().chain(TEXT_COLUMNS.iter()) {
                if !names.iter().any(|name| name.as_str() == *required) {
                    return Err(LoaderError::MissingColumn(required.to_string()));
                }
            }
        }

        let projection: Vec<Expr> = NUMERIC_COLUMNS
            .iter()
            .map(|name| col(*name).cast(DataType::Float64))
            .chain(
                TEXT_COLUMNS
                    .iter()
                    .map(|name| col(*name).cast(DataType::String)),
            )
            .collect();

        let df = df.lazy().select(projection).collect()?;
        Ok(Self { df, source_width })
    }

    /// Number of responses.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns in the source file, before projection.
    pub fn source_width(&self) -> usize {
        self.source_width
    }

    /// Derived copy holding only the rows matching `predicate`.
    pub fn filter(&self, predicate: Expr) -> Result<SurveyTable, LoaderError> {
        let df = self.df.clone().lazy().filter(predicate).collect()?;
        Ok(Self {
            df,
            source_width: self.source_width,
        })
    }

    /// Values of a numeric column; `None` marks a missing answer (null or NaN).
    pub fn numeric(&self, column: &str) -> Result<Vec<Option<f64>>, LoaderError> {
        let series = self.df.column(column)?;
        let ca = series.f64()?;
        Ok(ca
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Values of a text column, trimmed; blank cells count as missing.
    pub fn text(&self, column: &str) -> Result<Vec<Option<String>>, LoaderError> {
        let series = self.df.column(column)?;
        let ca = series.str()?;
        Ok(ca
            .into_iter()
            .map(|v| {
                v.map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .collect())
    }
}

/// Handles CSV file loading with Polars for high performance.
#[derive(Debug, Clone)]
pub struct DataLoader {
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(10000),
        }
    }

    /// Load the survey CSV and check that every required column exists.
    pub fn load_csv(&self, file_path: &Path) -> Result<SurveyTable, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::MissingInput(file_path.to_path_buf()));
        }

        info!("Reading {}", file_path.display());
        let df = LazyCsvReader::new(file_path)
            .with_infer_schema_length(self.infer_schema_length)
            .with_null_values(Some(NullValues::AllColumnsSingle(NA_MARKER.into())))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        debug!("Parsed {} rows x {} columns", df.height(), df.width());

        SurveyTable::from_dataframe(df)
    }
}
