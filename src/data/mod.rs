//! Data module - CSV loading and processing

mod education;
mod loader;
mod processor;

#[cfg(test)]
pub(crate) mod fixture;

pub use education::EducationLevel;
pub use loader::{
    DataLoader, LoaderError, SurveyTable, AI_THREAT, COMPENSATION, COUNTRY, DEV_TYPE, ED_LEVEL,
    JOB_SAT, LANGUAGES, NUMERIC_COLUMNS, REMOTE_WORK, TEXT_COLUMNS, TOOL_COUNT_WORK, WORK_EXP,
    YEARS_CODE,
};
pub use processor::{DataProcessor, ExperienceBins, LANGUAGE_DELIMITER};
