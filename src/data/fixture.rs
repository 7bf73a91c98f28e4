//! In-memory survey tables for unit tests.

use super::loader::*;
use polars::prelude::*;

#[derive(Debug, Clone, Default)]
pub struct Respondent {
    pub compensation: Option<f64>,
    pub work_exp: Option<f64>,
    pub years_code: Option<&'static str>,
    pub languages: Option<&'static str>,
    pub ed_level: Option<&'static str>,
    pub remote_work: Option<&'static str>,
    pub job_sat: Option<f64>,
    pub ai_threat: Option<&'static str>,
    pub country: Option<&'static str>,
    pub dev_type: Option<&'static str>,
    pub tool_count: Option<f64>,
}

impl Respondent {
    pub fn paid(compensation: f64, work_exp: f64) -> Self {
        Self {
            compensation: Some(compensation),
            work_exp: Some(work_exp),
            ..Self::default()
        }
    }
}

fn numeric(name: &str, rows: &[Respondent], get: impl Fn(&Respondent) -> Option<f64>) -> Column {
    Column::new(name.into(), rows.iter().map(get).collect::<Vec<_>>())
}

fn text(
    name: &str,
    rows: &[Respondent],
    get: impl Fn(&Respondent) -> Option<&'static str>,
) -> Column {
    Column::new(name.into(), rows.iter().map(get).collect::<Vec<_>>())
}

pub fn table(rows: &[Respondent]) -> SurveyTable {
    let df = DataFrame::new(vec![
        numeric(COMPENSATION, rows, |r| r.compensation),
        numeric(WORK_EXP, rows, |r| r.work_exp),
        text(YEARS_CODE, rows, |r| r.years_code),
        text(LANGUAGES, rows, |r| r.languages),
        text(ED_LEVEL, rows, |r| r.ed_level),
        text(REMOTE_WORK, rows, |r| r.remote_work),
        numeric(JOB_SAT, rows, |r| r.job_sat),
        text(AI_THREAT, rows, |r| r.ai_threat),
        text(COUNTRY, rows, |r| r.country),
        text(DEV_TYPE, rows, |r| r.dev_type),
        numeric(TOOL_COUNT_WORK, rows, |r| r.tool_count),
    ])
    .expect("fixture columns share one length");
    SurveyTable::from_dataframe(df).expect("fixture has every required column")
}
