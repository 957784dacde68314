use crate::constants::SHIFT_COUNT;
use chrono::NaiveDate;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read template file {path}: {source}", path = path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse template CSV: {0}")]
    TemplateParse(#[from] csv::Error),
    #[error("template header must be `{expected}`, got `{got}`")]
    TemplateHeader { expected: String, got: String },
    #[error("template contains no rotation rows")]
    TemplateEmpty,
    #[error("template row {row}, column {column}: invalid time range `{value}` (expected HH:MM-HH:MM or empty)")]
    InvalidTimeRange {
        row: usize,
        column: String,
        value: String,
    },
    #[error("shift number must be between 1 and {max}, got {got}", max = SHIFT_COUNT)]
    InvalidShiftNumber { got: u8 },
    #[error("invalid date range: {from} must be before {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
    #[error("failed to write calendar file {path}: {source}", path = path.display())]
    CalendarWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type CalendarResult<T> = std::result::Result<T, CalendarError>;
