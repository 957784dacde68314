//! # Shiftcal Core
//!
//! Core business logic for the shift calendar service.
//!
//! This crate contains pure domain operations:
//! - Rotation template parsing (`template.csv`)
//! - Schedule expansion over a date window
//! - iCalendar serialization of the resulting feeds
//!
//! **No API concerns**: HTTP servers, routing, OpenAPI documentation, and
//! CLI parsing belong in `api-rest` and `cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod ics;
pub mod schedule;
pub mod template;

pub use config::{
    resolve_template_file, validate_template_file, weeks_ahead_from_env_value, CoreConfig,
};
pub use error::{CalendarError, CalendarResult};
pub use ics::Calendar;
pub use schedule::{default_date_range, expand_schedule, ShiftEvent};
pub use template::{RotationDay, ShiftId, ShiftTemplate, TimeRange};

use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::Path;

/// One-call feed generation: parse the template, expand the rotation over
/// `[from, to)` and wrap the events in a named [`Calendar`].
///
/// `selected = None` produces the combined feed for all shifts; a set with a
/// single shift produces that shift's feed.
///
/// # Errors
/// Propagates template parse errors and `CalendarError::InvalidDateRange`
/// from expansion.
pub fn generate_calendar(
    template_file: &Path,
    from: NaiveDate,
    to: NaiveDate,
    selected: Option<&BTreeSet<ShiftId>>,
) -> CalendarResult<Calendar> {
    let template = ShiftTemplate::from_csv_file(template_file)?;
    let events = expand_schedule(&template, from, to, selected)?;
    Ok(Calendar::new(calendar_name(selected), events))
}

fn calendar_name(selected: Option<&BTreeSet<ShiftId>>) -> String {
    match selected {
        None => "All Shifts".to_string(),
        Some(set) if set.len() == 1 => match set.iter().next() {
            Some(shift) => format!("Shift {shift}"),
            None => "All Shifts".to_string(),
        },
        Some(_) => "Selected Shifts".to_string(),
    }
}
