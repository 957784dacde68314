//! Expansion of a rotation template into concrete shift occurrences.
//!
//! Expansion is pure: the same template and window always produce the same
//! events, because the cycle phase is derived from a fixed epoch rather than
//! from the time of the request. This keeps the generated feeds byte-stable
//! and cacheable.

use crate::constants::ROTATION_EPOCH_YMD;
use crate::error::{CalendarError, CalendarResult};
use crate::template::{ShiftId, ShiftTemplate};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

/// One concrete shift occurrence on a specific date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftEvent {
    pub shift: ShiftId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ShiftEvent {
    /// Human-readable event title, e.g. `Shift 3`.
    pub fn summary(&self) -> String {
        format!("Shift {}", self.shift)
    }

    /// Deterministic event identifier, stable across regenerations of the
    /// same feed so calendar clients can reconcile updates.
    pub fn uid(&self) -> String {
        format!(
            "shift{}-{}@shiftcal",
            self.shift,
            self.start.date().format("%Y%m%d")
        )
    }
}

fn rotation_epoch() -> NaiveDate {
    let (year, month, day) = ROTATION_EPOCH_YMD;
    NaiveDate::from_ymd_opt(year, month, day).expect("rotation epoch is a valid calendar date")
}

/// Expands the rotation over the half-open window `[from, to)`.
///
/// When `selected` is `Some`, only the listed shifts produce events;
/// `None` expands every shift. An overnight assignment produces an event
/// ending on the day after its start, so `end` is always after `start`.
///
/// # Errors
/// Returns `CalendarError::InvalidDateRange` if `from >= to`.
pub fn expand_schedule(
    template: &ShiftTemplate,
    from: NaiveDate,
    to: NaiveDate,
    selected: Option<&BTreeSet<ShiftId>>,
) -> CalendarResult<Vec<ShiftEvent>> {
    if from >= to {
        return Err(CalendarError::InvalidDateRange { from, to });
    }

    let epoch = rotation_epoch();
    let cycle_len = template.cycle_len() as i64;

    let mut events = Vec::new();
    let mut date = from;
    while date < to {
        let next_date = date.succ_opt().ok_or_else(|| {
            CalendarError::InvalidInput("date range extends beyond supported dates".into())
        })?;

        let offset = (date - epoch).num_days().rem_euclid(cycle_len) as usize;
        let day = template.day(offset);

        for shift in ShiftId::all() {
            if let Some(selected) = selected {
                if !selected.contains(&shift) {
                    continue;
                }
            }
            let Some(range) = day.assignment(shift) else {
                continue;
            };
            let end_date = if range.crosses_midnight() {
                next_date
            } else {
                date
            };
            events.push(ShiftEvent {
                shift,
                start: date.and_time(range.start),
                end: end_date.and_time(range.end),
            });
        }

        date = next_date;
    }

    Ok(events)
}

/// The default feed window: `weeks` weeks starting at `today`.
pub fn default_date_range(today: NaiveDate, weeks: u32) -> (NaiveDate, NaiveDate) {
    (today, today + Duration::weeks(i64::from(weeks)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
day,shift1,shift2,shift3,shift4,shift5
1,07:00-15:00,,,23:00-07:00,
2,,07:00-15:00,,,
";

    fn sample_template() -> ShiftTemplate {
        ShiftTemplate::from_csv_reader(SAMPLE.as_bytes()).expect("sample template parses")
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_expansion_is_anchored_to_epoch() {
        let template = sample_template();
        // 2024-01-01 is the epoch, so it is day 1 of the cycle.
        let events = expand_schedule(&template, date(2024, 1, 1), date(2024, 1, 2), None).unwrap();
        let shifts: Vec<u8> = events.iter().map(|e| e.shift.number()).collect();
        assert_eq!(shifts, vec![1, 4]);

        // Two cycle lengths later the same rotation day comes around again.
        let later = expand_schedule(&template, date(2024, 1, 5), date(2024, 1, 6), None).unwrap();
        let later_shifts: Vec<u8> = later.iter().map(|e| e.shift.number()).collect();
        assert_eq!(shifts, later_shifts);
    }

    #[test]
    fn test_window_end_is_exclusive() {
        let template = sample_template();
        let events = expand_schedule(&template, date(2024, 1, 1), date(2024, 1, 3), None).unwrap();
        // Day 1 yields shifts 1 and 4, day 2 yields shift 2; day 3 is outside.
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.start.date() < date(2024, 1, 3)));
    }

    #[test]
    fn test_overnight_shift_ends_next_day() {
        let template = sample_template();
        let events = expand_schedule(&template, date(2024, 1, 1), date(2024, 1, 2), None).unwrap();
        let night = events.iter().find(|e| e.shift.number() == 4).unwrap();
        assert_eq!(night.start.date(), date(2024, 1, 1));
        assert_eq!(night.end.date(), date(2024, 1, 2));
        assert!(night.end > night.start);
    }

    #[test]
    fn test_selected_shifts_filter_events() {
        let template = sample_template();
        let selected: BTreeSet<ShiftId> = [ShiftId::new(4).unwrap()].into_iter().collect();
        let events =
            expand_schedule(&template, date(2024, 1, 1), date(2024, 1, 8), Some(&selected))
                .unwrap();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.shift.number() == 4));
    }

    #[test]
    fn test_selection_without_assignments_yields_empty() {
        let template = sample_template();
        let selected: BTreeSet<ShiftId> = [ShiftId::new(3).unwrap()].into_iter().collect();
        let events =
            expand_schedule(&template, date(2024, 1, 1), date(2024, 1, 8), Some(&selected))
                .unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_rejects_empty_or_inverted_window() {
        let template = sample_template();
        let err =
            expand_schedule(&template, date(2024, 1, 2), date(2024, 1, 2), None).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDateRange { .. }));
        let err =
            expand_schedule(&template, date(2024, 1, 3), date(2024, 1, 2), None).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_uid_is_deterministic() {
        let template = sample_template();
        let first = expand_schedule(&template, date(2024, 1, 1), date(2024, 1, 2), None).unwrap();
        let second = expand_schedule(&template, date(2024, 1, 1), date(2024, 1, 2), None).unwrap();
        let first_uids: Vec<String> = first.iter().map(ShiftEvent::uid).collect();
        let second_uids: Vec<String> = second.iter().map(ShiftEvent::uid).collect();
        assert_eq!(first_uids, second_uids);
        assert_eq!(first_uids[0], "shift1-20240101@shiftcal");
    }

    #[test]
    fn test_default_date_range_spans_requested_weeks() {
        let (from, to) = default_date_range(date(2026, 8, 7), 52);
        assert_eq!(from, date(2026, 8, 7));
        assert_eq!((to - from).num_days(), 52 * 7);
    }
}
