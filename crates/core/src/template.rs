//! Rotation template parsing.
//!
//! A rotation template is a CSV file describing one cycle of the shift
//! rotation. The header is `day,shift1,shift2,shift3,shift4,shift5`; each
//! subsequent row is one day of the cycle. A cell is either empty (the shift
//! is off that day) or a wall-clock range `HH:MM-HH:MM`. A range whose end is
//! not after its start crosses midnight and ends on the following day.
//!
//! The `day` column is a human-readable label only; the cycle phase is
//! anchored to a fixed epoch (see [`crate::constants::ROTATION_EPOCH_YMD`]),
//! not to anything in the file.

use crate::constants::SHIFT_COUNT;
use crate::error::{CalendarError, CalendarResult};
use chrono::NaiveTime;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A validated shift number.
///
/// This type is deliberately *closed*: a constructed `ShiftId` is always
/// within `1..=SHIFT_COUNT`, so downstream code can index rotation days
/// without range checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftId(u8);

impl ShiftId {
    /// Creates a `ShiftId` from a 1-based shift number.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidShiftNumber` if `number` is outside
    /// `1..=SHIFT_COUNT`.
    pub fn new(number: u8) -> CalendarResult<Self> {
        if number == 0 || number as usize > SHIFT_COUNT {
            return Err(CalendarError::InvalidShiftNumber { got: number });
        }
        Ok(Self(number))
    }

    /// The 1-based shift number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Iterates over every shift in the rotation, in order.
    pub fn all() -> impl Iterator<Item = ShiftId> {
        (1..=SHIFT_COUNT as u8).map(ShiftId)
    }

    /// Zero-based column index within a rotation day.
    pub(crate) fn index(self) -> usize {
        usize::from(self.0) - 1
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A wall-clock working window within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    /// Parses a `HH:MM-HH:MM` cell. Returns `None` on any grammar violation;
    /// callers attach row/column context.
    pub fn parse(value: &str) -> Option<Self> {
        let (start, end) = value.split_once('-')?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
        Some(Self { start, end })
    }

    /// A range whose end is not after its start ends on the following day.
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }
}

/// Per-shift assignments for one day of the rotation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationDay {
    assignments: [Option<TimeRange>; SHIFT_COUNT],
}

impl RotationDay {
    /// The working window for `shift` on this day, if it is rostered on.
    pub fn assignment(&self, shift: ShiftId) -> Option<TimeRange> {
        self.assignments[shift.index()]
    }
}

/// One full cycle of the shift rotation, parsed from `template.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTemplate {
    days: Vec<RotationDay>,
}

impl ShiftTemplate {
    /// Reads and parses a rotation template from a CSV file.
    ///
    /// # Errors
    /// Returns `CalendarError::TemplateRead` if the file cannot be opened,
    /// or any parse error from [`ShiftTemplate::from_csv_reader`].
    pub fn from_csv_file(path: &Path) -> CalendarResult<Self> {
        let file = File::open(path).map_err(|source| CalendarError::TemplateRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    /// Parses a rotation template from CSV text.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the CSV is malformed (`TemplateParse`),
    /// - the header is not `day,shift1,...,shift5` (`TemplateHeader`),
    /// - there are no rotation rows (`TemplateEmpty`),
    /// - a cell is neither empty nor `HH:MM-HH:MM` (`InvalidTimeRange`).
    pub fn from_csv_reader(reader: impl Read) -> CalendarResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let expected = expected_header();
        let got: Vec<&str> = headers.iter().collect();
        if got != expected {
            return Err(CalendarError::TemplateHeader {
                expected: expected.join(","),
                got: got.join(","),
            });
        }

        let mut days = Vec::new();
        for (row_index, record) in csv_reader.records().enumerate() {
            let record = record?;
            let mut assignments = [None; SHIFT_COUNT];
            for (column_index, assignment) in assignments.iter_mut().enumerate() {
                let cell = record.get(column_index + 1).unwrap_or("");
                if cell.is_empty() {
                    continue;
                }
                let range =
                    TimeRange::parse(cell).ok_or_else(|| CalendarError::InvalidTimeRange {
                        // +2: one for the header row, one for 1-based counting
                        row: row_index + 2,
                        column: expected[column_index + 1].to_string(),
                        value: cell.to_string(),
                    })?;
                *assignment = Some(range);
            }
            days.push(RotationDay { assignments });
        }

        if days.is_empty() {
            return Err(CalendarError::TemplateEmpty);
        }

        Ok(Self { days })
    }

    /// Number of days in one rotation cycle.
    pub fn cycle_len(&self) -> usize {
        self.days.len()
    }

    /// The rotation day at `index`, wrapping around the cycle.
    pub fn day(&self, index: usize) -> &RotationDay {
        &self.days[index % self.days.len()]
    }
}

fn expected_header() -> Vec<String> {
    let mut header = Vec::with_capacity(SHIFT_COUNT + 1);
    header.push("day".to_string());
    for number in 1..=SHIFT_COUNT {
        header.push(format!("shift{number}"));
    }
    header
}
