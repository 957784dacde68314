//! iCalendar (RFC 5545) serialization for shift feeds.
//!
//! Output format sketch:
//!
//! ```text
//! BEGIN:VCALENDAR
//! VERSION:2.0
//! PRODID:-//shiftcal//Shift Calendar 0.1//EN
//! CALSCALE:GREGORIAN
//! X-WR-CALNAME:All Shifts
//! BEGIN:VEVENT
//! UID:shift1-20260807@shiftcal
//! DTSTAMP:20260807T070000Z
//! DTSTART:20260807T070000
//! DTEND:20260807T150000
//! SUMMARY:Shift 1
//! END:VEVENT
//! END:VCALENDAR
//! ```
//!
//! Serialization rules:
//! - lines are CRLF-terminated and folded at 75 octets with a leading space
//!   on continuation lines,
//! - text values escape `\`, `;`, `,` and newlines,
//! - `DTSTART`/`DTEND` are floating local times: shift schedules are
//!   wall-clock commitments, and clients render floating times in the
//!   subscriber's local zone,
//! - `DTSTAMP` is derived from the event start rather than the generation
//!   instant, keeping the output byte-stable for HTTP caching.

use crate::constants::{ICS_LINE_LIMIT, ICS_PROD_ID};
use crate::schedule::ShiftEvent;

const DT_FORMAT: &str = "%Y%m%dT%H%M%S";

/// A named collection of shift occurrences, serializable to iCalendar text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    name: String,
    events: Vec<ShiftEvent>,
}

impl Calendar {
    pub fn new(name: impl Into<String>, events: Vec<ShiftEvent>) -> Self {
        Self {
            name: name.into(),
            events,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn events(&self) -> &[ShiftEvent] {
        &self.events
    }

    /// Serializes the calendar to iCalendar text.
    pub fn to_ical(&self) -> String {
        let mut lines = Vec::with_capacity(self.events.len() * 7 + 6);
        lines.push("BEGIN:VCALENDAR".to_string());
        lines.push("VERSION:2.0".to_string());
        lines.push(format!("PRODID:{ICS_PROD_ID}"));
        lines.push("CALSCALE:GREGORIAN".to_string());
        lines.push(format!("X-WR-CALNAME:{}", escape_text(&self.name)));

        for event in &self.events {
            lines.push("BEGIN:VEVENT".to_string());
            lines.push(format!("UID:{}", event.uid()));
            lines.push(format!("DTSTAMP:{}Z", event.start.format(DT_FORMAT)));
            lines.push(format!("DTSTART:{}", event.start.format(DT_FORMAT)));
            lines.push(format!("DTEND:{}", event.end.format(DT_FORMAT)));
            lines.push(format!("SUMMARY:{}", escape_text(&event.summary())));
            lines.push("END:VEVENT".to_string());
        }

        lines.push("END:VCALENDAR".to_string());

        let mut out = String::new();
        for line in &lines {
            out.push_str(&fold_line(line));
            out.push_str("\r\n");
        }
        out
    }
}

/// Escapes a TEXT property value per RFC 5545 section 3.3.11.
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Folds a content line at the 75-octet limit, splitting only on character
/// boundaries. Continuation lines start with a single space.
fn fold_line(line: &str) -> String {
    if line.len() <= ICS_LINE_LIMIT {
        return line.to_string();
    }
    let mut folded = String::with_capacity(line.len() + 8);
    let mut remaining = ICS_LINE_LIMIT;
    for ch in line.chars() {
        let width = ch.len_utf8();
        if width > remaining {
            folded.push_str("\r\n ");
            remaining = ICS_LINE_LIMIT - 1;
        }
        folded.push(ch);
        remaining -= width;
    }
    folded
}
