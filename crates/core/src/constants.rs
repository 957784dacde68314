//! Constants used throughout the shiftcal core crate.

/// Number of shifts in the rotation.
pub const SHIFT_COUNT: usize = 5;

/// Default rotation template file name, searched for relative to the working
/// directory and then up the source tree when no override is given.
pub const TEMPLATE_FILE_NAME: &str = "template.csv";

/// Date the rotation cycle is anchored to (year, month, day). The rotation
/// day for any calendar date is the number of days since this epoch, modulo
/// the template's cycle length, so a given date always lands on the same
/// rotation day no matter when a feed is generated.
pub const ROTATION_EPOCH_YMD: (i32, u32, u32) = (2024, 1, 1);

/// Default feed horizon in weeks when no end date is given.
pub const DEFAULT_WEEKS_AHEAD: u32 = 52;

/// Default public base URL advertised on the landing page.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// PRODID property emitted in every generated VCALENDAR.
pub const ICS_PROD_ID: &str = "-//shiftcal//Shift Calendar 0.1//EN";

/// Maximum octets per physical content line in iCalendar output before
/// folding, per RFC 5545 section 3.1.
pub const ICS_LINE_LIMIT: usize = 75;
