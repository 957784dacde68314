//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! handlers. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent
//! behaviour in multi-threaded runtimes and test harnesses.

use crate::constants::{DEFAULT_WEEKS_AHEAD, TEMPLATE_FILE_NAME};
use crate::error::{CalendarError, CalendarResult};
use crate::template::ShiftTemplate;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    template_file: PathBuf,
    base_url: String,
    weeks_ahead: u32,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidInput` if `base_url` is empty or
    /// `weeks_ahead` is zero.
    pub fn new(template_file: PathBuf, base_url: String, weeks_ahead: u32) -> CalendarResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CalendarError::InvalidInput("base_url cannot be empty".into()));
        }
        if weeks_ahead == 0 {
            return Err(CalendarError::InvalidInput(
                "weeks_ahead must be at least 1".into(),
            ));
        }

        Ok(Self {
            template_file,
            base_url,
            weeks_ahead,
        })
    }

    pub fn template_file(&self) -> &Path {
        &self.template_file
    }

    /// Public base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn weeks_ahead(&self) -> u32 {
        self.weeks_ahead
    }
}

/// Resolve the rotation template file without reading environment variables.
///
/// If `override_file` is provided it must exist. Otherwise this searches for
/// `template.csv` relative to the current working directory and then walks up
/// from `CARGO_MANIFEST_DIR`.
///
/// # Errors
/// Returns `CalendarError::InvalidInput` if the override does not exist or
/// no template file can be located.
pub fn resolve_template_file(override_file: Option<PathBuf>) -> CalendarResult<PathBuf> {
    if let Some(template_file) = override_file {
        if template_file.is_file() {
            return Ok(template_file);
        }
        return Err(CalendarError::InvalidInput(format!(
            "SHIFTCAL_TEMPLATE_FILE override is not a readable file: {}",
            template_file.display()
        )));
    }

    let cwd_relative = PathBuf::from(TEMPLATE_FILE_NAME);
    if cwd_relative.is_file() {
        return Ok(cwd_relative);
    }

    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    for ancestor in manifest_dir.ancestors() {
        let candidate = ancestor.join(TEMPLATE_FILE_NAME);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Err(CalendarError::InvalidInput(format!(
        "could not locate {TEMPLATE_FILE_NAME} (set SHIFTCAL_TEMPLATE_FILE to override)"
    )))
}

/// Validate that the resolved template parses cleanly.
///
/// This is intended to be run at startup so a broken rotation template fails
/// the process before it starts accepting connections.
///
/// # Errors
/// Propagates any parse error from [`ShiftTemplate::from_csv_file`].
pub fn validate_template_file(template_file: &Path) -> CalendarResult<()> {
    let template = ShiftTemplate::from_csv_file(template_file)?;
    tracing::debug!(
        days = template.cycle_len(),
        template = %template_file.display(),
        "validated rotation template"
    );
    Ok(())
}

/// Parse the `SHIFTCAL_WEEKS_AHEAD` environment value, falling back to the
/// default horizon when unset.
///
/// # Errors
/// Returns `CalendarError::InvalidInput` if the value is present but not a
/// positive integer.
pub fn weeks_ahead_from_env_value(value: Option<String>) -> CalendarResult<u32> {
    match value {
        None => Ok(DEFAULT_WEEKS_AHEAD),
        Some(raw) => raw.trim().parse::<u32>().ok().filter(|w| *w > 0).ok_or_else(|| {
            CalendarError::InvalidInput(format!(
                "SHIFTCAL_WEEKS_AHEAD must be a positive integer, got `{raw}`"
            ))
        }),
    }
}
