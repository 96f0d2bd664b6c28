//! Merge configuration

use crate::{Result, TemplateError};
use chrono::{FixedOffset, Offset, Utc};
use rtf_text::Locale;
use serde::{Deserialize, Serialize};

/// Minutes in a day; offsets must stay strictly inside one day
const MINUTES_PER_DAY: i32 = 24 * 60;

/// How the repetition count of a table row is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowCountPolicy {
    /// The first field of the row decides
    #[default]
    FirstField,
    /// The first field whose path reaches a sequence decides
    AnyField,
}

/// Settings for a merge
///
/// All fields are optional in JSON:
///
/// ```json
/// { "locale": "de-DE", "utcOffsetMinutes": 60, "rowCount": "anyField" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeConfig {
    /// Locale for numbers and dates
    pub locale: Locale,
    /// Offset used to read and display dates
    pub utc_offset_minutes: i32,
    pub row_count: RowCountPolicy,
    /// Report open markers used in the wrong context
    pub strict_markers: bool,
    /// Copy structural warnings into the protocol
    pub report_structure: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            utc_offset_minutes: 0,
            row_count: RowCountPolicy::default(),
            strict_markers: false,
            report_structure: true,
        }
    }
}

impl MergeConfig {
    /// Load from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.utc_offset_minutes.abs() >= MINUTES_PER_DAY {
            return Err(TemplateError::Config(format!(
                "utcOffsetMinutes must be within one day, got {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Builder-style locale setter
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Builder-style offset setter
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// The configured offset; UTC if out of range
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}
