//! RTF Text - value formatting for merged RTF documents
//!
//! This crate provides:
//! - Locale definitions (separators, date patterns, month and weekday names)
//! - Locale-aware number formatting (decimal, percent, currency)
//! - Locale-aware date/time formatting with date and time styles
//! - Parsing of `key=value` format option fragments
//! - The legacy 8-bit escape transform required by RTF output
//!
//! # Example
//!
//! ```
//! use rtf_text::{encode_legacy, format_number, FormatOptions, Locale};
//!
//! let locale = Locale::from_tag("de-DE").unwrap();
//! let options = FormatOptions::parse("minimumFractionDigits=2").unwrap();
//! assert_eq!(format_number(1234.5, &locale, &options), "1.234,50");
//!
//! assert_eq!(encode_legacy("Müller"), "M\\'fcller");
//! ```

mod date;
mod encoding;
mod locale;
mod number;
mod options;

pub use date::{format_datetime, parse_iso_datetime};
pub use encoding::{encode_legacy, ESCAPE_PREFIX, EURO_ESCAPE, EURO_MOJIBAKE};
pub use locale::{CurrencyPosition, Locale};
pub use number::format_number;
pub use options::{DateStyle, FormatOptions, NumberStyle};

use thiserror::Error;

/// Errors that can occur during value formatting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("Unknown locale: {0}")]
    UnknownLocale(String),

    #[error("Invalid format options: {0}")]
    InvalidOptions(String),
}

/// Result type for formatting operations
pub type Result<T> = std::result::Result<T, TextError>;
