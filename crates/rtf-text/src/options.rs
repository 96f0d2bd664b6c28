//! Format options for numbers and dates
//!
//! A field may carry a fragment such as `style=currency,currency=EUR` after
//! its path. Keys use the names familiar from locale-aware formatting APIs;
//! keys and values may be wrapped in single or double quotes.

use crate::{Result, TextError};

/// Upper bound for fraction digit options
const MAX_FRACTION_DIGITS: u8 = 20;

/// Upper bound for the minimum integer digits option
const MAX_INTEGER_DIGITS: u8 = 21;

/// Number presentation style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberStyle {
    #[default]
    Decimal,
    Percent,
    Currency,
}

/// Length of a date or time rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    Full,
    Long,
    Medium,
    Short,
}

/// Options controlling number and date rendering
///
/// `None` means "use the default for the style and locale".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub style: NumberStyle,
    /// ISO 4217 code, required for [`NumberStyle::Currency`]
    pub currency: Option<String>,
    pub minimum_fraction_digits: Option<u8>,
    pub maximum_fraction_digits: Option<u8>,
    pub minimum_integer_digits: Option<u8>,
    pub use_grouping: Option<bool>,
    pub date_style: Option<DateStyle>,
    pub time_style: Option<DateStyle>,
}

impl FormatOptions {
    /// Parse a comma separated list of `key=value` pairs
    ///
    /// # Examples
    /// ```
    /// use rtf_text::{FormatOptions, NumberStyle};
    ///
    /// let options = FormatOptions::parse("style='currency', currency=EUR").unwrap();
    /// assert_eq!(options.style, NumberStyle::Currency);
    /// assert_eq!(options.currency.as_deref(), Some("EUR"));
    ///
    /// assert!(FormatOptions::parse("colour=red").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let mut options = Self::default();

        for pair in text.split(',') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid(format!("expected key=value, found '{pair}'")))?;
            let key = unquote(key.trim());
            let value = unquote(value.trim());

            match key {
                "style" => {
                    options.style = match value {
                        "decimal" => NumberStyle::Decimal,
                        "percent" => NumberStyle::Percent,
                        "currency" => NumberStyle::Currency,
                        other => return Err(invalid_value(key, other)),
                    }
                }
                "currency" => {
                    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
                        return Err(invalid_value(key, value));
                    }
                    options.currency = Some(value.to_ascii_uppercase());
                }
                "minimumFractionDigits" => {
                    options.minimum_fraction_digits =
                        Some(parse_digits(key, value, MAX_FRACTION_DIGITS)?)
                }
                "maximumFractionDigits" => {
                    options.maximum_fraction_digits =
                        Some(parse_digits(key, value, MAX_FRACTION_DIGITS)?)
                }
                "minimumIntegerDigits" => {
                    let digits = parse_digits(key, value, MAX_INTEGER_DIGITS)?;
                    if digits == 0 {
                        return Err(invalid_value(key, value));
                    }
                    options.minimum_integer_digits = Some(digits);
                }
                "useGrouping" => {
                    options.use_grouping = Some(match value {
                        "true" => true,
                        "false" => false,
                        other => return Err(invalid_value(key, other)),
                    })
                }
                "dateStyle" => options.date_style = Some(parse_date_style(key, value)?),
                "timeStyle" => options.time_style = Some(parse_date_style(key, value)?),
                other => return Err(invalid(format!("unknown option '{other}'"))),
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Whether a date or time style was requested
    pub fn has_date_style(&self) -> bool {
        self.date_style.is_some() || self.time_style.is_some()
    }

    fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.minimum_fraction_digits, self.maximum_fraction_digits)
        {
            if min > max {
                return Err(invalid(format!(
                    "minimumFractionDigits ({min}) exceeds maximumFractionDigits ({max})"
                )));
            }
        }
        if self.style == NumberStyle::Currency && self.currency.is_none() {
            return Err(invalid("style=currency requires a currency code".to_string()));
        }
        Ok(())
    }
}

fn parse_digits(key: &str, value: &str, max: u8) -> Result<u8> {
    value
        .parse::<u8>()
        .ok()
        .filter(|n| *n <= max)
        .ok_or_else(|| invalid_value(key, value))
}

fn parse_date_style(key: &str, value: &str) -> Result<DateStyle> {
    match value {
        "full" => Ok(DateStyle::Full),
        "long" => Ok(DateStyle::Long),
        "medium" => Ok(DateStyle::Medium),
        "short" => Ok(DateStyle::Short),
        other => Err(invalid_value(key, other)),
    }
}

/// Strip one pair of matching quotes
fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn invalid(message: String) -> TextError {
    TextError::InvalidOptions(message)
}

fn invalid_value(key: &str, value: &str) -> TextError {
    invalid(format!("invalid value '{value}' for {key}"))
}
