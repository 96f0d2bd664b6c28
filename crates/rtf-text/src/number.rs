//! Locale-aware number formatting

use crate::locale::{CurrencyPosition, Locale};
use crate::options::{FormatOptions, NumberStyle};

/// Maximum fraction digits for plain decimals when none are requested
const DEFAULT_MAX_FRACTION_DIGITS: u8 = 3;

const NO_BREAK_SPACE: &str = "\u{a0}";

/// Format a number for a locale
///
/// Without options this matches the usual locale default: thousands
/// grouping and up to three fraction digits.
///
/// # Examples
/// ```
/// use rtf_text::{format_number, FormatOptions, Locale};
///
/// let us = Locale::from_tag("en-US").unwrap();
/// assert_eq!(format_number(1234567.891, &us, &FormatOptions::default()), "1,234,567.891");
///
/// let de = Locale::from_tag("de-DE").unwrap();
/// let euro = FormatOptions::parse("style=currency,currency=EUR").unwrap();
/// assert_eq!(format_number(-42.5, &de, &euro), "-42,50\u{a0}€");
/// ```
pub fn format_number(n: f64, locale: &Locale, options: &FormatOptions) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }

    let value = match options.style {
        NumberStyle::Percent => n * 100.0,
        NumberStyle::Decimal | NumberStyle::Currency => n,
    };

    let body = if value.is_infinite() {
        "∞".to_string()
    } else {
        let (min_fd, max_fd) = fraction_digits(options);
        let (int_digits, frac_digits) = round_digits(value.abs(), min_fd, max_fd);
        let int_digits = pad_integer(int_digits, options.minimum_integer_digits.unwrap_or(1));
        let int_str = if options.use_grouping.unwrap_or(true) {
            format_with_thousands(&int_digits, locale.group_separator())
        } else {
            int_digits
        };
        if frac_digits.is_empty() {
            int_str
        } else {
            format!("{int_str}{}{frac_digits}", locale.decimal_separator())
        }
    };

    let sign = if value < 0.0 { "-" } else { "" };

    match options.style {
        NumberStyle::Decimal => format!("{sign}{body}"),
        NumberStyle::Percent => format!("{sign}{body}{}%", locale.percent_gap()),
        NumberStyle::Currency => {
            let symbol = currency_symbol(options.currency.as_deref().unwrap_or_default());
            match locale.currency_position() {
                CurrencyPosition::Prefix => {
                    // letter codes such as CHF need a gap, signs do not
                    let gap = if !symbol.is_empty() && symbol.chars().all(char::is_alphabetic) {
                        NO_BREAK_SPACE
                    } else {
                        ""
                    };
                    format!("{sign}{symbol}{gap}{body}")
                }
                CurrencyPosition::Suffix => format!("{sign}{body}{NO_BREAK_SPACE}{symbol}"),
            }
        }
    }
}

/// Resolve the effective fraction digit range
fn fraction_digits(options: &FormatOptions) -> (u8, u8) {
    let (default_min, default_max) = match options.style {
        NumberStyle::Decimal => (0, DEFAULT_MAX_FRACTION_DIGITS),
        NumberStyle::Percent => (0, 0),
        NumberStyle::Currency => {
            let digits = currency_digits(options.currency.as_deref().unwrap_or_default());
            (digits, digits)
        }
    };

    match (
        options.minimum_fraction_digits,
        options.maximum_fraction_digits,
    ) {
        (Some(min), Some(max)) => (min, max.max(min)),
        (Some(min), None) => (min, default_max.max(min)),
        (None, Some(max)) => (default_min.min(max), max),
        (None, None) => (default_min, default_max),
    }
}

/// Round to `max_fd` places and split into integer and fraction digits
///
/// Trailing zeros are trimmed from the fraction down to `min_fd` digits.
fn round_digits(abs: f64, min_fd: u8, max_fd: u8) -> (String, String) {
    let scale = max_fd as usize;
    let scaled = (abs * 10_f64.powi(max_fd as i32)).round();

    // beyond f64 range the value is whole, so the fraction is all zeros
    let mut digits = if scaled.is_finite() {
        format!("{scaled:.0}")
    } else {
        format!("{abs:.0}{}", "0".repeat(scale))
    };
    if digits.len() <= scale {
        digits = format!("{}{digits}", "0".repeat(scale + 1 - digits.len()));
    }

    let (int_part, frac_part) = digits.split_at(digits.len() - scale);
    let mut frac = frac_part.to_string();
    while frac.len() > min_fd as usize && frac.ends_with('0') {
        frac.pop();
    }

    (int_part.to_string(), frac)
}

fn pad_integer(digits: String, min_digits: u8) -> String {
    let min_digits = min_digits as usize;
    if digits.len() >= min_digits {
        digits
    } else {
        format!("{}{digits}", "0".repeat(min_digits - digits.len()))
    }
}

/// Insert a group separator every three digits
fn format_with_thousands(digits: &str, sep: &str) -> String {
    if sep.is_empty() {
        return digits.to_string();
    }

    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3 * sep.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push_str(sep);
        }
        result.push(c);
    }

    result
}

fn currency_symbol(code: &str) -> &str {
    match code {
        "EUR" => "€",
        "USD" => "$",
        "GBP" => "£",
        "JPY" => "¥",
        other => other,
    }
}

fn currency_digits(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" => 0,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn locale(tag: &str) -> Locale {
        Locale::from_tag(tag).unwrap()
    }

    fn opts(text: &str) -> FormatOptions {
        FormatOptions::parse(text).unwrap()
    }

    #[test]
    fn test_default_decimal() {
        let o = FormatOptions::default();
        assert_eq!(format_number(1234.5, &locale("en-GB"), &o), "1,234.5");
        assert_eq!(format_number(1234.5, &locale("de-DE"), &o), "1.234,5");
        assert_eq!(format_number(1234.5, &locale("de-CH"), &o), "1\u{2019}234.5");
        assert_eq!(format_number(1234.5, &locale("fr-FR"), &o), "1\u{202f}234,5");
        assert_eq!(format_number(42.0, &locale("en-US"), &o), "42");
        assert_eq!(format_number(0.1234, &locale("en-US"), &o), "0.123");
    }

    #[test]
    fn test_negative() {
        let o = FormatOptions::default();
        assert_eq!(format_number(-1000000.0, &locale("en-US"), &o), "-1,000,000");
    }

    #[test]
    fn test_fraction_digits() {
        let us = locale("en-US");
        assert_eq!(format_number(3.0, &us, &opts("minimumFractionDigits=2")), "3.00");
        assert_eq!(format_number(3.14159, &us, &opts("maximumFractionDigits=1")), "3.1");
        assert_eq!(format_number(2.5, &us, &opts("maximumFractionDigits=0")), "3");
        assert_eq!(
            format_number(1.2, &us, &opts("minimumFractionDigits=1,maximumFractionDigits=4")),
            "1.2"
        );
        assert_eq!(format_number(1.23456, &us, &opts("minimumFractionDigits=5")), "1.23456");
    }

    #[test]
    fn test_grouping_and_integer_digits() {
        let us = locale("en-US");
        assert_eq!(format_number(1234567.0, &us, &opts("useGrouping=false")), "1234567");
        assert_eq!(format_number(7.0, &us, &opts("minimumIntegerDigits=3")), "007");
        assert_eq!(format_number(0.5, &us, &FormatOptions::default()), "0.5");
    }

    #[test]
    fn test_percent() {
        let o = opts("style=percent");
        assert_eq!(format_number(0.25, &locale("en-US"), &o), "25%");
        assert_eq!(format_number(0.25, &locale("de-DE"), &o), "25\u{a0}%");
        assert_eq!(format_number(0.125, &locale("fr-FR"), &opts("style=percent,maximumFractionDigits=1")), "12,5\u{202f}%");
    }

    #[test]
    fn test_currency() {
        assert_eq!(
            format_number(1234.5, &locale("en-US"), &opts("style=currency,currency=USD")),
            "$1,234.50"
        );
        assert_eq!(
            format_number(1234.5, &locale("de-DE"), &opts("style=currency,currency=EUR")),
            "1.234,50\u{a0}€"
        );
        assert_eq!(
            format_number(1234.5, &locale("de-CH"), &opts("style=currency,currency=CHF")),
            "CHF\u{a0}1\u{2019}234.50"
        );
        assert_eq!(
            format_number(1234.5, &locale("en-GB"), &opts("style=currency,currency=JPY")),
            "¥1,235"
        );
    }

    #[test]
    fn test_special_values() {
        let o = FormatOptions::default();
        assert_eq!(format_number(f64::NAN, &locale("en-US"), &o), "NaN");
        assert_eq!(format_number(f64::INFINITY, &locale("en-US"), &o), "∞");
        assert_eq!(format_number(f64::NEG_INFINITY, &locale("en-US"), &o), "-∞");
    }

    #[test]
    fn test_format_with_thousands() {
        assert_eq!(format_with_thousands("1000", ","), "1,000");
        assert_eq!(format_with_thousands("1000000", ","), "1,000,000");
        assert_eq!(format_with_thousands("100", ","), "100");
        assert_eq!(format_with_thousands("12345", ""), "12345");
    }

    #[test]
    fn test_round_digits() {
        assert_eq!(round_digits(0.5, 0, 3), ("0".to_string(), "5".to_string()));
        assert_eq!(round_digits(12.0, 2, 2), ("12".to_string(), "00".to_string()));
        assert_eq!(round_digits(0.0004, 0, 3), ("0".to_string(), String::new()));
    }

    #[test]
    fn test_huge_numbers() {
        let us = locale("en-US");
        let big = format_number(1e306, &us, &FormatOptions::default());
        assert!(big.starts_with("1,000,000,000,000,000,017"), "{big}");
        assert!(!big.contains("inf"));
        assert!(!big.contains('.'));

        let wide = format_number(1e290, &us, &opts("maximumFractionDigits=20"));
        assert!(wide.starts_with("1"), "{wide}");
        assert!(!wide.contains("inf"));
        assert!(!wide.contains('.'));

        let (int_part, frac) = round_digits(1e300, 2, 20);
        assert_eq!(int_part, format!("{:.0}", 1e300));
        assert_eq!(frac, "00");
    }
}
