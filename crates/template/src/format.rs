//! Field names and value formatting

use crate::config::MergeConfig;
use crate::protocol::{Entry, Protocol};
use crate::value::Value;
use rtf_text::{encode_legacy, format_datetime, format_number, parse_iso_datetime, FormatOptions};
use std::borrow::Cow;

/// A field name split into its path and format options
///
/// `items.price:style=currency,currency=EUR` has the path `items.price` and
/// the options `style=currency,currency=EUR`. A colon directly after a
/// closing quote followed by a space (`"style": "percent"`) is read as `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName<'a> {
    pub path: &'a str,
    pub options: Option<Cow<'a, str>>,
}

impl<'a> FieldName<'a> {
    pub fn parse(name: &'a str) -> Self {
        let normalized = normalize_assignments(name);

        // normalisation keeps byte offsets, so the path can borrow `name`
        let Some(colon) = normalized.find(':') else {
            return Self {
                path: name.trim(),
                options: None,
            };
        };

        let options = match normalized {
            Cow::Borrowed(s) => Cow::Borrowed(s[colon + 1..].trim()),
            Cow::Owned(s) => Cow::Owned(s[colon + 1..].trim().to_string()),
        };

        Self {
            path: name[..colon].trim(),
            options: (!options.is_empty()).then_some(options),
        }
    }
}

fn normalize_assignments(name: &str) -> Cow<'_, str> {
    if name.contains("\": ") || name.contains("': ") {
        Cow::Owned(name.replace("\": ", "\"= ").replace("': ", "'= "))
    } else {
        Cow::Borrowed(name)
    }
}

/// Render a resolved value for insertion into the document
///
/// Returns `None` for values that cannot be written. Output is already
/// legacy-encoded.
pub(crate) fn format_value(
    value: &Value,
    name: &FieldName<'_>,
    config: &MergeConfig,
    protocol: &mut Protocol,
) -> Option<String> {
    let offset = config.utc_offset();

    let text = match value {
        Value::String(s) => match parse_iso_datetime(s, offset) {
            Some(dt) => {
                let options = parse_options(name, protocol);
                format_datetime(&dt.with_timezone(&offset).naive_local(), &config.locale, &options)
            }
            None => s.clone(),
        },
        Value::Number(n) => format_number(*n, &config.locale, &parse_options(name, protocol)),
        Value::Date(dt) => {
            let options = parse_options(name, protocol);
            format_datetime(&dt.with_timezone(&offset).naive_local(), &config.locale, &options)
        }
        _ => return None,
    };

    Some(encode_legacy(&text))
}

fn parse_options(name: &FieldName<'_>, protocol: &mut Protocol) -> FormatOptions {
    let Some(text) = name.options.as_deref() else {
        return FormatOptions::default();
    };

    FormatOptions::parse(text).unwrap_or_else(|err| {
        protocol.push(Entry::InvalidFormatOptions {
            field: name.path.to_string(),
            options: text.to_string(),
            reason: err.to_string(),
        });
        FormatOptions::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;
    use rtf_text::Locale;

    fn format(value: Value, name: &str, config: &MergeConfig) -> (Option<String>, Protocol) {
        let mut protocol = Protocol::new();
        let out = format_value(&value, &FieldName::parse(name), config, &mut protocol);
        (out, protocol)
    }

    fn de() -> MergeConfig {
        MergeConfig::default().with_locale(Locale::from_tag("de-DE").unwrap())
    }

    #[test]
    fn test_field_name_plain() {
        let name = FieldName::parse(" to.name1 ");
        assert_eq!(name.path, "to.name1");
        assert_eq!(name.options, None);
    }

    #[test]
    fn test_field_name_options() {
        let name = FieldName::parse("total:style=percent");
        assert_eq!(name.path, "total");
        assert_eq!(name.options.as_deref(), Some("style=percent"));

        let name = FieldName::parse("total:  ");
        assert_eq!(name.options, None);
    }

    #[test]
    fn test_field_name_normalises_json_style() {
        let name = FieldName::parse("amount:\"style\": \"currency\", 'currency': 'EUR'");
        assert_eq!(name.path, "amount");
        assert_eq!(
            name.options.as_deref(),
            Some("\"style\"= \"currency\", 'currency'= 'EUR'")
        );
    }

    #[test]
    fn test_format_string() {
        let (out, protocol) = format(Value::from("Grüße"), "x", &MergeConfig::default());
        assert_eq!(out.as_deref(), Some("Gr\\'fc\\'dfe"));
        assert!(protocol.is_empty());
    }

    #[test]
    fn test_string_ignores_options() {
        let (out, protocol) = format(Value::from("abc"), "x:bogus", &MergeConfig::default());
        assert_eq!(out.as_deref(), Some("abc"));
        assert!(protocol.is_empty());
    }

    #[test]
    fn test_format_number_default() {
        let (out, _) = format(Value::from(1234.5), "n", &MergeConfig::default());
        assert_eq!(out.as_deref(), Some("1,234.5"));

        let (out, _) = format(Value::from(1234.5), "n", &de());
        assert_eq!(out.as_deref(), Some("1.234,5"));
    }

    #[test]
    fn test_format_number_with_options() {
        let (out, protocol) = format(
            Value::from(0.256),
            "rate:style=percent,maximumFractionDigits=1",
            &MergeConfig::default(),
        );
        assert_eq!(out.as_deref(), Some("25.6%"));
        assert!(protocol.is_empty());
    }

    #[test]
    fn test_currency_is_escaped() {
        let (out, _) = format(Value::from(1234.5), "p:style=currency,currency=EUR", &de());
        // no-break space becomes a space, the euro sign is escaped
        assert_eq!(out.as_deref(), Some("1.234,50 \\'20ac"));
    }

    #[test]
    fn test_invalid_options_fall_back() {
        let (out, protocol) = format(Value::from(2.5), "n:colour=red", &MergeConfig::default());
        assert_eq!(out.as_deref(), Some("2.5"));
        assert_eq!(protocol.len(), 1);
        assert!(matches!(
            &protocol.entries()[0],
            Entry::InvalidFormatOptions { field, .. } if field == "n"
        ));
    }

    #[test]
    fn test_iso_string_becomes_date() {
        let (out, _) = format(Value::from("2024-03-01T09:05:00Z"), "d", &de());
        assert_eq!(out.as_deref(), Some("1.3.2024, 09:05:00"));

        let (out, _) = format(
            Value::from("2024-03-01T09:05:00Z"),
            "d",
            &de().with_utc_offset_minutes(60),
        );
        assert_eq!(out.as_deref(), Some("1.3.2024, 10:05:00"));
    }

    #[test]
    fn test_date_value_with_style() {
        let dt = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 9, 5, 0)
            .unwrap();
        let (out, _) = format(Value::from(dt), "d:dateStyle=short", &de());
        assert_eq!(out.as_deref(), Some("01.03.24"));
    }

    #[test]
    fn test_non_leaf_values() {
        let config = MergeConfig::default();
        assert_eq!(format(Value::Null, "x", &config).0, None);
        assert_eq!(format(Value::from(true), "x", &config).0, None);
        assert_eq!(format(Value::empty(), "x", &config).0, None);
    }
}
