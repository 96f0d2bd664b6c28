//! Locale definitions
//!
//! Each locale carries the separators and date patterns needed to render
//! values the way office documents in that region expect them. Patterns use
//! the usual CLDR letters (`d`, `M`, `y`, `E`, `H`, `h`, `m`, `s`, `a`).

use crate::options::DateStyle;
use crate::{Result, TextError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// English month names
const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English month names (abbreviated)
const EN_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// English weekday names, Monday first
const EN_WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// German month names
const DE_MONTHS: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// German month names (abbreviated)
const DE_MONTHS_SHORT: [&str; 12] = [
    "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
    "Dez.",
];

/// German weekday names, Monday first
const DE_WEEKDAYS: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];

/// French month names
const FR_MONTHS: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// French month names (abbreviated)
const FR_MONTHS_SHORT: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// French weekday names, Monday first
const FR_WEEKDAYS: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

/// Where a currency symbol goes relative to the amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    /// `$1,234.50`
    Prefix,
    /// `1.234,50 €`
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Language {
    English,
    German,
    French,
}

impl Language {
    fn months(self) -> &'static [&'static str; 12] {
        match self {
            Language::English => &EN_MONTHS,
            Language::German => &DE_MONTHS,
            Language::French => &FR_MONTHS,
        }
    }

    fn months_short(self) -> &'static [&'static str; 12] {
        match self {
            Language::English => &EN_MONTHS_SHORT,
            Language::German => &DE_MONTHS_SHORT,
            Language::French => &FR_MONTHS_SHORT,
        }
    }

    fn weekdays(self) -> &'static [&'static str; 7] {
        match self {
            Language::English => &EN_WEEKDAYS,
            Language::German => &DE_WEEKDAYS,
            Language::French => &FR_WEEKDAYS,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct LocaleData {
    tag: &'static str,
    language: Language,
    decimal: &'static str,
    group: &'static str,
    percent_gap: &'static str,
    currency_position: CurrencyPosition,
    /// Date patterns indexed full, long, medium, short
    dates: [&'static str; 4],
    /// Time patterns indexed full, long, medium, short
    times: [&'static str; 4],
    default_date: &'static str,
    default_time: &'static str,
    joiner: &'static str,
}

static LOCALES: [LocaleData; 5] = [
    LocaleData {
        tag: "en-US",
        language: Language::English,
        decimal: ".",
        group: ",",
        percent_gap: "",
        currency_position: CurrencyPosition::Prefix,
        dates: ["EEEE, MMMM d, y", "MMMM d, y", "MMM d, y", "M/d/yy"],
        times: ["h:mm:ss a", "h:mm:ss a", "h:mm:ss a", "h:mm a"],
        default_date: "M/d/y",
        default_time: "h:mm:ss a",
        joiner: ", ",
    },
    LocaleData {
        tag: "en-GB",
        language: Language::English,
        decimal: ".",
        group: ",",
        percent_gap: "",
        currency_position: CurrencyPosition::Prefix,
        dates: ["EEEE d MMMM y", "d MMMM y", "d MMM y", "dd/MM/y"],
        times: ["HH:mm:ss", "HH:mm:ss", "HH:mm:ss", "HH:mm"],
        default_date: "dd/MM/y",
        default_time: "HH:mm:ss",
        joiner: ", ",
    },
    LocaleData {
        tag: "de-DE",
        language: Language::German,
        decimal: ",",
        group: ".",
        percent_gap: "\u{a0}",
        currency_position: CurrencyPosition::Suffix,
        dates: ["EEEE, d. MMMM y", "d. MMMM y", "dd.MM.y", "dd.MM.yy"],
        times: ["HH:mm:ss", "HH:mm:ss", "HH:mm:ss", "HH:mm"],
        default_date: "d.M.y",
        default_time: "HH:mm:ss",
        joiner: ", ",
    },
    LocaleData {
        tag: "de-CH",
        language: Language::German,
        decimal: ".",
        group: "\u{2019}",
        percent_gap: "",
        currency_position: CurrencyPosition::Prefix,
        dates: ["EEEE, d. MMMM y", "d. MMMM y", "dd.MM.y", "dd.MM.yy"],
        times: ["HH:mm:ss", "HH:mm:ss", "HH:mm:ss", "HH:mm"],
        default_date: "d.M.y",
        default_time: "HH:mm:ss",
        joiner: ", ",
    },
    LocaleData {
        tag: "fr-FR",
        language: Language::French,
        decimal: ",",
        group: "\u{202f}",
        percent_gap: "\u{202f}",
        currency_position: CurrencyPosition::Suffix,
        dates: ["EEEE d MMMM y", "d MMMM y", "d MMM y", "dd/MM/y"],
        times: ["HH:mm:ss", "HH:mm:ss", "HH:mm:ss", "HH:mm"],
        default_date: "dd/MM/y",
        default_time: "HH:mm:ss",
        joiner: " ",
    },
];

/// Region used when only a language is given
const PRIMARY_REGIONS: [(&str, &str); 3] = [("en", "en-US"), ("de", "de-DE"), ("fr", "fr-FR")];

/// Tags accepted as spellings of another locale
const ALIASES: [(&str, &str); 1] = [("en-UK", "en-GB")];

/// A formatting locale
///
/// Locales are cheap to copy; all data is static.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    data: &'static LocaleData,
}

impl Locale {
    /// Look up a locale by its tag
    ///
    /// Tags are matched case-insensitively and `_` is accepted in place of
    /// `-`. A tag whose region is unknown falls back to the primary region of
    /// its language (`de-LU` formats like `de-DE`).
    ///
    /// # Examples
    /// ```
    /// use rtf_text::Locale;
    /// assert_eq!(Locale::from_tag("de_de").unwrap().tag(), "de-DE");
    /// assert_eq!(Locale::from_tag("en-UK").unwrap().tag(), "en-GB");
    /// assert_eq!(Locale::from_tag("fr").unwrap().tag(), "fr-FR");
    /// assert!(Locale::from_tag("xx-YY").is_err());
    /// ```
    pub fn from_tag(tag: &str) -> Result<Self> {
        let normalized = tag.trim().replace('_', "-");
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(&normalized))
            .map(|(_, target)| *target)
            .unwrap_or(normalized.as_str());

        if let Some(data) = find_locale(canonical) {
            return Ok(Self { data });
        }

        let language = canonical.split('-').next().unwrap_or_default();
        PRIMARY_REGIONS
            .iter()
            .find(|(lang, _)| lang.eq_ignore_ascii_case(language))
            .and_then(|(_, region)| find_locale(region))
            .map(|data| Self { data })
            .ok_or_else(|| TextError::UnknownLocale(tag.to_string()))
    }

    /// Tags of all built-in locales
    pub fn available() -> impl Iterator<Item = &'static str> {
        LOCALES.iter().map(|data| data.tag)
    }

    /// Canonical tag, e.g. `de-DE`
    pub fn tag(&self) -> &'static str {
        self.data.tag
    }

    /// Decimal separator
    pub fn decimal_separator(&self) -> &'static str {
        self.data.decimal
    }

    /// Thousands separator
    pub fn group_separator(&self) -> &'static str {
        self.data.group
    }

    /// Text placed between a number and its percent sign
    pub fn percent_gap(&self) -> &'static str {
        self.data.percent_gap
    }

    pub fn currency_position(&self) -> CurrencyPosition {
        self.data.currency_position
    }

    /// Date pattern for a date style
    pub fn date_pattern(&self, style: DateStyle) -> &'static str {
        self.data.dates[style_index(style)]
    }

    /// Time pattern for a time style
    pub fn time_pattern(&self, style: DateStyle) -> &'static str {
        self.data.times[style_index(style)]
    }

    /// Date pattern used when no style is requested
    pub fn default_date_pattern(&self) -> &'static str {
        self.data.default_date
    }

    /// Time pattern used when no style is requested
    pub fn default_time_pattern(&self) -> &'static str {
        self.data.default_time
    }

    /// Text between the date and time parts of a combined rendering
    pub fn date_time_joiner(&self) -> &'static str {
        self.data.joiner
    }

    /// Month name, `month` in 1..=12
    pub fn month_name(&self, month: u32, abbreviated: bool) -> &'static str {
        let names = if abbreviated {
            self.data.language.months_short()
        } else {
            self.data.language.months()
        };
        let idx = month.saturating_sub(1) as usize;
        names.get(idx).copied().unwrap_or("")
    }

    /// Weekday name, `day` counted from Monday = 0
    pub fn weekday_name(&self, day: u32) -> &'static str {
        self.data
            .language
            .weekdays()
            .get(day as usize)
            .copied()
            .unwrap_or("")
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self { data: &LOCALES[1] }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data.tag)
    }
}

impl FromStr for Locale {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_tag(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.tag().to_string()
    }
}

fn find_locale(tag: &str) -> Option<&'static LocaleData> {
    LOCALES.iter().find(|data| data.tag.eq_ignore_ascii_case(tag))
}

fn style_index(style: DateStyle) -> usize {
    match style {
        DateStyle::Full => 0,
        DateStyle::Long => 1,
        DateStyle::Medium => 2,
        DateStyle::Short => 3,
    }
}
