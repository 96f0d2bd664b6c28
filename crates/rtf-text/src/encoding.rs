//! Legacy 8-bit escaping for RTF output
//!
//! RTF readers expect 7-bit text; everything else is written as a `\'hh`
//! escape. The transform is one-way.

use std::fmt::Write;

/// Prefix of an escaped character
pub const ESCAPE_PREFIX: &str = "\\'";

/// UTF-8 `€` read back as Windows-1252 (`â‚¬`)
pub const EURO_MOJIBAKE: &str = "\u{e2}\u{201a}\u{ac}";

/// Escape for `€` in Windows-1252
pub const EURO_ESCAPE: &str = "\\'80";

const NO_BREAK_SPACE: char = '\u{a0}';

/// Escape non-ASCII text for RTF output
///
/// - no-break spaces become plain spaces
/// - the `â‚¬` mojibake becomes [`EURO_ESCAPE`]
/// - any other non-ASCII character becomes [`ESCAPE_PREFIX`] followed by the
///   lowercase hex of the low 16 bits of its code point
///
/// # Examples
/// ```
/// use rtf_text::encode_legacy;
///
/// assert_eq!(encode_legacy("Café"), "Caf\\'e9");
/// assert_eq!(encode_legacy("10\u{a0}km"), "10 km");
/// assert_eq!(encode_legacy("5 \u{e2}\u{201a}\u{ac}"), "5 \\'80");
/// ```
pub fn encode_legacy(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if let Some(after) = rest.strip_prefix(EURO_MOJIBAKE) {
            out.push_str(EURO_ESCAPE);
            rest = after;
            continue;
        }

        match ch {
            NO_BREAK_SPACE => out.push(' '),
            c if c.is_ascii() => out.push(c),
            c => {
                // writing to a String cannot fail
                let _ = write!(out, "{ESCAPE_PREFIX}{:x}", u32::from(c) & 0xFFFF);
            }
        }
        rest = &rest[ch.len_utf8()..];
    }

    out
}
