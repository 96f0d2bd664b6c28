//! Marker scanning
//!
//! Finds the fixed structural markers in template text. Matching is a plain
//! left-to-right literal search; structure is decided by the element
//! builder in [`crate::parser`].

use serde::Serialize;
use std::fmt;

/// Structural markers recognised in templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    /// `:#field:`
    FieldOpen,
    /// `:#array:`
    ArrayOpen,
    /// `:#include:`
    IncludeOpen,
    /// `#:`
    Close,
    /// `\row \` - a table row ends and another control word follows
    RowStart,
    /// `\row }` - the last row of a table ends
    RowEnd,
}

impl MarkerKind {
    /// All kinds in match priority order
    pub const ALL: [MarkerKind; 6] = [
        MarkerKind::FieldOpen,
        MarkerKind::ArrayOpen,
        MarkerKind::IncludeOpen,
        MarkerKind::Close,
        MarkerKind::RowEnd,
        MarkerKind::RowStart,
    ];

    /// The literal text of the marker
    pub fn literal(self) -> &'static str {
        match self {
            MarkerKind::FieldOpen => ":#field:",
            MarkerKind::ArrayOpen => ":#array:",
            MarkerKind::IncludeOpen => ":#include:",
            MarkerKind::Close => "#:",
            MarkerKind::RowStart => "\\row \\",
            MarkerKind::RowEnd => "\\row }",
        }
    }

    /// Whether this marker opens a tag
    pub fn is_open(self) -> bool {
        matches!(
            self,
            MarkerKind::FieldOpen | MarkerKind::ArrayOpen | MarkerKind::IncludeOpen
        )
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// A marker occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub kind: MarkerKind,
    /// Byte offset of the first character of the literal
    pub offset: usize,
}

impl Marker {
    /// Byte offset just past the literal
    pub fn end(&self) -> usize {
        self.offset + self.kind.literal().len()
    }
}

/// Find all non-overlapping markers in ascending offset order
///
/// # Examples
/// ```
/// use template::{scan_markers, MarkerKind};
///
/// let markers = scan_markers("Dear :#field:name#:,");
/// assert_eq!(markers.len(), 2);
/// assert_eq!(markers[0].kind, MarkerKind::FieldOpen);
/// assert_eq!(markers[1].offset, 17);
/// ```
pub fn scan_markers(text: &str) -> Vec<Marker> {
    let bytes = text.as_bytes();
    let mut markers = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        // every literal starts with one of these
        if !matches!(bytes[pos], b':' | b'#' | b'\\') {
            pos += 1;
            continue;
        }

        let rest = &bytes[pos..];
        match MarkerKind::ALL
            .iter()
            .find(|kind| rest.starts_with(kind.literal().as_bytes()))
        {
            Some(&kind) => {
                markers.push(Marker { kind, offset: pos });
                pos += kind.literal().len();
            }
            None => pos += 1,
        }
    }

    markers
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(text: &str) -> Vec<(MarkerKind, usize)> {
        scan_markers(text)
            .into_iter()
            .map(|m| (m.kind, m.offset))
            .collect()
    }

    #[test]
    fn test_no_markers() {
        assert!(scan_markers("{\\rtf1\\ansi plain # text : here}").is_empty());
        assert!(scan_markers("").is_empty());
    }

    #[test]
    fn test_all_kinds() {
        let text = ":#field:a#: :#array:b#: :#include:c#: \\row \\trowd \\row }";
        assert_eq!(
            kinds(text),
            vec![
                (MarkerKind::FieldOpen, 0),
                (MarkerKind::Close, 9),
                (MarkerKind::ArrayOpen, 12),
                (MarkerKind::Close, 21),
                (MarkerKind::IncludeOpen, 24),
                (MarkerKind::Close, 35),
                (MarkerKind::RowStart, 38),
                (MarkerKind::RowEnd, 50),
            ]
        );
    }

    #[test]
    fn test_non_overlapping() {
        // the close consumes the colon that would start another open
        assert_eq!(kinds("#:#field:"), vec![(MarkerKind::Close, 0)]);
        assert_eq!(
            kinds("#::#field:"),
            vec![(MarkerKind::Close, 0), (MarkerKind::FieldOpen, 2)]
        );
    }

    #[test]
    fn test_multibyte_text() {
        let text = "Grüße :#field:x#:";
        let markers = scan_markers(text);
        assert_eq!(markers[0].offset, "Grüße ".len());
        assert_eq!(&text[markers[1].offset..markers[1].end()], "#:");
    }

    #[test]
    fn test_marker_end() {
        let m = Marker {
            kind: MarkerKind::IncludeOpen,
            offset: 3,
        };
        assert_eq!(m.end(), 13);
        assert_eq!(MarkerKind::RowStart.to_string(), "\\row \\");
        assert!(MarkerKind::ArrayOpen.is_open());
        assert!(!MarkerKind::Close.is_open());
    }
}
