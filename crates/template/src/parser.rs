//! Template parsing
//!
//! Turns the flat marker list from [`crate::scanner`] into elements. Fields
//! closed inside a table row belong to that row; the last row of a table
//! (`\row \` ... `\row }`) becomes a repeatable row group if it holds at
//! least one field. The three open markers are interchangeable unless
//! strict marker checking is on.

use crate::elements::{Element, Field, RowGroup};
use crate::scanner::{scan_markers, Marker, MarkerKind};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

/// Non-fatal problems found while building elements
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralWarning {
    #[error("Start tag {opener} at offset {offset} has no end tag and was ignored.")]
    UnclosedTag { opener: MarkerKind, offset: usize },

    #[error("Tag at offset {offset} starts before the table row at offset {row_start} and was ignored.")]
    FieldCrossesRow { offset: usize, row_start: usize },

    #[error("Table row at offset {offset} with {fields} field(s) is not the last row of its table and was ignored.")]
    RowDiscarded { offset: usize, fields: usize },

    #[error("Tag {opener} at offset {offset} is used {}.", row_context(.inside_row))]
    MarkerMismatch {
        opener: MarkerKind,
        offset: usize,
        inside_row: bool,
    },
}

fn row_context(inside_row: &bool) -> &'static str {
    if *inside_row {
        "inside a table row"
    } else {
        "outside a table row"
    }
}

/// A template split into elements, ready to be merged
#[derive(Debug, Clone)]
pub struct ParsedTemplate {
    text: String,
    elements: Vec<Element>,
    warnings: Vec<StructuralWarning>,
}

impl ParsedTemplate {
    /// Parse with interchangeable open markers
    pub fn parse(text: impl Into<String>) -> Self {
        Self::parse_with(text, false)
    }

    /// Parse, optionally reporting open markers used in the wrong context
    pub fn parse_with(text: impl Into<String>, strict_markers: bool) -> Self {
        let text = text.into();
        let markers = scan_markers(&text);
        let (elements, warnings) = build_elements(&text, &markers, strict_markers);

        for warning in &warnings {
            tracing::warn!(%warning, "template structure");
        }
        tracing::debug!(
            markers = markers.len(),
            elements = elements.len(),
            "parsed template"
        );

        Self {
            text,
            elements,
            warnings,
        }
    }

    /// The template text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Top-level elements in document order
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Problems found while parsing
    pub fn warnings(&self) -> &[StructuralWarning] {
        &self.warnings
    }
}

/// Parse template text
pub fn parse_template(text: &str) -> ParsedTemplate {
    ParsedTemplate::parse(text)
}

/// Build elements from markers found in `text`
///
/// `markers` must come from [`scan_markers`] on the same text.
pub fn build_elements(
    text: &str,
    markers: &[Marker],
    strict_markers: bool,
) -> (Vec<Element>, Vec<StructuralWarning>) {
    let mut builder = ElementBuilder {
        text,
        strict_markers,
        field: None,
        row: None,
        elements: Vec::new(),
        warnings: Vec::new(),
    };

    for marker in markers {
        builder.feed(*marker);
    }

    builder.finish()
}

struct OpenField {
    start: usize,
    content_start: usize,
    opener: MarkerKind,
}

struct OpenRow {
    start: usize,
    fields: Vec<Field>,
}

struct ElementBuilder<'a> {
    text: &'a str,
    strict_markers: bool,
    field: Option<OpenField>,
    row: Option<OpenRow>,
    elements: Vec<Element>,
    warnings: Vec<StructuralWarning>,
}

impl ElementBuilder<'_> {
    fn feed(&mut self, marker: Marker) {
        match marker.kind {
            MarkerKind::FieldOpen | MarkerKind::ArrayOpen | MarkerKind::IncludeOpen => {
                self.open_field(marker)
            }
            MarkerKind::Close => self.close_field(marker),
            MarkerKind::RowStart => self.start_row(marker),
            MarkerKind::RowEnd => self.end_row(marker),
        }
    }

    fn open_field(&mut self, marker: Marker) {
        let open = OpenField {
            start: marker.offset,
            content_start: marker.end(),
            opener: marker.kind,
        };
        if let Some(previous) = self.field.replace(open) {
            self.unclosed(previous);
        }
    }

    fn close_field(&mut self, marker: Marker) {
        // a close without an open is ignored
        let Some(open) = self.field.take() else {
            return;
        };

        let name = clean_name(&self.text[open.content_start..marker.offset]);
        let end = marker.end();

        match self.row.as_mut() {
            Some(row) => {
                if open.start < row.start {
                    self.warnings.push(StructuralWarning::FieldCrossesRow {
                        offset: open.start,
                        row_start: row.start,
                    });
                    return;
                }
                row.fields.push(Field {
                    start: open.start - row.start,
                    end: end - row.start,
                    name,
                    opener: open.opener,
                });
                self.check_context(&open, true);
            }
            None => {
                self.elements.push(Element::Field(Field {
                    start: open.start,
                    end,
                    name,
                    opener: open.opener,
                }));
                self.check_context(&open, false);
            }
        }
    }

    fn start_row(&mut self, marker: Marker) {
        let row = OpenRow {
            start: marker.offset,
            fields: Vec::new(),
        };
        if let Some(previous) = self.row.replace(row) {
            self.discard_row(previous);
        }
    }

    fn end_row(&mut self, marker: Marker) {
        let Some(row) = self.row.take() else {
            return;
        };
        if row.fields.is_empty() {
            return;
        }

        // a tag still open here would overlap the row group
        if let Some(open) = self.field.take() {
            self.unclosed(open);
        }

        self.elements.push(Element::Array(RowGroup {
            start: row.start,
            end: marker.offset,
            name: self.text[row.start..marker.offset].to_string(),
            fields: row.fields,
        }));
    }

    fn finish(mut self) -> (Vec<Element>, Vec<StructuralWarning>) {
        if let Some(open) = self.field.take() {
            self.unclosed(open);
        }
        if let Some(row) = self.row.take() {
            self.discard_row(row);
        }
        (self.elements, self.warnings)
    }

    fn unclosed(&mut self, open: OpenField) {
        self.warnings.push(StructuralWarning::UnclosedTag {
            opener: open.opener,
            offset: open.start,
        });
    }

    fn discard_row(&mut self, row: OpenRow) {
        if !row.fields.is_empty() {
            self.warnings.push(StructuralWarning::RowDiscarded {
                offset: row.start,
                fields: row.fields.len(),
            });
        }
    }

    fn check_context(&mut self, open: &OpenField, inside_row: bool) {
        if !self.strict_markers {
            return;
        }
        let mismatch = match open.opener {
            MarkerKind::ArrayOpen => !inside_row,
            MarkerKind::FieldOpen => inside_row,
            _ => false,
        };
        if mismatch {
            self.warnings.push(StructuralWarning::MarkerMismatch {
                opener: open.opener,
                offset: open.start,
                inside_row,
            });
        }
    }
}

/// Strip RTF markup from tag content
///
/// Removes braces, control words (`\b0`, `\fs24 `), control symbols
/// (`\'e9`, `\~`) and any character outside `U+0020..=U+00FF`.
fn clean_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' | '}' => {}
            '\\' => skip_control(&mut chars),
            '\u{20}'..='\u{ff}' => out.push(c),
            _ => {}
        }
    }

    out
}

/// Consume the rest of a control word or symbol after its backslash
fn skip_control(chars: &mut Peekable<Chars<'_>>) {
    match chars.peek().copied() {
        Some(c) if c.is_ascii_alphabetic() => {
            while chars.next_if(|c| c.is_ascii_alphabetic()).is_some() {}
            chars.next_if_eq(&'-');
            while chars.next_if(|c| c.is_ascii_digit()).is_some() {}
            // the delimiting space belongs to the control word
            chars.next_if_eq(&' ');
        }
        Some('\'') => {
            chars.next();
            for _ in 0..2 {
                chars.next_if(|c| c.is_ascii_hexdigit());
            }
        }
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn build(text: &str) -> (Vec<Element>, Vec<StructuralWarning>) {
        build_elements(text, &scan_markers(text), false)
    }

    fn field(start: usize, end: usize, name: &str) -> Field {
        Field {
            start,
            end,
            name: name.to_string(),
            opener: MarkerKind::FieldOpen,
        }
    }

    #[test]
    fn test_single_field() {
        let (elements, warnings) = build("Hello :#field:to.name1#: !");
        assert_eq!(elements, vec![Element::Field(field(6, 24, "to.name1"))]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_field_at_offset_zero() {
        let (elements, _) = build(":#field:a#:");
        assert_eq!(elements, vec![Element::Field(field(0, 11, "a"))]);
    }

    #[test]
    fn test_stray_close_ignored() {
        let (elements, warnings) = build("a #: b :#field:x#: c #:");
        assert_eq!(elements.len(), 1);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_unclosed_then_open() {
        let text = ":#field:a and :#field:b#:";
        let (elements, warnings) = build(text);
        assert_eq!(elements, vec![Element::Field(field(14, 25, "b"))]);
        assert_eq!(
            warnings,
            vec![StructuralWarning::UnclosedTag {
                opener: MarkerKind::FieldOpen,
                offset: 0
            }]
        );
    }

    #[test]
    fn test_unclosed_at_end() {
        let (elements, warnings) = build("x :#array:a more text");
        assert!(elements.is_empty());
        assert_eq!(
            warnings,
            vec![StructuralWarning::UnclosedTag {
                opener: MarkerKind::ArrayOpen,
                offset: 2
            }]
        );
    }

    #[test]
    fn test_name_is_cleaned() {
        let (elements, _) = build(":#field:{\\b\\fs24 to.}{\\i0 name}\r\n#:");
        assert_eq!(elements[0].as_field().unwrap().name, "to.name");
    }

    #[test]
    fn test_row_group() {
        let text = "head\\row \\trowd :#array:items.label#:\\cell \\row }tail";
        let (elements, warnings) = build(text);
        assert!(warnings.is_empty());
        assert_eq!(elements.len(), 1);

        let row = elements[0].as_array().unwrap();
        assert_eq!(row.start, 4);
        assert_eq!(row.end, text.find("\\row }").unwrap());
        assert_eq!(row.name, "\\row \\trowd :#array:items.label#:\\cell ");
        assert_eq!(row.fields.len(), 1);

        let inner = &row.fields[0];
        assert_eq!(inner.name, "items.label");
        assert_eq!(&row.name[inner.start..inner.end], ":#array:items.label#:");
    }

    #[test]
    fn test_row_without_fields_dropped() {
        let (elements, warnings) = build("\\row \\trowd plain\\cell \\row }");
        assert!(elements.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_earlier_row_discarded() {
        let text = "\\row \\a :#field:x#:\\row \\b :#field:y#:\\row }";
        let (elements, warnings) = build(text);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].as_array().unwrap().fields[0].name, "y");
        assert_eq!(
            warnings,
            vec![StructuralWarning::RowDiscarded {
                offset: 0,
                fields: 1
            }]
        );
    }

    #[test]
    fn test_fields_around_row() {
        let text = ":#field:a#: \\row \\ :#field:b#: \\row } :#field:c#:";
        let (elements, _) = build(text);
        let starts: Vec<usize> = elements.iter().map(crate::Span::start).collect();
        assert_eq!(starts, vec![0, 12, text.rfind(":#field:").unwrap()]);
        assert!(elements[1].as_array().is_some());
    }

    #[test]
    fn test_field_crossing_row_start() {
        let text = ":#field:a \\row \\ b#: :#field:c#:\\row }";
        let (elements, warnings) = build(text);
        assert_eq!(elements.len(), 1);
        assert_eq!(
            warnings,
            vec![StructuralWarning::FieldCrossesRow {
                offset: 0,
                row_start: 10
            }]
        );
    }

    #[test]
    fn test_field_open_at_row_end() {
        let text = "\\row \\ :#field:a#: :#field:b \\row } c#:";
        let (elements, warnings) = build(text);
        assert_eq!(elements.len(), 1);
        assert_eq!(
            warnings,
            vec![StructuralWarning::UnclosedTag {
                opener: MarkerKind::FieldOpen,
                offset: 19
            }]
        );
    }

    #[test]
    fn test_strict_markers() {
        let text = ":#array:a#: \\row \\ :#field:b#: :#array:c#:\\row } :#include:d#:";
        let (elements, warnings) = build_elements(text, &scan_markers(text), true);
        assert_eq!(elements.len(), 3);
        assert_eq!(
            warnings,
            vec![
                StructuralWarning::MarkerMismatch {
                    opener: MarkerKind::ArrayOpen,
                    offset: 0,
                    inside_row: false
                },
                StructuralWarning::MarkerMismatch {
                    opener: MarkerKind::FieldOpen,
                    offset: 19,
                    inside_row: true
                },
            ]
        );

        let (_, lenient) = build(text);
        assert!(lenient.is_empty());
    }

    #[test]
    fn test_deterministic() {
        let text = "a :#field:x#: \\row \\ :#array:y.z#: \\row } :#field:q";
        assert_eq!(build(text), build(text));
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("{\\rtlch\\fcs1 \\af0 to.name}"), "to.name");
        assert_eq!(clean_name("a\\'e9b"), "ab");
        assert_eq!(clean_name("x\\~y"), "xy");
        assert_eq!(clean_name("amount\\li-720 :style=percent"), "amount:style=percent");
        assert_eq!(clean_name("tab\there"), "tabhere");
        assert_eq!(clean_name("caf\u{e9}"), "caf\u{e9}");
        assert_eq!(clean_name("x\u{2019}"), "x");
        assert_eq!(clean_name("trailing\\"), "trailing");
    }

    #[test]
    fn test_parsed_template() {
        let parsed = parse_template("Hi :#field:name#: :#field:oops");
        assert_eq!(parsed.text(), "Hi :#field:name#: :#field:oops");
        assert_eq!(parsed.elements().len(), 1);
        assert_eq!(parsed.warnings().len(), 1);
        assert_eq!(
            parsed.warnings()[0].to_string(),
            "Start tag :#field: at offset 18 has no end tag and was ignored."
        );
    }
}
