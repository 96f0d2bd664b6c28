//! Template elements
//!
//! A template is split into fields, replaced by one value each, and row
//! groups, repeated once per entry of a sequence in the variable tree.

use crate::format::FieldName;
use crate::scanner::MarkerKind;
use serde::Serialize;

/// A region of the enclosing text
pub trait Span {
    /// Byte offset of the first byte of the region
    fn start(&self) -> usize;
    /// Byte offset just past the region
    fn end(&self) -> usize;
}

/// A single substitutable tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Offset of the open marker in the enclosing text
    pub start: usize,
    /// Offset just past the close marker
    pub end: usize,
    /// Tag content with RTF control words and braces removed
    pub name: String,
    /// Marker that opened the tag
    pub opener: MarkerKind,
}

impl Field {
    /// Split the name into path and format options
    pub fn field_name(&self) -> FieldName<'_> {
        FieldName::parse(&self.name)
    }
}

/// A repeatable table row
///
/// `name` holds the verbatim row text; the offsets of `fields` are relative
/// to `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowGroup {
    pub start: usize,
    pub end: usize,
    pub name: String,
    pub fields: Vec<Field>,
}

/// A top-level template element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Field(Field),
    Array(RowGroup),
}

impl Element {
    /// The field, if this is one
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Element::Field(f) => Some(f),
            Element::Array(_) => None,
        }
    }

    /// The row group, if this is one
    pub fn as_array(&self) -> Option<&RowGroup> {
        match self {
            Element::Array(r) => Some(r),
            Element::Field(_) => None,
        }
    }
}

impl Span for Field {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

impl Span for RowGroup {
    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }
}

impl Span for Element {
    fn start(&self) -> usize {
        match self {
            Element::Field(f) => f.start,
            Element::Array(r) => r.start,
        }
    }

    fn end(&self) -> usize {
        match self {
            Element::Field(f) => f.end,
            Element::Array(r) => r.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(start: usize, end: usize, name: &str) -> Field {
        Field {
            start,
            end,
            name: name.to_string(),
            opener: MarkerKind::FieldOpen,
        }
    }

    #[test]
    fn test_element_span() {
        let f = Element::Field(field(3, 12, "a"));
        assert_eq!((f.start(), f.end()), (3, 12));

        let row = Element::Array(RowGroup {
            start: 20,
            end: 60,
            name: String::new(),
            fields: vec![field(5, 14, "b")],
        });
        assert_eq!((row.start(), row.end()), (20, 60));
        assert!(row.as_array().is_some());
        assert!(row.as_field().is_none());
    }

    #[test]
    fn test_field_name_split() {
        let f = field(0, 10, "total:style=percent");
        let name = f.field_name();
        assert_eq!(name.path, "total");
        assert_eq!(name.options.as_deref(), Some("style=percent"));
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(Element::Field(field(0, 10, "x"))).unwrap();
        assert_eq!(json["type"], "field");
        assert_eq!(json["opener"], "fieldOpen");
    }
}
