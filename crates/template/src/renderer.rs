//! Template merging
//!
//! Text between elements is copied unchanged. Fields are replaced by their
//! formatted value or removed; table rows are repeated once per entry of
//! the sequence their fields point into.

use crate::config::{MergeConfig, RowCountPolicy};
use crate::elements::{Element, Field, RowGroup, Span};
use crate::format::format_value;
use crate::parser::ParsedTemplate;
use crate::protocol::{Entry, Protocol};
use crate::value::Value;
use crate::{Result, TemplateError};
use serde::Serialize;

/// Result of a one-shot merge
#[derive(Debug, Clone, Serialize)]
pub struct MergeOutput {
    pub text: String,
    pub protocol: Protocol,
}

/// Merge template text with variables in one call
///
/// Structural warnings go into the protocol unless
/// [`MergeConfig::report_structure`] is off.
pub fn merge_template(text: &str, vars: &Value, config: &MergeConfig) -> MergeOutput {
    let template = ParsedTemplate::parse_with(text, config.strict_markers);
    let mut protocol = Protocol::new();
    let text = Merger::new(config).merge(&template, vars, &mut protocol);
    MergeOutput { text, protocol }
}

/// Template merger
pub struct Merger<'a> {
    config: &'a MergeConfig,
}

impl<'a> Merger<'a> {
    /// Create a merger using `config`
    pub fn new(config: &'a MergeConfig) -> Self {
        Self { config }
    }

    /// Merge a parsed template
    pub fn merge(&self, template: &ParsedTemplate, vars: &Value, protocol: &mut Protocol) -> String {
        if self.config.report_structure {
            for warning in template.warnings() {
                protocol.push(Entry::warning(warning.to_string()));
            }
        }

        let empty = Value::empty();
        let vars = if vars.is_mapping() {
            vars
        } else {
            protocol.push(Entry::error("Variables are not a mapping and were ignored."));
            &empty
        };

        self.merge_elements(template.text(), template.elements(), vars, None, protocol)
    }

    /// Merge `elements` found in `text`
    ///
    /// Never fails: if the elements do not fit the text, the output built so
    /// far is returned and the problem is recorded as an error entry.
    pub fn merge_elements(
        &self,
        text: &str,
        elements: &[Element],
        vars: &Value,
        index: Option<usize>,
        protocol: &mut Protocol,
    ) -> String {
        let mut out = String::with_capacity(text.len());
        let result = copy_around(&mut out, text, elements, |out, element, tag| match element {
            Element::Field(field) => self.write_field(out, field, tag, vars, index, protocol),
            Element::Array(row) => self.write_row(out, row, vars, protocol),
        });
        report_failure(result, protocol);
        out
    }

    /// Append one copy of the row per entry
    ///
    /// Each copy is merged on its own; a copy whose fields do not fit the
    /// row text is cut short and the merge goes on with the next one.
    fn write_row(&self, out: &mut String, row: &RowGroup, vars: &Value, protocol: &mut Protocol) {
        let count = self.repeat_count(row, vars);
        tracing::debug!(offset = row.start, count, "repeating table row");

        for i in 0..count {
            let mut copy = String::with_capacity(row.name.len());
            let result = copy_around(&mut copy, &row.name, &row.fields, |copy, field, tag| {
                self.write_field(copy, field, tag, vars, Some(i), protocol)
            });
            report_failure(result, protocol);
            out.push_str(&copy);
        }
    }

    fn write_field(
        &self,
        out: &mut String,
        field: &Field,
        tag: &str,
        vars: &Value,
        index: Option<usize>,
        protocol: &mut Protocol,
    ) {
        let name = field.field_name();
        let value = vars
            .resolve(name.path, index)
            .and_then(|value| format_value(value, &name, self.config, protocol));

        match value {
            Some(value) => {
                out.push_str(&value);
                protocol.push(Entry::Replaced {
                    tag: tag.to_string(),
                    value,
                });
            }
            None => protocol.push(Entry::MissingVariable {
                field: name.path.to_string(),
            }),
        }
    }

    fn repeat_count(&self, row: &RowGroup, vars: &Value) -> usize {
        let count_of = |field: &Field| vars.repeat_count(field.field_name().path);

        let count = match self.config.row_count {
            RowCountPolicy::FirstField => row.fields.first().and_then(count_of),
            RowCountPolicy::AnyField => row.fields.iter().find_map(count_of),
        };

        count.unwrap_or(0)
    }
}

fn report_failure(result: Result<()>, protocol: &mut Protocol) {
    if let Err(err) = result {
        tracing::error!(error = %err, "merge aborted");
        protocol.push(Entry::error(err.to_string()));
    }
}

/// Copy the text around `items`, letting `write` fill in each item
///
/// `write` also gets the tag text the item covers.
fn copy_around<T: Span>(
    out: &mut String,
    text: &str,
    items: &[T],
    mut write: impl FnMut(&mut String, &T, &str),
) -> Result<()> {
    let mut previous_end = 0;

    for item in items {
        let (start, end) = (item.start(), item.end());
        if start < previous_end {
            return Err(TemplateError::OverlappingElements {
                start,
                previous_end,
            });
        }

        out.push_str(slice(text, previous_end, start)?);
        let tag = slice(text, start, end)?;
        write(out, item, tag);
        previous_end = end;
    }

    out.push_str(slice(text, previous_end, text.len())?);
    Ok(())
}

fn slice(text: &str, start: usize, end: usize) -> Result<&str> {
    text.get(start..end).ok_or(TemplateError::SpanOutOfBounds {
        start,
        end,
        len: text.len(),
    })
}
