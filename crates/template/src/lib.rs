//! Template Engine - RTF field and table-row merging
//!
//! This crate provides:
//! - Marker scanning (`:#field:`, `:#array:`, `:#include:`, `#:`, table row ends)
//! - Element building (fields and repeatable table rows)
//! - A typed variable tree with dotted-path resolution
//! - Value formatting and the merge itself, with a protocol of every step
//! - A template store boundary and correspondence creation
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use template::{merge_template, MergeConfig, Value};
//!
//! let vars = Value::from(json!({ "to": { "name1": "Mueller" } }));
//! let output = merge_template("Hello :#field:to.name1#: !", &vars, &MergeConfig::default());
//!
//! assert_eq!(output.text, "Hello Mueller !");
//! assert_eq!(output.protocol.len(), 1);
//! ```

pub mod elements;
pub mod parser;
pub mod scanner;
pub mod store;
pub mod value;

mod config;
mod format;
mod protocol;
mod renderer;

pub use config::{MergeConfig, RowCountPolicy};
pub use elements::{Element, Field, RowGroup, Span};
pub use format::FieldName;
pub use parser::{parse_template, ParsedTemplate, StructuralWarning};
pub use protocol::{Entry, Protocol};
pub use renderer::{merge_template, MergeOutput, Merger};
pub use scanner::{scan_markers, Marker, MarkerKind};
pub use store::{Correspondence, DirectoryStore, MemoryStore, TemplateStore};
pub use value::Value;

use thiserror::Error;

/// Errors that can occur around template processing
///
/// The merge itself never fails; these cover loading templates and
/// configuration, and the internal failures a merge records in its protocol.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template {0} not found.")]
    NotFound(String),

    #[error("There is already a template with this name {0}.")]
    AlreadyExists(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Element span {start}..{end} does not fit the template text ({len} bytes)")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    #[error("Element at offset {start} overlaps the previous element ending at {previous_end}")]
    OverlappingElements { start: usize, previous_end: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Format error: {0}")]
    Text(#[from] rtf_text::TextError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
