//! Merge protocol
//!
//! Every replacement and every problem met during a merge is recorded in
//! order. Entries are also emitted as `tracing` events.

use serde::Serialize;
use std::fmt;

/// One protocol line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Entry {
    /// A field was substituted
    Replaced { tag: String, value: String },
    /// A field path did not resolve to a leaf
    MissingVariable { field: String },
    /// Format options could not be parsed; defaults were used
    InvalidFormatOptions {
        field: String,
        options: String,
        reason: String,
    },
    Warning { message: String },
    Error { message: String },
    Info { message: String },
}

impl Entry {
    pub fn warning(message: impl Into<String>) -> Self {
        Entry::Warning {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Entry::Error {
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Entry::Info {
            message: message.into(),
        }
    }

    /// Whether this entry reports a problem
    pub fn is_problem(&self) -> bool {
        !matches!(self, Entry::Replaced { .. } | Entry::Info { .. })
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Replaced { tag, value } => write!(f, "Replace \"{tag}\" with \"{value}\""),
            Entry::MissingVariable { field } => write!(f, "Variable for field {field} not found."),
            Entry::InvalidFormatOptions {
                field,
                options,
                reason,
            } => write!(
                f,
                "Warning: Format options \"{options}\" of field {field} ignored: {reason}"
            ),
            Entry::Warning { message } => write!(f, "Warning: {message}"),
            Entry::Error { message } => write!(f, "Error: {message}"),
            Entry::Info { message } => f.write_str(message),
        }
    }
}

/// Ordered, append-only merge log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Protocol {
    entries: Vec<Entry>,
}

impl Protocol {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: Entry) {
        match &entry {
            Entry::Replaced { .. } => tracing::debug!(%entry),
            Entry::Info { .. } => tracing::info!(%entry),
            Entry::Error { .. } => tracing::error!(%entry),
            _ => tracing::warn!(%entry),
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries rendered as text lines
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(ToString::to_string).collect()
    }

    /// Whether any entry reports a problem
    pub fn has_problems(&self) -> bool {
        self.entries.iter().any(Entry::is_problem)
    }
}

impl<'a> IntoIterator for &'a Protocol {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entry_display() {
        let replaced = Entry::Replaced {
            tag: ":#field:to.name1#:".to_string(),
            value: "Mueller".to_string(),
        };
        assert_eq!(replaced.to_string(), "Replace \":#field:to.name1#:\" with \"Mueller\"");

        let missing = Entry::MissingVariable {
            field: "missing.path".to_string(),
        };
        assert_eq!(missing.to_string(), "Variable for field missing.path not found.");

        assert_eq!(Entry::error("boom").to_string(), "Error: boom");
        assert_eq!(Entry::warning("careful").to_string(), "Warning: careful");
        assert_eq!(Entry::info("Correspondence created.").to_string(), "Correspondence created.");
    }

    #[test]
    fn test_protocol_order() {
        let mut protocol = Protocol::new();
        assert!(protocol.is_empty());

        protocol.push(Entry::info("first"));
        protocol.push(Entry::MissingVariable {
            field: "a".to_string(),
        });

        assert_eq!(protocol.len(), 2);
        assert_eq!(
            protocol.lines(),
            vec!["first", "Variable for field a not found."]
        );
        assert!(protocol.has_problems());
        assert_eq!(protocol.to_string(), "first\nVariable for field a not found.\n");
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_value(Entry::MissingVariable {
            field: "x".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "missingVariable");
        assert_eq!(json["field"], "x");
    }
}
