//! Template storage and correspondence creation
//!
//! Templates are looked up by name. A correspondence is one template merged
//! with one set of variables, together with the protocol of that merge.

use crate::config::MergeConfig;
use crate::parser::ParsedTemplate;
use crate::protocol::{Entry, Protocol};
use crate::renderer::Merger;
use crate::value::Value;
use crate::{Result, TemplateError};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// File extension of template files
const TEMPLATE_EXTENSION: &str = "rtf";

/// Source of template text by name
pub trait TemplateStore {
    /// Load the text of template `name`
    fn load(&self, name: &str) -> Result<String>;
}

/// Templates held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    templates: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template; names must be unique
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> Result<()> {
        let name = check_name(name.into())?;
        if self.templates.contains_key(&name) {
            return Err(TemplateError::AlreadyExists(name));
        }
        self.templates.insert(name, text.into());
        Ok(())
    }

    /// Builder-style [`MemoryStore::insert`]
    pub fn with_template(mut self, name: impl Into<String>, text: impl Into<String>) -> Result<Self> {
        self.insert(name, text)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self, name: &str) -> Result<String> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }
}

/// Templates read from `.rtf` files
///
/// `load("letter")` reads a file registered under that name, or else
/// `<dir>/letter.rtf`.
/// Names are plain file stems; paths are rejected.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
    registered: HashMap<String, PathBuf>,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            registered: HashMap::new(),
        }
    }

    /// Register a file under a name
    ///
    /// The file must have the `.rtf` extension. It is read on each load.
    pub fn register(&mut self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<()> {
        let name = check_name(name.into())?;
        check_plain_name(&name)?;
        let path = path.as_ref();

        if !has_template_extension(path) {
            return Err(TemplateError::InvalidTemplate(format!(
                "The filename must be RTF for a template: {}",
                path.display()
            )));
        }
        if self.registered.contains_key(&name) || self.default_path(&name).is_file() {
            return Err(TemplateError::AlreadyExists(name));
        }

        self.registered.insert(name, path.to_path_buf());
        Ok(())
    }

    /// Names of all templates available in this store, sorted
    pub fn names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.registered.keys().cloned().collect();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || !has_template_extension(&path) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn default_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{TEMPLATE_EXTENSION}"))
    }
}

impl TemplateStore for DirectoryStore {
    fn load(&self, name: &str) -> Result<String> {
        check_plain_name(name)?;
        let path = self
            .registered
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default_path(name));

        fs::read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => TemplateError::NotFound(name.to_string()),
            _ => TemplateError::IoError(err),
        })
    }
}

fn check_name(name: String) -> Result<String> {
    if name.trim().is_empty() {
        return Err(TemplateError::InvalidTemplate(
            "The name of the template must be specified.".to_string(),
        ));
    }
    Ok(name)
}

/// Directory templates are named by a single file stem
fn check_plain_name(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || name.contains(['/', '\\']) {
        return Err(TemplateError::InvalidTemplate(format!(
            "The template name must not contain a path: {name}"
        )));
    }
    Ok(())
}

fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
}

/// A merged document and the protocol of its creation
#[derive(Debug, Clone, Serialize)]
pub struct Correspondence {
    pub template: String,
    pub body: String,
    pub protocol: Protocol,
}

impl Correspondence {
    /// Load template `name` from `store` and merge it with `vars`
    ///
    /// Never fails; a template that cannot be loaded gives an empty body
    /// and an error entry.
    pub fn create(
        store: &dyn TemplateStore,
        name: &str,
        vars: &Value,
        config: &MergeConfig,
    ) -> Self {
        let mut protocol = Protocol::new();
        protocol.push(Entry::info(format!(
            "Start 'create correspondence' with template {name}"
        )));

        let body = match store.load(name) {
            Ok(text) => {
                let template = ParsedTemplate::parse_with(text, config.strict_markers);
                let body = Merger::new(config).merge(&template, vars, &mut protocol);
                protocol.push(Entry::info("Correspondence created."));
                body
            }
            Err(err) => {
                protocol.push(Entry::error(err.to_string()));
                String::new()
            }
        };

        Self {
            template: name.to_string(),
            body,
            protocol,
        }
    }
}
