//! Command implementations

use anyhow::{bail, Context, Result};
use clap::Args;
use rtf_text::Locale;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use template::{
    merge_template, Correspondence, DirectoryStore, Element, Entry, MergeConfig, ParsedTemplate,
    Protocol, RowCountPolicy, Value,
};

/// Data and output options shared by merging commands
#[derive(Args)]
pub struct MergeArgs {
    /// JSON file with the variables (defaults to none)
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the protocol to a file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub protocol: Option<PathBuf>,

    /// Do not print the protocol
    #[arg(short, long)]
    pub quiet: bool,

    /// Exit with failure if the protocol reports a problem
    #[arg(long)]
    pub check: bool,
}

/// Merge configuration options
#[derive(Args)]
pub struct ConfigArgs {
    /// JSON merge configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Locale for numbers and dates (e.g. de-DE)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// UTC offset in minutes used for dates
    #[arg(long, value_name = "MINUTES", allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,

    /// Count table rows from any field instead of the first
    #[arg(long)]
    pub any_field: bool,

    /// Report open tags used in the wrong context
    #[arg(long)]
    pub strict: bool,

    /// Keep structural warnings out of the protocol
    #[arg(long)]
    pub no_structure: bool,
}

impl ConfigArgs {
    /// Read the configuration file and apply flag overrides
    fn load(&self) -> Result<MergeConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = read_file(path)?;
                MergeConfig::from_json(&json)
                    .with_context(|| format!("Invalid configuration in {}", path.display()))?
            }
            None => MergeConfig::default(),
        };

        if let Some(tag) = &self.locale {
            config.locale = Locale::from_tag(tag)?;
        }
        if let Some(minutes) = self.utc_offset {
            config.utc_offset_minutes = minutes;
        }
        if self.any_field {
            config.row_count = RowCountPolicy::AnyField;
        }
        config.strict_markers |= self.strict;
        if self.no_structure {
            config.report_structure = false;
        }

        config.validate()?;
        Ok(config)
    }
}

impl MergeArgs {
    fn load_data(&self) -> Result<Value> {
        let Some(path) = &self.data else {
            return Ok(Value::empty());
        };
        let json = read_file(path)?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON data in {}", path.display()))
    }

    fn write_protocol(&self, protocol: &Protocol) -> Result<()> {
        if let Some(path) = &self.protocol {
            fs::write(path, protocol.to_string())
                .with_context(|| format!("Failed to write protocol {}", path.display()))?;
        } else if !self.quiet {
            eprint!("{protocol}");
        }
        Ok(())
    }

    fn write_output(&self, text: &str) -> Result<()> {
        match &self.output {
            Some(path) => fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(text.as_bytes())?;
                stdout.flush()?;
            }
        }
        Ok(())
    }

    fn finish(&self, text: &str, protocol: &Protocol) -> Result<()> {
        self.write_protocol(protocol)?;
        self.write_output(text)?;

        if self.check && protocol.has_problems() {
            bail!("The protocol reports problems");
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Merge a template file with data
pub fn merge(template: &Path, args: &MergeArgs, config: &ConfigArgs) -> Result<()> {
    let text = read_file(template)?;
    let vars = args.load_data()?;
    let config = config.load()?;

    tracing::debug!(template = %template.display(), locale = %config.locale, "merging");
    let output = merge_template(&text, &vars, &config);

    args.finish(&output.text, &output.protocol)
}

/// Merge a named template from a template directory
pub fn create(name: &str, dir: &Path, args: &MergeArgs, config: &ConfigArgs) -> Result<()> {
    let vars = args.load_data()?;
    let config = config.load()?;
    let store = DirectoryStore::new(dir);

    let doc = Correspondence::create(&store, name, &vars, &config);

    if let Some(Entry::Error { message }) = doc
        .protocol
        .iter()
        .find(|entry| matches!(entry, Entry::Error { .. }))
    {
        args.write_protocol(&doc.protocol)?;
        bail!("Correspondence not created: {message}");
    }

    args.finish(&doc.body, &doc.protocol)
}

/// Print the structure of a template
pub fn inspect(template: &Path, json: bool, strict: bool) -> Result<()> {
    let text = read_file(template)?;
    let parsed = ParsedTemplate::parse_with(text, strict);
    let warnings: Vec<String> = parsed.warnings().iter().map(ToString::to_string).collect();

    if json {
        let report = serde_json::json!({
            "elements": parsed.elements(),
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for element in parsed.elements() {
        match element {
            Element::Field(field) => {
                println!("field  {:>6}..{:<6} {}", field.start, field.end, field.name);
            }
            Element::Array(row) => {
                println!("row    {:>6}..{:<6} {} field(s)", row.start, row.end, row.fields.len());
                for field in &row.fields {
                    println!("  field {:>5}..{:<6} {}", field.start, field.end, field.name);
                }
            }
        }
    }
    for warning in &warnings {
        println!("warning: {warning}");
    }
    println!(
        "{} element(s), {} warning(s)",
        parsed.elements().len(),
        warnings.len()
    );

    Ok(())
}
