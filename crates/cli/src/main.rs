//! rtfmerge command line interface

mod commands;

use clap::{Parser, Subcommand};
use commands::{ConfigArgs, MergeArgs};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// rtfmerge - merge RTF templates with JSON data
///
/// # Examples
///
/// ```bash
/// # Merge a template file with data
/// rtfmerge merge letter.rtf --data customer.json --output out.rtf
///
/// # Merge a named template from a template directory
/// rtfmerge create letter --dir templates --data customer.json
///
/// # List the fields and table rows of a template
/// rtfmerge inspect letter.rtf
/// ```
#[derive(Parser)]
#[command(name = "rtfmerge")]
#[command(author, version, about = "rtfmerge - merge RTF templates with JSON data", long_about = None)]
struct Cli {
    /// Log merge steps at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge a template file with data
    Merge {
        /// Template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        #[command(flatten)]
        args: MergeArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Create a correspondence from a named template
    ///
    /// Loads `<DIR>/<NAME>.rtf` and merges it with the data.
    Create {
        /// Template name
        #[arg(value_name = "NAME")]
        name: String,

        /// Template directory
        #[arg(short = 'D', long, value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        args: MergeArgs,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// List the fields, table rows and structural problems of a template
    Inspect {
        /// Template file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Report open tags used in the wrong context
        #[arg(long)]
        strict: bool,
    },
}

impl Commands {
    fn execute(self) -> anyhow::Result<()> {
        match self {
            Commands::Merge {
                template,
                args,
                config,
            } => commands::merge(&template, &args, &config),
            Commands::Create {
                name,
                dir,
                args,
                config,
            } => commands::create(&name, &dir, &args, &config),
            Commands::Inspect {
                template,
                json,
                strict,
            } => commands::inspect(&template, json, strict),
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
