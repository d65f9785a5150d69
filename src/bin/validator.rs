//! Git Tag Scheme CLI
//!
//! Validates that every tag in a repository matches a naming scheme.
//!
//! Usage:
//!   git-tag-scheme MAJOR.MINOR.PATCH
//!   git tag --list | git-tag-scheme 0Y.0M.MICRO --stdin --calendar

use std::io::Read;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use git_tag_scheme::{
    DatePolicy, GitTagSource, StaticTagSource, TagSchemeConfig, TagSchemeError,
    TagSchemeValidator, TagSource,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "git-tag-scheme")]
#[command(about = "Validate that all tags match a naming scheme")]
struct Cli {
    /// Scheme to enforce, e.g. MAJOR.MINOR.PATCH or 0Y.0M.MICRO
    scheme: Option<String>,

    /// Path inside the repository (default: from config, else ".")
    #[arg(short, long)]
    repo: Option<PathBuf>,

    /// Config file to load on top of the default locations
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Date to check 0Y/0M components against (YYYY-MM-DD, default: today)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Accept any valid year/month instead of today's
    #[arg(long)]
    calendar: bool,

    /// Read whitespace-separated tags from stdin instead of the repository
    #[arg(long)]
    stdin: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli) {
        match format {
            OutputFormat::Text => {
                eprintln!("Error: {}", e);
                if let Some(hint) = e.hint() {
                    eprintln!("hint: {}", hint);
                }
            }
            OutputFormat::Json => {
                let report = serde_json::json!({
                    "valid": false,
                    "error": e.to_string(),
                    "hint": e.hint(),
                });
                eprintln!("{}", report);
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), TagSchemeError> {
    let mut config = TagSchemeConfig::load(cli.config.as_deref())?;
    if cli.calendar {
        config.validator.date_policy = DatePolicy::Calendar;
    }
    if let Some(repo) = cli.repo {
        config.repository.path = repo;
    }

    let scheme = cli
        .scheme
        .or_else(|| config.validator.scheme.clone())
        .ok_or(TagSchemeError::MissingScheme)?;

    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let registry = config.registry(today)?;

    let source: Box<dyn TagSource> = if cli.stdin {
        let mut listing = String::new();
        std::io::stdin().read_to_string(&mut listing)?;
        Box::new(StaticTagSource::from_listing(&listing))
    } else {
        Box::new(GitTagSource::new(config.repository_path()?))
    };

    let validator = TagSchemeValidator::from_source(scheme, source.as_ref(), registry)?;
    let report = validator.execute()?;

    match cli.format {
        OutputFormat::Text => {
            println!();
            println!("{}", report);
        }
        OutputFormat::Json => {
            let mut value = serde_json::to_value(&report)?;
            value["valid"] = serde_json::Value::Bool(true);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
