use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use roster::{load_records, Config, OutputFormat, Session};
use roster_seeker::OrderBy;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Search, filter, and sort a list of people.
#[derive(Parser, Debug)]
#[command(name = "roster", version, about)]
struct Cli {
    /// Records file (.json, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    records: PathBuf,

    /// YAML config with search fields and default sort
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Initial query text
    #[arg(short, long)]
    query: Option<String>,

    /// Sort column as field[:asc|desc]; repeat for tie-breakers
    #[arg(short, long, value_name = "FIELD[:DIR]")]
    sort: Vec<OrderBy>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Keep reading queries and commands from stdin
    #[arg(short, long)]
    interactive: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if !cli.sort.is_empty() {
        config.sort = cli.sort.clone();
    }
    config.validate().context("invalid --sort column")?;

    let records = load_records(&cli.records)
        .with_context(|| format!("loading records {}", cli.records.display()))?;

    let session = Session::new(records, &config)?.with_format(cli.format);
    if let Some(query) = cli.query {
        session.query().set(query)?;
    }

    let mut out = io::stdout().lock();
    if cli.interactive {
        let stdin = io::stdin();
        let session = if stdin.is_terminal() {
            session.with_prompt("> ")
        } else {
            session
        };
        session.run(stdin.lock(), &mut out)?;
        info!(stats = ?session.stats(), "session ended");
        session.close();
    } else {
        session.render(&mut out)?;
        session.close();
    }
    Ok(())
}
