mod recipe;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use recipe::Recipe;
use sqlchain::Statement;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "sqlchain-cli")]
#[command(about = "Build a parameterized SQL statement from a JSON recipe")]
#[command(version)]
struct Args {
    /// Recipe file (reads stdin when omitted)
    #[arg(short, long, env = "SQLCHAIN_INPUT")]
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json, env = "SQLCHAIN_FORMAT")]
    format: Format,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// {"query": ..., "params": [...]}
    Json,
    /// query on the first line, one param per line after it
    Text,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    let input = read_input(args.input.as_ref())?;
    let recipe = Recipe::from_json(&input)?;
    debug!(table = %recipe.table, "recipe loaded");

    let mut builder = recipe.into_builder()?;
    let statement = builder.build().context("Failed to build statement")?;

    println!("{}", render(&statement, args.format)?);
    Ok(())
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file {:?}", path)),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read recipe from stdin")?;
            Ok(buf)
        }
    }
}

fn render(statement: &Statement, format: Format) -> Result<String> {
    match format {
        Format::Json => {
            serde_json::to_string_pretty(statement).context("Failed to serialize statement")
        }
        Format::Text => {
            let mut lines = vec![statement.query.clone()];
            for param in &statement.params {
                lines.push(serde_json::to_string(param).context("Failed to serialize param")?);
            }
            Ok(lines.join("\n"))
        }
    }
}
