use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "offtab")]
#[command(about = "Struct field offset table toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one field offset against a table
    Query {
        #[arg(short, long)]
        table: PathBuf,
        /// Field identifier, e.g. "golang.org/x/net/http2.Framer.r"
        #[arg(short, long)]
        field: String,
        /// Library version, e.g. "1.21.3" or "v1.21.3"
        #[arg(short, long)]
        version: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List field identifiers with their version ranges and offsets
    List {
        #[arg(short, long)]
        table: PathBuf,
        /// Only show fields from this module
        #[arg(short, long)]
        module: Option<String>,
    },
    /// Check a table for overlapping version ranges
    Validate {
        #[arg(short, long)]
        table: PathBuf,
    },
    /// Merge offset tables into one, coalescing adjacent ranges
    Merge {
        #[arg(short, long)]
        output: PathBuf,
        /// Input tables, merged in order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("offtab=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Query {
            table,
            field,
            version,
            json,
        } => commands::query::run(&table, &field, &version, json),
        Command::List { table, module } => commands::list::run(&table, module.as_deref()),
        Command::Validate { table } => commands::validate::run(&table),
        Command::Merge { output, inputs } => commands::merge::run(&output, &inputs),
    }
}
