use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use sql_filter_parser::{new_sql_parser, SqlParserOptions};

#[derive(Parser)]
#[command(name = "sqlfilter")]
#[command(author, version, about = "Parses and rewrites SQL-like WHERE-clause filter expressions into parameterized queries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a filter expression and print the rewritten query plus bind values
    Parse {
        /// The filter expression to parse (omit to read from stdin with --stdin)
        filter: Option<String>,

        /// Read the filter expression from stdin instead of an argument
        #[arg(long)]
        stdin: bool,

        /// Comma-separated list of columns the filter is allowed to reference
        #[arg(long, value_delimiter = ',')]
        valid_columns: Vec<String>,

        /// Prefix every column name with `<prefix>.` unless already present
        #[arg(long)]
        column_prefix: Option<String>,

        /// Maximum number of logical joins (AND/OR/NOT) permitted (default 10)
        #[arg(long)]
        max_complexity: Option<u32>,

        /// Print the result as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ParseOutput {
    query: String,
    values: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            filter,
            stdin,
            valid_columns,
            column_prefix,
            max_complexity,
            json,
        } => {
            let filter = match filter {
                Some(filter) => filter,
                None if stdin => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read filter expression from stdin")?;
                    buf
                }
                None => anyhow::bail!("provide a filter expression or pass --stdin"),
            };

            let mut options = SqlParserOptions::new();
            if !valid_columns.is_empty() {
                options = options.with_valid_columns(valid_columns);
            }
            if let Some(prefix) = column_prefix {
                options = options.with_column_prefix(prefix);
            }
            if let Some(limit) = max_complexity {
                options = options.with_maximum_complexity(limit);
            }

            let mut parser = new_sql_parser(options).context("failed to build the SQL grammar")?;
            let (query, values) = parser.parse(filter.trim())?;

            if json {
                let output = ParseOutput { query, values };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{query}");
                for value in values {
                    println!("-- bind: {value}");
                }
            }
        }
    }

    Ok(())
}
