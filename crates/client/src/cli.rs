//! CLI command definitions.

use std::io::IsTerminal;

use clap::{Parser, ValueEnum};

use crate::app::Invocation;
use crate::config::AwsConfig;
use crate::store::ReadOptions;

/// Browse and query DynamoDB tables.
#[derive(Debug, Parser)]
#[command(name = "dynq", version)]
#[command(about = "Browse and query DynamoDB tables", long_about = None)]
#[command(after_help = "Examples:
  dynq                                      List tables
  dynq Orders                               Scan a table
  dynq Orders CUST1                         Query a partition
  dynq Orders CUST1 '>= 2024-01-01'         Comparison on the sort key
  dynq Orders CUST1 'between 2024-01 2024-06'
  dynq Orders CUST1 'SHIP*'                 Prefix match (same as begins_with SHIP)")]
pub struct Cli {
    /// Maximum number of items to output. 0 for no limit.
    #[arg(short = 'n', long = "number", default_value_t = 10)]
    pub number: usize,

    /// Output mode.
    #[arg(long, value_enum, default_value_t = OutputMode::Lines)]
    pub output: OutputMode,

    /// Output format. Defaults to pretty on a terminal, json otherwise.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Items requested per page.
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(i32).range(1..))]
    pub page_size: i32,

    /// Use strongly consistent reads.
    #[arg(long)]
    pub consistent_read: bool,

    /// Scan or query a secondary index instead of the base table.
    #[arg(long)]
    pub index: Option<String>,

    /// Custom endpoint URL (e.g. http://localhost:8000 for local DynamoDB).
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// AWS region. Falls back to the profile's region when omitted.
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS profile to use for credentials.
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Table name. Lists tables when omitted.
    pub table: Option<String>,

    /// Partition key value. Scans the table when omitted.
    pub partition: Option<String>,

    /// Sort key expression: `<= X`, `>= X`, `< X`, `> X`, `= X`,
    /// `begins_with X`, `X*`, `between X Y`, or a bare value.
    #[arg(requires = "partition")]
    pub sort: Option<String>,
}

/// Output mode options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// One record per line.
    #[default]
    Lines,
    /// A single JSON array of all records.
    Array,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON.
    Json,
    /// Indented JSON.
    Pretty,
}

impl Cli {
    /// AWS client settings from flags and environment.
    pub fn aws_config(&self) -> AwsConfig {
        AwsConfig {
            endpoint_url: self.endpoint_url.clone(),
            region: self.region.clone(),
            profile: self.profile.clone(),
        }
    }

    /// The effective output format, falling back on whether stdout is a terminal.
    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_else(|| {
            if std::io::stdout().is_terminal() {
                OutputFormat::Pretty
            } else {
                OutputFormat::Json
            }
        })
    }

    /// The retrieval to run, or `None` when no table was given.
    pub fn invocation(&self) -> Option<Invocation> {
        let table = self.table.clone()?;
        Some(Invocation {
            table,
            partition: self.partition.clone(),
            sort: self.sort.clone(),
            cap: self.number,
            read: ReadOptions {
                index_name: self.index.clone(),
                page_size: Some(self.page_size),
                consistent_read: self.consistent_read,
            },
        })
    }
}
