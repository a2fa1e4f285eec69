//! usage-report - Query a user-activity CSV from the command line
//!
//! Loads the table once, runs a single query and prints the JSON response.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use usagetable::{Config, CsvFileSource, QueryRequest, QueryResponse, QueryService};

/// usage-report - grouped user-activity reports
#[derive(Parser, Debug)]
#[command(name = "usage-report")]
#[command(author, version, about = "Run aggregate queries over a user-activity CSV")]
struct ReportArgs {
    /// CSV file to load
    #[arg(long, global = true, env = "USAGE_DATA_PATH")]
    data: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Row count per region
    MapUsers,

    /// Grouped aggregate
    Chart {
        /// Grouping dimension (region, age_group)
        #[arg(long, default_value = "region")]
        x_axis: String,

        /// Aggregate (users, sales, retention)
        #[arg(long, default_value = "users")]
        y_axis: String,
    },

    /// Revenue and revenue share per age bracket
    AgeSalesRatio,

    /// Every row of the table
    Records,

    /// Raw JSON request, e.g. '{"type": "MapUsers"}'
    Query {
        json: String,
    },
}

impl Commands {
    fn into_request(self) -> Result<QueryRequest, serde_json::Error> {
        Ok(match self {
            Commands::MapUsers => QueryRequest::MapUsers,
            Commands::Chart { x_axis, y_axis } => QueryRequest::Chart { x_axis, y_axis },
            Commands::AgeSalesRatio => QueryRequest::AgeSalesRatio,
            Commands::Records => QueryRequest::Records,
            Commands::Query { json } => serde_json::from_str(&json)?,
        })
    }
}

fn print_response(response: &QueryResponse, pretty: bool) -> Result<(), serde_json::Error> {
    let out = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> ExitCode {
    let args = ReportArgs::parse();

    let mut config = Config::from_env();
    if let Some(path) = args.data {
        config.data_path = path;
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or(config.log_filter.as_str()));

    let request = match args.command.into_request() {
        Ok(request) => request,
        Err(e) => {
            error!("invalid request: {}", e);
            return ExitCode::from(2);
        }
    };

    let service = QueryService::new(config.table_name.as_str());
    service.load(&CsvFileSource::new(&config.data_path));

    let response = service.handle(request);
    if let Err(e) = print_response(&response, args.pretty) {
        error!("failed to encode response: {}", e);
        return ExitCode::FAILURE;
    }

    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
