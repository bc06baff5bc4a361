// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use portquery_rust::core::query::UserContext;
use portquery_rust::query_api::Row;
use portquery_rust::{PortQueryConfig, PortQueryConnection, PortQueryResult};

/// Scan a host by describing the ports you want in SOSQL.
///
/// Example: portquery "SELECT PORT, TCP FROM 127.0.0.1 WHERE PORT BETWEEN 1 AND 1024 AND TCP = OPEN"
#[derive(Parser, Debug)]
#[command(name = "portquery", version, about)]
struct Cli {
    /// SOSQL query to run
    query: String,

    /// TOML file with timeout_secs / thread_count / delay_ms
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-probe timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Worker threads (0 = one per CPU)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Delay between probes in milliseconds
    #[arg(short, long)]
    delay: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> PortQueryResult<PortQueryConfig> {
    let mut config = match &cli.config {
        Some(path) => PortQueryConfig::from_file(path)?,
        None => PortQueryConfig::default(),
    };
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(threads) = cli.threads {
        config.thread_count = threads;
    }
    if let Some(delay) = cli.delay {
        config.delay_ms = delay;
    }
    config.validate()?;
    Ok(config)
}

fn print_row(_ctx: UserContext, row: Row) {
    let cells: Vec<String> = row.iter().map(|value| value.to_string()).collect();
    println!("{}", cells.join("\t"));
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("portquery: {}", e);
            return ExitCode::from(2);
        }
    };

    let mut conn = PortQueryConnection::new(config);
    conn.set_user_callback(print_row);
    match conn.execute(&cli.query) {
        Ok(summary) => {
            log::info!(
                "{} rows, {} probes, {} ports pruned",
                summary.rows_delivered,
                summary.probes_submitted,
                summary.ports_pruned
            );
            ExitCode::SUCCESS
        }
        Err(_) => {
            eprintln!("portquery: {}", conn.error_string());
            ExitCode::FAILURE
        }
    }
}
