//! Command-line argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Replay a CSV of ledger operations against a data directory and print
/// the reconciled account balances as CSV.
#[derive(Debug, Parser)]
#[command(name = "hogar-ledger", version, about)]
pub struct CliArgs {
    /// Path to the operations CSV file
    #[arg(value_name = "OPS")]
    pub ops_file: PathBuf,

    /// Directory holding the accounts, movements, and statements tables
    #[arg(long, default_value = "data", value_name = "DIR")]
    pub data_dir: PathBuf,
}
