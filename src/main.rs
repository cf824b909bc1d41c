//! Batch entry point: replay an operations CSV and print balances

use tracing_subscriber::EnvFilter;

use hogar_ledger::cli;
use hogar_ledger::io::replay;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hogar_ledger=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let args = cli::parse_args();

    let mut stdout = std::io::stdout();
    if let Err(error) = replay::process(&args.data_dir, &args.ops_file, &mut stdout) {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}
