//! Account Ledger server
//!
//! Serves an in-memory account ledger over HTTP.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --bind 0.0.0.0:8080 --workers 4
//! cargo run -- --accounts-file accounts.csv --log-format json
//! ```
//!
//! Accounts listed in `--accounts-file` (`name,balance` rows) are created
//! before the server starts accepting requests.
//!
//! # Exit Codes
//!
//! - 0: Clean shutdown after ctrl-c
//! - 1: Error (seed file unreadable or rejected, address in use, etc.)

use account_ledger::cli;
use account_ledger::core::{Ledger, TracingObserver};
use account_ledger::http;
use account_ledger::io::seed_ledger;
use account_ledger::logging::init_logging;
use anyhow::{anyhow, Context};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let args = cli::parse_args();
    init_logging(args.log_format, &args.log_level);

    let ledger = Ledger::new().with_observer(Arc::new(TracingObserver));
    if let Some(path) = &args.accounts_file {
        seed_ledger(&ledger, path).map_err(|e| anyhow!(e))?;
    }

    let config = args.to_server_config();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .context("failed to build async runtime")?;

    runtime
        .block_on(http::serve(&config, Arc::new(ledger)))
        .with_context(|| format!("server on {} failed", config.bind))
}
