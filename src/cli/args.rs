use crate::http::ServerConfig;
use crate::logging::LogFormat;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Serve an in-memory account ledger over HTTP
#[derive(Parser, Debug)]
#[command(name = "account-ledger")]
#[command(about = "Serve an in-memory account ledger over HTTP", long_about = None)]
pub struct CliArgs {
    /// Address the HTTP server listens on
    #[arg(
        long = "bind",
        env = "LEDGER_BIND",
        value_name = "ADDR",
        default_value = "127.0.0.1:4567"
    )]
    pub bind: SocketAddr,

    /// CSV file of opening accounts (`name,balance`)
    #[arg(long = "accounts-file", env = "LEDGER_ACCOUNTS_FILE", value_name = "FILE")]
    pub accounts_file: Option<PathBuf>,

    /// Number of async worker threads
    #[arg(
        long = "workers",
        env = "LEDGER_WORKERS",
        value_name = "COUNT",
        help = "Number of async worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "human")]
    pub log_format: LogFormat,

    /// Log filter used when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "FILTER", default_value = "info")]
    pub log_level: String,
}

impl CliArgs {
    /// Create a ServerConfig from CLI arguments
    pub fn to_server_config(&self) -> ServerConfig {
        let default = ServerConfig::default();
        ServerConfig::new(self.bind, self.workers.unwrap_or(default.workers))
    }
}
