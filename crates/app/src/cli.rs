use std::net::SocketAddr;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Listen address, overriding GAZETTE_HTTP_ADDR.
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// Apply pending database migrations and exit.
    #[arg(long, default_value_t = false)]
    pub migrate_only: bool,
}
