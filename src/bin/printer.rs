// Bootstrap for the external printer stub (§2 "Printer Stub (external)").

use std::{net::SocketAddr, time::Duration};

use clap::Parser;
use lamport_print_mutex::printer;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Stateless printer stub")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:50051")]
    listen_addr: SocketAddr,

    /// Artificial processing delay in milliseconds before replying, to make
    /// overlapping requests observable.
    #[arg(long, default_value_t = 2000)]
    delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let listener = TcpListener::bind(args.listen_addr).await?;
    info!(listen_addr = %args.listen_addr, delay_ms = args.delay_ms, "printer stub listening");
    printer::serve(listener, Duration::from_millis(args.delay_ms), |_job| {}).await
}
