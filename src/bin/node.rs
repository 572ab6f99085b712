// Bootstrap for one client node (§2 "Bootstrap/CLI (external)"): wires a
// `Node`, its peer RPC server, and a `CriticalSectionDriver` together, then
// either runs the auto-job generator or reads print jobs from stdin.

use std::{io::BufRead, sync::Arc};

use clap::Parser;
use lamport_print_mutex::{
    config::NodeArgs, driver::CriticalSectionDriver, node::Node, peer_client::PeerClient,
    printer_client::PrinterClient, server,
};
use rand::Rng;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = NodeArgs::parse();

    let peers = args.resolved_peers();
    info!(
        client_id = args.client_id,
        listen_addr = %args.listen_addr,
        printer_addr = %args.printer_addr,
        peer_count = peers.len(),
        grant_policy = ?args.grant_policy,
        "starting node"
    );

    let node = Arc::new(Node::new(args.client_id));
    let listener = TcpListener::bind(args.listen_addr).await?;
    tokio::spawn(server::serve(listener, node.clone()));

    let peer_clients = peers
        .into_iter()
        .map(|addr| PeerClient::new(addr, args.rpc_timeout()))
        .collect();
    let printer = PrinterClient::new(args.printer_addr, args.rpc_timeout());
    let driver = CriticalSectionDriver::new(node, peer_clients, printer, args.grant_policy);

    if let Some(min_ms) = args.auto_interval_min_ms {
        let max_ms = args.auto_interval_max_ms.unwrap_or(min_ms + 1).max(min_ms + 1);
        run_auto_job_loop(&driver, args.client_id, min_ms, max_ms).await;
    } else {
        run_stdin_loop(&driver).await;
    }
    Ok(())
}

async fn run_auto_job_loop(driver: &CriticalSectionDriver, client_id: u32, min_ms: u64, max_ms: u64) {
    loop {
        let delay_ms = rand::thread_rng().gen_range(min_ms..max_ms);
        tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
        let content = format!("hello from {client_id}");
        match driver.enter_critical_section(content).await {
            Ok(reply) => info!(?reply, "job printed"),
            Err(err) => error!(%err, "job failed"),
        }
    }
}

async fn run_stdin_loop(driver: &CriticalSectionDriver) {
    info!("reading print jobs from stdin, Ctrl-D to exit");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match driver.enter_critical_section(line.to_string()).await {
            Ok(reply) => info!(?reply, "job printed"),
            Err(err) => error!(%err, "job failed"),
        }
    }
}
