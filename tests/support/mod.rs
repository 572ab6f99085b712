// Shared scaffolding for the end-to-end scenarios below: real tokio tasks
// talking over real loopback TCP, no mocked network.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use lamport_print_mutex::{
    driver::CriticalSectionDriver, error::GrantPolicy, message::PrintJob, node::Node,
    peer_client::PeerClient, printer, printer_client::PrinterClient, server,
};
use tokio::{net::TcpListener, sync::mpsc};

pub const RPC_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts a printer stub with the given artificial delay and returns its
/// address plus a channel that yields every job in the order the printer
/// observed it.
pub async fn spawn_printer(delay: Duration) -> (SocketAddr, mpsc::UnboundedReceiver<PrintJob>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(printer::serve(listener, delay, move |job: &PrintJob| {
        let _ = tx.send(job.clone());
    }));
    (addr, rx)
}

/// Binds `client_ids.len()` peer RPC servers up front (so every node's full
/// peer set is known before any of them start driving), then returns one
/// `CriticalSectionDriver` per node, in the same order as `client_ids`.
pub async fn spawn_cluster(
    client_ids: &[u32],
    printer_addr: SocketAddr,
    policy: GrantPolicy,
) -> Vec<Arc<CriticalSectionDriver>> {
    let mut listeners = Vec::with_capacity(client_ids.len());
    let mut addrs = Vec::with_capacity(client_ids.len());
    for _ in client_ids {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        addrs.push(listener.local_addr().unwrap());
        listeners.push(listener);
    }

    let mut drivers = Vec::with_capacity(client_ids.len());
    for (i, (&client_id, listener)) in client_ids.iter().zip(listeners).enumerate() {
        let node = Arc::new(Node::new(client_id));
        tokio::spawn(server::serve(listener, node.clone()));

        let peers: Vec<PeerClient> = addrs
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, addr)| PeerClient::new(*addr, RPC_TIMEOUT))
            .collect();
        let printer = PrinterClient::new(printer_addr, RPC_TIMEOUT);
        drivers.push(Arc::new(CriticalSectionDriver::new(
            node, peers, printer, policy,
        )));
    }
    drivers
}

/// Same as `spawn_cluster`, but also hands back each node's `Arc<Node>` so a
/// test can reach in and pre-advance a node's clock directly (e.g. to force
/// equal lamport timestamps across nodes before they contend).
pub async fn spawn_cluster_with_nodes(
    client_ids: &[u32],
    printer_addr: SocketAddr,
    policy: GrantPolicy,
) -> (Vec<Arc<CriticalSectionDriver>>, Vec<Arc<Node>>) {
    let mut listeners = Vec::with_capacity(client_ids.len());
    let mut addrs = Vec::with_capacity(client_ids.len());
    for _ in client_ids {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        addrs.push(listener.local_addr().unwrap());
        listeners.push(listener);
    }

    let mut drivers = Vec::with_capacity(client_ids.len());
    let mut nodes = Vec::with_capacity(client_ids.len());
    for (i, (&client_id, listener)) in client_ids.iter().zip(listeners).enumerate() {
        let node = Arc::new(Node::new(client_id));
        tokio::spawn(server::serve(listener, node.clone()));

        let peers: Vec<PeerClient> = addrs
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, addr)| PeerClient::new(*addr, RPC_TIMEOUT))
            .collect();
        let printer = PrinterClient::new(printer_addr, RPC_TIMEOUT);
        drivers.push(Arc::new(CriticalSectionDriver::new(
            node.clone(),
            peers,
            printer,
            policy,
        )));
        nodes.push(node);
    }
    (drivers, nodes)
}
