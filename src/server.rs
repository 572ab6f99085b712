// Peer RPC server (§4.2): accepts connections, decodes one `PeerRequest`
// frame, dispatches into `Node`, and writes back the corresponding
// `PeerResponse`. A deferred RequestAccess simply keeps its connection's
// task parked on `Node::handle_request_access` for as long as it takes —
// tokio tasks are cheap enough that this needs no explicit thread-pool
// sizing.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::warn;

use crate::{
    message::{PeerRequest, PeerResponse},
    net::{read_frame, write_frame},
    node::Node,
};

pub async fn serve(listener: TcpListener, node: Arc<Node>) -> anyhow::Result<()> {
    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let node = node.clone();
        tokio::spawn(async move {
            if let Err(err) = handle_connection(node, stream).await {
                warn!(%peer_addr, %err, "peer connection failed");
            }
        });
    }
}

async fn handle_connection(node: Arc<Node>, mut stream: tokio::net::TcpStream) -> anyhow::Result<()> {
    let request: PeerRequest = read_frame(&mut stream).await?;
    let response = match request {
        PeerRequest::Access(req) => PeerResponse::Access(node.handle_request_access(req).await),
        PeerRequest::Release(rel) => {
            node.handle_release_access(rel).await;
            PeerResponse::Ack
        }
    };
    write_frame(&mut stream, &response).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{message::AccessRequest, peer_client::PeerClient};
    use std::time::Duration;

    #[tokio::test]
    async fn server_grants_a_released_node_immediately() {
        let node = Arc::new(Node::new(1));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, node));

        let client = PeerClient::new(addr, Duration::from_secs(5));
        let resp = client
            .request_access(AccessRequest {
                client_id: 2,
                lamport_ts: 1,
            })
            .await
            .unwrap();
        assert!(resp.granted);
    }
}
