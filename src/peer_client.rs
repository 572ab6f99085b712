// Outbound peer RPC (§4.3): broadcastRequest and sendRelease. Both dispatch
// to every peer in parallel via a `JoinSet`, the same primitive the
// teacher's `worker::SpawnExecutor` uses to fan work out over the runtime.

use std::{net::SocketAddr, time::Duration};

use tokio::{net::TcpStream, task::JoinSet, time::timeout};
use tracing::warn;

use crate::{
    message::{AccessRelease, AccessRequest, AccessResponse, PeerRequest, PeerResponse},
    net::{read_frame, write_frame},
};

#[derive(Debug, Clone)]
pub struct PeerClient {
    pub addr: SocketAddr,
    pub rpc_timeout: Duration,
}

impl PeerClient {
    pub fn new(addr: SocketAddr, rpc_timeout: Duration) -> Self {
        Self { addr, rpc_timeout }
    }

    pub async fn request_access(&self, req: AccessRequest) -> anyhow::Result<AccessResponse> {
        let addr = self.addr;
        let call = async move {
            let mut stream = TcpStream::connect(addr).await?;
            write_frame(&mut stream, &PeerRequest::Access(req)).await?;
            match read_frame(&mut stream).await? {
                PeerResponse::Access(resp) => Ok(resp),
                PeerResponse::Ack => anyhow::bail!("peer replied Ack to a RequestAccess call"),
            }
        };
        timeout(self.rpc_timeout, call).await?
    }

    pub async fn release_access(&self, rel: AccessRelease) -> anyhow::Result<()> {
        let addr = self.addr;
        let call = async move {
            let mut stream = TcpStream::connect(addr).await?;
            write_frame(&mut stream, &PeerRequest::Release(rel)).await?;
            let _: PeerResponse = read_frame(&mut stream).await?;
            Ok(())
        };
        timeout(self.rpc_timeout, call).await?
    }
}

/// Broadcasts `req` to every peer in parallel and waits until every call has
/// either returned or failed (§4.3: "completes only when every peer has
/// responded or errored").
pub async fn broadcast_request(
    peers: &[PeerClient],
    req: AccessRequest,
) -> Vec<anyhow::Result<AccessResponse>> {
    let mut calls = JoinSet::new();
    for peer in peers {
        let peer = peer.clone();
        calls.spawn(async move { peer.request_access(req).await });
    }
    let mut results = Vec::with_capacity(peers.len());
    while let Some(joined) = calls.join_next().await {
        results.push(match joined {
            Ok(result) => result,
            Err(join_err) => Err(anyhow::anyhow!(join_err)),
        });
    }
    results
}

/// Dispatches a release to every peer in parallel. Errors are logged and
/// swallowed: the releaser has already exited its critical section locally
/// and has no way to roll that back (§4.3).
pub async fn send_release(peers: &[PeerClient], rel: AccessRelease) {
    let mut calls = JoinSet::new();
    for peer in peers {
        let peer = peer.clone();
        calls.spawn(async move { (peer.addr, peer.release_access(rel).await) });
    }
    while let Some(joined) = calls.join_next().await {
        match joined {
            Ok((addr, Err(err))) => warn!(%addr, %err, "release_access failed"),
            Err(join_err) => warn!(%join_err, "release_access task panicked"),
            Ok((_, Ok(()))) => {}
        }
    }
}
