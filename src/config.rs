// Node configuration (§6): required at startup, no persisted state. Peer
// addresses must not include the node's own address; duplicates are
// ignored.

use std::{net::SocketAddr, time::Duration};

use clap::Parser;

use crate::error::GrantPolicy;

#[derive(Debug, Clone, Parser)]
#[command(about = "Distributed mutual-exclusion printer client node")]
pub struct NodeArgs {
    /// This node's stable client id, unique among peers.
    #[arg(long)]
    pub client_id: u32,

    /// Address this node's peer RPC server listens on.
    #[arg(long)]
    pub listen_addr: SocketAddr,

    /// Address of the external printer stub.
    #[arg(long)]
    pub printer_addr: SocketAddr,

    /// Comma-separated addresses of sibling nodes (self is filtered out,
    /// duplicates are ignored).
    #[arg(long, value_delimiter = ',')]
    pub peers: Vec<SocketAddr>,

    /// §9 open question: whether a failed/timed-out peer RequestAccess
    /// aborts the attempt (`strict`) or is merely logged and proceeded past
    /// (`lenient`, matching the source's behavior).
    #[arg(long, default_value = "lenient")]
    pub grant_policy: GrantPolicy,

    /// Timeout applied uniformly to every outbound RPC.
    #[arg(long, default_value_t = 30)]
    pub rpc_timeout_secs: u64,

    /// If set, repeatedly enters the critical section on its own with a
    /// random interval in [min, max) milliseconds instead of reading jobs
    /// from stdin.
    #[arg(long)]
    pub auto_interval_min_ms: Option<u64>,
    #[arg(long, requires = "auto_interval_min_ms")]
    pub auto_interval_max_ms: Option<u64>,
}

impl NodeArgs {
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    /// Filters this node's own address out of the configured peer list and
    /// removes duplicates, preserving the first occurrence's order.
    pub fn resolved_peers(&self) -> Vec<SocketAddr> {
        resolve_peers(self.listen_addr, &self.peers)
    }
}

pub fn resolve_peers(self_addr: SocketAddr, raw_peers: &[SocketAddr]) -> Vec<SocketAddr> {
    let mut seen = std::collections::HashSet::new();
    raw_peers
        .iter()
        .copied()
        .filter(|addr| *addr != self_addr)
        .filter(|addr| seen.insert(*addr))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn filters_self_and_dedups() {
        let resolved = resolve_peers(
            addr(4000),
            &[addr(4000), addr(4001), addr(4002), addr(4001)],
        );
        assert_eq!(resolved, vec![addr(4001), addr(4002)]);
    }

    #[test]
    fn empty_peer_list_stays_empty() {
        assert!(resolve_peers(addr(4000), &[]).is_empty());
    }
}
