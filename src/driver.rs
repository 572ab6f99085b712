// The critical-section driver (§4.4): one full WANTED -> HELD -> RELEASED
// cycle plus the printer call inside it. A node-wide `attempt_lock` serializes
// overlapping `enter_critical_section` calls, since at most one driver
// activity may be in flight per node at a time.

use std::sync::Arc;

use tokio::sync::Mutex as AsyncMutex;
use tracing::warn;

use crate::{
    error::GrantPolicy,
    message::{AccessRelease, AccessRequest, PrintJob, PrintReply},
    node::Node,
    peer_client::{broadcast_request, send_release, PeerClient},
    printer_client::PrinterClient,
};

pub struct CriticalSectionDriver {
    node: Arc<Node>,
    peers: Vec<PeerClient>,
    printer: PrinterClient,
    policy: GrantPolicy,
    attempt_lock: AsyncMutex<()>,
}

impl CriticalSectionDriver {
    pub fn new(
        node: Arc<Node>,
        peers: Vec<PeerClient>,
        printer: PrinterClient,
        policy: GrantPolicy,
    ) -> Self {
        Self {
            node,
            peers,
            printer,
            policy,
            attempt_lock: AsyncMutex::new(()),
        }
    }

    pub async fn enter_critical_section(&self, content: String) -> anyhow::Result<PrintReply> {
        let _serialize = self.attempt_lock.lock().await;

        // 1. Declare intent.
        let request_ts = self.node.declare_intent().await;
        let request = AccessRequest {
            client_id: self.node.id,
            lamport_ts: request_ts,
        };

        // 2. Broadcast and wait for every peer to respond.
        let results = broadcast_request(&self.peers, request).await;
        let mut granted = 0usize;
        for result in results {
            match result {
                Ok(resp) => {
                    self.node.merge(resp.lamport_ts).await;
                    granted += 1;
                }
                Err(err) => {
                    warn!(
                        node = self.node.id,
                        %err,
                        "request_access to a peer failed"
                    );
                    if self.policy == GrantPolicy::Strict {
                        self.node.abort_to_released().await;
                        anyhow::bail!(
                            "aborting critical section attempt under strict grant policy: {err}"
                        );
                    }
                }
            }
        }
        if granted != self.peers.len() {
            warn!(
                node = self.node.id,
                granted,
                expected = self.peers.len(),
                "entering critical section without a unanimous grant set"
            );
        }

        // 3. Enter.
        self.node.enter_held().await;

        // 4. Use the critical section.
        let send_ts = self.node.tick().await;
        let job = PrintJob {
            client_id: self.node.id,
            content,
            lamport_ts: send_ts,
        };
        let reply = match self.printer.send(job).await {
            Ok(reply) => {
                self.node.merge(reply.lamport_ts).await;
                reply
            }
            Err(err) => {
                warn!(node = self.node.id, %err, "printer call failed");
                PrintReply {
                    success: false,
                    confirmation: String::new(),
                    lamport_ts: send_ts,
                }
            }
        };

        // 5. Exit.
        self.node.exit_released().await;

        // 6. Announce.
        let announce_ts = self.node.tick().await;
        let release = AccessRelease {
            client_id: self.node.id,
            lamport_ts: announce_ts,
        };
        send_release(&self.peers, release).await;

        Ok(reply)
    }
}
