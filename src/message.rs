// Wire types for both RPC surfaces (§3, §6). `bincode` over a length-prefixed
// frame (see `net.rs`) is the wire encoding; nothing here assumes that, since
// §1 leaves wire encoding unconstrained.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    pub client_id: u32,
    pub lamport_ts: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResponse {
    pub granted: bool,
    pub lamport_ts: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRelease {
    pub client_id: u32,
    pub lamport_ts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintJob {
    pub client_id: u32,
    pub content: String,
    pub lamport_ts: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrintReply {
    pub success: bool,
    pub confirmation: String,
    pub lamport_ts: i64,
}

/// One peer-to-peer connection carries exactly one of these, request side.
#[derive(Debug, Clone, Serialize, Deserialize, derive_more::From)]
pub enum PeerRequest {
    Access(AccessRequest),
    Release(AccessRelease),
}

/// ... and exactly one of these, response side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PeerResponse {
    Access(AccessResponse),
    Ack,
}
