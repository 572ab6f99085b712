// Per-node shared state (§3) and the Ricart–Agrawala deferral discipline
// (§4.2). All reads and writes of clock/state/requestTs happen under a
// single exclusive region, exactly as §5 requires; `tokio::sync::Mutex` is
// that region and `tokio::sync::Notify` is the condition variable deferred
// handlers park on.

use tokio::sync::{Mutex, Notify};
use tracing::debug;

use crate::{
    clock::LogicalClock,
    message::{AccessRelease, AccessRequest, AccessResponse},
    state::NodeState,
};

struct Inner {
    clock: LogicalClock,
    state: NodeState,
    /// Valid only while `state != Released`; `None` is the §3 sentinel.
    request_ts: Option<i64>,
}

pub struct Node {
    pub id: u32,
    inner: Mutex<Inner>,
    /// Wakes deferred `handle_request_access` loops. Sources: a local
    /// RELEASED exit and any inbound ReleaseAccess, per §5 (c) — the latter
    /// is a liveness safety net, cheap and harmless to include even though
    /// in this design only the local driver ever advances `request_ts`.
    notify: Notify,
}

impl Node {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            inner: Mutex::new(Inner {
                clock: LogicalClock::new(),
                state: NodeState::Released,
                request_ts: None,
            }),
            notify: Notify::new(),
        }
    }

    /// RequestAccess handler (§4.2). Merges the sender's timestamp once,
    /// then loops: grant immediately, or defer and re-evaluate on every
    /// wake, exactly as steps 3–5 describe.
    pub async fn handle_request_access(&self, req: AccessRequest) -> AccessResponse {
        {
            let mut inner = self.inner.lock().await;
            inner.clock.merge(req.lamport_ts);
        }
        loop {
            let mut inner = self.inner.lock().await;
            let defer = match inner.state {
                NodeState::Held => true,
                NodeState::Wanted => {
                    let own_request_ts = inner
                        .request_ts
                        .expect("requestTs must be set while WANTED");
                    (own_request_ts, self.id) < (req.lamport_ts, req.client_id)
                }
                NodeState::Released => false,
            };
            if !defer {
                let ts = inner.clock.tick();
                debug!(node = self.id, from = req.client_id, ts, "granting request");
                return AccessResponse {
                    granted: true,
                    lamport_ts: ts,
                };
            }
            debug!(node = self.id, from = req.client_id, "deferring request");
            // `enable()` registers interest in the current notification
            // generation before the lock is dropped, so a `notify_waiters`
            // racing the `drop(inner)` below cannot be missed.
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            drop(inner);
            notified.await;
        }
    }

    /// ReleaseAccess handler (§4.2). Never itself grants; it only wakes
    /// deferred handlers so they can re-evaluate.
    pub async fn handle_release_access(&self, rel: AccessRelease) {
        let mut inner = self.inner.lock().await;
        inner.clock.merge(rel.lamport_ts);
        drop(inner);
        self.notify.notify_waiters();
    }

    /// Driver step 1: RELEASED -> WANTED, returns the new requestTs.
    pub async fn declare_intent(&self) -> i64 {
        let mut inner = self.inner.lock().await;
        debug_assert_eq!(inner.state, NodeState::Released);
        debug_assert!(inner.request_ts.is_none());
        let ts = inner.clock.tick();
        inner.request_ts = Some(ts);
        inner.state = NodeState::Wanted;
        ts
    }

    /// Driver step 3: WANTED -> HELD.
    pub async fn enter_held(&self) {
        let mut inner = self.inner.lock().await;
        debug_assert_eq!(inner.state, NodeState::Wanted);
        inner.state = NodeState::Held;
    }

    /// Driver step 5: HELD -> RELEASED, ticks the clock, wakes local
    /// waiters.
    pub async fn exit_released(&self) -> i64 {
        let mut inner = self.inner.lock().await;
        debug_assert_eq!(inner.state, NodeState::Held);
        inner.state = NodeState::Released;
        inner.request_ts = None;
        let ts = inner.clock.tick();
        drop(inner);
        self.notify.notify_waiters();
        ts
    }

    /// Strict-policy abort: WANTED -> RELEASED without ever reaching HELD,
    /// for callers that choose not to proceed without a unanimous grant set.
    pub async fn abort_to_released(&self) {
        let mut inner = self.inner.lock().await;
        inner.state = NodeState::Released;
        inner.request_ts = None;
        drop(inner);
        self.notify.notify_waiters();
    }

    pub async fn tick(&self) -> i64 {
        self.inner.lock().await.clock.tick()
    }

    pub async fn merge(&self, remote_ts: i64) -> i64 {
        self.inner.lock().await.clock.merge(remote_ts)
    }
}
