// Per-node request state (§4.5). Transitions are owned entirely by the
// critical-section driver; peer RPC handlers only ever read this.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Released,
    Wanted,
    Held,
}

impl Default for NodeState {
    fn default() -> Self {
        NodeState::Released
    }
}
