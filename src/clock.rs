// Lamport logical clock.
//
// IR2 from "Time, Clocks, and the Ordering of Events in a Distributed
// System": a process increments its clock before every local event and, on
// receiving a message, sets its clock greater than both its own present
// value and the message's timestamp.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct LogicalClock {
    ts: i64,
}

impl LogicalClock {
    pub fn new() -> Self {
        Self { ts: 0 }
    }

    pub fn ts(&self) -> i64 {
        self.ts
    }

    /// Local event: advance the clock and return the new value.
    pub fn tick(&mut self) -> i64 {
        self.ts += 1;
        self.ts
    }

    /// Message receipt: merge in a remote timestamp and return the new value.
    pub fn merge(&mut self, remote_ts: i64) -> i64 {
        self.ts = self.ts.max(remote_ts) + 1;
        self.ts
    }
}
