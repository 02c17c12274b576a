use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use serde::{Deserialize, Serialize};

/// Correlates a JSON-RPC response to the request that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(
    /// Monotonic numeric request identifier.
    pub u64,
);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues strictly increasing request ids.
///
/// The counter starts at zero and is incremented before each use, so the
/// first id handed out is `1`. Increments are atomic: concurrent callers
/// sharing one counter never observe the same id.
#[derive(Debug, Default)]
pub struct RequestIdCounter {
    last: AtomicU64,
}

impl RequestIdCounter {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Increments the counter and returns the new value.
    pub fn next_id(&self) -> RequestId {
        RequestId(self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1))
    }

    /// Most recently issued id, or `0` when nothing was issued yet.
    pub fn last_issued(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}
