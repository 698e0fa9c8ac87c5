use std::time::Duration;

/// Session-wide time budget, measured against clock readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    started_ns: Option<u64>,
    limit: Duration,
}

impl Countdown {
    pub fn new(limit: Duration) -> Self {
        Self {
            started_ns: None,
            limit,
        }
    }

    pub fn start(&mut self, now_ns: u64) {
        self.started_ns = Some(now_ns);
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    pub fn is_running(&self) -> bool {
        self.started_ns.is_some()
    }

    pub fn elapsed(&self, now_ns: u64) -> Duration {
        self.started_ns
            .map(|s| Duration::from_nanos(now_ns.saturating_sub(s)))
            .unwrap_or(Duration::ZERO)
    }

    /// Full limit before start, zero once expired.
    pub fn remaining(&self, now_ns: u64) -> Duration {
        self.limit.saturating_sub(self.elapsed(now_ns))
    }

    pub fn is_up(&self, now_ns: u64) -> bool {
        self.is_running() && self.elapsed(now_ns) >= self.limit
    }
}
