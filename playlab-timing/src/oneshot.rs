use std::time::Duration;
use tracing::debug;

/// Identifies one arming of a [`TrialTimer`]. Ids are never reused within
/// a timer, so a fire carrying an old id can be told apart from the
/// current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    id: TimerId,
    deadline_ns: u64,
}

/// Single-slot, cancellable one-shot timer.
///
/// At most one deadline is pending. Arming replaces (and thereby cancels)
/// whatever was pending; dropping the timer releases it, so nothing can
/// fire into a session that no longer exists.
#[derive(Debug, Default)]
pub struct TrialTimer {
    next_id: u64,
    pending: Option<Pending>,
}

impl TrialTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, now_ns: u64, delay: Duration) -> TimerId {
        if let Some(old) = self.pending.take() {
            debug!(timer = old.id.0, "re-arming cancels pending timer");
        }
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending = Some(Pending {
            id,
            deadline_ns: now_ns.saturating_add(u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX)),
        });
        id
    }

    /// Revokes the pending deadline, if any.
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.pending.take().map(|p| p.id)
    }

    /// Fires the pending deadline if it has passed. A deadline fires at
    /// most once.
    pub fn poll(&mut self, now_ns: u64) -> Option<TimerId> {
        match self.pending {
            Some(p) if now_ns >= p.deadline_ns => {
                self.pending = None;
                Some(p.id)
            }
            _ => None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn remaining(&self, now_ns: u64) -> Option<Duration> {
        self.pending
            .map(|p| Duration::from_nanos(p.deadline_ns.saturating_sub(now_ns)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn fires_once_at_deadline() {
        let mut t = TrialTimer::new();
        let id = t.arm(0, Duration::from_millis(1500));
        assert_eq!(t.poll(1499 * MS), None);
        assert_eq!(t.poll(1500 * MS), Some(id));
        assert_eq!(t.poll(3000 * MS), None);
        assert!(!t.is_armed());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = TrialTimer::new();
        let id = t.arm(0, Duration::from_millis(1500));
        assert_eq!(t.cancel(), Some(id));
        assert_eq!(t.poll(10_000 * MS), None);
        assert_eq!(t.cancel(), None);
    }

    #[test]
    fn rearming_invalidates_previous_id() {
        let mut t = TrialTimer::new();
        let first = t.arm(0, Duration::from_millis(100));
        let second = t.arm(50 * MS, Duration::from_millis(100));
        assert_ne!(first, second);
        assert_eq!(t.remaining(60 * MS), Some(Duration::from_millis(90)));
        assert_eq!(t.poll(100 * MS), None);
        assert_eq!(t.poll(150 * MS), Some(second));
        assert_eq!(t.poll(150 * MS), None);
    }

    #[test]
    fn huge_delay_saturates_instead_of_wrapping() {
        let mut t = TrialTimer::new();
        t.arm(5 * MS, Duration::MAX);
        assert_eq!(t.poll(u64::MAX - 1), None);
        assert!(t.is_armed());
        assert_eq!(t.remaining(0), Some(Duration::from_nanos(u64::MAX)));
    }
}
