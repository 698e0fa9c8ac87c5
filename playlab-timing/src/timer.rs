use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source, in nanoseconds since the clock was created.
///
/// Latencies are differences of two readings, so implementations must never
/// go backwards.
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> u64;

    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }

    fn sleep(&self, d: Duration);
}

#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl Clock for MonotonicClock {
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }

    fn sleep(&self, d: Duration) {
        self.high_precision_sleep(d)
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Sleeps on the monotonic clock where the platform offers one,
    /// resuming after signal interruptions.
    pub fn high_precision_sleep(&self, duration: Duration) {
        #[cfg(target_os = "linux")]
        nanosleep_monotonic(duration);
        #[cfg(not(target_os = "linux"))]
        std::thread::sleep(duration);
    }
}

#[cfg(target_os = "linux")]
fn nanosleep_monotonic(duration: Duration) {
    let mut left = libc::timespec {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_nsec: duration.subsec_nanos() as libc::c_long,
    };
    loop {
        let req = left;
        // SAFETY: both pointers refer to live, properly aligned timespecs.
        let rc = unsafe { libc::clock_nanosleep(libc::CLOCK_MONOTONIC, 0, &req, &mut left) };
        if rc != libc::EINTR {
            break;
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Hand-driven clock for tests and replays. Clones share the same reading,
/// so a test can keep one handle and give another to a session.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ns: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }

    fn sleep(&self, d: Duration) {
        self.advance(d)
    }
}
