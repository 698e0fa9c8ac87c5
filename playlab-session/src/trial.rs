use playlab_core::{Outcome, Stimulus, TrialRecord, TrialState};
use std::time::Duration;

/// A trial between arming and resolution. Sealed into a [`TrialRecord`]
/// exactly once.
#[derive(Debug, Clone)]
pub struct Trial<S: Stimulus, R> {
    pub id: usize,
    pub level: u32,
    pub stimulus: S,
    pub durations: TrialDurations,
    pub timestamps: TrialTimestamps,
    pub accepted: Vec<R>,
    pub state: TrialState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialDurations {
    pub arming: Duration,
    pub presentation: Option<Duration>,
    pub response_window: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrialTimestamps {
    pub armed: u64,
    pub stimulus_start: Option<u64>,
    pub recall_start: Option<u64>,
    pub response: Option<u64>,
}

impl TrialTimestamps {
    /// Instant latency is measured from: recall opening for sequence
    /// trials, stimulus onset otherwise.
    pub fn measurement_start(&self) -> Option<u64> {
        self.recall_start.or(self.stimulus_start)
    }
}

impl<S: Stimulus, R> Trial<S, R> {
    pub fn new(id: usize, level: u32, stimulus: S, durations: TrialDurations, now_ns: u64) -> Self {
        Self {
            id,
            level,
            stimulus,
            durations,
            timestamps: TrialTimestamps {
                armed: now_ns,
                ..TrialTimestamps::default()
            },
            accepted: Vec::new(),
            state: TrialState::Armed,
        }
    }

    pub fn seal(self, outcome: Outcome, response_ns: Option<u64>) -> TrialRecord<S, R> {
        let onset = self.timestamps.measurement_start();
        TrialRecord::seal(
            self.id,
            self.level,
            self.stimulus,
            self.accepted,
            outcome,
            self.timestamps.armed,
            onset,
            response_ns,
        )
    }
}
