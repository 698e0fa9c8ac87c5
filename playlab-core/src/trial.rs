use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a trial ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    OnTimeCorrect,
    OnTimeIncorrect,
    /// Input arrived before the stimulus was shown.
    Premature,
    /// No input before the response window closed.
    Missed,
}

impl Outcome {
    pub fn is_on_time(&self) -> bool {
        matches!(self, Self::OnTimeCorrect | Self::OnTimeIncorrect)
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Self::OnTimeCorrect)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTimeCorrect => "correct",
            Self::OnTimeIncorrect => "incorrect",
            Self::Premature => "too early",
            Self::Missed => "missed",
        }
    }
}

/// Recorded result per trial. Sealed once; there are no setters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRecord<S, R> {
    trial_id: usize,
    level: u32,
    stimulus: S,
    responses: Vec<R>,
    outcome: Outcome,
    armed_ns: u64,
    onset_ns: Option<u64>,
    response_ns: Option<u64>,
    latency_ns: Option<u64>,
}

impl<S, R> TrialRecord<S, R> {
    /// Seals a finished trial. Latency is only kept for on-time outcomes
    /// with a known onset, and can never be negative.
    #[allow(clippy::too_many_arguments)]
    pub fn seal(
        trial_id: usize,
        level: u32,
        stimulus: S,
        responses: Vec<R>,
        outcome: Outcome,
        armed_ns: u64,
        onset_ns: Option<u64>,
        response_ns: Option<u64>,
    ) -> Self {
        let latency_ns = match (outcome.is_on_time(), onset_ns, response_ns) {
            (true, Some(onset), Some(response)) => Some(response.saturating_sub(onset)),
            _ => None,
        };
        Self {
            trial_id,
            level,
            stimulus,
            responses,
            outcome,
            armed_ns,
            onset_ns,
            response_ns,
            latency_ns,
        }
    }

    pub fn trial_id(&self) -> usize {
        self.trial_id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stimulus(&self) -> &S {
        &self.stimulus
    }

    pub fn responses(&self) -> &[R] {
        &self.responses
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn armed_ns(&self) -> u64 {
        self.armed_ns
    }

    pub fn onset_ns(&self) -> Option<u64> {
        self.onset_ns
    }

    pub fn response_ns(&self) -> Option<u64> {
        self.response_ns
    }

    pub fn latency(&self) -> Option<Duration> {
        self.latency_ns.map(Duration::from_nanos)
    }

    pub fn latency_ms(&self) -> Option<f64> {
        self.latency_ns.map(|ns| ns as f64 / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_time_trials_carry_latency() {
        let r: TrialRecord<u8, u8> = TrialRecord::seal(
            0,
            1,
            3,
            vec![3],
            Outcome::OnTimeCorrect,
            0,
            Some(2_000_000_000),
            Some(2_200_000_000),
        );
        assert_eq!(r.latency_ms(), Some(200.0));
        assert_eq!(r.latency(), Some(Duration::from_millis(200)));
    }

    #[test]
    fn premature_and_missed_have_no_latency() {
        let early: TrialRecord<u8, u8> =
            TrialRecord::seal(0, 1, 0, vec![], Outcome::Premature, 0, None, Some(500));
        assert_eq!(early.latency_ms(), None);

        let missed: TrialRecord<u8, u8> =
            TrialRecord::seal(1, 1, 0, vec![], Outcome::Missed, 0, Some(10), None);
        assert_eq!(missed.latency(), None);
    }

    #[test]
    fn latency_saturates_instead_of_going_negative() {
        let r: TrialRecord<u8, u8> =
            TrialRecord::seal(0, 1, 0, vec![], Outcome::OnTimeIncorrect, 0, Some(900), Some(100));
        assert_eq!(r.latency(), Some(Duration::ZERO));
    }

    #[test]
    fn record_serializes_outcome_by_name() {
        let r: TrialRecord<u8, u8> =
            TrialRecord::seal(4, 2, 9, vec![9], Outcome::OnTimeCorrect, 1, Some(2), Some(3));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"OnTimeCorrect\""));
        assert!(json.contains("\"trial_id\":4"));
    }
}
