use super::MAX_SEQUENCE_LEN;
use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A run of decimal digits shown one after another, then typed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Digits(pub Vec<u8>);

impl Digits {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses typed input such as `"472"` or `"4 7 2"`. Non-digits are skipped.
    pub fn parse_answer(input: &str) -> Vec<u8> {
        input
            .chars()
            .filter_map(|c| c.to_digit(10))
            .map(|d| d as u8)
            .collect()
    }
}

impl Stimulus for Digits {
    fn describe(&self) -> String {
        self.0.iter().map(|d| char::from(b'0' + d)).collect()
    }

    fn recall_len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberSequenceParams {
    pub base_length: usize,
    pub max_length: usize,
    #[serde(with = "crate::serde_millis")]
    pub per_digit: Duration,
    #[serde(with = "crate::serde_millis")]
    pub display_padding: Duration,
    pub lives: u32,
    #[serde(with = "crate::serde_millis")]
    pub feedback: Duration,
    pub points_per_digit: i64,
}

impl Default for NumberSequenceParams {
    fn default() -> Self {
        Self {
            base_length: 3,
            max_length: 20,
            per_digit: Duration::from_millis(800),
            display_padding: Duration::from_millis(500),
            lives: 3,
            feedback: Duration::from_millis(1000),
            points_per_digit: 10,
        }
    }
}

impl NumberSequenceParams {
    pub fn sanitized(mut self) -> Self {
        self.base_length = self.base_length.clamp(1, MAX_SEQUENCE_LEN);
        self.max_length = self.max_length.clamp(self.base_length, MAX_SEQUENCE_LEN);
        self.lives = self.lives.max(1);
        self
    }

    pub fn length_for(&self, level: u32) -> usize {
        (self.base_length + level.saturating_sub(1) as usize).min(self.max_length)
    }
}

#[derive(Debug, Clone)]
pub struct NumberSequence {
    params: NumberSequenceParams,
}

impl NumberSequence {
    pub fn new(params: NumberSequenceParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }

    pub fn params(&self) -> &NumberSequenceParams {
        &self.params
    }
}

impl Game for NumberSequence {
    type Stimulus = Digits;
    type Response = Vec<u8>;

    fn kind(&self) -> GameKind {
        GameKind::NumberSequence
    }

    fn termination(&self) -> Termination {
        Termination::Lives(self.params.lives)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, level: u32, rng: &mut R) -> Digits {
        let len = self.params.length_for(level);
        Digits((0..len).map(|_| rng.below(10) as u8).collect())
    }

    fn presentation(&self, digits: &Digits, _level: u32) -> Option<Duration> {
        let shown = self.params.per_digit.saturating_mul(digits.len() as u32);
        Some(shown.saturating_add(self.params.display_padding))
    }

    fn inter_trial(&self) -> Duration {
        self.params.feedback
    }

    fn judge(&self, digits: &Digits, _accepted: &[Vec<u8>], answer: &Vec<u8>) -> Verdict {
        if answer.len() != digits.len() {
            Verdict::Rejected
        } else if answer.as_slice() == digits.as_slice() {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    fn score(&self, record: &TrialRecord<Digits, Vec<u8>>) -> Adjustment {
        if record.outcome().is_correct() {
            let len = record.stimulus().len() as i64;
            Adjustment::advance(len.saturating_mul(self.params.points_per_digit))
        } else {
            Adjustment::lose_life()
        }
    }

    fn max_level(&self) -> u32 {
        (self.params.max_length - self.params.base_length + 1) as u32
    }
}
