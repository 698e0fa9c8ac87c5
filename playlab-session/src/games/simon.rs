use super::MAX_SEQUENCE_LEN;
use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub fn arrow(&self) -> char {
        match self {
            Self::Up => '↑',
            Self::Right => '→',
            Self::Down => '↓',
            Self::Left => '←',
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "up" | "w" => Some(Self::Up),
            "r" | "right" | "d" => Some(Self::Right),
            "down" | "s" => Some(Self::Down),
            "l" | "left" | "a" => Some(Self::Left),
            _ => None,
        }
    }
}

/// The whole sequence so far; each round replays it with one more step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimonSequence(pub Vec<Direction>);

impl Stimulus for SimonSequence {
    fn describe(&self) -> String {
        self.0.iter().map(Direction::arrow).collect()
    }

    fn recall_len(&self) -> usize {
        self.0.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimonParams {
    pub max_length: usize,
    #[serde(with = "crate::serde_millis")]
    pub flash: Duration,
    #[serde(with = "crate::serde_millis")]
    pub gap: Duration,
    pub lives: u32,
    #[serde(with = "crate::serde_millis")]
    pub between_rounds: Duration,
}

impl Default for SimonParams {
    fn default() -> Self {
        Self {
            max_length: 50,
            flash: Duration::from_millis(300),
            gap: Duration::from_millis(400),
            lives: 1,
            between_rounds: Duration::from_millis(800),
        }
    }
}

impl SimonParams {
    pub fn sanitized(mut self) -> Self {
        self.max_length = self.max_length.clamp(1, MAX_SEQUENCE_LEN);
        self.lives = self.lives.max(1);
        self
    }
}

#[derive(Debug, Clone)]
pub struct SimonSays {
    params: SimonParams,
    sequence: Vec<Direction>,
}

impl SimonSays {
    pub fn new(params: SimonParams) -> Self {
        Self {
            params: params.sanitized(),
            sequence: Vec::new(),
        }
    }

    pub fn sequence(&self) -> &[Direction] {
        &self.sequence
    }
}

impl Game for SimonSays {
    type Stimulus = SimonSequence;
    type Response = Direction;

    fn kind(&self) -> GameKind {
        GameKind::SimonSays
    }

    fn termination(&self) -> Termination {
        Termination::Lives(self.params.lives)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, level: u32, rng: &mut R) -> SimonSequence {
        let target = (level.max(1) as usize).min(self.params.max_length);
        while self.sequence.len() < target {
            self.sequence.push(Direction::ALL[rng.below(Direction::ALL.len())]);
        }
        SimonSequence(self.sequence[..target].to_vec())
    }

    fn presentation(&self, seq: &SimonSequence, _level: u32) -> Option<Duration> {
        let step = self.params.flash.saturating_add(self.params.gap);
        Some(step.saturating_mul(seq.0.len() as u32))
    }

    fn inter_trial(&self) -> Duration {
        self.params.between_rounds
    }

    fn judge(&self, seq: &SimonSequence, accepted: &[Direction], step: &Direction) -> Verdict {
        match seq.0.get(accepted.len()) {
            Some(expected) if expected != step => Verdict::Incorrect,
            Some(_) if accepted.len() + 1 == seq.0.len() => Verdict::Correct,
            Some(_) => Verdict::Continue,
            None => Verdict::Ignored,
        }
    }

    fn score(&self, record: &TrialRecord<SimonSequence, Direction>) -> Adjustment {
        if record.outcome().is_correct() {
            Adjustment::advance(1)
        } else {
            Adjustment::lose_life()
        }
    }

    fn max_level(&self) -> u32 {
        self.params.max_length as u32
    }

    fn reset(&mut self) {
        self.sequence.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playlab_core::ScriptedRandom;

    #[test]
    fn sequence_grows_by_one_and_keeps_prefix() {
        let mut g = SimonSays::new(SimonParams::default());
        let mut rng = ScriptedRandom::new([0.0, 0.5, 0.75]);
        let first = g.generate_stimulus(1, &mut rng);
        assert_eq!(first.0, vec![Direction::Up]);
        let second = g.generate_stimulus(2, &mut rng);
        assert_eq!(second.0, vec![Direction::Up, Direction::Down]);
        assert_eq!(g.presentation(&second, 2), Some(Duration::from_millis(1400)));

        g.reset();
        assert!(g.sequence().is_empty());
    }

    #[test]
    fn recall_is_checked_step_by_step() {
        let g = SimonSays::new(SimonParams::default());
        let seq = SimonSequence(vec![Direction::Left, Direction::Up]);
        assert_eq!(g.judge(&seq, &[], &Direction::Left), Verdict::Continue);
        assert_eq!(g.judge(&seq, &[Direction::Left], &Direction::Up), Verdict::Correct);
        assert_eq!(g.judge(&seq, &[], &Direction::Down), Verdict::Incorrect);
    }

    #[test]
    fn parses_keys() {
        assert_eq!(Direction::parse("W"), Some(Direction::Up));
        assert_eq!(Direction::parse("left"), Some(Direction::Left));
        assert_eq!(Direction::parse("x"), None);
    }
}
