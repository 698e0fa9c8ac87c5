use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InkColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

impl InkColor {
    pub const ALL: [InkColor; 6] = [
        InkColor::Red,
        InkColor::Blue,
        InkColor::Green,
        InkColor::Yellow,
        InkColor::Purple,
        InkColor::Orange,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Blue => "BLUE",
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Purple => "PURPLE",
            Self::Orange => "ORANGE",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            Self::Red => "#ef4444",
            Self::Blue => "#3b82f6",
            Self::Green => "#22c55e",
            Self::Yellow => "#eab308",
            Self::Purple => "#a855f7",
            Self::Orange => "#f97316",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s) || c.name()[..1].eq_ignore_ascii_case(s))
    }
}

/// A colour word printed in an ink colour. The answer is the ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StroopWord {
    pub word: InkColor,
    pub ink: InkColor,
}

impl StroopWord {
    pub fn is_congruent(&self) -> bool {
        self.word == self.ink
    }
}

impl Stimulus for StroopWord {
    fn describe(&self) -> String {
        format!("{} in {} ink", self.word.name(), self.ink.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StroopParams {
    pub rounds: usize,
    pub mismatch_probability: f64,
    #[serde(with = "crate::serde_millis")]
    pub feedback: Duration,
}

impl Default for StroopParams {
    fn default() -> Self {
        Self {
            rounds: 20,
            mismatch_probability: 0.7,
            feedback: Duration::from_millis(300),
        }
    }
}

impl StroopParams {
    pub fn sanitized(mut self) -> Self {
        self.rounds = self.rounds.max(1);
        self.mismatch_probability = self.mismatch_probability.clamp(0.0, 1.0);
        self
    }
}

#[derive(Debug, Clone)]
pub struct StroopTest {
    params: StroopParams,
}

impl StroopTest {
    pub fn new(params: StroopParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }
}

impl Game for StroopTest {
    type Stimulus = StroopWord;
    type Response = InkColor;

    fn kind(&self) -> GameKind {
        GameKind::Stroop
    }

    fn termination(&self) -> Termination {
        Termination::TrialCount(self.params.rounds)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, _level: u32, rng: &mut R) -> StroopWord {
        let word = InkColor::ALL[rng.below(InkColor::ALL.len())];
        let mut ink = InkColor::ALL[rng.below(InkColor::ALL.len())];
        if ink == word && rng.chance(self.params.mismatch_probability) {
            let others: Vec<InkColor> = InkColor::ALL.into_iter().filter(|c| *c != word).collect();
            ink = others[rng.below(others.len())];
        }
        StroopWord { word, ink }
    }

    fn inter_trial(&self) -> Duration {
        self.params.feedback
    }

    fn judge(&self, stimulus: &StroopWord, _accepted: &[InkColor], answer: &InkColor) -> Verdict {
        if *answer == stimulus.ink {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    fn score(&self, record: &TrialRecord<StroopWord, InkColor>) -> Adjustment {
        if record.outcome().is_correct() {
            Adjustment::points(1)
        } else {
            Adjustment::NONE
        }
    }

    fn max_level(&self) -> u32 {
        1
    }
}
