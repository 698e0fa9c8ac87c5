use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use playlab_lexicon::{DEFAULT_WORDS, WordId, WordPool};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCard {
    pub word: String,
    /// Whether the word was shown earlier in this session.
    pub seen_before: bool,
}

impl Stimulus for WordCard {
    fn describe(&self) -> String {
        self.word.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbalAnswer {
    Seen,
    New,
}

impl VerbalAnswer {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "seen" => Some(Self::Seen),
            "n" | "new" => Some(Self::New),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerbalMemoryParams {
    pub words: Vec<String>,
    /// Chance of re-showing a seen word once any exist.
    pub reshow_probability: f64,
    pub lives: u32,
    #[serde(with = "crate::serde_millis")]
    pub feedback: Duration,
}

impl Default for VerbalMemoryParams {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| w.to_string()).collect(),
            reshow_probability: 0.4,
            lives: 3,
            feedback: Duration::from_millis(400),
        }
    }
}

impl VerbalMemoryParams {
    pub fn sanitized(mut self) -> Self {
        self.words.retain(|w| !w.trim().is_empty());
        if self.words.is_empty() {
            self.words = Self::default().words;
        }
        self.reshow_probability = self.reshow_probability.clamp(0.0, 1.0);
        self.lives = self.lives.max(1);
        self
    }
}

/// Seen-or-new word recognition over a session-scoped word pool.
#[derive(Debug, Clone)]
pub struct VerbalMemory {
    params: VerbalMemoryParams,
    pool: WordPool,
}

impl VerbalMemory {
    pub fn new(params: VerbalMemoryParams) -> Self {
        let params = params.sanitized();
        let pool = WordPool::new(params.words.iter().map(String::as_str));
        Self { params, pool }
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    fn draw<R: RandomSource>(&mut self, rng: &mut R) -> Option<(WordId, bool)> {
        let seen = self.pool.seen_len();
        let fresh = self.pool.fresh_len();
        if seen > 0 && (fresh == 0 || rng.chance(self.params.reshow_probability)) {
            return self.pool.seen_at(rng.below(seen)).map(|id| (id, true));
        }
        self.pool.take_fresh(rng.below(fresh)).map(|id| (id, false))
    }
}

impl Game for VerbalMemory {
    type Stimulus = WordCard;
    type Response = VerbalAnswer;

    fn kind(&self) -> GameKind {
        GameKind::VerbalMemory
    }

    fn termination(&self) -> Termination {
        Termination::Lives(self.params.lives)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, _level: u32, rng: &mut R) -> WordCard {
        let (word, seen_before) = match self.draw(rng) {
            Some((id, seen)) => (self.pool.text(id).map(|a| a.to_string()), seen),
            None => (None, false),
        };
        WordCard {
            word: word.unwrap_or_default(),
            seen_before,
        }
    }

    fn inter_trial(&self) -> Duration {
        self.params.feedback
    }

    fn judge(&self, card: &WordCard, _accepted: &[VerbalAnswer], answer: &VerbalAnswer) -> Verdict {
        let expected = if card.seen_before {
            VerbalAnswer::Seen
        } else {
            VerbalAnswer::New
        };
        if *answer == expected {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    fn score(&self, record: &TrialRecord<WordCard, VerbalAnswer>) -> Adjustment {
        if record.outcome().is_correct() {
            Adjustment::points(1)
        } else {
            Adjustment::lose_life()
        }
    }

    fn max_level(&self) -> u32 {
        1
    }

    fn reset(&mut self) {
        self.pool = WordPool::new(self.params.words.iter().map(String::as_str));
    }
}
