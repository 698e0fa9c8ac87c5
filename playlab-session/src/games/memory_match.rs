use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use crate::session::Session;
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CARD_FACES: [&str; 12] = [
    "🍎", "🍌", "🍒", "🍇", "🍋", "🥭", "🍊", "🍓", "🍉", "🥝", "🍍", "🍑",
];

/// The table as the player sees it at the start of a move: which face
/// sits where and which pairs are already off the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub faces: Vec<u8>,
    pub matched: Vec<bool>,
}

impl Board {
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn face(&self, index: usize) -> Option<&'static str> {
        self.faces.get(index).map(|&f| CARD_FACES[f as usize % CARD_FACES.len()])
    }

    pub fn pairs_left(&self) -> usize {
        self.matched.iter().filter(|m| !**m).count() / 2
    }
}

impl Stimulus for Board {
    fn describe(&self) -> String {
        format!("{} cards, {} pairs left", self.len(), self.pairs_left())
    }

    fn recall_len(&self) -> usize {
        2
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryMatchParams {
    pub pairs: usize,
    /// How long a turned pair stays face up before the next move.
    #[serde(with = "crate::serde_millis")]
    pub flip_back: Duration,
}

impl Default for MemoryMatchParams {
    fn default() -> Self {
        Self {
            pairs: 6,
            flip_back: Duration::from_millis(1000),
        }
    }
}

impl MemoryMatchParams {
    pub fn sanitized(mut self) -> Self {
        self.pairs = self.pairs.clamp(2, CARD_FACES.len());
        self
    }
}

/// Classic pairs: each move turns two cards, a match takes them off the
/// table. Ends once every pair is found; moves and time are the result.
#[derive(Debug, Clone)]
pub struct MemoryMatch {
    params: MemoryMatchParams,
    faces: Vec<u8>,
    matched: Vec<bool>,
}

impl MemoryMatch {
    pub fn new(params: MemoryMatchParams) -> Self {
        Self {
            params: params.sanitized(),
            faces: Vec::new(),
            matched: Vec::new(),
        }
    }

    pub fn params(&self) -> &MemoryMatchParams {
        &self.params
    }

    fn deal<R: RandomSource>(&mut self, rng: &mut R) {
        let mut faces: Vec<u8> = (0..self.params.pairs as u8).flat_map(|f| [f, f]).collect();
        for i in (1..faces.len()).rev() {
            faces.swap(i, rng.below(i + 1));
        }
        self.matched = vec![false; faces.len()];
        self.faces = faces;
    }
}

impl Game for MemoryMatch {
    type Stimulus = Board;
    type Response = usize;

    fn kind(&self) -> GameKind {
        GameKind::MemoryMatch
    }

    fn termination(&self) -> Termination {
        Termination::CorrectCount(self.params.pairs)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, _level: u32, rng: &mut R) -> Board {
        if self.faces.is_empty() {
            self.deal(rng);
        }
        Board {
            faces: self.faces.clone(),
            matched: self.matched.clone(),
        }
    }

    fn inter_trial(&self) -> Duration {
        self.params.flip_back
    }

    fn judge(&self, board: &Board, accepted: &[usize], card: &usize) -> Verdict {
        let Some(&face) = board.faces.get(*card) else {
            return Verdict::Rejected;
        };
        if board.matched[*card] || accepted.contains(card) {
            return Verdict::Ignored;
        }
        match accepted.first() {
            None => Verdict::Continue,
            Some(&first) if board.faces[first] == face => Verdict::Correct,
            Some(_) => Verdict::Incorrect,
        }
    }

    fn on_resolved(&mut self, record: &TrialRecord<Board, usize>) {
        if record.outcome().is_correct() {
            for &card in record.responses() {
                if let Some(m) = self.matched.get_mut(card) {
                    *m = true;
                }
            }
        }
    }

    fn score(&self, _record: &TrialRecord<Board, usize>) -> Adjustment {
        Adjustment::NONE
    }

    fn max_level(&self) -> u32 {
        1
    }

    fn reset(&mut self) {
        self.faces.clear();
        self.matched.clear();
    }

    fn share_text(&self, session: &Session<Board, usize>) -> Option<String> {
        if session.correct_count() < self.params.pairs {
            return None;
        }
        let secs = session.duration()?.as_secs_f64();
        Some(format!(
            "I completed Memory Match ({} pairs) in {} moves and {:.1}s! Can you beat me?",
            self.params.pairs,
            session.trials().len(),
            secs
        ))
    }
}
