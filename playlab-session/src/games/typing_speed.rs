use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use crate::session::Session;
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const SAMPLE_TEXTS: [&str; 10] = [
    "The quick brown fox jumps over the lazy dog.",
    "Pack my box with five dozen liquor jugs.",
    "How vexingly quick daft zebras jump!",
    "The five boxing wizards jump quickly.",
    "Sphinx of black quartz, judge my vow.",
    "Two driven jocks help fax my big quiz.",
    "The jay, pig, fox, zebra and my wolves quack!",
    "Crazy Frederick bought many very exquisite opal jewels.",
    "We promptly judged antique ivory buckles for the next prize.",
    "A mad boxer shot a quick, gloved jab to the jaw of his dizzy opponent.",
];

/// Text to copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage(pub String);

impl Passage {
    /// Space-separated words, the unit WPM is counted in.
    pub fn word_count(&self) -> usize {
        self.0.split(' ').count()
    }
}

impl Stimulus for Passage {
    fn describe(&self) -> String {
        self.0.clone()
    }
}

/// One submitted attempt at the passage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Typed(pub String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingParams {
    pub passages: Vec<String>,
    pub rounds: usize,
    /// Lower bounds (WPM) for the Professional, Excellent, Good and Average bands.
    pub rating_bands_wpm: [u32; 4],
    #[serde(with = "crate::serde_millis")]
    pub feedback: Duration,
}

impl Default for TypingParams {
    fn default() -> Self {
        Self {
            passages: SAMPLE_TEXTS.iter().map(|s| s.to_string()).collect(),
            rounds: 1,
            rating_bands_wpm: [80, 60, 40, 25],
            feedback: Duration::from_millis(1000),
        }
    }
}

impl TypingParams {
    pub fn sanitized(mut self) -> Self {
        self.passages.retain(|p| !p.trim().is_empty());
        if self.passages.is_empty() {
            self.passages = Self::default().passages;
        }
        self.rounds = self.rounds.max(1);
        self.rating_bands_wpm.sort_unstable_by(|a, b| b.cmp(a));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TypingRating {
    Professional,
    Excellent,
    Good,
    Average,
    KeepPracticing,
}

impl TypingRating {
    pub fn from_wpm(wpm: u32, bands: [u32; 4]) -> Self {
        match bands.iter().position(|&b| wpm >= b) {
            Some(0) => Self::Professional,
            Some(1) => Self::Excellent,
            Some(2) => Self::Good,
            Some(3) => Self::Average,
            _ => Self::KeepPracticing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Professional => "Professional!",
            Self::Excellent => "Excellent!",
            Self::Good => "Good!",
            Self::Average => "Average",
            Self::KeepPracticing => "Keep practicing!",
        }
    }
}

/// Speed and character accuracy of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypingResult {
    pub wpm: u32,
    pub accuracy: u32,
}

impl TypingResult {
    pub fn measure(passage: &Passage, typed: &Typed, elapsed_ms: f64) -> Self {
        Self {
            wpm: words_per_minute(passage.word_count(), elapsed_ms),
            accuracy: char_accuracy(&passage.0, &typed.0),
        }
    }
}

pub fn words_per_minute(words: usize, elapsed_ms: f64) -> u32 {
    if elapsed_ms <= 0.0 {
        return 0;
    }
    (words as f64 / (elapsed_ms / 60_000.0)).round() as u32
}

/// Characters typed in the right position, over the passage length.
/// An empty attempt counts as 100.
pub fn char_accuracy(text: &str, typed: &str) -> u32 {
    let len = text.chars().count();
    if typed.is_empty() || len == 0 {
        return 100;
    }
    let correct = typed
        .chars()
        .zip(text.chars())
        .filter(|(a, b)| a == b)
        .count();
    (correct as f64 / len as f64 * 100.0).round() as u32
}

/// Copy a short passage as fast as possible. The clock runs from the moment
/// the passage appears until the line is submitted.
#[derive(Debug, Clone)]
pub struct TypingSpeed {
    params: TypingParams,
}

impl TypingSpeed {
    pub fn new(params: TypingParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }

    pub fn params(&self) -> &TypingParams {
        &self.params
    }

    pub fn rate(&self, wpm: u32) -> TypingRating {
        TypingRating::from_wpm(wpm, self.params.rating_bands_wpm)
    }

    pub fn result_of(record: &TrialRecord<Passage, Typed>) -> Option<TypingResult> {
        let typed = record.responses().last()?;
        let ms = record.latency_ms()?;
        Some(TypingResult::measure(record.stimulus(), typed, ms))
    }

    /// Mean WPM and accuracy over the attempts that were submitted.
    pub fn session_result(session: &Session<Passage, Typed>) -> Option<TypingResult> {
        let results: Vec<TypingResult> = session.trials().iter().filter_map(Self::result_of).collect();
        if results.is_empty() {
            return None;
        }
        let n = results.len() as f64;
        let mean = |f: fn(&TypingResult) -> u32| {
            (results.iter().map(|r| f(r) as f64).sum::<f64>() / n).round() as u32
        };
        Some(TypingResult {
            wpm: mean(|r| r.wpm),
            accuracy: mean(|r| r.accuracy),
        })
    }
}

impl Game for TypingSpeed {
    type Stimulus = Passage;
    type Response = Typed;

    fn kind(&self) -> GameKind {
        GameKind::TypingSpeed
    }

    fn termination(&self) -> Termination {
        Termination::TrialCount(self.params.rounds)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, _level: u32, rng: &mut R) -> Passage {
        let i = rng.below(self.params.passages.len());
        Passage(self.params.passages[i].clone())
    }

    fn inter_trial(&self) -> Duration {
        self.params.feedback
    }

    fn judge(&self, passage: &Passage, _accepted: &[Typed], typed: &Typed) -> Verdict {
        if typed.0.is_empty() {
            Verdict::Rejected
        } else if typed.0 == passage.0 {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    /// Each attempt scores its rounded WPM.
    fn score(&self, record: &TrialRecord<Passage, Typed>) -> Adjustment {
        match Self::result_of(record) {
            Some(r) => Adjustment::points(r.wpm as i64),
            None => Adjustment::NONE,
        }
    }

    fn max_level(&self) -> u32 {
        1
    }

    fn share_text(&self, session: &Session<Passage, Typed>) -> Option<String> {
        let r = Self::session_result(session)?;
        Some(format!(
            "I typed at {} WPM with {}% accuracy! Can you beat me?",
            r.wpm, r.accuracy
        ))
    }
}
