use crate::session::Session;
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

/// Level cap applied when a game does not set its own.
pub const DEFAULT_MAX_LEVEL: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameKind {
    Reaction,
    AudioReaction,
    AimTrainer,
    Stroop,
    NumberSequence,
    VisualMemory,
    VerbalMemory,
    SimonSays,
    ColorPerception,
    ShapeRecognition,
    TypingSpeed,
    MemoryMatch,
}

impl GameKind {
    pub const ALL: [GameKind; 12] = [
        GameKind::Reaction,
        GameKind::AudioReaction,
        GameKind::AimTrainer,
        GameKind::Stroop,
        GameKind::NumberSequence,
        GameKind::VisualMemory,
        GameKind::VerbalMemory,
        GameKind::SimonSays,
        GameKind::ColorPerception,
        GameKind::ShapeRecognition,
        GameKind::TypingSpeed,
        GameKind::MemoryMatch,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Reaction => "Reaction Time Test",
            Self::AudioReaction => "Audio Reaction Time Test",
            Self::AimTrainer => "Aim Trainer",
            Self::Stroop => "Stroop Test",
            Self::NumberSequence => "Number Sequence",
            Self::VisualMemory => "Visual Memory",
            Self::VerbalMemory => "Verbal Memory Test",
            Self::SimonSays => "Simon Says",
            Self::ColorPerception => "Color Perception",
            Self::ShapeRecognition => "Shape Recognition",
            Self::TypingSpeed => "Typing Speed Test",
            Self::MemoryMatch => "Memory Match",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Reaction => "reaction",
            Self::AudioReaction => "audio-reaction",
            Self::AimTrainer => "aim-trainer",
            Self::Stroop => "stroop",
            Self::NumberSequence => "number-sequence",
            Self::VisualMemory => "visual-memory",
            Self::VerbalMemory => "verbal-memory",
            Self::SimonSays => "simon-says",
            Self::ColorPerception => "color-perception",
            Self::ShapeRecognition => "shape-recognition",
            Self::TypingSpeed => "typing-speed",
            Self::MemoryMatch => "memory-match",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.slug() == slug)
    }
}

/// The one stopping condition a game variant uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Lives(u32),
    TimeLimit(Duration),
    TrialCount(usize),
    /// Stop after this many correct trials (e.g. "hit 20 targets").
    CorrectCount(usize),
}

/// Judgement of one input against the live stimulus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// A correct partial recall; more inputs are needed.
    Continue,
    /// Valid but meaningless here, e.g. re-selecting a chosen cell.
    Ignored,
    /// Fails a shape precondition, e.g. an answer of the wrong length.
    Rejected,
}

/// Effect of one sealed trial on the session aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Adjustment {
    pub points: i64,
    pub lives: i32,
    pub level_up: bool,
}

impl Adjustment {
    pub const NONE: Adjustment = Adjustment {
        points: 0,
        lives: 0,
        level_up: false,
    };

    pub fn points(points: i64) -> Self {
        Self {
            points,
            ..Self::NONE
        }
    }

    pub fn advance(points: i64) -> Self {
        Self {
            points,
            level_up: true,
            ..Self::NONE
        }
    }

    pub fn lose_life() -> Self {
        Self {
            lives: -1,
            ..Self::NONE
        }
    }
}

/// Per-game hooks plugged into [`crate::SessionMachine`].
///
/// A game owns its parameters and any generator state that spans trials
/// (a growing Simon sequence, the verbal-memory word pool). It never sees
/// the session aggregate while generating.
pub trait Game {
    type Stimulus: Stimulus + Serialize;
    type Response: Clone + Debug + PartialEq + Serialize;

    fn kind(&self) -> GameKind;

    fn termination(&self) -> Termination;

    fn generate_stimulus<R: RandomSource>(&mut self, level: u32, rng: &mut R) -> Self::Stimulus;

    /// Wait between arming and stimulus onset. Zero shows the stimulus at once.
    fn arming_delay<R: RandomSource>(
        &mut self,
        _trial_index: usize,
        _level: u32,
        _rng: &mut R,
    ) -> Duration {
        Duration::ZERO
    }

    /// Whether input during the arming wait resolves the trial as premature.
    /// Otherwise such input is ignored.
    fn penalizes_early_input(&self) -> bool {
        false
    }

    /// `Some` splits the active phase into presenting then recalling.
    fn presentation(&self, _stimulus: &Self::Stimulus, _level: u32) -> Option<Duration> {
        None
    }

    /// Time allowed for an answer once input opens. Expiry is a miss.
    fn response_window(&self) -> Option<Duration> {
        None
    }

    /// Pause between a resolved trial and arming the next one.
    fn inter_trial(&self) -> Duration {
        Duration::ZERO
    }

    fn judge(
        &self,
        stimulus: &Self::Stimulus,
        accepted: &[Self::Response],
        response: &Self::Response,
    ) -> Verdict;

    /// Sees every sealed trial before it is scored, for games whose board
    /// outlives a single trial.
    fn on_resolved(&mut self, _record: &TrialRecord<Self::Stimulus, Self::Response>) {}

    fn score(&self, record: &TrialRecord<Self::Stimulus, Self::Response>) -> Adjustment;

    /// Replaces the generic share line, for results the summary cannot express.
    fn share_text(&self, _session: &Session<Self::Stimulus, Self::Response>) -> Option<String> {
        None
    }

    fn max_level(&self) -> u32 {
        DEFAULT_MAX_LEVEL
    }

    /// Clears cross-trial generator state before a fresh session.
    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_slug(kind.slug()), Some(kind));
        }
        assert_eq!(GameKind::from_slug("tetris"), None);
    }

    #[test]
    fn adjustment_helpers() {
        assert!(Adjustment::advance(30).level_up);
        assert!(!Adjustment::points(5).level_up);
        assert_eq!(Adjustment::lose_life().lives, -1);
        assert_eq!(Adjustment::points(-25).points, -25);
        assert_eq!(Adjustment::default(), Adjustment::NONE);
    }
}
