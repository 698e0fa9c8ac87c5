use crate::game::{Adjustment, GameKind, Termination};
use playlab_core::{Outcome, SessionStatus, TrialRecord};
use playlab_timing::Countdown;
use serde::Serialize;
use std::time::Duration;

/// Aggregate of one continuous play-through.
///
/// Only the state machine mutates it. Once terminated it is read-only;
/// playing again needs a new `Session`.
#[derive(Debug, Clone)]
pub struct Session<S, R> {
    kind: GameKind,
    termination: Termination,
    status: SessionStatus,
    trials: Vec<TrialRecord<S, R>>,
    score: u64,
    lives: Option<u32>,
    level: u32,
    countdown: Option<Countdown>,
    started_ns: Option<u64>,
    ended_ns: Option<u64>,
}

impl<S, R> Session<S, R> {
    pub fn new(kind: GameKind, termination: Termination) -> Self {
        let lives = match termination {
            Termination::Lives(n) => Some(n),
            _ => None,
        };
        let countdown = match termination {
            Termination::TimeLimit(limit) => Some(Countdown::new(limit)),
            _ => None,
        };
        Self {
            kind,
            termination,
            status: SessionStatus::NotStarted,
            trials: Vec::new(),
            score: 0,
            lives,
            level: 1,
            countdown,
            started_ns: None,
            ended_ns: None,
        }
    }

    pub(crate) fn begin(&mut self, now_ns: u64) {
        self.status = SessionStatus::Active;
        self.started_ns = Some(now_ns);
        if let Some(c) = &mut self.countdown {
            c.start(now_ns);
        }
    }

    /// Folds one sealed trial into the aggregate.
    pub(crate) fn record(&mut self, record: TrialRecord<S, R>, adj: Adjustment, max_level: u32) {
        self.score = (self.score as i64).saturating_add(adj.points).max(0) as u64;
        if let Some(lives) = &mut self.lives {
            *lives = lives.saturating_add_signed(adj.lives);
        }
        if adj.level_up {
            self.level = (self.level + 1).min(max_level.max(1));
        }
        self.trials.push(record);
    }

    pub(crate) fn terminate(&mut self, now_ns: u64) {
        self.status = SessionStatus::Terminated;
        self.ended_ns = Some(now_ns);
    }

    pub fn should_terminate(&self, now_ns: u64) -> bool {
        match self.termination {
            Termination::Lives(_) => self.lives == Some(0),
            Termination::TimeLimit(_) => self.countdown.is_some_and(|c| c.is_up(now_ns)),
            Termination::TrialCount(n) => self.trials.len() >= n,
            Termination::CorrectCount(n) => self.correct_count() >= n,
        }
    }

    pub fn kind(&self) -> GameKind {
        self.kind
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn trials(&self) -> &[TrialRecord<S, R>] {
        &self.trials
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives_remaining(&self) -> Option<u32> {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn time_remaining(&self, now_ns: u64) -> Option<Duration> {
        self.countdown.map(|c| c.remaining(now_ns))
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.trials.iter().filter(|t| t.outcome() == outcome).count()
    }

    pub fn correct_count(&self) -> usize {
        self.count(Outcome::OnTimeCorrect)
    }

    /// Correct trials over every recorded trial, premature and missed ones
    /// included; 0 when nothing resolved.
    pub fn accuracy(&self) -> f64 {
        if self.trials.is_empty() {
            return 0.0;
        }
        self.correct_count() as f64 / self.trials.len() as f64
    }

    /// Mean latency over on-time trials.
    pub fn mean_latency_ms(&self) -> Option<f64> {
        let times: Vec<f64> = self.trials.iter().filter_map(|t| t.latency_ms()).collect();
        if times.is_empty() {
            return None;
        }
        Some(times.iter().sum::<f64>() / times.len() as f64)
    }

    pub fn best_latency_ms(&self) -> Option<f64> {
        self.trials
            .iter()
            .filter(|t| t.outcome().is_correct())
            .filter_map(|t| t.latency_ms())
            .min_by(|a, b| a.total_cmp(b))
    }

    pub fn duration(&self) -> Option<Duration> {
        match (self.started_ns, self.ended_ns) {
            (Some(s), Some(e)) => Some(Duration::from_nanos(e.saturating_sub(s))),
            _ => None,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            game: self.kind,
            score: self.score,
            accuracy: self.accuracy(),
            mean_latency_ms: self.mean_latency_ms(),
            best_latency_ms: self.best_latency_ms(),
            level_reached: self.level,
            trials: self.trials.len(),
            correct: self.correct_count(),
            incorrect: self.count(Outcome::OnTimeIncorrect),
            premature: self.count(Outcome::Premature),
            missed: self.count(Outcome::Missed),
            lives_remaining: self.lives,
            duration_ms: self.duration().map(|d| d.as_millis() as u64),
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_, S, R> {
        Snapshot {
            summary: self.summary(),
            trials: &self.trials,
        }
    }
}

/// Derived statistics handed to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub game: GameKind,
    pub score: u64,
    pub accuracy: f64,
    pub mean_latency_ms: Option<f64>,
    pub best_latency_ms: Option<f64>,
    pub level_reached: u32,
    pub trials: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub premature: usize,
    pub missed: usize,
    pub lives_remaining: Option<u32>,
    pub duration_ms: Option<u64>,
}

impl Summary {
    pub fn accuracy_percent(&self) -> u32 {
        (self.accuracy * 100.0).round() as u32
    }

    /// Plain-text line for the share action.
    pub fn share_text(&self) -> String {
        let ms = self.mean_latency_ms.map(|v| v.round() as u64).unwrap_or(0);
        let secs = self.duration_ms.unwrap_or(0) as f64 / 1000.0;
        match self.game {
            GameKind::Reaction | GameKind::AudioReaction => format!(
                "I got {}ms on the {}! Can you beat me?",
                ms,
                self.game.title()
            ),
            GameKind::AimTrainer => format!(
                "I scored {} points with {}% accuracy! Can you beat me?",
                self.score,
                self.accuracy_percent()
            ),
            GameKind::Stroop => format!(
                "I got {}% accuracy on the Stroop Test in {:.1}s! Can you beat me?",
                self.accuracy_percent(),
                secs
            ),
            GameKind::NumberSequence => format!(
                "I reached level {} with {} points on Number Sequence! Can you beat me?",
                self.level_reached, self.score
            ),
            GameKind::VisualMemory => format!(
                "I reached level {} with {} points on Visual Memory! Can you beat me?",
                self.level_reached, self.score
            ),
            GameKind::VerbalMemory => format!(
                "I scored {} on the Verbal Memory Test! Can you beat me?",
                self.score
            ),
            GameKind::SimonSays => format!(
                "I reached level {} on Simon Says! Can you beat me?",
                self.score
            ),
            GameKind::ColorPerception => format!(
                "I reached level {} with a score of {} on Color Perception! Can you beat me?",
                self.level_reached, self.score
            ),
            GameKind::ShapeRecognition => format!(
                "I scored {} points on Shape Recognition! Can you beat me?",
                self.score
            ),
            GameKind::TypingSpeed => format!(
                "I scored {} on the Typing Speed Test! Can you beat me?",
                self.score
            ),
            GameKind::MemoryMatch => format!(
                "I matched {} pairs in {} moves on Memory Match! Can you beat me?",
                self.correct, self.trials
            ),
        }
    }
}

/// Summary plus the sealed trials, for export.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a, S, R> {
    #[serde(flatten)]
    pub summary: Summary,
    pub trials: &'a [TrialRecord<S, R>],
}
