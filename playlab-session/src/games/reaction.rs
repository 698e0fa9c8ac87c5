use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Visual,
    Audio,
}

/// "Go" cue. Shown as a colour change or played as a beep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub modality: Modality,
}

impl Stimulus for Signal {
    fn describe(&self) -> String {
        match self.modality {
            Modality::Visual => "green light".to_string(),
            Modality::Audio => "800 Hz beep".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Press;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionParams {
    #[serde(with = "crate::serde_millis")]
    pub min_delay: Duration,
    #[serde(with = "crate::serde_millis")]
    pub delay_spread: Duration,
    pub trials: usize,
    #[serde(with = "crate::serde_millis::option")]
    pub response_window: Option<Duration>,
    #[serde(with = "crate::serde_millis")]
    pub inter_trial: Duration,
    /// Upper bounds (ms) for the Incredible, Excellent, Great and Good bands.
    pub rating_bands_ms: [u64; 4],
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(1000),
            delay_spread: Duration::from_millis(3000),
            trials: 5,
            response_window: None,
            inter_trial: Duration::from_millis(1000),
            rating_bands_ms: [200, 250, 300, 350],
        }
    }
}

impl ReactionParams {
    pub fn sanitized(mut self) -> Self {
        self.trials = self.trials.max(1);
        self.rating_bands_ms.sort_unstable();
        self
    }
}

/// Same knobs as [`ReactionParams`] with the audio test's constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioReactionParams {
    #[serde(with = "crate::serde_millis")]
    pub min_delay: Duration,
    #[serde(with = "crate::serde_millis")]
    pub delay_spread: Duration,
    pub trials: usize,
    #[serde(with = "crate::serde_millis::option")]
    pub response_window: Option<Duration>,
    #[serde(with = "crate::serde_millis")]
    pub inter_trial: Duration,
    pub rating_bands_ms: [u64; 4],
}

impl Default for AudioReactionParams {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(2000),
            delay_spread: Duration::from_millis(3000),
            trials: 5,
            response_window: None,
            inter_trial: Duration::from_millis(1000),
            rating_bands_ms: [180, 220, 280, 350],
        }
    }
}

impl AudioReactionParams {
    pub fn sanitized(mut self) -> Self {
        self.trials = self.trials.max(1);
        self.rating_bands_ms.sort_unstable();
        self
    }
}

impl From<AudioReactionParams> for ReactionParams {
    fn from(p: AudioReactionParams) -> Self {
        Self {
            min_delay: p.min_delay,
            delay_spread: p.delay_spread,
            trials: p.trials,
            response_window: p.response_window,
            inter_trial: p.inter_trial,
            rating_bands_ms: p.rating_bands_ms,
        }
    }
}

fn whole_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rating {
    Incredible,
    Excellent,
    Great,
    Good,
    KeepPracticing,
}

impl Rating {
    pub fn from_latency(latency_ms: f64, bands: [u64; 4]) -> Self {
        let idx = bands
            .iter()
            .position(|&b| latency_ms < b as f64)
            .unwrap_or(bands.len());
        match idx {
            0 => Self::Incredible,
            1 => Self::Excellent,
            2 => Self::Great,
            3 => Self::Good,
            _ => Self::KeepPracticing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Incredible => "Incredible!",
            Self::Excellent => "Excellent!",
            Self::Great => "Great!",
            Self::Good => "Good",
            Self::KeepPracticing => "Keep practicing!",
        }
    }
}

/// Wait for a randomly delayed cue, then respond as fast as possible.
/// Responding during the wait is premature.
#[derive(Debug, Clone)]
pub struct ReactionTest {
    modality: Modality,
    params: ReactionParams,
}

impl ReactionTest {
    pub fn visual(params: ReactionParams) -> Self {
        Self {
            modality: Modality::Visual,
            params: params.sanitized(),
        }
    }

    pub fn audio(params: AudioReactionParams) -> Self {
        Self {
            modality: Modality::Audio,
            params: ReactionParams::from(params).sanitized(),
        }
    }

    pub fn params(&self) -> &ReactionParams {
        &self.params
    }

    pub fn rate(&self, latency_ms: f64) -> Rating {
        Rating::from_latency(latency_ms, self.params.rating_bands_ms)
    }
}

impl Game for ReactionTest {
    type Stimulus = Signal;
    type Response = Press;

    fn kind(&self) -> GameKind {
        match self.modality {
            Modality::Visual => GameKind::Reaction,
            Modality::Audio => GameKind::AudioReaction,
        }
    }

    fn termination(&self) -> Termination {
        Termination::TrialCount(self.params.trials)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, _level: u32, _rng: &mut R) -> Signal {
        Signal {
            modality: self.modality,
        }
    }

    fn arming_delay<R: RandomSource>(&mut self, _trial: usize, _level: u32, rng: &mut R) -> Duration {
        let lo = whole_millis(self.params.min_delay);
        let hi = lo.saturating_add(whole_millis(self.params.delay_spread));
        Duration::from_millis(rng.between(lo, hi))
    }

    fn penalizes_early_input(&self) -> bool {
        true
    }

    fn response_window(&self) -> Option<Duration> {
        self.params.response_window
    }

    fn inter_trial(&self) -> Duration {
        self.params.inter_trial
    }

    fn judge(&self, _stimulus: &Signal, _accepted: &[Press], _response: &Press) -> Verdict {
        Verdict::Correct
    }

    fn score(&self, _record: &TrialRecord<Signal, Press>) -> Adjustment {
        Adjustment::NONE
    }

    fn max_level(&self) -> u32 {
        1
    }
}
