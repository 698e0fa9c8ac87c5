use serde::{Deserialize, Serialize};

/// Lifecycle of one play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    Active,
    Terminated,
}

impl SessionStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, Self::Terminated)
    }
}

/// States of a single trial once the session is running.
///
/// `Armed` waits on the trial timer; an input there is premature.
/// `Active` is a single-shot stimulus window. Sequence games replace it
/// with `Presenting` (no input) followed by `Recalling`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialState {
    Armed,
    Active,
    Presenting,
    Recalling,
    Resolved,
}

impl TrialState {
    pub fn allows_input(&self) -> bool {
        matches!(self, Self::Armed | Self::Active | Self::Recalling)
    }

    /// True once the stimulus is perceivable and latency is being measured.
    pub fn is_measuring(&self) -> bool {
        matches!(self, Self::Active | Self::Recalling)
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}
