/// A challenge issued to the player for one trial.
///
/// Stimuli are produced fresh per trial and never mutated after being
/// handed to the state machine.
pub trait Stimulus: Clone + Send + Sync + std::fmt::Debug {
    /// Short form used in logs and exported trial records.
    fn describe(&self) -> String;

    /// Number of inputs a complete answer takes. Single-shot trials use 1.
    fn recall_len(&self) -> usize {
        1
    }
}
