pub mod random;
pub mod state;
pub mod stimulus;
pub mod trial;

pub use random::{RandomSource, RngSource, ScriptedRandom};
pub use state::{SessionStatus, TrialState};
pub use stimulus::Stimulus;
pub use trial::{Outcome, TrialRecord};
