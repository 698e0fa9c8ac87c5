pub mod countdown;
pub mod oneshot;
pub mod timer;

pub use countdown::Countdown;
pub use oneshot::{TimerId, TrialTimer};
pub use timer::{Clock, ManualClock, MonotonicClock};
