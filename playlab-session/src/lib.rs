pub mod config;
pub mod game;
pub mod games;
pub mod serde_millis;
pub mod session;
pub mod state;
pub mod trial;

pub use config::{ConfigError, GamesConfig};
pub use game::{Adjustment, DEFAULT_MAX_LEVEL, Game, GameKind, Termination, Verdict};
pub use session::{Session, Snapshot, Summary};
pub use state::{InputEffect, SessionError, SessionEvent, SessionMachine};
pub use trial::{Trial, TrialDurations, TrialTimestamps};
