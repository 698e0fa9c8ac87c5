pub mod bank;
pub mod error;
pub mod run;
pub mod scoring;

pub use bank::{Choice, PlateColors, Profile, Question, QuizBank, QuizKind};
pub use error::QuizError;
pub use run::{Progress, QuizRun};
pub use scoring::{
    BalanceBand, ColourVisionBand, DiscTrait, EqBand, LearningStyle, QuizOutcome, StressLevel,
};
