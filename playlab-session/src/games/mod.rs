pub mod aim;
pub mod color_perception;
pub mod memory_match;
pub mod number_sequence;
pub mod reaction;
pub mod shape_recognition;
pub mod simon;
pub mod stroop;
pub mod typing_speed;
pub mod verbal_memory;
pub mod visual_memory;

pub use aim::{AimDifficulty, AimParams, AimTrainer, Click, Target};
pub use color_perception::{ColorGrid, ColorPerception, ColorPerceptionParams, Hsl};
pub use memory_match::{Board, MemoryMatch, MemoryMatchParams};
pub use number_sequence::{Digits, NumberSequence, NumberSequenceParams};
pub use reaction::{AudioReactionParams, Modality, Press, Rating, ReactionParams, ReactionTest, Signal};
pub use shape_recognition::{Shape, ShapeGrid, ShapeRecognition, ShapeRecognitionParams};
pub use simon::{Direction, SimonParams, SimonSays, SimonSequence};
pub use stroop::{InkColor, StroopParams, StroopTest, StroopWord};
pub use typing_speed::{Passage, Typed, TypingParams, TypingRating, TypingResult, TypingSpeed};
pub use verbal_memory::{VerbalAnswer, VerbalMemory, VerbalMemoryParams, WordCard};
pub use visual_memory::{Pattern, VisualMemory, VisualMemoryParams};

/// Largest board any grid game will build, whatever the config says.
pub const MAX_GRID_SIDE: u32 = 12;

/// Longest digit or direction sequence a game will build.
pub const MAX_SEQUENCE_LEN: usize = 200;

/// Side length of a square board that grows by one every `step` levels.
pub(crate) fn grid_side(level: u32, base: u32, step: u32, max: u32) -> u32 {
    let grown = base.saturating_add(level / step.max(1));
    grown.min(max.max(base))
}
