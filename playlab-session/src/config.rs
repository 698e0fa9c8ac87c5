use crate::games::{
    AimParams, AudioReactionParams, ColorPerceptionParams, MemoryMatchParams,
    NumberSequenceParams, ReactionParams, ShapeRecognitionParams, SimonParams, StroopParams,
    TypingParams, VerbalMemoryParams, VisualMemoryParams,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid game config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for every game. Any field left out of the file keeps its
/// default, so `{}` is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamesConfig {
    pub reaction: ReactionParams,
    pub audio_reaction: AudioReactionParams,
    pub aim: AimParams,
    pub stroop: StroopParams,
    pub number_sequence: NumberSequenceParams,
    pub visual_memory: VisualMemoryParams,
    pub verbal_memory: VerbalMemoryParams,
    pub simon: SimonParams,
    pub color_perception: ColorPerceptionParams,
    pub shape_recognition: ShapeRecognitionParams,
    pub typing: TypingParams,
    pub memory_match: MemoryMatchParams,
}

impl GamesConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: GamesConfig = serde_json::from_str(s)?;
        Ok(cfg.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded game config");
        Self::from_json_str(&text)
    }

    pub fn sanitized(self) -> Self {
        Self {
            reaction: self.reaction.sanitized(),
            audio_reaction: self.audio_reaction.sanitized(),
            aim: self.aim.sanitized(),
            stroop: self.stroop.sanitized(),
            number_sequence: self.number_sequence.sanitized(),
            visual_memory: self.visual_memory.sanitized(),
            verbal_memory: self.verbal_memory.sanitized(),
            simon: self.simon.sanitized(),
            color_perception: self.color_perception.sanitized(),
            shape_recognition: self.shape_recognition.sanitized(),
            typing: self.typing.sanitized(),
            memory_match: self.memory_match.sanitized(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{AimDifficulty, MAX_GRID_SIDE, MAX_SEQUENCE_LEN};
    use std::time::Duration;

    #[test]
    fn empty_object_is_all_defaults() {
        let cfg = GamesConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, GamesConfig::default().sanitized());
        assert_eq!(cfg.reaction.trials, 5);
        assert_eq!(cfg.audio_reaction.min_delay, Duration::from_millis(2000));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GamesConfig::from_json_str(
            r#"{
                "reaction": { "min_delay": 1500, "trials": 3 },
                "aim": { "difficulty": "hard" },
                "simon": { "max_length": 0 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.reaction.min_delay, Duration::from_millis(1500));
        assert_eq!(cfg.reaction.trials, 3);
        assert_eq!(cfg.reaction.delay_spread, Duration::from_millis(3000));
        assert_eq!(cfg.aim.difficulty, AimDifficulty::Hard);
        assert_eq!(cfg.aim.arena_width, 600.0);
        assert_eq!(cfg.simon.max_length, 1);
    }

    #[test]
    fn oversized_values_are_capped() {
        let cfg = GamesConfig::from_json_str(
            r#"{
                "number_sequence": { "per_digit": 9223372036854775807, "max_length": 1000000 },
                "visual_memory": { "max_side": 4000000000, "display_step": 18446744073709551615 },
                "color_perception": { "base_side": 99999, "max_side": 99999 },
                "shape_recognition": { "max_side": 99999 },
                "simon": { "max_length": 99999999 },
                "memory_match": { "pairs": 500 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.number_sequence.max_length, MAX_SEQUENCE_LEN);
        assert_eq!(cfg.simon.max_length, MAX_SEQUENCE_LEN);
        assert_eq!(cfg.visual_memory.max_side, MAX_GRID_SIDE);
        assert_eq!(cfg.color_perception.base_side, MAX_GRID_SIDE);
        assert_eq!(cfg.color_perception.max_side, MAX_GRID_SIDE);
        assert_eq!(cfg.shape_recognition.max_side, MAX_GRID_SIDE);
        assert_eq!(cfg.memory_match.pairs, 12);
        assert_eq!(cfg.visual_memory.display_for(u32::MAX), cfg.visual_memory.min_display);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let err = GamesConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = GamesConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
