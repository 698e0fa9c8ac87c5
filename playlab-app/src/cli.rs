use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "playlab")]
#[command(about = "Reaction, memory and perception mini-games in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play one game session.
    Play {
        /// Game slug, e.g. `reaction` or `visual-memory`.
        game: String,
        /// Preset for the aim trainer or memory match.
        #[arg(long, value_parser = ["easy", "medium", "hard"])]
        difficulty: Option<String>,
        /// JSON file overriding game parameters.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Seed for a reproducible session.
        #[arg(long)]
        seed: Option<u64>,
        /// Write the summary and trial records here when the session ends.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Take a self-scored questionnaire.
    Quiz {
        /// Quiz slug, e.g. `mbti` or `learning-style`.
        quiz: String,
    },
    /// List games and quizzes.
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_play_flags() {
        let cli = Cli::try_parse_from([
            "playlab",
            "play",
            "aim-trainer",
            "--difficulty",
            "hard",
            "--seed",
            "7",
        ])
        .unwrap();
        match cli.command {
            Commands::Play {
                game,
                difficulty,
                seed,
                json,
                ..
            } => {
                assert_eq!(game, "aim-trainer");
                assert_eq!(difficulty.as_deref(), Some("hard"));
                assert_eq!(seed, Some(7));
                assert!(json.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["playlab", "play", "aim-trainer", "--difficulty", "insane"]).is_err());
    }
}
