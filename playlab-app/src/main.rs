mod app;
mod cli;
mod console;
mod input;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Commands};
use playlab_quiz::QuizKind;
use playlab_session::GameKind;
use tracing_subscriber::EnvFilter;

use app::App;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout is the game screen; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::List => {
            app::print_catalogue();
            Ok(())
        }
        Commands::Play {
            game,
            difficulty,
            config,
            seed,
            json,
        } => {
            let Some(kind) = GameKind::from_slug(&game) else {
                bail!("unknown game '{game}'; run `playlab list` to see the games");
            };
            let mut app = App::new(config.as_deref(), seed)?;
            app.play(kind, difficulty.as_deref(), json.as_deref())
        }
        Commands::Quiz { quiz } => {
            let Some(kind) = QuizKind::from_slug(&quiz) else {
                bail!("unknown quiz '{quiz}'; run `playlab list` to see the quizzes");
            };
            let mut app = App::new(None, None)?;
            app.quiz(kind)
        }
    }
}
