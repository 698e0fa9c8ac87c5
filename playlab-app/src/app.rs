use crate::console::{CLEAR, ConsoleGame, render_plate};
use crate::input::{Input, InputPump};
use anyhow::{Context, Result};
use playlab_core::{Outcome, RngSource};
use playlab_quiz::{QuizBank, QuizKind, QuizOutcome, QuizRun};
use playlab_session::games::{
    AimDifficulty, AimTrainer, ColorPerception, MemoryMatch, NumberSequence, ReactionTest,
    ShapeRecognition, SimonSays, StroopTest, TypingSpeed, VerbalMemory, VisualMemory,
};
use playlab_session::{GameKind, GamesConfig, InputEffect, SessionEvent, SessionMachine, Summary};
use playlab_timing::{Clock, MonotonicClock};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Pacing of the session loop.
const TICK: Duration = Duration::from_millis(2);

type Machine<G> = SessionMachine<G, MonotonicClock, RngSource<StdRng>>;

pub struct App {
    config: GamesConfig,
    seed: Option<u64>,
    clock: MonotonicClock,
    input: InputPump,
}

impl App {
    pub fn new(config: Option<&Path>, seed: Option<u64>) -> Result<Self> {
        let config = match config {
            Some(path) => GamesConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GamesConfig::default(),
        };
        Ok(Self {
            config,
            seed,
            clock: MonotonicClock::new(),
            input: InputPump::spawn(),
        })
    }

    fn rng(&self) -> RngSource<StdRng> {
        match self.seed {
            Some(seed) => {
                info!(seed, "seeded session");
                RngSource(StdRng::seed_from_u64(seed))
            }
            None => RngSource(StdRng::from_os_rng()),
        }
    }

    pub fn play(&mut self, kind: GameKind, difficulty: Option<&str>, json: Option<&Path>) -> Result<()> {
        if difficulty.is_some() && !matches!(kind, GameKind::AimTrainer | GameKind::MemoryMatch) {
            warn!(game = kind.slug(), "--difficulty only applies to the aim trainer and memory match");
        }
        let cfg = self.config.clone();
        match kind {
            GameKind::Reaction => self.run_session(ReactionTest::visual(cfg.reaction), json),
            GameKind::AudioReaction => {
                self.run_session(ReactionTest::audio(cfg.audio_reaction), json)
            }
            GameKind::AimTrainer => {
                let mut params = cfg.aim;
                params.difficulty = match difficulty {
                    Some("easy") => AimDifficulty::Easy,
                    Some("hard") => AimDifficulty::Hard,
                    Some(_) => AimDifficulty::Medium,
                    None => params.difficulty,
                };
                self.run_session(AimTrainer::new(params), json)
            }
            GameKind::Stroop => self.run_session(StroopTest::new(cfg.stroop), json),
            GameKind::NumberSequence => {
                self.run_session(NumberSequence::new(cfg.number_sequence), json)
            }
            GameKind::VisualMemory => self.run_session(VisualMemory::new(cfg.visual_memory), json),
            GameKind::VerbalMemory => self.run_session(VerbalMemory::new(cfg.verbal_memory), json),
            GameKind::SimonSays => self.run_session(SimonSays::new(cfg.simon), json),
            GameKind::ColorPerception => {
                self.run_session(ColorPerception::new(cfg.color_perception), json)
            }
            GameKind::ShapeRecognition => {
                self.run_session(ShapeRecognition::new(cfg.shape_recognition), json)
            }
            GameKind::TypingSpeed => self.run_session(TypingSpeed::new(cfg.typing), json),
            GameKind::MemoryMatch => {
                let mut params = cfg.memory_match;
                if let Some(pairs) = difficulty.and_then(memory_pairs) {
                    params.pairs = pairs;
                }
                self.run_session(MemoryMatch::new(params), json)
            }
        }
    }

    fn run_session<G: ConsoleGame>(&mut self, game: G, json: Option<&Path>) -> Result<()> {
        let kind = game.kind();
        println!("=== {} ===", kind.title());
        println!("{}", game.instructions());
        println!("Type `q` to quit.\n");

        let mut machine: Machine<G> = SessionMachine::new(game, self.clock.clone(), self.rng());
        machine.start()?;
        loop {
            let quit = self.drive(&mut machine);
            self.report(&machine, json)?;
            if quit || !self.confirm("\nPlay again? [y/N]") {
                return Ok(());
            }
            let finished = machine.replay()?;
            info!(game = kind.slug(), score = finished.score(), "replaying");
            println!();
            machine.start()?;
        }
    }

    /// Runs the session until it terminates. True when the player quit.
    fn drive<G: ConsoleGame>(&mut self, machine: &mut Machine<G>) -> bool {
        let mut quit = false;
        loop {
            for event in machine.update() {
                present(machine, &event);
            }
            if machine.status().is_terminated() {
                return quit;
            }
            match self.input.try_next() {
                Some(Input::Line(line)) => {
                    if matches!(line.trim(), "q" | "quit") {
                        quit = true;
                        machine.teardown();
                        continue;
                    }
                    handle_line(machine, &line);
                }
                Some(Input::Closed) => {
                    quit = true;
                    machine.teardown();
                }
                None => {
                    let nap = machine.next_wake_in().map_or(TICK, |d| d.min(TICK));
                    self.clock.sleep(nap);
                }
            }
        }
    }

    fn report<G: ConsoleGame>(&self, machine: &Machine<G>, json: Option<&Path>) -> Result<()> {
        let summary = machine.summary();
        print_summary(&summary);
        if let Some(line) = machine.game().verdict_line(&summary) {
            println!("{line}");
        }
        println!("\n{}", machine.share_text());

        if let Some(path) = json {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut out, &machine.snapshot())?;
            out.flush()?;
            println!("Saved results to {}", path.display());
        }
        Ok(())
    }

    fn confirm(&self, prompt: &str) -> bool {
        println!("{prompt}");
        match self.input.next_blocking() {
            Input::Line(line) => is_yes(&line),
            Input::Closed => false,
        }
    }

    pub fn quiz(&mut self, kind: QuizKind) -> Result<()> {
        let bank = QuizBank::load(kind)?;
        println!("=== {} ===", bank.title);
        println!("Answer with the option number. Type `q` to quit.\n");
        let mut run = QuizRun::new(bank);

        while let Some((question, options)) = run.current() {
            let progress = run.progress();
            println!("Question {} of {}", progress.answered + 1, progress.total);
            println!("{}", question.text);
            if let Some(colors) = &question.colors {
                let numeral = question.expected.as_deref().unwrap_or_default();
                match render_plate(numeral, &colors.background, &colors.foreground) {
                    Some(plate) => println!("{plate}"),
                    None => warn!(numeral, "plate colours did not parse"),
                }
            }
            if let Some(note) = &question.note {
                println!("({note})");
            }
            for (i, choice) in options.iter().enumerate() {
                println!("  {}. {}", i + 1, choice.label);
            }
            let line = match self.input.next_blocking() {
                Input::Line(line) => line,
                Input::Closed => return Ok(()),
            };
            let line = line.trim();
            if matches!(line, "q" | "quit") {
                return Ok(());
            }
            let Some(choice) = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
                println!("Please enter a number.\n");
                continue;
            };
            if let Err(e) = run.answer(choice) {
                println!("{e}\n");
            } else {
                println!();
            }
        }

        print_quiz_outcome(&run.result()?);
        Ok(())
    }
}

/// Pair count for a memory-match difficulty preset.
fn memory_pairs(difficulty: &str) -> Option<usize> {
    match difficulty {
        "easy" => Some(4),
        "medium" => Some(6),
        "hard" => Some(8),
        _ => None,
    }
}

fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn handle_line<G: ConsoleGame>(machine: &mut Machine<G>, line: &str) {
    let inputs = machine.game().parse_inputs(line);
    if inputs.is_empty() {
        println!("(could not read that input)");
        return;
    }
    for response in inputs {
        match machine.respond(response) {
            InputEffect::Ignored => {}
            InputEffect::Rejected => println!("(that answer does not fit this round)"),
            InputEffect::Progress { accepted } => println!("  ok ({accepted})"),
            InputEffect::Resolved(_) => {}
        }
    }
}

fn present<G: ConsoleGame>(machine: &Machine<G>, event: &SessionEvent) {
    let game = machine.game();
    match event {
        SessionEvent::Started => {}
        SessionEvent::TrialArmed { trial, level } => {
            if let Some(wait) = game.waiting_prompt() {
                if let Some((_, total)) = machine.trial_progress() {
                    println!("\nRound {}/{}", trial + 1, total);
                }
                println!("{wait}");
            } else if game.max_level() > 1 {
                println!("\nLevel {level}");
            }
        }
        SessionEvent::StimulusOnset { .. } => {
            if let Some(stimulus) = machine.visible_stimulus() {
                println!("{}", game.show(stimulus));
            }
            if let Some(left) = machine.time_remaining() {
                println!("({}s left)", left.as_secs());
            }
        }
        SessionEvent::RecallOpened { .. } => {
            print!("{CLEAR}");
            println!("{}", game.recall_prompt());
        }
        SessionEvent::TrialResolved {
            outcome,
            latency_ms,
            ..
        } => {
            let line = match (outcome, latency_ms) {
                (Outcome::Premature, _) => "Too soon!".to_string(),
                (Outcome::Missed, _) => "Too slow.".to_string(),
                (Outcome::OnTimeCorrect, Some(ms)) => format!("Correct ({ms:.0} ms)"),
                (Outcome::OnTimeCorrect, None) => "Correct".to_string(),
                (Outcome::OnTimeIncorrect, _) => "Wrong".to_string(),
            };
            let session = machine.session();
            match session.lives_remaining() {
                Some(lives) => println!("{line}  score {}  lives {lives}", session.score()),
                None => println!("{line}  score {}", session.score()),
            }
        }
        SessionEvent::Terminated => println!("\nSession over."),
    }
}

fn print_summary(summary: &Summary) {
    println!("\n--- {} ---", summary.game.title());
    println!("Score:        {}", summary.score);
    println!(
        "Accuracy:     {}% ({} of {})",
        summary.accuracy_percent(),
        summary.correct,
        summary.trials
    );
    if let Some(ms) = summary.mean_latency_ms {
        println!("Mean time:    {ms:.0} ms");
    }
    if let Some(ms) = summary.best_latency_ms {
        println!("Best time:    {ms:.0} ms");
    }
    println!("Level:        {}", summary.level_reached);
    if summary.premature > 0 {
        println!("Too soon:     {}", summary.premature);
    }
    if summary.missed > 0 {
        println!("Missed:       {}", summary.missed);
    }
}

fn print_quiz_outcome(outcome: &QuizOutcome) {
    match outcome {
        QuizOutcome::Mbti {
            code,
            title,
            description,
        } => {
            println!("Your type: {code}");
            if let Some(title) = title {
                println!("{title}");
            }
            if let Some(description) = description {
                println!("{description}");
            }
        }
        QuizOutcome::Disc { dominant, scores } => {
            println!("Dominant style: {} ({})", dominant.name(), dominant.letter());
            for (t, n) in scores {
                println!("  {}: {n}", t.letter());
            }
        }
        QuizOutcome::Eq {
            categories,
            average,
            band,
        } => {
            println!("Overall EQ: {average}% ({band:?})");
            for (name, pct) in categories {
                println!("  {name}: {pct}%");
            }
        }
        QuizOutcome::ColourVision {
            correct,
            total,
            percentage,
            band,
        } => {
            println!("{}", band.label());
            println!("You correctly identified {correct} out of {total} plates ({percentage}%)");
        }
        QuizOutcome::Stress {
            score,
            max,
            percentage,
            level,
            advice,
        } => {
            println!("Stress level: {} ({percentage}%, {score} of {max})", level.slug());
            if let Some(advice) = advice {
                println!("{advice}");
            }
        }
        QuizOutcome::LifeBalance {
            categories,
            average,
            band,
            focus,
        } => {
            println!("Overall balance: {average}% ({band:?})");
            for (name, pct) in categories {
                println!("  {name}: {pct}%");
            }
            if !focus.is_empty() {
                let names: Vec<&str> = focus.iter().map(|(name, _)| name.as_str()).collect();
                println!("Areas to focus on: {}", names.join(", "));
            }
        }
        QuizOutcome::LearningStyle {
            dominant,
            scores,
            title,
            tips,
        } => {
            match title {
                Some(title) => println!("{title}"),
                None => println!("{} Learner", dominant.name()),
            }
            for (style, count, pct) in scores {
                println!("  {}: {count} ({pct}%)", style.name());
            }
            for tip in tips {
                println!("  - {tip}");
            }
        }
    }
}

pub fn print_catalogue() {
    println!("Games:");
    for kind in GameKind::ALL {
        println!("  {:<18} {}", kind.slug(), kind.title());
    }
    println!("\nQuizzes:");
    for kind in QuizKind::ALL {
        println!("  {}", kind.slug());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_match_presets() {
        assert_eq!(memory_pairs("easy"), Some(4));
        assert_eq!(memory_pairs("hard"), Some(8));
        assert_eq!(memory_pairs("insane"), None);
    }

    #[test]
    fn only_yes_replays() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
    }
}
