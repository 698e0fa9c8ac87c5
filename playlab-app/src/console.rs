use playlab_core::Stimulus;
use playlab_session::games::{
    AimTrainer, Board, Click, ColorGrid, ColorPerception, Digits, Direction, InkColor,
    MemoryMatch, NumberSequence, Passage, Pattern, Press, ReactionTest, ShapeRecognition,
    SimonSays, StroopTest, StroopWord, Typed, TypingSpeed, VerbalAnswer, VerbalMemory,
    VisualMemory,
};
use playlab_session::{Game, Summary};

const RESET: &str = "\x1b[0m";
pub const CLEAR: &str = "\x1b[2J\x1b[H";

/// Terminal rendering and input parsing for one game.
pub trait ConsoleGame: Game {
    fn instructions(&self) -> String;

    fn parse_input(&self, line: &str) -> Option<Self::Response>;

    /// One line can carry several inputs for games recalled step by step.
    fn parse_inputs(&self, line: &str) -> Vec<Self::Response> {
        self.parse_input(line).into_iter().collect()
    }

    fn show(&self, stimulus: &Self::Stimulus) -> String {
        stimulus.describe()
    }

    fn waiting_prompt(&self) -> Option<&'static str> {
        None
    }

    fn recall_prompt(&self) -> &'static str {
        "Your turn:"
    }

    /// Extra result line under the summary.
    fn verdict_line(&self, _summary: &Summary) -> Option<String> {
        None
    }
}

fn paint_rgb((r, g, b): (u8, u8, u8), text: &str) -> String {
    format!("\x1b[38;2;{r};{g};{b}m{text}{RESET}")
}

fn block_rgb((r, g, b): (u8, u8, u8)) -> String {
    format!("\x1b[48;2;{r};{g};{b}m  {RESET}")
}

pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some(((v >> 16) as u8, (v >> 8) as u8, v as u8))
}

/// `h` in degrees, `s`/`l` in percent.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    let to = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to(r), to(g), to(b))
}

/// 3x5 glyphs for the plate numerals, one row per entry.
const PLATE_FONT: [[&str; 5]; 10] = [
    ["###", "#.#", "#.#", "#.#", "###"],
    [".#.", "##.", ".#.", ".#.", "###"],
    ["###", "..#", "###", "#..", "###"],
    ["###", "..#", "###", "..#", "###"],
    ["#.#", "#.#", "###", "..#", "..#"],
    ["###", "#..", "###", "..#", "###"],
    ["###", "#..", "###", "#.#", "###"],
    ["###", "..#", ".#.", ".#.", ".#."],
    ["###", "#.#", "###", "#.#", "###"],
    ["###", "#.#", "###", "..#", "###"],
];

/// Draws `numeral` in `foreground` on a `background` field, both `#rrggbb`.
/// `None` when a colour does not parse or the numeral has a non-digit.
pub fn render_plate(numeral: &str, background: &str, foreground: &str) -> Option<String> {
    let bg = hex_to_rgb(background)?;
    let fg = hex_to_rgb(foreground)?;
    let glyphs = numeral
        .chars()
        .map(|c| c.to_digit(10).map(|d| &PLATE_FONT[d as usize]))
        .collect::<Option<Vec<_>>>()?;
    let width = glyphs.len() * 4 + 1;
    let margin: String = std::iter::repeat_n(block_rgb(bg), width).collect();

    let mut rows = vec![margin.clone()];
    for row in 0..5 {
        let mut line = block_rgb(bg);
        for glyph in &glyphs {
            for px in glyph[row].chars() {
                line.push_str(&block_rgb(if px == '#' { fg } else { bg }));
            }
            line.push_str(&block_rgb(bg));
        }
        rows.push(line);
    }
    rows.push(margin);
    Some(rows.join("\n"))
}

/// 1-based cell number from the player, as a 0-based index.
fn parse_cell(token: &str) -> Option<usize> {
    token.trim().parse::<usize>().ok()?.checked_sub(1)
}

impl ConsoleGame for ReactionTest {
    fn instructions(&self) -> String {
        format!(
            "Press Enter as soon as the signal appears. Pressing early counts as too soon. {} rounds.",
            self.params().trials
        )
    }

    fn parse_input(&self, _line: &str) -> Option<Press> {
        Some(Press)
    }

    fn show(&self, signal: &Self::Stimulus) -> String {
        paint_rgb((34, 197, 94), &format!(">>> GO! ({}) <<<", signal.describe()))
    }

    fn waiting_prompt(&self) -> Option<&'static str> {
        Some("Wait for it...")
    }

    fn verdict_line(&self, summary: &Summary) -> Option<String> {
        summary
            .mean_latency_ms
            .map(|ms| format!("Rating: {}", self.rate(ms).label()))
    }
}

impl ConsoleGame for AimTrainer {
    fn instructions(&self) -> String {
        let (size, hits) = self.params().difficulty.preset();
        format!(
            "Targets of size {size:.0} appear in a {:.0}x{:.0} arena. Type `x y` to click. Hit {hits}.",
            self.params().arena_width,
            self.params().arena_height
        )
    }

    fn parse_input(&self, line: &str) -> Option<Click> {
        let mut it = line.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
        let x = it.next()?.parse().ok()?;
        let y = it.next()?.parse().ok()?;
        Some(Click { x, y })
    }
}

impl ConsoleGame for StroopTest {
    fn instructions(&self) -> String {
        let names: Vec<&str> = InkColor::ALL.iter().map(InkColor::name).collect();
        format!("Type the INK colour, not the word ({}).", names.join(", "))
    }

    fn parse_input(&self, line: &str) -> Option<InkColor> {
        InkColor::parse(line)
    }

    fn show(&self, word: &StroopWord) -> String {
        match hex_to_rgb(word.ink.hex()) {
            Some(rgb) => paint_rgb(rgb, word.word.name()),
            None => word.describe(),
        }
    }
}

impl ConsoleGame for NumberSequence {
    fn instructions(&self) -> String {
        "Memorise the digits, then type them back once they disappear.".to_string()
    }

    fn parse_input(&self, line: &str) -> Option<Vec<u8>> {
        let digits = Digits::parse_answer(line);
        (!digits.is_empty()).then_some(digits)
    }

    fn recall_prompt(&self) -> &'static str {
        "Type the number:"
    }
}

impl ConsoleGame for VisualMemory {
    fn instructions(&self) -> String {
        "Memorise the lit cells, then enter their numbers (1 = top left), one or more per line."
            .to_string()
    }

    fn parse_input(&self, line: &str) -> Option<usize> {
        parse_cell(line)
    }

    fn parse_inputs(&self, line: &str) -> Vec<usize> {
        line.split_whitespace().filter_map(parse_cell).collect()
    }

    fn show(&self, pattern: &Pattern) -> String {
        pattern.describe()
    }

    fn recall_prompt(&self) -> &'static str {
        "Which cells were lit?"
    }
}

impl ConsoleGame for VerbalMemory {
    fn instructions(&self) -> String {
        "Answer `s` if you have seen the word in this session, `n` if it is new.".to_string()
    }

    fn parse_input(&self, line: &str) -> Option<VerbalAnswer> {
        VerbalAnswer::parse(line)
    }
}

impl ConsoleGame for SimonSays {
    fn instructions(&self) -> String {
        "Repeat the arrows with u/r/d/l (or w/d/s/a). One mistake ends the game.".to_string()
    }

    fn parse_input(&self, line: &str) -> Option<Direction> {
        Direction::parse(line)
    }

    fn parse_inputs(&self, line: &str) -> Vec<Direction> {
        line.split_whitespace().filter_map(Direction::parse).collect()
    }
}

impl ConsoleGame for ColorPerception {
    fn instructions(&self) -> String {
        "One square is a slightly different shade. Enter its number (1 = top left).".to_string()
    }

    fn parse_input(&self, line: &str) -> Option<usize> {
        parse_cell(line)
    }

    fn show(&self, grid: &ColorGrid) -> String {
        let side = grid.side as usize;
        let mut rows = Vec::with_capacity(side);
        for row in 0..side {
            let mut line = String::new();
            for col in 0..side {
                let idx = row * side + col;
                if let Some(c) = grid.color_at(idx) {
                    line.push_str(&block_rgb(hsl_to_rgb(c.h, c.s, c.l)));
                    line.push_str(&format!("{:<3}", idx + 1));
                }
            }
            rows.push(line);
        }
        rows.join("\n")
    }
}

impl ConsoleGame for ShapeRecognition {
    fn instructions(&self) -> String {
        format!(
            "Find the target shape and enter its cell number (1 = top left). {}s on the clock.",
            self.params().time_limit.as_secs()
        )
    }

    fn parse_input(&self, line: &str) -> Option<usize> {
        parse_cell(line)
    }
}

impl ConsoleGame for TypingSpeed {
    fn instructions(&self) -> String {
        "Type the passage exactly as shown and press Enter. The clock starts when it appears."
            .to_string()
    }

    fn parse_input(&self, line: &str) -> Option<Typed> {
        Some(Typed(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn show(&self, passage: &Passage) -> String {
        paint_rgb((56, 189, 248), &passage.0)
    }

    /// Each round scores its WPM, so the mean is score over rounds.
    fn verdict_line(&self, summary: &Summary) -> Option<String> {
        let rounds = u64::try_from(summary.trials).ok().filter(|n| *n > 0)?;
        let wpm = u32::try_from(summary.score / rounds).unwrap_or(u32::MAX);
        Some(format!("Rating: {}", self.rate(wpm).label()))
    }
}

impl ConsoleGame for MemoryMatch {
    fn instructions(&self) -> String {
        format!(
            "Turn two cards per move by number (1 = first card). Find all {} pairs.",
            self.params().pairs
        )
    }

    fn parse_input(&self, line: &str) -> Option<usize> {
        parse_cell(line)
    }

    fn parse_inputs(&self, line: &str) -> Vec<usize> {
        line.split_whitespace().filter_map(parse_cell).collect()
    }

    fn show(&self, board: &Board) -> String {
        let cards: Vec<String> = (0..board.len())
            .map(|i| match (board.matched[i], board.face(i)) {
                (true, Some(face)) => format!("{face:>3}"),
                _ => format!("{:>3}", i + 1),
            })
            .collect();
        cards
            .chunks(4)
            .map(|row| row.join(" "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
