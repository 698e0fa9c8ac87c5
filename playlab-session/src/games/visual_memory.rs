use super::{MAX_GRID_SIDE, grid_side};
use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lit cells of a square grid, flashed then recalled cell by cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pattern {
    pub side: u32,
    pub cells: Vec<usize>,
}

impl Pattern {
    pub fn contains(&self, cell: usize) -> bool {
        self.cells.contains(&cell)
    }

    pub fn cell_count(&self) -> usize {
        (self.side * self.side) as usize
    }
}

impl Stimulus for Pattern {
    fn describe(&self) -> String {
        let mut out = String::new();
        for row in 0..self.side as usize {
            for col in 0..self.side as usize {
                let idx = row * self.side as usize + col;
                out.push(if self.contains(idx) { '#' } else { '.' });
            }
            if row + 1 < self.side as usize {
                out.push('\n');
            }
        }
        out
    }

    fn recall_len(&self) -> usize {
        self.cells.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualMemoryParams {
    pub base_side: u32,
    pub max_side: u32,
    pub levels_per_side: u32,
    pub base_cells: usize,
    #[serde(with = "crate::serde_millis")]
    pub base_display: Duration,
    #[serde(with = "crate::serde_millis")]
    pub display_step: Duration,
    #[serde(with = "crate::serde_millis")]
    pub min_display: Duration,
    pub lives: u32,
    #[serde(with = "crate::serde_millis")]
    pub feedback: Duration,
}

impl Default for VisualMemoryParams {
    fn default() -> Self {
        Self {
            base_side: 3,
            max_side: 6,
            levels_per_side: 5,
            base_cells: 3,
            base_display: Duration::from_millis(1500),
            display_step: Duration::from_millis(50),
            min_display: Duration::from_millis(500),
            lives: 3,
            feedback: Duration::from_millis(1000),
        }
    }
}

impl VisualMemoryParams {
    pub fn sanitized(mut self) -> Self {
        self.base_side = self.base_side.clamp(2, MAX_GRID_SIDE);
        self.max_side = self.max_side.clamp(self.base_side, MAX_GRID_SIDE);
        self.levels_per_side = self.levels_per_side.max(1);
        self.base_cells = self.base_cells.max(1);
        self.min_display = self.min_display.min(self.base_display);
        self.lives = self.lives.max(1);
        self
    }

    pub fn side_for(&self, level: u32) -> u32 {
        grid_side(level, self.base_side, self.levels_per_side, self.max_side)
    }

    /// Always leaves at least two cells dark.
    pub fn cells_for(&self, level: u32) -> usize {
        let side = self.side_for(level) as usize;
        self.base_cells
            .saturating_add(level as usize / 2)
            .min(side * side - 2)
    }

    pub fn display_for(&self, level: u32) -> Duration {
        self.base_display
            .saturating_sub(self.display_step.saturating_mul(level))
            .max(self.min_display)
    }
}

#[derive(Debug, Clone)]
pub struct VisualMemory {
    params: VisualMemoryParams,
}

impl VisualMemory {
    pub fn new(params: VisualMemoryParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }

    pub fn params(&self) -> &VisualMemoryParams {
        &self.params
    }
}

impl Game for VisualMemory {
    type Stimulus = Pattern;
    type Response = usize;

    fn kind(&self) -> GameKind {
        GameKind::VisualMemory
    }

    fn termination(&self) -> Termination {
        Termination::Lives(self.params.lives)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, level: u32, rng: &mut R) -> Pattern {
        let side = self.params.side_for(level);
        let want = self.params.cells_for(level);
        let mut all: Vec<usize> = (0..(side * side) as usize).collect();
        for i in 0..want {
            let j = i + rng.below(all.len() - i);
            all.swap(i, j);
        }
        all.truncate(want);
        all.sort_unstable();
        Pattern { side, cells: all }
    }

    fn presentation(&self, _pattern: &Pattern, level: u32) -> Option<Duration> {
        Some(self.params.display_for(level))
    }

    fn inter_trial(&self) -> Duration {
        self.params.feedback
    }

    fn judge(&self, pattern: &Pattern, accepted: &[usize], cell: &usize) -> Verdict {
        if *cell >= pattern.cell_count() {
            Verdict::Rejected
        } else if accepted.contains(cell) {
            Verdict::Ignored
        } else if !pattern.contains(*cell) {
            Verdict::Incorrect
        } else if accepted.len() + 1 == pattern.cells.len() {
            Verdict::Correct
        } else {
            Verdict::Continue
        }
    }

    fn score(&self, record: &TrialRecord<Pattern, usize>) -> Adjustment {
        if record.outcome().is_correct() {
            Adjustment::advance(record.level() as i64 * 10)
        } else {
            Adjustment::lose_life()
        }
    }
}
