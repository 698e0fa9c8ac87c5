use super::{MAX_GRID_SIDE, grid_side};
use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn css(&self) -> String {
        format!("hsl({:.0}, {:.0}%, {:.0}%)", self.h, self.s, self.l)
    }
}

/// A grid of same-coloured cells with one slightly lighter cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorGrid {
    pub side: u32,
    pub base: Hsl,
    pub odd: Hsl,
    pub odd_index: usize,
}

impl ColorGrid {
    pub fn cell_count(&self) -> usize {
        (self.side * self.side) as usize
    }

    pub fn color_at(&self, cell: usize) -> Option<Hsl> {
        if cell >= self.cell_count() {
            None
        } else if cell == self.odd_index {
            Some(self.odd)
        } else {
            Some(self.base)
        }
    }
}

impl Stimulus for ColorGrid {
    fn describe(&self) -> String {
        format!(
            "{0}x{0} grid of {1}, odd cell {2}",
            self.side,
            self.base.css(),
            self.odd.css()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPerceptionParams {
    pub base_side: u32,
    pub max_side: u32,
    pub levels_per_side: u32,
    pub base_delta: f64,
    pub delta_step: f64,
    pub max_reduction: f64,
    pub min_delta: f64,
    pub lives: u32,
    #[serde(with = "crate::serde_millis")]
    pub feedback: Duration,
}

impl Default for ColorPerceptionParams {
    fn default() -> Self {
        Self {
            base_side: 2,
            max_side: 6,
            levels_per_side: 3,
            base_delta: 20.0,
            delta_step: 1.5,
            max_reduction: 15.0,
            min_delta: 3.0,
            lives: 3,
            feedback: Duration::from_millis(500),
        }
    }
}

impl ColorPerceptionParams {
    pub fn sanitized(mut self) -> Self {
        self.base_side = self.base_side.clamp(2, MAX_GRID_SIDE);
        self.max_side = self.max_side.clamp(self.base_side, MAX_GRID_SIDE);
        self.levels_per_side = self.levels_per_side.max(1);
        self.min_delta = self.min_delta.max(0.5);
        self.base_delta = self.base_delta.max(self.min_delta);
        self.lives = self.lives.max(1);
        self
    }

    pub fn side_for(&self, level: u32) -> u32 {
        grid_side(level, self.base_side, self.levels_per_side, self.max_side)
    }

    /// Lightness gap between the odd cell and the rest.
    pub fn delta_for(&self, level: u32) -> f64 {
        let reduction = (self.delta_step * level as f64).min(self.max_reduction);
        (self.base_delta - reduction).max(self.min_delta)
    }
}

#[derive(Debug, Clone)]
pub struct ColorPerception {
    params: ColorPerceptionParams,
}

impl ColorPerception {
    pub fn new(params: ColorPerceptionParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }

    pub fn params(&self) -> &ColorPerceptionParams {
        &self.params
    }
}

impl Game for ColorPerception {
    type Stimulus = ColorGrid;
    type Response = usize;

    fn kind(&self) -> GameKind {
        GameKind::ColorPerception
    }

    fn termination(&self) -> Termination {
        Termination::Lives(self.params.lives)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, level: u32, rng: &mut R) -> ColorGrid {
        let side = self.params.side_for(level);
        let base = Hsl {
            h: rng.uniform(0.0, 360.0),
            s: rng.uniform(50.0, 80.0),
            l: rng.uniform(40.0, 60.0),
        };
        let odd = Hsl {
            l: (base.l + self.params.delta_for(level)).min(100.0),
            ..base
        };
        let odd_index = rng.below((side * side) as usize);
        ColorGrid {
            side,
            base,
            odd,
            odd_index,
        }
    }

    fn inter_trial(&self) -> Duration {
        self.params.feedback
    }

    fn judge(&self, grid: &ColorGrid, _accepted: &[usize], cell: &usize) -> Verdict {
        if *cell >= grid.cell_count() {
            Verdict::Rejected
        } else if *cell == grid.odd_index {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    fn score(&self, record: &TrialRecord<ColorGrid, usize>) -> Adjustment {
        if record.outcome().is_correct() {
            Adjustment::advance(record.level() as i64 * 10)
        } else {
            Adjustment::lose_life()
        }
    }
}
