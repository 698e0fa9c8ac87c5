use super::{MAX_GRID_SIDE, grid_side};
use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Star,
    Hexagon,
}

impl Shape {
    pub const ALL: [Shape; 6] = [
        Shape::Circle,
        Shape::Square,
        Shape::Triangle,
        Shape::Diamond,
        Shape::Star,
        Shape::Hexagon,
    ];

    pub fn glyph(&self) -> char {
        match self {
            Self::Circle => '●',
            Self::Square => '■',
            Self::Triangle => '▲',
            Self::Diamond => '◆',
            Self::Star => '★',
            Self::Hexagon => '⬢',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
            Self::Star => "star",
            Self::Hexagon => "hexagon",
        }
    }
}

/// Find-the-target board: exactly one cell holds the target shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeGrid {
    pub side: u32,
    pub target: Shape,
    pub cells: Vec<Shape>,
}

impl ShapeGrid {
    pub fn target_index(&self) -> Option<usize> {
        self.cells.iter().position(|s| *s == self.target)
    }
}

impl Stimulus for ShapeGrid {
    fn describe(&self) -> String {
        let rows: Vec<String> = self
            .cells
            .chunks(self.side.max(1) as usize)
            .map(|row| row.iter().map(Shape::glyph).collect())
            .collect();
        format!("find the {}\n{}", self.target.name(), rows.join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeRecognitionParams {
    #[serde(with = "crate::serde_millis")]
    pub time_limit: Duration,
    pub base_side: u32,
    pub max_side: u32,
    pub levels_per_side: u32,
    pub base_points: i64,
    pub points_per_level: i64,
    pub miss_penalty: i64,
}

impl Default for ShapeRecognitionParams {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(30),
            base_side: 3,
            max_side: 6,
            levels_per_side: 3,
            base_points: 10,
            points_per_level: 2,
            miss_penalty: 5,
        }
    }
}

impl ShapeRecognitionParams {
    pub fn sanitized(mut self) -> Self {
        if self.time_limit.is_zero() {
            self.time_limit = Self::default().time_limit;
        }
        self.base_side = self.base_side.clamp(2, MAX_GRID_SIDE);
        self.max_side = self.max_side.clamp(self.base_side, MAX_GRID_SIDE);
        self.levels_per_side = self.levels_per_side.max(1);
        self.miss_penalty = self.miss_penalty.max(0);
        self
    }

    pub fn side_for(&self, level: u32) -> u32 {
        grid_side(level, self.base_side, self.levels_per_side, self.max_side)
    }
}

#[derive(Debug, Clone)]
pub struct ShapeRecognition {
    params: ShapeRecognitionParams,
}

impl ShapeRecognition {
    pub fn new(params: ShapeRecognitionParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }

    pub fn params(&self) -> &ShapeRecognitionParams {
        &self.params
    }
}

impl Game for ShapeRecognition {
    type Stimulus = ShapeGrid;
    type Response = usize;

    fn kind(&self) -> GameKind {
        GameKind::ShapeRecognition
    }

    fn termination(&self) -> Termination {
        Termination::TimeLimit(self.params.time_limit)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, level: u32, rng: &mut R) -> ShapeGrid {
        let side = self.params.side_for(level);
        let n = (side * side) as usize;
        let target = Shape::ALL[rng.below(Shape::ALL.len())];
        let at = rng.below(n);
        let others: Vec<Shape> = Shape::ALL.into_iter().filter(|s| *s != target).collect();
        let cells = (0..n)
            .map(|i| {
                if i == at {
                    target
                } else {
                    others[rng.below(others.len())]
                }
            })
            .collect();
        ShapeGrid {
            side,
            target,
            cells,
        }
    }

    fn judge(&self, grid: &ShapeGrid, _accepted: &[usize], cell: &usize) -> Verdict {
        match grid.cells.get(*cell) {
            None => Verdict::Rejected,
            Some(shape) if *shape == grid.target => Verdict::Correct,
            Some(_) => Verdict::Incorrect,
        }
    }

    fn score(&self, record: &TrialRecord<ShapeGrid, usize>) -> Adjustment {
        if record.outcome().is_correct() {
            let level = record.level() as i64;
            let bonus = self.params.points_per_level.saturating_mul(level);
            Adjustment::advance(self.params.base_points.saturating_add(bonus))
        } else {
            Adjustment::points(-self.params.miss_penalty)
        }
    }
}
