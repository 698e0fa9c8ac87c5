use crate::game::{Adjustment, Game, GameKind, Termination, Verdict};
use playlab_core::{RandomSource, Stimulus, TrialRecord};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AimDifficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl AimDifficulty {
    /// Target diameter and number of hits needed.
    pub fn preset(&self) -> (f32, usize) {
        match self {
            Self::Easy => (60.0, 15),
            Self::Medium => (45.0, 20),
            Self::Hard => (30.0, 25),
        }
    }
}

/// A round target; `x`/`y` is the top-left corner of its bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Target {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }

    pub fn contains(&self, click: &Click) -> bool {
        let (cx, cy) = self.center();
        let r = self.size / 2.0;
        let (dx, dy) = (click.x - cx, click.y - cy);
        dx * dx + dy * dy <= r * r
    }
}

impl Stimulus for Target {
    fn describe(&self) -> String {
        let (cx, cy) = self.center();
        format!("target at ({:.0}, {:.0}) size {:.0}", cx, cy, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Click {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AimParams {
    pub difficulty: AimDifficulty,
    pub arena_width: f32,
    pub arena_height: f32,
    #[serde(with = "crate::serde_millis")]
    pub first_target_delay: Duration,
    pub hit_base_points: i64,
    /// Milliseconds of latency that cost one point.
    pub ms_per_point: u64,
    pub hit_min_points: i64,
    pub miss_penalty: i64,
}

impl Default for AimParams {
    fn default() -> Self {
        Self {
            difficulty: AimDifficulty::Medium,
            arena_width: 600.0,
            arena_height: 400.0,
            first_target_delay: Duration::from_millis(500),
            hit_base_points: 100,
            ms_per_point: 10,
            hit_min_points: 10,
            miss_penalty: 25,
        }
    }
}

impl AimParams {
    pub fn sanitized(mut self) -> Self {
        let (size, _) = self.difficulty.preset();
        self.arena_width = self.arena_width.max(size);
        self.arena_height = self.arena_height.max(size);
        self.ms_per_point = self.ms_per_point.max(1);
        self.hit_min_points = self.hit_min_points.max(0);
        self.miss_penalty = self.miss_penalty.max(0);
        self
    }
}

/// Click targets that appear one at a time anywhere in the arena.
#[derive(Debug, Clone)]
pub struct AimTrainer {
    params: AimParams,
}

impl AimTrainer {
    pub fn new(params: AimParams) -> Self {
        Self {
            params: params.sanitized(),
        }
    }

    pub fn params(&self) -> &AimParams {
        &self.params
    }

    pub fn hit_points(&self, latency_ms: f64) -> i64 {
        let lost = (latency_ms.max(0.0) as u64 / self.params.ms_per_point) as i64;
        self.params
            .hit_base_points
            .saturating_sub(lost)
            .max(self.params.hit_min_points)
    }
}

impl Game for AimTrainer {
    type Stimulus = Target;
    type Response = Click;

    fn kind(&self) -> GameKind {
        GameKind::AimTrainer
    }

    fn termination(&self) -> Termination {
        Termination::CorrectCount(self.params.difficulty.preset().1)
    }

    fn generate_stimulus<R: RandomSource>(&mut self, _level: u32, rng: &mut R) -> Target {
        let (size, _) = self.params.difficulty.preset();
        let x = rng.uniform(0.0, (self.params.arena_width - size) as f64) as f32;
        let y = rng.uniform(0.0, (self.params.arena_height - size) as f64) as f32;
        Target { x, y, size }
    }

    fn arming_delay<R: RandomSource>(&mut self, trial: usize, _level: u32, _rng: &mut R) -> Duration {
        if trial == 0 {
            self.params.first_target_delay
        } else {
            Duration::ZERO
        }
    }

    fn judge(&self, target: &Target, _accepted: &[Click], click: &Click) -> Verdict {
        if target.contains(click) {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        }
    }

    fn score(&self, record: &TrialRecord<Target, Click>) -> Adjustment {
        if record.outcome().is_correct() {
            Adjustment::points(self.hit_points(record.latency_ms().unwrap_or(0.0)))
        } else {
            Adjustment::points(-self.params.miss_penalty)
        }
    }

    fn max_level(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playlab_core::ScriptedRandom;

    #[test]
    fn hit_points_decay_with_latency_to_a_floor() {
        let g = AimTrainer::new(AimParams::default());
        assert_eq!(g.hit_points(0.0), 100);
        assert_eq!(g.hit_points(259.0), 75);
        assert_eq!(g.hit_points(5000.0), 10);
    }

    #[test]
    fn targets_stay_inside_arena() {
        let mut g = AimTrainer::new(AimParams::default());
        let mut rng = ScriptedRandom::new([0.0, 0.999_999, 0.5, 0.5]);
        let a = g.generate_stimulus(1, &mut rng);
        assert_eq!((a.x, a.size), (0.0, 45.0));
        assert!(a.y + a.size <= 400.0);
        let b = g.generate_stimulus(1, &mut rng);
        assert!(b.x + b.size <= 600.0);
    }

    #[test]
    fn clicks_inside_radius_hit() {
        let t = Target {
            x: 100.0,
            y: 100.0,
            size: 40.0,
        };
        assert!(t.contains(&Click { x: 120.0, y: 120.0 }));
        assert!(t.contains(&Click { x: 139.0, y: 120.0 }));
        assert!(!t.contains(&Click { x: 101.0, y: 101.0 }));
    }

    #[test]
    fn difficulty_picks_hit_target() {
        let g = AimTrainer::new(AimParams {
            difficulty: AimDifficulty::Hard,
            ..AimParams::default()
        });
        assert_eq!(g.termination(), Termination::CorrectCount(25));
    }
}
