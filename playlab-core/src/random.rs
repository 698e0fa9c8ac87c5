use rand::Rng;

/// Source of uniform floats in `[0, 1)` for stimulus generation.
///
/// Generators only see this trait so that sessions can be replayed with a
/// scripted sequence in tests or seeded from the CLI.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `0..n`. Returns 0 when `n` is 0.
    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let v = self.next_f64().clamp(0.0, 1.0);
        ((v * n as f64) as usize).min(n - 1)
    }

    /// Uniform integer in `lo..=hi`.
    fn between(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        let span = usize::try_from(hi - lo).unwrap_or(usize::MAX).saturating_add(1);
        lo.saturating_add(self.below(span) as u64).min(hi)
    }

    /// Uniform float in `lo..hi`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64().clamp(0.0, 1.0) * (hi - lo)
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            items.get(self.below(items.len()))
        }
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Adapts any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Replays a fixed list of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        // keep the half-open contract even for sloppy scripts
        v.clamp(0.0, 0.999_999_999)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn below_maps_unit_interval_onto_indices() {
        let mut r = ScriptedRandom::new([0.0, 0.45, 0.75, 0.25, 0.999]);
        assert_eq!(r.below(10), 0);
        assert_eq!(r.below(10), 4);
        assert_eq!(r.below(10), 7);
        assert_eq!(r.below(10), 2);
        assert_eq!(r.below(10), 9);
        assert_eq!(r.drawn(), 5);
    }

    #[test]
    fn between_is_inclusive() {
        let mut r = ScriptedRandom::new([0.0, 0.999_999]);
        assert_eq!(r.between(1000, 4000), 1000);
        assert_eq!(r.between(1000, 4000), 4000);
        assert_eq!(r.between(5, 5), 5);
        assert_eq!(r.between(0, u64::MAX), 0);
        assert!(r.between(10, u64::MAX) >= 10);
    }

    #[test]
    fn scripted_cycles_and_clamps() {
        let mut r = ScriptedRandom::new([1.5]);
        assert!(r.next_f64() < 1.0);
        assert!(r.next_f64() < 1.0);
        let mut empty = ScriptedRandom::new(Vec::new());
        assert_eq!(empty.next_f64(), 0.0);
    }

    #[test]
    fn rng_source_stays_in_range() {
        let mut r = RngSource(StdRng::seed_from_u64(7));
        for _ in 0..1000 {
            let v = r.next_f64();
            assert!((0.0..1.0).contains(&v));
            assert!(r.below(6) < 6);
        }
        assert!(r.pick::<u8>(&[]).is_none());
    }
}
