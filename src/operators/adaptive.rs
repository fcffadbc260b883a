use rand::Rng;
use serde::{Deserialize, Serialize};

use super::mutation;
use crate::error::{EvoError, Result};
use crate::genome::Genome;

/// Invocations between two rate adjustments.
const ADAPTATION_WINDOW: u32 = 10;

/// Self-adapting Gaussian mutation implementing the 1-in-5 heuristic with
/// a configurable window and threshold: a high recent success ratio
/// scales the rate up (more exploration), a low one scales it down.
///
/// The rolling counters live in this explicit state struct so the
/// operator composes with dependency injection instead of hiding state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveMutation {
    rate: f64,
    sigma: f64,
    min_rate: f64,
    max_rate: f64,
    success_threshold: f64,
    success_count: u32,
    total_count: u32,
    history: Vec<f64>,
}

impl AdaptiveMutation {
    pub fn new(
        initial_rate: f64,
        sigma: f64,
        min_rate: f64,
        max_rate: f64,
        success_threshold: f64,
    ) -> Result<Self> {
        if min_rate <= 0.0 || max_rate > 1.0 || min_rate > max_rate {
            return Err(EvoError::Configuration(
                "Adaptive mutation rate bounds must satisfy 0 < min_rate <= max_rate <= 1"
                    .to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&success_threshold) {
            return Err(EvoError::Configuration(
                "Adaptive mutation success threshold must be between 0 and 1".to_string(),
            ));
        }
        Ok(Self {
            rate: initial_rate.clamp(min_rate, max_rate),
            sigma,
            min_rate,
            max_rate,
            success_threshold,
            success_count: 0,
            total_count: 0,
            history: Vec::new(),
        })
    }

    /// Current adapted rate, always within `[min_rate, max_rate]`.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Success ratios observed at each past adaptation step.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Record whether the previous mutation improved fitness, adapt the
    /// rate once per window, then apply Gaussian mutation at the current
    /// rate.
    pub fn mutate<R: Rng>(&mut self, genome: &mut Genome<f64>, fitness_improved: bool, rng: &mut R) {
        self.total_count += 1;
        if fitness_improved {
            self.success_count += 1;
        }

        if self.total_count >= ADAPTATION_WINDOW {
            let ratio = self.success_count as f64 / self.total_count as f64;
            if ratio > self.success_threshold {
                self.rate *= 1.5;
            } else if ratio < self.success_threshold / 2.0 {
                self.rate *= 0.5;
            }
            self.rate = self.rate.clamp(self.min_rate, self.max_rate);
            self.history.push(ratio);
            self.success_count = 0;
            self.total_count = 0;
        }

        mutation::gaussian(genome, self.rate, self.sigma, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_bad_rate_bounds() {
        assert!(AdaptiveMutation::new(0.1, 0.1, 0.5, 0.2, 0.2).is_err());
        assert!(AdaptiveMutation::new(0.1, 0.1, 0.0, 0.5, 0.2).is_err());
        assert!(AdaptiveMutation::new(0.1, 0.1, 0.01, 0.5, 1.5).is_err());
    }

    #[test]
    fn rate_increases_when_successes_are_frequent() {
        let mut adaptive = AdaptiveMutation::new(0.1, 0.1, 0.001, 0.9, 0.2).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let mut genome = Genome::new(vec![0.0; 4]);

        for _ in 0..10 {
            adaptive.mutate(&mut genome, true, &mut rng);
        }

        assert!((adaptive.rate() - 0.15).abs() < 1e-12);
        assert_eq!(adaptive.history(), &[1.0]);
    }

    #[test]
    fn rate_decreases_when_successes_are_rare() {
        let mut adaptive = AdaptiveMutation::new(0.1, 0.1, 0.001, 0.9, 0.2).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut genome = Genome::new(vec![0.0; 4]);

        for _ in 0..10 {
            adaptive.mutate(&mut genome, false, &mut rng);
        }

        assert!((adaptive.rate() - 0.05).abs() < 1e-12);
        assert_eq!(adaptive.history(), &[0.0]);
    }

    #[test]
    fn rate_stays_clamped_to_bounds() {
        let mut adaptive = AdaptiveMutation::new(0.5, 0.1, 0.1, 0.6, 0.2).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut genome = Genome::new(vec![0.0; 4]);

        for _ in 0..50 {
            adaptive.mutate(&mut genome, true, &mut rng);
        }
        assert!(adaptive.rate() <= 0.6);

        for _ in 0..200 {
            adaptive.mutate(&mut genome, false, &mut rng);
        }
        assert!(adaptive.rate() >= 0.1);
    }

    #[test]
    fn middling_success_leaves_rate_unchanged() {
        // threshold 0.4: a ratio of 0.3 is neither above it nor below 0.2.
        let mut adaptive = AdaptiveMutation::new(0.1, 0.1, 0.001, 0.9, 0.4).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut genome = Genome::new(vec![0.0; 4]);

        for i in 0..10 {
            adaptive.mutate(&mut genome, i < 3, &mut rng);
        }

        assert!((adaptive.rate() - 0.1).abs() < 1e-12);
    }
}
