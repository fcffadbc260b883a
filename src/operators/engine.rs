use rand::Rng;
use serde::{Deserialize, Serialize};

use super::adaptive::AdaptiveMutation;
use super::mutation::{self, MutationType};
use crate::error::{EvoError, Result};
use crate::genome::Genome;

/// Shared parameters for all mutation strategies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MutationParams {
    /// Per-gene (or whole-genome, for the positional operators)
    /// application probability.
    pub rate: f64,
    /// Gaussian standard deviation.
    pub sigma: f64,
    /// Distribution index for polynomial mutation.
    pub eta: f64,
    /// Creep half-width.
    pub step: f64,
    /// Lower bound for the bounded operators.
    pub low: f64,
    /// Upper bound for the bounded operators.
    pub high: f64,
    /// Adaptive rate floor.
    pub min_rate: f64,
    /// Adaptive rate ceiling.
    pub max_rate: f64,
    /// Adaptive success-ratio threshold.
    pub success_threshold: f64,
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            rate: 0.1,
            sigma: 0.1,
            eta: 20.0,
            step: 0.1,
            low: -1.0,
            high: 1.0,
            min_rate: 0.001,
            max_rate: 0.5,
            success_threshold: 0.2,
        }
    }
}

impl MutationParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rate) {
            return Err(EvoError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if self.sigma < 0.0 {
            return Err(EvoError::Configuration(
                "Mutation sigma must be non-negative".to_string(),
            ));
        }
        if self.eta <= 0.0 {
            return Err(EvoError::Configuration(
                "Mutation eta must be positive".to_string(),
            ));
        }
        if self.step < 0.0 {
            return Err(EvoError::Configuration(
                "Creep step must be non-negative".to_string(),
            ));
        }
        if self.low >= self.high {
            return Err(EvoError::Configuration(
                "Mutation bounds must satisfy low < high".to_string(),
            ));
        }
        Ok(())
    }
}

/// Usage counters accumulated by the mutation engine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MutationStats {
    pub mutations: u64,
    pub successful: u64,
}

/// Dispatch facade over the mutation operator catalog.
///
/// Configured once with a strategy tag and shared parameters; `mutate`
/// routes each call to the matching operator. In adaptive mode, calls
/// carrying an improvement flag go through [`AdaptiveMutation`] so the
/// effective rate self-tunes.
pub struct MutationEngine {
    mutation_type: MutationType,
    params: MutationParams,
    adaptive: Option<AdaptiveMutation>,
    stats: MutationStats,
}

impl MutationEngine {
    pub fn new(mutation_type: MutationType, params: MutationParams) -> Result<Self> {
        params.validate()?;
        let adaptive = if mutation_type == MutationType::Adaptive {
            Some(AdaptiveMutation::new(
                params.rate,
                params.sigma,
                params.min_rate,
                params.max_rate,
                params.success_threshold,
            )?)
        } else {
            None
        };
        Ok(Self {
            mutation_type,
            params,
            adaptive,
            stats: MutationStats::default(),
        })
    }

    pub fn mutation_type(&self) -> MutationType {
        self.mutation_type
    }

    /// Apply the configured mutation. `fitness_improved` reports whether
    /// the genome's previous mutation paid off; it only influences
    /// adaptive mode, where it feeds the success window.
    pub fn mutate<R: Rng>(
        &mut self,
        genome: &mut Genome<f64>,
        fitness_improved: Option<bool>,
        rng: &mut R,
    ) {
        self.stats.mutations += 1;
        if fitness_improved == Some(true) {
            self.stats.successful += 1;
        }

        if let (Some(adaptive), Some(improved)) = (self.adaptive.as_mut(), fitness_improved) {
            adaptive.mutate(genome, improved, rng);
            return;
        }

        self.apply(self.mutation_type, genome, rng);
    }

    /// Apply several operator types in sequence to one genome.
    pub fn combined_mutation<R: Rng>(
        &mut self,
        genome: &mut Genome<f64>,
        types: &[MutationType],
        rng: &mut R,
    ) {
        for &mutation_type in types {
            self.stats.mutations += 1;
            self.apply(mutation_type, genome, rng);
        }
    }

    fn apply<R: Rng>(&mut self, mutation_type: MutationType, genome: &mut Genome<f64>, rng: &mut R) {
        let p = self.params;
        match mutation_type {
            MutationType::BitFlip => mutation::bit_flip(genome, p.rate, rng),
            MutationType::Swap => mutation::swap(genome, p.rate, rng),
            MutationType::Inversion => mutation::inversion(genome, p.rate, rng),
            MutationType::Scramble => mutation::scramble(genome, p.rate, rng),
            MutationType::Gaussian => mutation::gaussian(genome, p.rate, p.sigma, rng),
            MutationType::Uniform => mutation::uniform(genome, p.rate, p.low, p.high, rng),
            MutationType::Polynomial => {
                mutation::polynomial(genome, p.rate, p.eta, p.low, p.high, rng)
            }
            MutationType::Creep => mutation::creep(genome, p.rate, p.step, p.low, p.high, rng),
            // No improvement flag available here: fall back to Gaussian at
            // the current adapted rate.
            MutationType::Adaptive => {
                let rate = self.effective_rate();
                mutation::gaussian(genome, rate, p.sigma, rng);
            }
        }
    }

    pub fn stats(&self) -> MutationStats {
        self.stats
    }

    pub fn success_rate(&self) -> f64 {
        if self.stats.mutations == 0 {
            0.0
        } else {
            self.stats.successful as f64 / self.stats.mutations as f64
        }
    }

    /// The rate actually applied. Differs from the nominal configured rate
    /// only while adaptive mode is active.
    pub fn effective_rate(&self) -> f64 {
        self.adaptive
            .as_ref()
            .map(|a| a.rate())
            .unwrap_or(self.params.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rejects_inverted_bounds() {
        let params = MutationParams {
            low: 1.0,
            high: -1.0,
            ..Default::default()
        };
        assert!(MutationEngine::new(MutationType::Uniform, params).is_err());
    }

    #[test]
    fn counters_track_calls_and_successes() {
        let mut engine =
            MutationEngine::new(MutationType::Gaussian, MutationParams::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let mut genome = Genome::new(vec![0.0; 8]);

        engine.mutate(&mut genome, Some(true), &mut rng);
        engine.mutate(&mut genome, Some(false), &mut rng);
        engine.mutate(&mut genome, None, &mut rng);

        let stats = engine.stats();
        assert_eq!(stats.mutations, 3);
        assert_eq!(stats.successful, 1);
        assert!((engine.success_rate() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn effective_rate_tracks_adaptive_state() {
        let params = MutationParams {
            rate: 0.1,
            min_rate: 0.001,
            max_rate: 0.9,
            success_threshold: 0.2,
            ..Default::default()
        };
        let mut engine = MutationEngine::new(MutationType::Adaptive, params).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let mut genome = Genome::new(vec![0.0; 8]);

        assert!((engine.effective_rate() - 0.1).abs() < 1e-12);
        for _ in 0..10 {
            engine.mutate(&mut genome, Some(true), &mut rng);
        }
        assert!((engine.effective_rate() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn non_adaptive_effective_rate_is_nominal() {
        let engine =
            MutationEngine::new(MutationType::Creep, MutationParams::default()).unwrap();
        assert!((engine.effective_rate() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn combined_mutation_applies_each_operator() {
        let mut engine =
            MutationEngine::new(MutationType::Gaussian, MutationParams::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(8);
        let mut genome = Genome::new(vec![0.5; 16]);

        engine.combined_mutation(
            &mut genome,
            &[MutationType::Gaussian, MutationType::Swap, MutationType::Creep],
            &mut rng,
        );

        assert_eq!(engine.stats().mutations, 3);
    }
}
