use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::genome::{Gene, Genome};

/// How many individuals the diversity metric samples per generation.
const DIVERSITY_SAMPLE: usize = 10;

/// Per-generation convergence statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u32,
    pub best: f64,
    pub worst: f64,
    pub average: f64,
    /// Mean pairwise normalized Hamming distance over a uniform sample of
    /// the population.
    pub diversity: f64,
}

/// Diversity as the mean pairwise fraction of differing gene positions,
/// sampled over at most [`DIVERSITY_SAMPLE`] individuals drawn uniformly
/// across the whole population.
pub fn diversity<T: Gene, R: Rng>(population: &[Genome<T>], rng: &mut R) -> f64 {
    if population.len() < 2 {
        return 0.0;
    }

    let k = DIVERSITY_SAMPLE.min(population.len());
    let sample = rand::seq::index::sample(rng, population.len(), k);

    let mut total = 0.0;
    let mut pairs = 0u32;
    for i in 0..k {
        for j in (i + 1)..k {
            total += population[sample.index(i)].hamming(&population[sample.index(j)]);
            pairs += 1;
        }
    }

    if pairs == 0 {
        0.0
    } else {
        total / pairs as f64
    }
}
