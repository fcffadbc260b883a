use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvoError, Result};
use crate::genome::{Gene, Genome};

/// Parent-selection strategy. Every variant maps an evaluated population
/// to one chosen parent; none of them retains the population reference
/// past the call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    Tournament { size: usize },
    Roulette,
    Rank,
    Truncation { keep_ratio: f64 },
}

impl SelectionMethod {
    pub fn select<'a, T: Gene, R: Rng>(
        &self,
        population: &'a [Genome<T>],
        rng: &mut R,
    ) -> Result<&'a Genome<T>> {
        match *self {
            SelectionMethod::Tournament { size } => tournament(population, size, rng),
            SelectionMethod::Roulette => roulette(population, rng),
            SelectionMethod::Rank => rank(population, rng),
            SelectionMethod::Truncation { keep_ratio } => truncation(population, keep_ratio, rng),
        }
    }
}

fn require_fitness<T: Gene>(genome: &Genome<T>) -> Result<f64> {
    genome.fitness().ok_or_else(|| {
        EvoError::Precondition(format!(
            "Genome {} has no fitness; call evaluate() before selection",
            genome.id()
        ))
    })
}

fn require_non_empty<T: Gene>(population: &[Genome<T>]) -> Result<()> {
    if population.is_empty() {
        return Err(EvoError::Precondition(
            "Cannot select from an empty population".to_string(),
        ));
    }
    Ok(())
}

/// Tournament selection: pick the best of `size` random candidates drawn
/// with replacement. Ties keep the first candidate encountered.
pub fn tournament<'a, T: Gene, R: Rng>(
    population: &'a [Genome<T>],
    size: usize,
    rng: &mut R,
) -> Result<&'a Genome<T>> {
    require_non_empty(population)?;
    if size == 0 {
        return Err(EvoError::Configuration(
            "Tournament size must be at least 1".to_string(),
        ));
    }

    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = require_fitness(&population[best_idx])?;

    for _ in 1..size {
        let idx = rng.gen_range(0..population.len());
        let fitness = require_fitness(&population[idx])?;
        if fitness > best_fitness {
            best_idx = idx;
            best_fitness = fitness;
        }
    }

    Ok(&population[best_idx])
}

/// Roulette wheel selection: probability proportional to fitness, with
/// negative fitness clamped to zero. When the total weight is zero the
/// selection falls back to a uniform random pick.
pub fn roulette<'a, T: Gene, R: Rng>(
    population: &'a [Genome<T>],
    rng: &mut R,
) -> Result<&'a Genome<T>> {
    require_non_empty(population)?;

    let mut total_fitness = 0.0;
    for genome in population {
        total_fitness += require_fitness(genome)?.max(0.0);
    }

    if total_fitness <= 0.0 {
        // All fitness non-positive: uniform pick avoids division by zero
        // and avoids biasing toward any one individual.
        return Ok(&population[rng.gen_range(0..population.len())]);
    }

    let mut spin = rng.gen::<f64>() * total_fitness;
    for genome in population {
        spin -= require_fitness(genome)?.max(0.0);
        if spin <= 0.0 {
            return Ok(genome);
        }
    }

    // Floating-point slack: the walk can overshoot by a rounding error.
    Ok(&population[population.len() - 1])
}

/// Rank-based selection: sort ascending by fitness, weight by rank 1..N,
/// then select with the same cumulative walk as roulette.
pub fn rank<'a, T: Gene, R: Rng>(
    population: &'a [Genome<T>],
    rng: &mut R,
) -> Result<&'a Genome<T>> {
    require_non_empty(population)?;

    let fitness: Vec<f64> = population
        .iter()
        .map(require_fitness)
        .collect::<Result<_>>()?;

    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        fitness[a]
            .partial_cmp(&fitness[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let n = population.len();
    let total_rank = (n * (n + 1) / 2) as f64;
    let mut spin = rng.gen::<f64>() * total_rank;

    for (position, &idx) in order.iter().enumerate() {
        spin -= (position + 1) as f64;
        if spin <= 0.0 {
            return Ok(&population[idx]);
        }
    }

    Ok(&population[order[n - 1]])
}

/// Truncation selection: keep the top `keep_ratio` fraction by fitness
/// (at least one individual), then pick uniformly within it.
pub fn truncation<'a, T: Gene, R: Rng>(
    population: &'a [Genome<T>],
    keep_ratio: f64,
    rng: &mut R,
) -> Result<&'a Genome<T>> {
    require_non_empty(population)?;
    if !(0.0..=1.0).contains(&keep_ratio) {
        return Err(EvoError::Configuration(
            "Truncation keep_ratio must be between 0 and 1".to_string(),
        ));
    }

    let fitness: Vec<f64> = population
        .iter()
        .map(require_fitness)
        .collect::<Result<_>>()?;

    let mut order: Vec<usize> = (0..population.len()).collect();
    order.sort_by(|&a, &b| {
        fitness[b]
            .partial_cmp(&fitness[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let keep = ((population.len() as f64 * keep_ratio) as usize)
        .max(1)
        .min(population.len());

    Ok(&population[order[rng.gen_range(0..keep)]])
}
