use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EvoError, Result};
use crate::genome::{Gene, Genome};

/// Crossover strategy. Every variant takes two equal-length parents and
/// returns exactly two fresh children (new ids, age 0, fitness unset).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverMethod {
    SinglePoint,
    TwoPoint,
    Uniform { p: f64 },
    Arithmetic { alpha: f64 },
    Sbx { eta: f64 },
}

impl CrossoverMethod {
    /// Dispatch over real-valued genomes. The positional variants are also
    /// available as generic free functions for non-numeric gene types.
    pub fn apply<R: Rng>(
        &self,
        parent1: &Genome<f64>,
        parent2: &Genome<f64>,
        rng: &mut R,
    ) -> Result<(Genome<f64>, Genome<f64>)> {
        match *self {
            CrossoverMethod::SinglePoint => single_point(parent1, parent2, rng),
            CrossoverMethod::TwoPoint => two_point(parent1, parent2, rng),
            CrossoverMethod::Uniform { p } => uniform(parent1, parent2, p, rng),
            CrossoverMethod::Arithmetic { alpha } => arithmetic(parent1, parent2, alpha),
            CrossoverMethod::Sbx { eta } => sbx(parent1, parent2, eta, rng),
        }
    }
}

fn check_lengths<T: Gene>(parent1: &Genome<T>, parent2: &Genome<T>) -> Result<()> {
    if parent1.len() != parent2.len() {
        return Err(EvoError::GenomeMismatch {
            expected: parent1.len(),
            actual: parent2.len(),
        });
    }
    Ok(())
}

/// Single-point crossover: cut at one random index, swap the tails.
pub fn single_point<T: Gene, R: Rng>(
    parent1: &Genome<T>,
    parent2: &Genome<T>,
    rng: &mut R,
) -> Result<(Genome<T>, Genome<T>)> {
    check_lengths(parent1, parent2)?;
    let len = parent1.len();

    let mut child1 = parent1.genes().to_vec();
    let mut child2 = parent2.genes().to_vec();

    if len > 1 {
        let cut = rng.gen_range(0..len);
        child1[cut..].clone_from_slice(&parent2.genes()[cut..]);
        child2[cut..].clone_from_slice(&parent1.genes()[cut..]);
    }

    Ok((Genome::new(child1), Genome::new(child2)))
}

/// Two-point crossover: order two random cut indices, swap the middle
/// segment between the parents.
pub fn two_point<T: Gene, R: Rng>(
    parent1: &Genome<T>,
    parent2: &Genome<T>,
    rng: &mut R,
) -> Result<(Genome<T>, Genome<T>)> {
    check_lengths(parent1, parent2)?;
    let len = parent1.len();

    let mut child1 = parent1.genes().to_vec();
    let mut child2 = parent2.genes().to_vec();

    if len > 1 {
        let mut a = rng.gen_range(0..len);
        let mut b = rng.gen_range(0..len);
        if a > b {
            std::mem::swap(&mut a, &mut b);
        }
        child1[a..b].clone_from_slice(&parent2.genes()[a..b]);
        child2[a..b].clone_from_slice(&parent1.genes()[a..b]);
    }

    Ok((Genome::new(child1), Genome::new(child2)))
}

/// Uniform crossover: for each position independently, with probability
/// `p` child 1 inherits parent 1's gene (else the genes are swapped).
pub fn uniform<T: Gene, R: Rng>(
    parent1: &Genome<T>,
    parent2: &Genome<T>,
    p: f64,
    rng: &mut R,
) -> Result<(Genome<T>, Genome<T>)> {
    check_lengths(parent1, parent2)?;

    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent1.len());

    for (g1, g2) in parent1.genes().iter().zip(parent2.genes()) {
        if rng.gen::<f64>() < p {
            child1.push(g1.clone());
            child2.push(g2.clone());
        } else {
            child1.push(g2.clone());
            child2.push(g1.clone());
        }
    }

    Ok((Genome::new(child1), Genome::new(child2)))
}

/// Arithmetic crossover: children are complementary convex combinations
/// of the parents, so `c1[i] + c2[i] == p1[i] + p2[i]` exactly.
pub fn arithmetic(
    parent1: &Genome<f64>,
    parent2: &Genome<f64>,
    alpha: f64,
) -> Result<(Genome<f64>, Genome<f64>)> {
    check_lengths(parent1, parent2)?;

    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent1.len());

    for (&g1, &g2) in parent1.genes().iter().zip(parent2.genes()) {
        child1.push(alpha * g1 + (1.0 - alpha) * g2);
        child2.push((1.0 - alpha) * g1 + alpha * g2);
    }

    Ok((Genome::new(child1), Genome::new(child2)))
}

/// Simulated Binary Crossover. Larger `eta` concentrates children nearer
/// the parents (exploitation), smaller `eta` spreads them out
/// (exploration). Identical parents always produce identical children.
pub fn sbx<R: Rng>(
    parent1: &Genome<f64>,
    parent2: &Genome<f64>,
    eta: f64,
    rng: &mut R,
) -> Result<(Genome<f64>, Genome<f64>)> {
    check_lengths(parent1, parent2)?;

    let mut child1 = Vec::with_capacity(parent1.len());
    let mut child2 = Vec::with_capacity(parent1.len());

    for (&g1, &g2) in parent1.genes().iter().zip(parent2.genes()) {
        let u = rng.gen::<f64>();
        let beta = if u <= 0.5 {
            (2.0 * u).powf(1.0 / (eta + 1.0))
        } else {
            (1.0 / (2.0 * (1.0 - u))).powf(1.0 / (eta + 1.0))
        };

        child1.push(0.5 * ((1.0 + beta) * g1 + (1.0 - beta) * g2));
        child2.push(0.5 * ((1.0 - beta) * g1 + (1.0 + beta) * g2));
    }

    Ok((Genome::new(child1), Genome::new(child2)))
}
