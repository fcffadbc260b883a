use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{EvoError, Result};

/// Marker trait for gene values. Anything cloneable and comparable works:
/// floats, integers, discrete symbols.
pub trait Gene: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {}

impl<T: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static> Gene for T {}

static NEXT_GENOME_ID: AtomicU64 = AtomicU64::new(1);

fn next_genome_id() -> u64 {
    NEXT_GENOME_ID.fetch_add(1, Ordering::Relaxed)
}

/// One candidate solution: a fixed-length gene sequence plus a cached
/// fitness value and an age counter.
///
/// The fitness cache is cleared whenever a gene is written, so a stale
/// score can never leak into selection or statistics. All genomes within
/// one population share the same gene-sequence length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genome<T: Gene> {
    id: u64,
    genes: Vec<T>,
    fitness: Option<f64>,
    /// Generations survived. Newly created offspring start at 0.
    pub age: u32,
    /// Open annotations for callers; the engine never reads these.
    pub metadata: HashMap<String, String>,
}

impl<T: Gene> Genome<T> {
    pub fn new(genes: Vec<T>) -> Self {
        Self {
            id: next_genome_id(),
            genes,
            fitness: None,
            age: 0,
            metadata: HashMap::new(),
        }
    }

    /// Create a genome by invoking `gene_generator(index)` for each
    /// position. The generator may be deterministic or randomized;
    /// reproducibility is the caller's responsibility via RNG injection.
    pub fn random<F>(length: usize, gene_generator: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        Self::new((0..length).map(gene_generator).collect())
    }

    /// Identifier, stable for the genome's lifetime.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[T] {
        &self.genes
    }

    /// Read a single gene. Out-of-range indices are a checked error.
    pub fn get(&self, index: usize) -> Result<&T> {
        self.genes.get(index).ok_or(EvoError::IndexOutOfBounds {
            index,
            length: self.genes.len(),
        })
    }

    /// Write a single gene, invalidating the cached fitness.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let length = self.genes.len();
        let gene = self
            .genes
            .get_mut(index)
            .ok_or(EvoError::IndexOutOfBounds { index, length })?;
        *gene = value;
        self.fitness = None;
        Ok(())
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    /// Mutable gene access for operators. Callers must invalidate the
    /// fitness cache themselves when they change a gene.
    pub(crate) fn genes_mut(&mut self) -> &mut [T] {
        &mut self.genes
    }

    /// Normalized Hamming distance: the fraction of differing gene
    /// positions. Both genomes are expected to have equal length.
    pub fn hamming(&self, other: &Self) -> f64 {
        if self.genes.is_empty() {
            return 0.0;
        }
        let differing = self
            .genes
            .iter()
            .zip(&other.genes)
            .filter(|(a, b)| a != b)
            .count();
        differing as f64 / self.genes.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_invalidates_fitness() {
        let mut genome = Genome::new(vec![1.0, 2.0, 3.0]);
        genome.set_fitness(0.5);
        assert_eq!(genome.fitness(), Some(0.5));

        genome.set(1, 9.0).unwrap();
        assert_eq!(genome.fitness(), None);
        assert_eq!(*genome.get(1).unwrap(), 9.0);
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut genome = Genome::new(vec![0.0, 1.0]);
        assert!(matches!(
            genome.get(2),
            Err(EvoError::IndexOutOfBounds { index: 2, length: 2 })
        ));
        assert!(genome.set(5, 1.0).is_err());
    }

    #[test]
    fn clone_is_independent() {
        let mut original = Genome::new(vec![1.0, 2.0, 3.0]);
        original.set_fitness(1.0);

        let mut copy = original.clone();
        copy.set(0, 42.0).unwrap();

        assert_eq!(*original.get(0).unwrap(), 1.0);
        assert_eq!(original.fitness(), Some(1.0));
        assert_eq!(copy.fitness(), None);
    }

    #[test]
    fn random_invokes_generator_per_index() {
        let genome = Genome::random(4, |i| i as f64 * 2.0);
        assert_eq!(genome.genes(), &[0.0, 2.0, 4.0, 6.0]);
        assert_eq!(genome.fitness(), None);
        assert_eq!(genome.age, 0);
    }

    #[test]
    fn hamming_counts_differing_positions() {
        let a = Genome::new(vec![0.0, 1.0, 0.0, 1.0]);
        let b = Genome::new(vec![0.0, 0.0, 0.0, 0.0]);
        assert!((a.hamming(&b) - 0.5).abs() < 1e-12);
        assert_eq!(a.hamming(&a.clone()), 0.0);
    }
}
