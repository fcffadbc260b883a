use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::GaConfig;
use crate::error::{EvoError, Result};
use crate::genome::Genome;
use crate::progress::{NullProgressCallback, ProgressCallback};
use crate::stats::{self, GenerationStats};

/// Outcome of a full [`GeneticAlgorithm::run`]: the best genome ever
/// evaluated plus the per-generation statistics history.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub best: Genome<f64>,
    pub history: Vec<GenerationStats>,
}

/// The orchestrating evolution loop.
///
/// Owns the population exclusively: operators only ever see transient
/// references to it. Fitness evaluation is the caller's job, supplied as
/// a pure function of the gene slice; evaluation across the population
/// runs in parallel since each genome's score is independent.
pub struct GeneticAlgorithm {
    config: GaConfig,
    population: Vec<Genome<f64>>,
    generation: u32,
    best_ever: Option<Genome<f64>>,
    history: Vec<GenerationStats>,
    rng: StdRng,
    /// Base seed for the per-generation statistics RNG. Diversity sampling
    /// draws from its own stream so reading statistics never consumes
    /// draws from the evolution RNG.
    stats_seed: u64,
}

impl GeneticAlgorithm {
    pub fn new(config: GaConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let stats_seed = rng.gen();
        Ok(Self {
            config,
            population: Vec::new(),
            generation: 0,
            best_ever: None,
            history: Vec::new(),
            rng,
            stats_seed,
        })
    }

    /// Populate `population_size` random genomes of `genome_length` via
    /// `gene_generator(index)` and reset the generation counter.
    pub fn initialize<F>(&mut self, mut gene_generator: F)
    where
        F: FnMut(usize) -> f64,
    {
        self.population = (0..self.config.population_size)
            .map(|_| Genome::random(self.config.genome_length, &mut gene_generator))
            .collect();
        self.generation = 0;
        self.best_ever = None;
        self.history.clear();
        log::debug!(
            "Initialized population of {} genomes of length {}",
            self.config.population_size,
            self.config.genome_length
        );
    }

    /// Score every genome whose fitness is unset, in parallel, and update
    /// the best-ever genome (strictly greater fitness replaces the
    /// incumbent; ties keep it).
    pub fn evaluate<F>(&mut self, fitness_fn: F) -> Result<()>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        self.evaluate_with(fitness_fn, &mut NullProgressCallback)
    }

    fn evaluate_with<F>(&mut self, fitness_fn: F, callback: &mut dyn ProgressCallback) -> Result<()>
    where
        F: Fn(&[f64]) -> f64 + Sync,
    {
        self.require_initialized()?;
        let total = self.population.len();

        let scores: Vec<(usize, f64)> = self
            .population
            .par_iter()
            .enumerate()
            .filter(|(_, genome)| genome.fitness().is_none())
            .map(|(idx, genome)| (idx, fitness_fn(genome.genes())))
            .collect();

        for (count, (idx, score)) in scores.into_iter().enumerate() {
            if !score.is_finite() {
                return Err(EvoError::Precondition(format!(
                    "Fitness function returned non-finite value {score} for genome {}",
                    self.population[idx].id()
                )));
            }
            self.population[idx].set_fitness(score);
            callback.on_genome_evaluated(count + 1, total);
        }

        for genome in &self.population {
            let Some(fitness) = genome.fitness() else { continue };
            let replace = match &self.best_ever {
                None => true,
                Some(best) => fitness > best.fitness().unwrap_or(f64::NEG_INFINITY),
            };
            if replace {
                self.best_ever = Some(genome.clone());
            }
        }

        Ok(())
    }

    /// Produce the next generation: elitism, selection, crossover at
    /// `crossover_rate` (exact clones otherwise), then the supplied
    /// mutation operator on each child at `mutation_rate`.
    ///
    /// Requires a fully evaluated population. The population size is
    /// preserved exactly; elites age by one generation, fresh offspring
    /// start at age 0.
    pub fn evolve<M>(&mut self, mut mutate_fn: M) -> Result<()>
    where
        M: FnMut(&mut Genome<f64>, f64, &mut StdRng),
    {
        self.require_evaluated()?;

        self.population.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let generation_stats = self.compute_stats()?;

        let selection = self.config.selection;
        let crossover = self.config.crossover;
        let population_size = self.config.population_size;

        let mut next_generation: Vec<Genome<f64>> = Vec::with_capacity(population_size);
        for elite in self.population.iter().take(self.config.elite_count) {
            let mut survivor = elite.clone();
            survivor.age += 1;
            next_generation.push(survivor);
        }

        while next_generation.len() < population_size {
            let (mut child1, mut child2) = {
                let parent1 = selection.select(&self.population, &mut self.rng)?;
                let parent2 = selection.select(&self.population, &mut self.rng)?;

                if self.rng.gen::<f64>() < self.config.crossover_rate {
                    crossover.apply(parent1, parent2, &mut self.rng)?
                } else {
                    // No crossover: children are exact clones of the
                    // parents, genetic material unmodified.
                    (
                        Genome::new(parent1.genes().to_vec()),
                        Genome::new(parent2.genes().to_vec()),
                    )
                }
            };

            mutate_fn(&mut child1, self.config.mutation_rate, &mut self.rng);
            next_generation.push(child1);

            if next_generation.len() < population_size {
                mutate_fn(&mut child2, self.config.mutation_rate, &mut self.rng);
                next_generation.push(child2);
            }
        }

        self.population = next_generation;
        self.generation += 1;
        self.history.push(generation_stats);

        log::debug!(
            "Generation {}: best {:.4}, average {:.4}, diversity {:.3}",
            generation_stats.generation,
            generation_stats.best,
            generation_stats.average,
            generation_stats.diversity
        );

        Ok(())
    }

    /// Evaluate once, then alternate evolve/evaluate for the requested
    /// number of generations.
    pub fn run<F, M>(&mut self, fitness_fn: F, mutate_fn: M, generations: u32) -> Result<RunResult>
    where
        F: Fn(&[f64]) -> f64 + Sync,
        M: FnMut(&mut Genome<f64>, f64, &mut StdRng),
    {
        self.run_with_progress(fitness_fn, mutate_fn, generations, &mut NullProgressCallback)
    }

    pub fn run_with_progress<F, M>(
        &mut self,
        fitness_fn: F,
        mut mutate_fn: M,
        generations: u32,
        callback: &mut dyn ProgressCallback,
    ) -> Result<RunResult>
    where
        F: Fn(&[f64]) -> f64 + Sync,
        M: FnMut(&mut Genome<f64>, f64, &mut StdRng),
    {
        self.require_initialized()?;
        self.evaluate_with(&fitness_fn, callback)?;

        for _ in 0..generations {
            callback.on_generation_start(self.generation);
            self.evolve(&mut mutate_fn)?;
            self.evaluate_with(&fitness_fn, callback)?;
            if let Some(stats) = self.history.last() {
                callback.on_generation_complete(stats);
            }
        }

        let best = self.best_ever.clone().ok_or_else(|| {
            EvoError::Precondition("Run completed without evaluating any genome".to_string())
        })?;

        log::info!(
            "Run complete after {} generations: best fitness {:?}",
            self.generation,
            best.fitness()
        );

        Ok(RunResult {
            best,
            history: self.history.clone(),
        })
    }

    /// Statistics over the current, fully evaluated population.
    pub fn statistics(&self) -> Result<GenerationStats> {
        self.require_evaluated()?;
        self.compute_stats()
    }

    /// Statistics recorded at each completed generation.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    pub fn population(&self) -> &[Genome<f64>] {
        &self.population
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Best genome ever evaluated, across all generations.
    pub fn best(&self) -> Option<&Genome<f64>> {
        self.best_ever.as_ref()
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    fn require_initialized(&self) -> Result<()> {
        if self.population.is_empty() {
            return Err(EvoError::Precondition(
                "Population is empty; call initialize() first".to_string(),
            ));
        }
        Ok(())
    }

    fn require_evaluated(&self) -> Result<()> {
        self.require_initialized()?;
        if let Some(genome) = self.population.iter().find(|g| g.fitness().is_none()) {
            return Err(EvoError::Precondition(format!(
                "Genome {} has no fitness; call evaluate() before evolving or reading statistics",
                genome.id()
            )));
        }
        Ok(())
    }

    fn compute_stats(&self) -> Result<GenerationStats> {
        let mut best = f64::NEG_INFINITY;
        let mut worst = f64::INFINITY;
        let mut sum = 0.0;

        for genome in &self.population {
            let fitness = genome.fitness().ok_or_else(|| {
                EvoError::Precondition(format!("Genome {} has no fitness", genome.id()))
            })?;
            best = best.max(fitness);
            worst = worst.min(fitness);
            sum += fitness;
        }

        // Derived per-generation stream: repeated reads of the same
        // generation sample identically and leave the evolution RNG
        // untouched.
        let mut stats_rng = StdRng::seed_from_u64(self.stats_seed ^ u64::from(self.generation));

        Ok(GenerationStats {
            generation: self.generation,
            best,
            worst,
            average: sum / self.population.len() as f64,
            diversity: stats::diversity(&self.population, &mut stats_rng),
        })
    }
}
