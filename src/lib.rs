//! Generic genetic algorithm engine.
//!
//! The crate is organized around a [`Genome`] representation, catalogs of
//! pure selection/crossover/mutation operators keyed by strategy enums, a
//! self-adapting mutation wrapper with a dispatching [`MutationEngine`],
//! and a [`GeneticAlgorithm`] orchestrator that owns the population and
//! drives the evaluate/evolve loop.
//!
//! Fitness is always supplied by the caller as a pure function of the
//! gene slice; the engine never evaluates anything itself. All randomness
//! flows through an injectable seeded RNG so runs are reproducible.

pub mod config;
pub mod error;
pub mod evolution;
pub mod genome;
pub mod operators;
pub mod progress;
pub mod stats;

pub use config::GaConfig;
pub use error::{EvoError, Result};
pub use evolution::{GeneticAlgorithm, RunResult};
pub use genome::{Gene, Genome};
pub use operators::{
    AdaptiveMutation, CrossoverMethod, MutationEngine, MutationParams, MutationStats,
    MutationType, SelectionMethod,
};
pub use progress::{
    ChannelProgressCallback, ConsoleProgressCallback, NullProgressCallback, ProgressCallback,
    ProgressMessage,
};
pub use stats::GenerationStats;
