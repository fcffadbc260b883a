pub mod adaptive;
pub mod crossover;
pub mod engine;
pub mod mutation;
pub mod selection;

pub use adaptive::AdaptiveMutation;
pub use crossover::CrossoverMethod;
pub use engine::{MutationEngine, MutationParams, MutationStats};
pub use mutation::MutationType;
pub use selection::SelectionMethod;
