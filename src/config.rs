use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{EvoError, Result};
use crate::operators::{CrossoverMethod, SelectionMethod};

/// Genetic algorithm configuration.
///
/// Loadable from and saveable to TOML; `validate` rejects out-of-range
/// parameters before a run can start with them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    pub population_size: usize,
    pub genome_length: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub elite_count: usize,
    pub selection: SelectionMethod,
    pub crossover: CrossoverMethod,
    /// Seed for the run's RNG; `None` draws entropy from the OS.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            genome_length: 32,
            mutation_rate: 0.15,
            crossover_rate: 0.85,
            elite_count: 2,
            selection: SelectionMethod::Tournament { size: 3 },
            crossover: CrossoverMethod::SinglePoint,
            seed: None,
        }
    }
}

impl GaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(EvoError::Configuration(
                "Population size must be at least 2".to_string(),
            ));
        }
        if self.genome_length == 0 {
            return Err(EvoError::Configuration(
                "Genome length must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(EvoError::Configuration(
                "Mutation rate must be between 0 and 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(EvoError::Configuration(
                "Crossover rate must be between 0 and 1".to_string(),
            ));
        }
        if self.elite_count >= self.population_size {
            return Err(EvoError::Configuration(
                "Elite count must be smaller than the population size".to_string(),
            ));
        }
        match self.selection {
            SelectionMethod::Tournament { size } if size == 0 => {
                return Err(EvoError::Configuration(
                    "Tournament size must be at least 1".to_string(),
                ));
            }
            SelectionMethod::Truncation { keep_ratio }
                if !(keep_ratio > 0.0 && keep_ratio <= 1.0) =>
            {
                return Err(EvoError::Configuration(
                    "Truncation keep_ratio must be in (0, 1]".to_string(),
                ));
            }
            _ => {}
        }
        match self.crossover {
            CrossoverMethod::Uniform { p } if !(0.0..=1.0).contains(&p) => {
                return Err(EvoError::Configuration(
                    "Uniform crossover probability must be between 0 and 1".to_string(),
                ));
            }
            CrossoverMethod::Arithmetic { alpha } if !(0.0..=1.0).contains(&alpha) => {
                return Err(EvoError::Configuration(
                    "Arithmetic crossover alpha must be between 0 and 1".to_string(),
                ));
            }
            CrossoverMethod::Sbx { eta } if eta <= 0.0 => {
                return Err(EvoError::Configuration(
                    "SBX eta must be positive".to_string(),
                ));
            }
            _ => {}
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: GaConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GaConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_tiny_population() {
        let config = GaConfig {
            population_size: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_elite_count_at_population_size() {
        let config = GaConfig {
            population_size: 10,
            elite_count: 10,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_rates() {
        let config = GaConfig {
            mutation_rate: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GaConfig {
            crossover_rate: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_operator_parameters() {
        let config = GaConfig {
            selection: SelectionMethod::Truncation { keep_ratio: 0.0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GaConfig {
            crossover: CrossoverMethod::Sbx { eta: -1.0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let config = GaConfig {
            selection: SelectionMethod::Truncation { keep_ratio: 0.25 },
            crossover: CrossoverMethod::Sbx { eta: 15.0 },
            seed: Some(42),
            ..Default::default()
        };

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: GaConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed.selection, config.selection);
        assert_eq!(parsed.crossover, config.crossover);
        assert_eq!(parsed.seed, Some(42));
    }
}
