use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Precondition error: {0}")]
    Precondition(String),

    #[error("Genome length mismatch: expected {expected}, got {actual}")]
    GenomeMismatch { expected: usize, actual: usize },

    #[error("Gene index {index} out of bounds for genome of length {length}")]
    IndexOutOfBounds { index: usize, length: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, EvoError>;
