use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the EV tracker.
///
/// Every variant is recoverable at the command boundary: the REPL reports it
/// and keeps running.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Error related to species lookup
    #[error(transparent)]
    Species(#[from] SpeciesError),
    /// Error related to item or consumable resolution
    #[error(transparent)]
    Effect(#[from] EffectError),
    /// Error reading or writing the tracker file
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Error loading or validating configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// No Pokemon with this id is being tracked
    #[error("No tracked Pokemon with id '{0}' was found.")]
    UnknownPokemon(u32),
    /// An operation that targets the team was run while the team is empty
    #[error("No tracked Pokemon is on the team.")]
    NoActivePokemon,
}

/// Errors raised by the species lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesError {
    #[error("No match found for '{0}'.")]
    UnknownSpecies(String),
    /// The name did not match exactly, but some names are close
    #[error("No match found for '{query}'.")]
    AmbiguousSpecies { query: String, candidates: Vec<String> },
    /// The species has several forms and none was selected
    #[error("No match found for '{query}'.")]
    AmbiguousForm { query: String, candidates: Vec<String> },
    /// The reference table could not be parsed
    #[error("Malformed pokedex data: {0}")]
    MalformedData(String),
}

/// Errors raised when resolving held items and consumables by name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("Invalid item '{0}'")]
    UnknownItem(String),
    #[error("Invalid vitamin '{0}'")]
    UnknownEffect(String),
    #[error("'{query}' could refer to several items")]
    AmbiguousEffect { query: String, candidates: Vec<String> },
}

/// Errors raised by tracker persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed tracker file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported generation {0}, expected 1 to 9")]
    InvalidGeneration(u8),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl TrackerError {
    /// Candidate names to suggest to the user, if the error carries any.
    pub fn candidates(&self) -> &[String] {
        match self {
            TrackerError::Species(SpeciesError::AmbiguousSpecies { candidates, .. })
            | TrackerError::Species(SpeciesError::AmbiguousForm { candidates, .. })
            | TrackerError::Effect(EffectError::AmbiguousEffect { candidates, .. }) => candidates,
            _ => &[],
        }
    }
}

/// Type alias for Results using TrackerError
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Type alias for Results using SpeciesError
pub type SpeciesResult<T> = Result<T, SpeciesError>;

/// Type alias for Results using EffectError
pub type EffectResult<T> = Result<T, EffectError>;

/// Type alias for Results using StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for Results using ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
