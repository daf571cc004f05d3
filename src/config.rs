//! Session configuration stored as JSON next to the working directory.

use crate::errors::{ConfigError, ConfigResult};
use schema::{RulePolicy, LATEST_GENERATION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_TRACKER_FILENAME: &str = ".ev-tracker";
pub const DEFAULT_GENERATION: u8 = 8;

/// Tracker file in the user's home directory, or in the working directory
/// when no home directory can be found.
pub fn default_tracker_path() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_TRACKER_FILENAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TRACKER_FILENAME))
}

/// Persisted settings. Fields missing from the file take their defaults and
/// unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracker file location.
    pub filename: Option<PathBuf>,
    pub generation: u8,
    pub alternate_ruleset: bool,
    pub ignore_pokerus: bool,
    /// External pokedex table; the embedded one is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pokedex: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filename: None,
            generation: DEFAULT_GENERATION,
            alternate_ruleset: false,
            ignore_pokerus: false,
            pokedex: None,
        }
    }
}

impl Config {
    /// Read the config at `path`, or the defaults when it does not exist.
    ///
    /// `infile` replaces the stored tracker location. The returned config
    /// always has a tracker location and a valid generation.
    pub fn load(path: &Path, infile: Option<&Path>) -> ConfigResult<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Config::default()
        };

        if let Some(infile) = infile {
            config.filename = Some(infile.to_path_buf());
        }
        if config.filename.is_none() {
            config.filename = Some(default_tracker_path());
        }
        config.validate()?;

        tracing::debug!("Resolved config {:?}", config);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if (1..=LATEST_GENERATION).contains(&self.generation) {
            Ok(())
        } else {
            Err(ConfigError::InvalidGeneration(self.generation))
        }
    }

    pub fn tracker_path(&self) -> PathBuf {
        self.filename.clone().unwrap_or_else(default_tracker_path)
    }

    /// Change the generation, rejecting unsupported values.
    pub fn set_generation(&mut self, generation: u8) -> ConfigResult<()> {
        let previous = self.generation;
        self.generation = generation;
        if let Err(e) = self.validate() {
            self.generation = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn rules(&self) -> RulePolicy {
        RulePolicy::new(self.generation)
            .with_alternate_ruleset(self.alternate_ruleset)
            .with_ignore_pokerus(self.ignore_pokerus)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tracker file: {}", self.tracker_path().display())?;
        writeln!(f, "Generation: {}", self.generation)?;
        writeln!(f, "Alternate ruleset: {}", self.alternate_ruleset)?;
        writeln!(f, "Ignore Pokerus: {}", self.ignore_pokerus)?;
        match &self.pokedex {
            Some(path) => write!(f, "Pokedex: {}", path.display()),
            None => write!(f, "Pokedex: embedded"),
        }
    }
}
