use crate::errors::{StorageError, StorageResult, TrackerResult};
use crate::pokedex::SpeciesLookup;
use crate::pokemon::TrackedPokemon;
use crate::tracker::Tracker;
use schema::EvSet;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk layout of the tracker file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackerFile {
    /// Team member ids, ascending.
    #[serde(default)]
    pub team: Vec<u32>,
    #[serde(default)]
    pub pokemon: Vec<PokemonRecord>,
}

/// One tracked Pokemon. The species is stored by pokedex id and form and
/// resolved again on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    pub id: u32,
    pub species: u16,
    #[serde(default)]
    pub form: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub pokerus: bool,
    #[serde(default)]
    pub evs: EvSet,
    #[serde(default)]
    pub target_evs: EvSet,
}

impl PokemonRecord {
    fn from_pokemon(pokemon: &TrackedPokemon) -> Option<Self> {
        Some(Self {
            id: pokemon.id()?,
            species: pokemon.species().id,
            form: pokemon.species().form.clone(),
            name: pokemon.nickname().map(str::to_string),
            item: pokemon.item().map(str::to_string),
            pokerus: pokemon.pokerus,
            evs: pokemon.evs,
            target_evs: pokemon.target_evs,
        })
    }

    fn into_pokemon(self, lookup: &dyn SpeciesLookup) -> TrackerResult<TrackedPokemon> {
        let species = lookup.fetch_form(self.species, &self.form)?;
        let mut pokemon = TrackedPokemon::new(species);
        pokemon.assign_id(self.id);
        pokemon.rename(self.name.as_deref());
        if let Err(e) = pokemon.set_item(self.item.as_deref()) {
            tracing::warn!("Dropping held item of Pokemon {}: {}", self.id, e);
        }
        pokemon.pokerus = self.pokerus;
        pokemon.evs = self.evs;
        pokemon.target_evs = self.target_evs;
        Ok(pokemon)
    }
}

impl From<&Tracker> for TrackerFile {
    fn from(tracker: &Tracker) -> Self {
        Self {
            team: tracker.team().collect(),
            pokemon: tracker
                .pokemon()
                .filter_map(PokemonRecord::from_pokemon)
                .collect(),
        }
    }
}

/// Reads and writes the tracker file.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the backup written before every save: the tracker path with
    /// `.bak` appended.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".bak");
        PathBuf::from(name)
    }

    /// Load the tracker, resolving species through `lookup`. A missing file
    /// is an empty tracker.
    pub fn load(&self, lookup: &dyn SpeciesLookup) -> TrackerResult<Tracker> {
        if !self.path.exists() {
            tracing::debug!("No tracker file at {}, starting empty", self.path.display());
            return Ok(Tracker::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })?;
        let file: TrackerFile =
            serde_json::from_str(&contents).map_err(|source| StorageError::Json {
                path: self.path.clone(),
                source,
            })?;

        let pokemon = file
            .pokemon
            .into_iter()
            .map(|record| record.into_pokemon(lookup))
            .collect::<TrackerResult<Vec<_>>>()?;
        tracing::info!(
            "Loaded {} tracked Pokemon from {}",
            pokemon.len(),
            self.path.display()
        );
        Ok(Tracker::from_parts(pokemon, file.team))
    }

    /// Write the tracker, first copying any existing file to the backup path.
    pub fn save(&self, tracker: &Tracker) -> StorageResult<()> {
        let io_error = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if self.path.exists() {
            fs::copy(&self.path, self.backup_path()).map_err(io_error)?;
        } else if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let file = TrackerFile::from(tracker);
        let contents = serde_json::to_string_pretty(&file).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, contents).map_err(io_error)?;
        tracing::debug!("Saved {} Pokemon to {}", file.pokemon.len(), self.path.display());
        Ok(())
    }
}
