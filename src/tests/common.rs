use crate::cli::{ReplLine, Session};
use crate::errors::TrackerResult;
use crate::pokedex::{Pokedex, SpeciesLookup};
use crate::pokemon::TrackedPokemon;
use crate::tracker::Tracker;
use clap::Parser;
use schema::{EvSet, Species};
use std::sync::Arc;
use tempfile::TempDir;

/// Look up a species in the embedded pokedex.
pub fn species(query: &str) -> Arc<Species> {
    Pokedex::embedded()
        .and_then(|pokedex| pokedex.search(query))
        .unwrap_or_else(|e| panic!("test species '{}' is missing: {}", query, e))
}

/// A builder for tracked Pokemon with common defaults.
///
/// # Example
/// ```
/// let pokemon = TestPokemonBuilder::new("Pikachu")
///     .with_item("Power Anklet")
///     .with_pokerus()
///     .build();
/// ```
pub struct TestPokemonBuilder {
    species: Arc<Species>,
    item: Option<&'static str>,
    pokerus: bool,
    evs: EvSet,
    target_evs: EvSet,
}

impl TestPokemonBuilder {
    pub fn new(query: &str) -> Self {
        Self {
            species: species(query),
            item: None,
            pokerus: false,
            evs: EvSet::default(),
            target_evs: EvSet::default(),
        }
    }

    pub fn with_item(mut self, item: &'static str) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_pokerus(mut self) -> Self {
        self.pokerus = true;
        self
    }

    pub fn with_evs(mut self, evs: EvSet) -> Self {
        self.evs = evs;
        self
    }

    pub fn with_target(mut self, target_evs: EvSet) -> Self {
        self.target_evs = target_evs;
        self
    }

    pub fn build(self) -> TrackedPokemon {
        let mut pokemon = TrackedPokemon::new(self.species);
        pokemon
            .set_item(self.item)
            .unwrap_or_else(|e| panic!("invalid test item: {}", e));
        pokemon.pokerus = self.pokerus;
        pokemon.evs = self.evs;
        pokemon.target_evs = self.target_evs;
        pokemon
    }
}

/// Track every Pokemon in order (ids start at 1) and put the given ids on
/// the team.
pub fn create_test_tracker(pokemon: Vec<TrackedPokemon>, team: &[u32]) -> Tracker {
    let mut tracker = Tracker::new();
    for entry in pokemon {
        tracker.track(entry);
    }
    for &id in team {
        tracker
            .add_to_team(id)
            .unwrap_or_else(|e| panic!("invalid test team: {}", e));
    }
    tracker
}

/// A session whose config and tracker files live in a fresh temp directory.
/// Keep the directory alive for as long as the session is used.
pub fn create_test_session() -> (TempDir, Session) {
    let dir = TempDir::new().expect("temp dir");
    let session = open_session(&dir);
    (dir, session)
}

pub fn open_session(dir: &TempDir) -> Session {
    Session::open(
        &dir.path().join("config.json"),
        Some(dir.path().join("tracker.json").as_path()),
    )
    .expect("session opens")
}

/// Parse and run one prompt line.
pub fn run(session: &mut Session, line: &str) -> TrackerResult<String> {
    let tokens = shlex::split(line).expect("balanced quotes");
    let parsed = ReplLine::try_parse_from(tokens).expect("valid command");
    session.execute(parsed.command)
}
