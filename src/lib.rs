// In: src/lib.rs

//! EV Tracker
//!
//! Tracks the Effort Values of individual Pokemon while they train: battle
//! rewards, held items, vitamins and berries, with the caps and bonuses of
//! each game generation.

// --- MODULE DECLARATIONS ---
pub mod cli;
pub mod config;
pub mod errors;
pub mod fuzzy;
pub mod items;
pub mod pokedex;
pub mod pokemon;
pub mod storage;
pub mod tracker;

#[cfg(test)]
mod tests;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{EvPatch, EvSet, RulePolicy, Species, Stat, LATEST_GENERATION, TOTAL_EV_CAP};

// --- From this crate's modules (`src/`) ---
pub use cli::{Cli, Command, Session};
pub use config::Config;
pub use errors::{TrackerError, TrackerResult};
pub use items::{Effect, CONSUMABLES, HELD_ITEMS};
pub use pokedex::{Pokedex, SpeciesLookup};
pub use pokemon::TrackedPokemon;
pub use storage::Storage;
pub use tracker::Tracker;
