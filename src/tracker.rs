use crate::errors::{TrackerError, TrackerResult};
use crate::pokemon::TrackedPokemon;
use schema::{EvSet, RulePolicy, Species};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// The result of applying an EV change to one Pokemon.
#[derive(Debug, Clone, PartialEq)]
pub struct EvChange {
    pub pokemon_id: u32,
    /// The change as computed before caps.
    pub requested: EvSet,
    /// The change that actually landed after caps.
    pub applied: EvSet,
}

/// All tracked Pokemon plus the set of ids currently on the team.
#[derive(Debug, Clone)]
pub struct Tracker {
    pokemon: BTreeMap<u32, TrackedPokemon>,
    team: BTreeSet<u32>,
    counter: u32,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            pokemon: BTreeMap::new(),
            team: BTreeSet::new(),
            counter: 1,
        }
    }

    /// Rebuild a tracker from saved Pokemon and team ids. Pokemon without an
    /// id and team ids that match no Pokemon are dropped.
    pub fn from_parts(
        pokemon: impl IntoIterator<Item = TrackedPokemon>,
        team: impl IntoIterator<Item = u32>,
    ) -> Self {
        let mut tracker = Self::new();
        for entry in pokemon {
            match entry.id() {
                Some(id) => {
                    tracker.pokemon.insert(id, entry);
                }
                None => tracing::warn!("Skipping saved Pokemon without an id: {}", entry),
            }
        }
        for id in team {
            if tracker.pokemon.contains_key(&id) {
                tracker.team.insert(id);
            } else {
                tracing::warn!("Dropping team id {} with no tracked Pokemon", id);
            }
        }
        tracker
    }

    /// Lowest unused id at or above the running counter.
    pub fn unique_id(&mut self) -> u32 {
        while self.pokemon.contains_key(&self.counter) {
            self.counter += 1;
        }
        self.counter
    }

    /// Start tracking a Pokemon under a fresh id. Returns the id.
    pub fn track(&mut self, mut pokemon: TrackedPokemon) -> u32 {
        let id = self.unique_id();
        pokemon.assign_id(id);
        tracing::info!("Tracking {}", pokemon);
        self.pokemon.insert(id, pokemon);
        id
    }

    /// Stop tracking a Pokemon, removing it from the team. The returned
    /// Pokemon has no id.
    pub fn release(&mut self, id: u32) -> TrackerResult<TrackedPokemon> {
        let mut pokemon = self
            .pokemon
            .remove(&id)
            .ok_or(TrackerError::UnknownPokemon(id))?;
        self.team.remove(&id);
        pokemon.release();
        tracing::info!("Released {} (was id {})", pokemon, id);
        Ok(pokemon)
    }

    pub fn get(&self, id: u32) -> TrackerResult<&TrackedPokemon> {
        self.pokemon.get(&id).ok_or(TrackerError::UnknownPokemon(id))
    }

    pub fn get_mut(&mut self, id: u32) -> TrackerResult<&mut TrackedPokemon> {
        self.pokemon
            .get_mut(&id)
            .ok_or(TrackerError::UnknownPokemon(id))
    }

    pub fn pokemon(&self) -> impl Iterator<Item = &TrackedPokemon> {
        self.pokemon.values()
    }

    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }

    pub fn add_to_team(&mut self, id: u32) -> TrackerResult<()> {
        self.get(id)?;
        self.team.insert(id);
        Ok(())
    }

    pub fn remove_from_team(&mut self, id: u32) -> TrackerResult<()> {
        self.get(id)?;
        self.team.remove(&id);
        Ok(())
    }

    pub fn on_team(&self, id: u32) -> bool {
        self.team.contains(&id)
    }

    /// Team member ids in ascending order.
    pub fn team(&self) -> impl Iterator<Item = u32> + '_ {
        self.team.iter().copied()
    }

    /// Ids of tracked Pokemon that are not on the team.
    pub fn boxed(&self) -> impl Iterator<Item = u32> + '_ {
        self.pokemon
            .keys()
            .copied()
            .filter(move |id| !self.team.contains(id))
    }

    pub fn location(&self, id: u32) -> &'static str {
        if self.on_team(id) {
            "Team"
        } else {
            "Box"
        }
    }

    /// The Pokemon a battle applies to: the given ids, or the whole team when
    /// none are given. Every id is checked before anything is returned.
    pub fn battle_participants(&self, ids: &[u32]) -> TrackerResult<Vec<u32>> {
        if ids.is_empty() {
            if self.team.is_empty() {
                return Err(TrackerError::NoActivePokemon);
            }
            return Ok(self.team().collect());
        }

        let mut participants = Vec::with_capacity(ids.len());
        for &id in ids {
            self.get(id)?;
            if !participants.contains(&id) {
                participants.push(id);
            }
        }
        Ok(participants)
    }

    /// Record `count` battles against `species` for the given Pokemon (or the
    /// team). All participants are resolved and their changes computed before
    /// any EVs are modified.
    pub fn battle(
        &mut self,
        ids: &[u32],
        species: &Species,
        count: i32,
        rules: &RulePolicy,
    ) -> TrackerResult<Vec<EvChange>> {
        let participants = self.battle_participants(ids)?;
        let requested: Vec<(u32, EvSet)> = participants
            .iter()
            .map(|&id| {
                self.get(id)
                    .map(|pokemon| (id, pokemon.battle_modifier(species, count, rules)))
            })
            .collect::<TrackerResult<_>>()?;

        let mut changes = Vec::with_capacity(requested.len());
        for (id, delta) in requested {
            let pokemon = self.get_mut(id)?;
            let applied = pokemon.apply(&delta, rules);
            tracing::debug!("Battle against {} gave {} {:?}", species.name, pokemon, applied);
            changes.push(EvChange {
                pokemon_id: id,
                requested: delta,
                applied,
            });
        }
        Ok(changes)
    }

    /// Use `count` of a consumable on one Pokemon.
    pub fn use_consumable(
        &mut self,
        id: u32,
        name: &str,
        count: i32,
        rules: &RulePolicy,
    ) -> TrackerResult<(&'static str, EvChange)> {
        let pokemon = self.get_mut(id)?;
        let (resolved, delta) = pokemon.vitamin_modifier(name, count, rules)?;
        let applied = pokemon.apply(&delta, rules);
        tracing::debug!("{} x{} on {} applied {:?}", resolved, count, pokemon, applied);
        Ok((
            resolved,
            EvChange {
                pokemon_id: id,
                requested: delta,
                applied,
            },
        ))
    }
}

impl fmt::Display for Tracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pokemon.is_empty() {
            return write!(f, "No tracked Pokemon");
        }
        let lines: Vec<String> = self
            .pokemon
            .iter()
            .map(|(id, pokemon)| pokemon.listing(self.on_team(*id)))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}
