use crate::errors::{EffectError, EffectResult};
use crate::items::{Effect, CONSUMABLES, HELD_ITEMS};
use schema::{EvPatch, EvSet, RulePolicy, Species};
use std::fmt;
use std::sync::Arc;

/// A Pokemon whose effort values are being tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedPokemon {
    id: Option<u32>,
    species: Arc<Species>,
    nickname: Option<String>,
    item: Option<&'static str>,
    pub pokerus: bool,
    pub evs: EvSet,
    /// All zero when no target has been set.
    pub target_evs: EvSet,
}

impl TrackedPokemon {
    /// Create an untracked Pokemon with no EVs. The tracker assigns its id.
    pub fn new(species: Arc<Species>) -> Self {
        Self {
            id: None,
            species,
            nickname: None,
            item: None,
            pokerus: false,
            evs: EvSet::default(),
            target_evs: EvSet::default(),
        }
    }

    pub fn id(&self) -> Option<u32> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: u32) {
        self.id = Some(id);
    }

    pub fn species(&self) -> &Arc<Species> {
        &self.species
    }

    pub fn set_species(&mut self, species: Arc<Species>) {
        self.species = species;
    }

    /// The nickname, or the species name when there is none.
    pub fn name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(self.species.name.as_str())
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    /// Set the nickname. Missing or blank names are ignored; use
    /// [`TrackedPokemon::clear_nickname`] to remove one.
    pub fn rename(&mut self, name: Option<&str>) {
        if let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) {
            self.nickname = Some(name.to_string());
        }
    }

    pub fn clear_nickname(&mut self) {
        self.nickname = None;
    }

    pub fn item(&self) -> Option<&'static str> {
        self.item
    }

    /// Give the Pokemon a held item, or take it away with `None`.
    pub fn set_item(&mut self, item: Option<&str>) -> EffectResult<()> {
        self.item = match item {
            Some(name) => {
                let (name, _) = HELD_ITEMS
                    .get(name)
                    .ok_or_else(|| EffectError::UnknownItem(name.to_string()))?;
                Some(name)
            }
            None => None,
        };
        Ok(())
    }

    fn held_effect(&self) -> Option<Effect> {
        self.item
            .and_then(|name| HELD_ITEMS.get(name))
            .map(|(_, effect)| effect)
    }

    /// Overwrite the given stats of the current EVs. Caps are not enforced.
    pub fn set_effort(&mut self, patch: &EvPatch) {
        patch.apply_to(&mut self.evs);
    }

    /// Overwrite the given stats of the target EVs. Caps are not enforced.
    pub fn set_target(&mut self, patch: &EvPatch) {
        patch.apply_to(&mut self.target_evs);
    }

    pub fn clear_target(&mut self) {
        self.target_evs = EvSet::default();
    }

    pub fn has_target(&self) -> bool {
        !self.target_evs.is_zero()
    }

    /// EVs gained from defeating `count` of `species`.
    ///
    /// The species' reward is passed through the held item, doubled by
    /// Pokerus when the rules allow it, then multiplied by `count`. Nothing is
    /// applied; pass the result to [`TrackedPokemon::apply`].
    pub fn battle_modifier(&self, species: &Species, count: i32, rules: &RulePolicy) -> EvSet {
        let mut evs = species.evs;
        if let Some(effect) = self.held_effect() {
            evs = effect.apply(&evs, rules);
        }
        if self.pokerus && rules.pokerus_doubles() {
            evs = evs * 2;
        }
        evs * count
    }

    /// EV change from using `count` of the named consumable.
    ///
    /// Returns the resolved consumable name with the change. Nothing is
    /// applied; pass the result to [`TrackedPokemon::apply`].
    pub fn vitamin_modifier(
        &self,
        name: &str,
        count: i32,
        rules: &RulePolicy,
    ) -> EffectResult<(&'static str, EvSet)> {
        let (name, effect) = CONSUMABLES.resolve(name)?;
        let delta = (effect.apply(&self.evs, rules) - self.evs) * count;
        Ok((name, delta))
    }

    /// Add `delta` to the current EVs within the caps. Returns what was
    /// actually applied.
    pub fn apply(&mut self, delta: &EvSet, rules: &RulePolicy) -> EvSet {
        self.evs.capped_add(delta, rules)
    }

    /// Mark the Pokemon as no longer tracked.
    pub fn release(&mut self) {
        self.id = None;
    }

    /// Multi-line summary: header, location, Pokerus, item and EVs.
    pub fn status(&self, location: Option<&str>) -> String {
        let mut lines = vec![self.to_string()];
        if let Some(location) = location {
            lines.push(format!("Location: {}", location));
        }
        if self.pokerus {
            lines.push("Pokerus".to_string());
        }
        if let Some(item) = self.item {
            lines.push(item.to_string());
        }
        lines.push(self.evs.format(None, Some(&self.target_evs)));
        lines.join("\n")
    }

    /// One line for `list`, starred when on the team.
    pub fn listing(&self, on_team: bool) -> String {
        let marker = if on_team { "* " } else { "  " };
        format!("{}{}", marker, self)
    }
}

impl fmt::Display for TrackedPokemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match &self.nickname {
            Some(nickname) => format!("{} ({})", nickname, self.species.display_name()),
            None => self.species.display_name(),
        };
        match self.id {
            Some(id) => write!(f, "{} {}", id, name),
            None => write!(f, "{}", name),
        }
    }
}
