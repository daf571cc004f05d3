//! Species reference data and the lookup used to resolve user queries.
//!
//! The pokedex is a read-only RON table of [`Species`] entries. Species with
//! several forms have one entry per form sharing the same id.

use crate::errors::{SpeciesError, SpeciesResult};
use crate::fuzzy::close_matches;
use schema::Species;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Forms of one species keyed by lowercase form name. Species without forms
/// have a single entry under the empty string.
pub type SpeciesForms = BTreeMap<String, Arc<Species>>;

/// Maximum number of suggestions offered for a misspelled species name.
pub const MAX_SUGGESTIONS: usize = 3;

static EMBEDDED_POKEDEX: LazyLock<SpeciesResult<Pokedex>> =
    LazyLock::new(|| Pokedex::from_ron(include_str!("../data/pokedex.ron")));

/// Read access to species reference data.
pub trait SpeciesLookup {
    /// All forms of the species with this pokedex number.
    fn fetch_by_id(&self, id: u16) -> SpeciesResult<SpeciesForms>;

    /// All forms of the species with this name, ignoring case.
    fn fetch_by_name(&self, name: &str) -> SpeciesResult<SpeciesForms>;

    /// Every species name, once each.
    fn names(&self) -> Vec<&str>;

    /// Resolve a user query such as `25`, `pikachu` or `Rotom (Wash)`.
    ///
    /// Misspelled names fail with [`SpeciesError::AmbiguousSpecies`] listing
    /// the close matches. A species with several forms needs the form in
    /// parentheses unless it has only one.
    fn search(&self, query: &str) -> SpeciesResult<Arc<Species>> {
        let query = query.trim();
        let (base, form) = split_form(query);

        let forms = if !base.is_empty() && base.chars().all(|c| c.is_ascii_digit()) {
            let id = base
                .parse::<u16>()
                .map_err(|_| SpeciesError::UnknownSpecies(base.to_string()))?;
            self.fetch_by_id(id)?
        } else {
            match self.fetch_by_name(base) {
                Ok(forms) => forms,
                Err(SpeciesError::UnknownSpecies(_)) => {
                    return Err(self.suggest(base));
                }
                Err(e) => return Err(e),
            }
        };

        pick_form(query, base, form, forms)
    }

    /// One specific form of a species, as stored in a tracker file.
    fn fetch_form(&self, id: u16, form: &str) -> SpeciesResult<Arc<Species>> {
        let forms = self.fetch_by_id(id)?;
        pick_form(&id.to_string(), &id.to_string(), form, forms)
    }

    /// The error reported for a name with no exact match.
    fn suggest(&self, name: &str) -> SpeciesError {
        let names = self.names();
        let candidates: Vec<String> = close_matches(name, names, MAX_SUGGESTIONS)
            .into_iter()
            .filter_map(|matched| self.fetch_by_name(matched).ok())
            .filter_map(|forms| forms.into_values().next())
            .map(|species| species.to_string())
            .collect();

        if candidates.is_empty() {
            SpeciesError::UnknownSpecies(name.to_string())
        } else {
            SpeciesError::AmbiguousSpecies {
                query: name.to_string(),
                candidates,
            }
        }
    }
}

/// Split `Name (form)` into its name and form parts.
fn split_form(query: &str) -> (&str, &str) {
    match query.split_once('(') {
        Some((base, rest)) => {
            let form = rest.split_once(')').map_or(rest, |(form, _)| form);
            (base.trim(), form.trim())
        }
        None => (query, ""),
    }
}

fn pick_form(
    query: &str,
    base: &str,
    form: &str,
    forms: SpeciesForms,
) -> SpeciesResult<Arc<Species>> {
    let only = if forms.len() == 1 { forms.values().next() } else { None };
    if let Some(species) = only.or_else(|| forms.get(&form.to_lowercase())) {
        return Ok(Arc::clone(species));
    }
    Err(SpeciesError::AmbiguousForm {
        query: query.to_string(),
        candidates: forms
            .values()
            .map(|species| format!("{} ({})", base, species.form))
            .collect(),
    })
}

/// In-memory species table indexed by id and name.
#[derive(Debug, Clone, Default)]
pub struct Pokedex {
    by_id: BTreeMap<u16, SpeciesForms>,
    by_name: HashMap<String, u16>,
}

impl Pokedex {
    /// Build the indexes from a list of species entries.
    pub fn from_species(entries: impl IntoIterator<Item = Species>) -> SpeciesResult<Self> {
        let mut pokedex = Self::default();
        for species in entries {
            if species.id == 0 || species.name.trim().is_empty() {
                return Err(SpeciesError::MalformedData(format!(
                    "invalid entry #{} '{}'",
                    species.id, species.name
                )));
            }

            let name_key = species.name.to_lowercase();
            match pokedex.by_name.get(&name_key) {
                Some(&id) if id != species.id => {
                    return Err(SpeciesError::MalformedData(format!(
                        "'{}' is listed under #{} and #{}",
                        species.name, id, species.id
                    )));
                }
                _ => {}
            }

            let forms = pokedex.by_id.entry(species.id).or_default();
            if let Some(existing) = forms.values().next() {
                if !existing.name.eq_ignore_ascii_case(&species.name) {
                    return Err(SpeciesError::MalformedData(format!(
                        "#{} is listed as both '{}' and '{}'",
                        species.id, existing.name, species.name
                    )));
                }
            }
            let form_key = species.form.to_lowercase();
            if forms.contains_key(&form_key) {
                return Err(SpeciesError::MalformedData(format!(
                    "duplicate entry for {}",
                    species.display_name()
                )));
            }
            let id = species.id;
            forms.insert(form_key, Arc::new(species));
            pokedex.by_name.insert(name_key, id);
        }
        Ok(pokedex)
    }

    /// Parse a RON list of species.
    pub fn from_ron(source: &str) -> SpeciesResult<Self> {
        let entries: Vec<Species> =
            ron::from_str(source).map_err(|e| SpeciesError::MalformedData(e.to_string()))?;
        Self::from_species(entries)
    }

    /// The table shipped with the binary.
    pub fn embedded() -> SpeciesResult<Self> {
        (*EMBEDDED_POKEDEX).clone()
    }

    /// Load an external table from disk.
    pub fn load(path: &Path) -> SpeciesResult<Self> {
        let source = fs::read_to_string(path).map_err(|e| {
            SpeciesError::MalformedData(format!("could not read {}: {}", path.display(), e))
        })?;
        let pokedex = Self::from_ron(&source)?;
        tracing::info!(
            "Loaded {} species from {}",
            pokedex.by_id.len(),
            path.display()
        );
        Ok(pokedex)
    }

    /// Number of distinct species ids.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl SpeciesLookup for Pokedex {
    fn fetch_by_id(&self, id: u16) -> SpeciesResult<SpeciesForms> {
        match self.by_id.get(&id) {
            Some(forms) => {
                tracing::debug!("Pokedex hit for #{}", id);
                Ok(forms.clone())
            }
            None => {
                tracing::debug!("Pokedex miss for #{}", id);
                Err(SpeciesError::UnknownSpecies(id.to_string()))
            }
        }
    }

    fn fetch_by_name(&self, name: &str) -> SpeciesResult<SpeciesForms> {
        match self.by_name.get(&name.trim().to_lowercase()) {
            Some(id) => {
                tracing::debug!("Pokedex hit for '{}'", name);
                self.fetch_by_id(*id)
            }
            None => {
                tracing::debug!("Pokedex miss for '{}'", name);
                Err(SpeciesError::UnknownSpecies(name.to_string()))
            }
        }
    }

    fn names(&self) -> Vec<&str> {
        self.by_id
            .values()
            .filter_map(|forms| forms.values().next())
            .map(|species| species.name.as_str())
            .collect()
    }
}
