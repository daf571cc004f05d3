use crate::stats::EvSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A species entry from the pokedex reference table.
///
/// Several entries can share an `id` when the species has forms; `form` is
/// empty for species without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: u16,
    pub name: String,
    #[serde(default)]
    pub form: String,
    /// EVs awarded for defeating one of this species.
    #[serde(default)]
    pub evs: EvSet,
}

impl Species {
    pub fn new(id: u16, name: impl Into<String>, evs: EvSet) -> Self {
        Self {
            id,
            name: name.into(),
            form: String::new(),
            evs,
        }
    }

    pub fn with_form(mut self, form: impl Into<String>) -> Self {
        self.form = form.into();
        self
    }

    pub fn has_form(&self) -> bool {
        !self.form.is_empty()
    }

    /// Name with the form appended, e.g. `Rotom (Wash)`.
    pub fn display_name(&self) -> String {
        if self.has_form() {
            format!("{} ({})", self.name, self.form)
        } else {
            self.name.clone()
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03} {:<10} {}", self.id, self.display_name(), self.evs)
    }
}
