//! Held items and consumables that change a Pokemon's effort values.
//!
//! Effects are plain data; [`Effect::apply`] turns one into a new [`EvSet`]
//! given the Pokemon's EVs and the active [`RulePolicy`].

use crate::errors::{EffectError, EffectResult};
use crate::fuzzy::close_matches;
use schema::{EvSet, RulePolicy, Stat};

/// What an item or consumable does to an EvSet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Multiply every stat (Macho Brace).
    Multiply(i32),
    /// Add the generation's power item bonus to one stat.
    PowerItem(Stat),
    /// Add a fixed amount to one stat (vitamins, mochi, feathers).
    Add(Stat, i32),
    /// Remove the generation's berry reduction from one stat, based on the
    /// stat's current value.
    BerryReduction(Stat),
    /// Drop every stat to zero.
    Reset,
}

impl Effect {
    /// Apply this effect to `evs`, returning the transformed set.
    ///
    /// Berry reductions read the current value of their stat from `evs`, so
    /// consumables must be applied to the Pokemon's live EVs rather than to a
    /// zero delta.
    pub fn apply(&self, evs: &EvSet, rules: &RulePolicy) -> EvSet {
        match *self {
            Effect::Multiply(factor) => *evs * factor,
            Effect::PowerItem(stat) => *evs + EvSet::single(stat, rules.power_item_bonus()),
            Effect::Add(stat, amount) => *evs + EvSet::single(stat, amount),
            Effect::BerryReduction(stat) => {
                *evs - EvSet::single(stat, rules.berry_reduction(evs.get(stat)))
            }
            Effect::Reset => EvSet::default(),
        }
    }
}

/// A named table of effects.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    entries: &'static [(&'static str, Effect)],
}

/// Items a Pokemon can hold to boost battle EVs.
pub const HELD_ITEMS: Catalog = Catalog {
    entries: &[
        ("Macho Brace", Effect::Multiply(2)),
        ("Power Weight", Effect::PowerItem(Stat::Hp)),
        ("Power Bracer", Effect::PowerItem(Stat::Attack)),
        ("Power Belt", Effect::PowerItem(Stat::Defense)),
        ("Power Lens", Effect::PowerItem(Stat::SpecialAttack)),
        ("Power Band", Effect::PowerItem(Stat::SpecialDefense)),
        ("Power Anklet", Effect::PowerItem(Stat::Speed)),
    ],
};

/// One-shot consumables applied directly to a Pokemon.
pub const CONSUMABLES: Catalog = Catalog {
    entries: &[
        // Vitamins
        ("HP Up", Effect::Add(Stat::Hp, 10)),
        ("Protein", Effect::Add(Stat::Attack, 10)),
        ("Iron", Effect::Add(Stat::Defense, 10)),
        ("Calcium", Effect::Add(Stat::SpecialAttack, 10)),
        ("Zinc", Effect::Add(Stat::SpecialDefense, 10)),
        ("Carbos", Effect::Add(Stat::Speed, 10)),
        // Mochi work like vitamins
        ("Health Mochi", Effect::Add(Stat::Hp, 10)),
        ("Muscle Mochi", Effect::Add(Stat::Attack, 10)),
        ("Resist Mochi", Effect::Add(Stat::Defense, 10)),
        ("Genius Mochi", Effect::Add(Stat::SpecialAttack, 10)),
        ("Clever Mochi", Effect::Add(Stat::SpecialDefense, 10)),
        ("Swift Mochi", Effect::Add(Stat::Speed, 10)),
        // Feathers
        ("Health Feather", Effect::Add(Stat::Hp, 1)),
        ("Muscle Feather", Effect::Add(Stat::Attack, 1)),
        ("Resist Feather", Effect::Add(Stat::Defense, 1)),
        ("Genius Feather", Effect::Add(Stat::SpecialAttack, 1)),
        ("Clever Feather", Effect::Add(Stat::SpecialDefense, 1)),
        ("Swift Feather", Effect::Add(Stat::Speed, 1)),
        // EV-reducing berries
        ("Pomeg Berry", Effect::BerryReduction(Stat::Hp)),
        ("Kelpsy Berry", Effect::BerryReduction(Stat::Attack)),
        ("Qualot Berry", Effect::BerryReduction(Stat::Defense)),
        ("Hondew Berry", Effect::BerryReduction(Stat::SpecialAttack)),
        ("Grepa Berry", Effect::BerryReduction(Stat::SpecialDefense)),
        ("Tamato Berry", Effect::BerryReduction(Stat::Speed)),
        // Full resets
        ("Perilous Soup", Effect::Reset),
        ("Fresh-Start Mochi", Effect::Reset),
    ],
};

impl Catalog {
    /// Exact, case-sensitive lookup. Returns the canonical name with the effect.
    pub fn get(&self, name: &str) -> Option<(&'static str, Effect)> {
        self.entries.iter().copied().find(|(entry, _)| *entry == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Resolve a user supplied name.
    ///
    /// Tries an exact match, then a case-insensitive one, then typo tolerant
    /// matching. A single close match is accepted; several are reported as
    /// ambiguous so the caller can ask for a more specific name.
    pub fn resolve(&self, query: &str) -> EffectResult<(&'static str, Effect)> {
        let query = query.trim();
        if let Some(found) = self.get(query) {
            return Ok(found);
        }
        if let Some(found) = self
            .entries
            .iter()
            .copied()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(query))
        {
            return Ok(found);
        }

        let matches = close_matches(query, self.names(), usize::MAX);
        match matches.as_slice() {
            [] => Err(EffectError::UnknownEffect(query.to_string())),
            [name] => {
                tracing::debug!("Resolved '{}' to '{}'", query, name);
                self.get(name)
                    .ok_or_else(|| EffectError::UnknownEffect(query.to_string()))
            }
            _ => Err(EffectError::AmbiguousEffect {
                query: query.to_string(),
                candidates: matches.iter().map(|name| name.to_string()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Macho Brace", EvSet::new(2, 0, 0, 0, 0, 4))]
    #[case("Power Anklet", EvSet::new(1, 0, 0, 0, 0, 10))]
    #[case("Power Weight", EvSet::new(9, 0, 0, 0, 0, 2))]
    fn test_held_items_gen9(#[case] item: &str, #[case] expected: EvSet) {
        let (_, effect) = HELD_ITEMS.get(item).unwrap();
        let base = EvSet::new(1, 0, 0, 0, 0, 2);
        assert_eq!(effect.apply(&base, &RulePolicy::new(9)), expected);
    }

    #[test]
    fn test_power_items_follow_generation() {
        let (_, effect) = HELD_ITEMS.get("Power Lens").unwrap();
        let gen5 = effect.apply(&EvSet::default(), &RulePolicy::new(5));
        let alternate = effect.apply(
            &EvSet::default(),
            &RulePolicy::new(8).with_alternate_ruleset(true),
        );

        assert_eq!(gen5, EvSet::single(Stat::SpecialAttack, 4));
        assert_eq!(alternate, EvSet::single(Stat::SpecialAttack, 4));
    }

    #[rstest]
    #[case("Protein", EvSet::new(0, 260, 0, 0, 0, 0))]
    #[case("Muscle Mochi", EvSet::new(0, 260, 0, 0, 0, 0))]
    #[case("Swift Feather", EvSet::new(0, 250, 0, 0, 0, 1))]
    #[case("Kelpsy Berry", EvSet::new(0, 240, 0, 0, 0, 0))]
    #[case("Perilous Soup", EvSet::default())]
    #[case("Fresh-Start Mochi", EvSet::default())]
    fn test_consumables(#[case] name: &str, #[case] expected: EvSet) {
        let (_, effect) = CONSUMABLES.get(name).unwrap();
        let current = EvSet::single(Stat::Attack, 250);
        assert_eq!(effect.apply(&current, &RulePolicy::new(9)), expected);
    }

    #[test]
    fn test_berry_reads_current_value() {
        let (_, effect) = CONSUMABLES.get("Pomeg Berry").unwrap();
        let current = EvSet::single(Stat::Hp, 150);

        assert_eq!(effect.apply(&current, &RulePolicy::new(4)).hp, 100);
        assert_eq!(effect.apply(&current, &RulePolicy::new(5)).hp, 140);
    }

    #[rstest]
    #[case("Protein", "Protein")]
    #[case("protein", "Protein")]
    #[case("hp up", "HP Up")]
    #[case("protien", "Protein")]
    #[case("Tamato Bery", "Tamato Berry")]
    fn test_resolve_single_match(#[case] query: &str, #[case] expected: &str) {
        let (name, _) = CONSUMABLES.resolve(query).unwrap();
        assert_eq!(name, expected);
    }

    #[test]
    fn test_resolve_ambiguous() {
        let err = CONSUMABLES.resolve("Muscle Mocher").unwrap_err();
        match err {
            EffectError::AmbiguousEffect { candidates, .. } => {
                assert!(candidates.contains(&"Muscle Mochi".to_string()));
                assert!(candidates.contains(&"Muscle Feather".to_string()));
            }
            other => panic!("expected an ambiguous match, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_unknown() {
        assert_eq!(
            CONSUMABLES.resolve("Rare Candy"),
            Err(EffectError::UnknownEffect("Rare Candy".to_string()))
        );
    }

    #[test]
    fn test_held_item_lookup_is_exact() {
        assert!(HELD_ITEMS.contains("Power Belt"));
        assert!(!HELD_ITEMS.contains("power belt"));
        assert!(!HELD_ITEMS.contains("Protein"));
    }
}
