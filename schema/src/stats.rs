use crate::rules::RulePolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};
use strum::{Display, EnumIter, IntoEnumIterator};

/// The six stats that can hold effort values.
///
/// Declaration order is the canonical order used everywhere stats are
/// iterated, which keeps capped additions reproducible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    #[strum(to_string = "HP")]
    Hp,
    #[strum(to_string = "Attack")]
    Attack,
    #[strum(to_string = "Defense")]
    Defense,
    #[strum(to_string = "Special Attack")]
    SpecialAttack,
    #[strum(to_string = "Special Defense")]
    SpecialDefense,
    #[strum(to_string = "Speed")]
    Speed,
}

impl Stat {
    /// Every stat in canonical order.
    pub fn all() -> impl Iterator<Item = Stat> {
        Stat::iter()
    }

    /// The snake_case key used in saved files and on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Attack => "attack",
            Stat::Defense => "defense",
            Stat::SpecialAttack => "special_attack",
            Stat::SpecialDefense => "special_defense",
            Stat::Speed => "speed",
        }
    }
}

/// A set of effort values, one per stat.
///
/// Values are signed so the same type can describe a delta (berries remove
/// EVs). Only [`EvSet::capped_add`] enforces the stat and total caps; direct
/// assignment through [`EvSet::set`] is an intentional override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EvSet {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub special_attack: i32,
    pub special_defense: i32,
    pub speed: i32,
}

impl EvSet {
    pub fn new(
        hp: i32,
        attack: i32,
        defense: i32,
        special_attack: i32,
        special_defense: i32,
        speed: i32,
    ) -> Self {
        Self {
            hp,
            attack,
            defense,
            special_attack,
            special_defense,
            speed,
        }
    }

    /// An EvSet with `value` in one stat and zero everywhere else.
    pub fn single(stat: Stat, value: i32) -> Self {
        let mut evs = Self::default();
        evs.set(stat, value);
        evs
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
        }
    }

    pub fn get_mut(&mut self, stat: Stat) -> &mut i32 {
        match stat {
            Stat::Hp => &mut self.hp,
            Stat::Attack => &mut self.attack,
            Stat::Defense => &mut self.defense,
            Stat::SpecialAttack => &mut self.special_attack,
            Stat::SpecialDefense => &mut self.special_defense,
            Stat::Speed => &mut self.speed,
        }
    }

    /// Overwrite one stat. No cap is enforced.
    pub fn set(&mut self, stat: Stat, value: i32) {
        *self.get_mut(stat) = value;
    }

    /// Iterate `(stat, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, i32)> + '_ {
        Stat::all().map(move |stat| (stat, self.get(stat)))
    }

    /// Sum of every stat, saturating at the `i32` bounds.
    pub fn total(&self) -> i32 {
        self.iter().fold(0, |sum, (_, value)| sum.saturating_add(value))
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, value)| value == 0)
    }

    /// Add `delta` in place while keeping every stat within `[0, stat_cap]`
    /// and the total within the total cap.
    ///
    /// Stats are visited in canonical order, so the total-cap check for a
    /// later stat sees the points already granted to earlier ones. Deltas are
    /// only ever shrunk toward zero: a value that was pushed out of bounds by
    /// a manual override is not dragged back by a positive delta.
    ///
    /// Returns the amounts actually applied to each stat.
    pub fn capped_add(&mut self, delta: &EvSet, rules: &RulePolicy) -> EvSet {
        let stat_cap = rules.stat_cap();
        let total_cap = rules.total_cap();
        let mut applied = EvSet::default();

        for stat in Stat::all() {
            let mut amount = delta.get(stat);
            let total = self.total();
            let current = self.get(stat);

            if amount > 0 && total.saturating_add(amount) > total_cap {
                amount = total_cap.saturating_sub(total).max(0);
            }
            if amount > 0 && current.saturating_add(amount) > stat_cap {
                amount = stat_cap.saturating_sub(current).max(0);
            } else if amount < 0 && current.saturating_add(amount) < 0 {
                amount = -current.max(0);
            }

            *self.get_mut(stat) = current.saturating_add(amount);
            applied.set(stat, amount);
        }

        applied
    }

    /// Multi-line listing of every stat that holds EVs or has a target.
    ///
    /// Each line is `Label: value`, followed by the signed adjustment when one
    /// is given and `(Target: N)` when that stat has a non-zero target.
    pub fn format(&self, adjustment: Option<&EvSet>, targets: Option<&EvSet>) -> String {
        let lines: Vec<String> = self
            .iter()
            .filter_map(|(stat, value)| {
                let target = targets.map(|t| t.get(stat)).unwrap_or(0);
                if value == 0 && target == 0 {
                    return None;
                }
                let mut line = format!("{}: {}", stat, value);
                if let Some(adjustment) = adjustment {
                    line.push_str(&format!(" ({:+})", adjustment.get(stat)));
                }
                if target != 0 {
                    line.push_str(&format!(" (Target: {})", target));
                }
                Some(line)
            })
            .collect();

        if lines.is_empty() {
            "No EVs".to_string()
        } else {
            lines.join("\n")
        }
    }

    /// Comma separated `+N Label` for every positive stat, used to describe a
    /// battle reward.
    pub fn as_modifier_string(&self) -> String {
        self.iter()
            .filter(|(_, value)| *value > 0)
            .map(|(stat, value)| format!("+{} {}", value, stat))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for EvSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(None, None))
    }
}

// Component arithmetic saturates at the `i32` bounds.
impl Add for EvSet {
    type Output = EvSet;

    fn add(self, other: EvSet) -> EvSet {
        let mut result = self;
        for stat in Stat::all() {
            let value = result.get_mut(stat);
            *value = value.saturating_add(other.get(stat));
        }
        result
    }
}

impl Sub for EvSet {
    type Output = EvSet;

    fn sub(self, other: EvSet) -> EvSet {
        let mut result = self;
        for stat in Stat::all() {
            let value = result.get_mut(stat);
            *value = value.saturating_sub(other.get(stat));
        }
        result
    }
}

impl Mul<i32> for EvSet {
    type Output = EvSet;

    fn mul(self, factor: i32) -> EvSet {
        let mut result = self;
        for stat in Stat::all() {
            let value = result.get_mut(stat);
            *value = value.saturating_mul(factor);
        }
        result
    }
}

/// A partial set of stat overrides. Stats left as `None` are untouched when
/// the patch is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvPatch {
    values: [Option<i32>; 6],
}

impl EvPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, stat: Stat, value: i32) -> Self {
        self.set(stat, Some(value));
        self
    }

    pub fn set(&mut self, stat: Stat, value: Option<i32>) {
        self.values[stat as usize] = value;
    }

    pub fn get(&self, stat: Stat) -> Option<i32> {
        self.values[stat as usize]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Write the provided stats into `evs` without any cap enforcement.
    pub fn apply_to(&self, evs: &mut EvSet) {
        for stat in Stat::all() {
            if let Some(value) = self.get(stat) {
                evs.set(stat, value);
            }
        }
    }
}
