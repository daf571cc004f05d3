use serde::{Deserialize, Serialize};

/// Highest generation whose rules are modelled.
pub const LATEST_GENERATION: u8 = 9;

/// Maximum number of effort points a Pokemon can hold across all stats.
pub const TOTAL_EV_CAP: i32 = 510;

const LEGACY_STAT_CAP: i32 = 255;
const MODERN_STAT_CAP: i32 = 252;
const POWER_ITEM_BONUS: i32 = 4;
const DOUBLED_POWER_ITEM_BONUS: i32 = 8;
const BERRY_REDUCTION: i32 = 10;
const GEN4_BERRY_FLOOR: i32 = 100;

/// The numeric EV rules for one game version.
///
/// Built once from configuration and handed to every calculation that depends
/// on the generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulePolicy {
    generation: u8,
    alternate_ruleset: bool,
    ignore_pokerus: bool,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self::new(8)
    }
}

impl RulePolicy {
    pub fn new(generation: u8) -> Self {
        Self {
            generation,
            alternate_ruleset: false,
            ignore_pokerus: false,
        }
    }

    /// Games that keep the pre-Gen 7 power item bonus even on modern engines.
    pub fn with_alternate_ruleset(mut self, alternate_ruleset: bool) -> Self {
        self.alternate_ruleset = alternate_ruleset;
        self
    }

    /// Games where Pokerus has no effect on battle EVs.
    pub fn with_ignore_pokerus(mut self, ignore_pokerus: bool) -> Self {
        self.ignore_pokerus = ignore_pokerus;
        self
    }

    pub fn generation(&self) -> u8 {
        self.generation
    }

    pub fn alternate_ruleset(&self) -> bool {
        self.alternate_ruleset
    }

    pub fn ignore_pokerus(&self) -> bool {
        self.ignore_pokerus
    }

    /// EVs added by a power item (Power Weight, Power Anklet, ...) per battle.
    pub fn power_item_bonus(&self) -> i32 {
        if self.generation > 6 && !self.alternate_ruleset {
            DOUBLED_POWER_ITEM_BONUS
        } else {
            POWER_ITEM_BONUS
        }
    }

    /// Maximum EVs a single stat may hold.
    pub fn stat_cap(&self) -> i32 {
        if self.generation > 6 {
            MODERN_STAT_CAP
        } else {
            LEGACY_STAT_CAP
        }
    }

    pub fn total_cap(&self) -> i32 {
        TOTAL_EV_CAP
    }

    /// Amount an EV-reducing berry removes from a stat currently at `current`.
    /// Gen 4 berries drop anything above 100 straight down to 100.
    pub fn berry_reduction(&self, current: i32) -> i32 {
        if self.generation == 4 && current > GEN4_BERRY_FLOOR {
            current - GEN4_BERRY_FLOOR
        } else {
            BERRY_REDUCTION
        }
    }

    pub fn pokerus_doubles(&self) -> bool {
        !self.ignore_pokerus
    }
}
