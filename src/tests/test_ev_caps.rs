#[cfg(test)]
mod tests {
    use crate::items::CONSUMABLES;
    use crate::tests::common::{create_test_tracker, species, TestPokemonBuilder};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{EvPatch, EvSet, RulePolicy, Stat, TOTAL_EV_CAP};

    fn assert_in_bounds(evs: &EvSet, rules: &RulePolicy) {
        assert!(evs.total() <= TOTAL_EV_CAP, "total too high: {:?}", evs);
        for (stat, value) in evs.iter() {
            assert!(
                (0..=rules.stat_cap()).contains(&value),
                "{} out of bounds: {:?}",
                stat,
                evs
            );
        }
    }

    #[test]
    fn test_total_cap_across_repeated_battles() {
        let rules = RulePolicy::new(9);
        let pokemon = TestPokemonBuilder::new("Mew")
            .with_evs(EvSet::new(252, 252, 0, 0, 0, 0))
            .build();
        let mut tracker = create_test_tracker(vec![pokemon], &[1]);

        // Both stats already sit at the stat cap
        let changes = tracker.battle(&[], &species("Snorlax"), 1, &rules).unwrap();
        assert_eq!(changes[0].applied, EvSet::default());
        let changes = tracker.battle(&[], &species("Machamp"), 1, &rules).unwrap();
        assert_eq!(changes[0].applied, EvSet::default());

        // Only 6 points remain before the total cap
        let changes = tracker.battle(&[], &species("Pikachu"), 5, &rules).unwrap();
        assert_eq!(changes[0].requested, EvSet::single(Stat::Speed, 10));
        assert_eq!(changes[0].applied, EvSet::single(Stat::Speed, 6));
        assert_eq!(tracker.get(1).unwrap().evs.total(), TOTAL_EV_CAP);
    }

    #[test]
    fn test_huge_counts_clamp_instead_of_wrapping() {
        let rules = RulePolicy::new(8);
        let pokemon = TestPokemonBuilder::new("Pikachu")
            .with_item("Power Anklet")
            .with_pokerus()
            .with_evs(EvSet::single(Stat::Hp, 100))
            .build();
        let mut tracker = create_test_tracker(vec![pokemon], &[1]);

        let changes = tracker
            .battle(&[], &species("Pikachu"), i32::MAX, &rules)
            .unwrap();
        assert_eq!(changes[0].requested, EvSet::single(Stat::Speed, i32::MAX));
        assert_eq!(changes[0].applied, EvSet::single(Stat::Speed, 252));

        let (_, change) = tracker
            .use_consumable(1, "Pomeg Berry", i32::MAX, &rules)
            .unwrap();
        assert_eq!(change.applied, EvSet::single(Stat::Hp, -100));
        assert_eq!(tracker.get(1).unwrap().evs, EvSet::single(Stat::Speed, 252));
    }

    #[rstest]
    #[case(4)]
    #[case(9)]
    fn test_every_consumable_respects_caps(#[case] generation: u8) {
        let rules = RulePolicy::new(generation);
        let starts = [
            EvSet::default(),
            EvSet::new(4, 252, 0, 0, 0, 252),
            EvSet::new(100, 100, 100, 100, 100, 10),
            EvSet::new(0, 0, 0, 150, 150, 150),
        ];

        for start in starts {
            for name in CONSUMABLES.names() {
                let pokemon = TestPokemonBuilder::new("Pikachu").with_evs(start).build();
                let mut tracker = create_test_tracker(vec![pokemon], &[]);
                tracker.use_consumable(1, name, 3, &rules).unwrap();
                assert_in_bounds(&tracker.get(1).unwrap().evs, &rules);
            }
        }
    }

    #[test]
    fn test_berries_stop_at_zero() {
        let rules = RulePolicy::new(9);
        let pokemon = TestPokemonBuilder::new("Pikachu")
            .with_evs(EvSet::single(Stat::Speed, 5))
            .build();
        let mut tracker = create_test_tracker(vec![pokemon], &[]);

        let (_, change) = tracker
            .use_consumable(1, "Tamato Berry", 1, &rules)
            .unwrap();
        assert_eq!(change.requested, EvSet::single(Stat::Speed, -10));
        assert_eq!(change.applied, EvSet::single(Stat::Speed, -5));
        assert_eq!(tracker.get(1).unwrap().evs, EvSet::default());
    }

    #[test]
    fn test_team_members_are_capped_independently() {
        let rules = RulePolicy::new(8);
        let fresh = TestPokemonBuilder::new("Abra").build();
        let nearly_done = TestPokemonBuilder::new("Kadabra")
            .with_evs(EvSet::new(6, 0, 0, 250, 0, 252))
            .build();
        let mut tracker = create_test_tracker(vec![fresh, nearly_done], &[1, 2]);

        let changes = tracker.battle(&[], &species("Alakazam"), 2, &rules).unwrap();
        let applied: Vec<EvSet> = changes.iter().map(|change| change.applied).collect();
        assert_eq!(
            applied,
            vec![
                EvSet::single(Stat::SpecialAttack, 6),
                EvSet::single(Stat::SpecialAttack, 2),
            ]
        );
    }

    #[test]
    fn test_manual_overrides_are_kept() {
        let rules = RulePolicy::new(9);
        let mut pokemon = TestPokemonBuilder::new("Snorlax").build();
        pokemon.set_effort(&EvPatch::new().with(Stat::Hp, 300));
        let mut tracker = create_test_tracker(vec![pokemon], &[1]);

        // Gains are refused but the value is not pulled back to the cap
        let changes = tracker.battle(&[], &species("Snorlax"), 1, &rules).unwrap();
        assert_eq!(changes[0].applied, EvSet::default());
        assert_eq!(tracker.get(1).unwrap().evs.hp, 300);

        tracker.use_consumable(1, "Pomeg Berry", 1, &rules).unwrap();
        assert_eq!(tracker.get(1).unwrap().evs.hp, 290);
    }

    #[test]
    fn test_reset_consumables_clear_everything() {
        let rules = RulePolicy::new(9);
        let pokemon = TestPokemonBuilder::new("Pikachu")
            .with_evs(EvSet::new(10, 20, 30, 40, 50, 60))
            .with_target(EvSet::single(Stat::Speed, 252))
            .build();
        let mut tracker = create_test_tracker(vec![pokemon], &[]);

        let (name, change) = tracker
            .use_consumable(1, "fresh-start mochi", 1, &rules)
            .unwrap();
        assert_eq!(name, "Fresh-Start Mochi");
        assert_eq!(change.applied, EvSet::new(-10, -20, -30, -40, -50, -60));

        let pokemon = tracker.get(1).unwrap();
        assert_eq!(pokemon.evs, EvSet::default());
        assert_eq!(pokemon.target_evs, EvSet::single(Stat::Speed, 252));
    }
}
