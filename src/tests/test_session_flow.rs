#[cfg(test)]
mod tests {
    use crate::errors::TrackerError;
    use crate::tests::common::{create_test_session, open_session, run};
    use pretty_assertions::assert_eq;
    use schema::{EvSet, Stat};
    use std::fs;

    #[test]
    fn test_training_session_end_to_end() {
        let (dir, mut session) = create_test_session();

        run(&mut session, "track Squirtle --name Shelly").unwrap();
        run(&mut session, "track Pidgey --item 'Power Anklet'").unwrap();
        run(&mut session, "withdraw 1").unwrap();
        run(&mut session, "withdraw 2").unwrap();
        run(&mut session, "set-target 1 --defense 252 --special-defense 252").unwrap();

        let output = run(&mut session, "battle Geodude --count 10").unwrap();
        assert_eq!(
            output,
            "Battled 10 × Geodude (#74) which has a base EV reward of +1 Defense\n\
             \n\
             1 Shelly (Squirtle) new EVs:\n\
             Defense: 10 (+10) (Target: 252)\n\
             Special Defense: 0 (+0) (Target: 252)\n\
             \n\
             2 Pidgey new EVs:\n\
             Defense: 10 (+10)\n\
             Speed: 80 (+80)"
        );

        run(&mut session, "deposit 2").unwrap();
        run(&mut session, "vitamin 1 Zinc --count 3").unwrap();

        // Everything is read back from disk by a fresh session
        drop(session);
        let mut session = open_session(&dir);
        assert_eq!(
            run(&mut session, "status 1").unwrap(),
            "1 Shelly (Squirtle)\n\
             Location: Team\n\
             Defense: 10 (Target: 252)\n\
             Special Defense: 30 (Target: 252)"
        );
        assert_eq!(
            run(&mut session, "status 2").unwrap(),
            "2 Pidgey\nLocation: Box\nPower Anklet\nDefense: 10\nSpeed: 80"
        );
        assert_eq!(run(&mut session, "list").unwrap(), "* 1 Shelly (Squirtle)\n  2 Pidgey");
    }

    #[test]
    fn test_battle_with_explicit_ids() {
        let (_dir, mut session) = create_test_session();
        run(&mut session, "track Onix").unwrap();
        run(&mut session, "track Cubone").unwrap();
        run(&mut session, "track Ekans").unwrap();
        run(&mut session, "withdraw 3").unwrap();

        // Boxed Pokemon can battle when named; duplicates count once
        run(&mut session, "battle Geodude --id 1 --id 1,2").unwrap();

        let tracker = session.tracker();
        assert_eq!(tracker.get(1).unwrap().evs, EvSet::single(Stat::Defense, 1));
        assert_eq!(tracker.get(2).unwrap().evs, EvSet::single(Stat::Defense, 1));
        assert_eq!(tracker.get(3).unwrap().evs, EvSet::default());
    }

    #[test]
    fn test_failed_commands_leave_the_file_alone() {
        let (dir, mut session) = create_test_session();
        run(&mut session, "track Onix").unwrap();
        let tracker_path = dir.path().join("tracker.json");
        let saved = fs::read_to_string(&tracker_path).unwrap();

        assert!(matches!(
            run(&mut session, "battle Geodude --id 1 --id 7"),
            Err(TrackerError::UnknownPokemon(7))
        ));
        assert!(run(&mut session, "vitamin 1 'Rare Candy'").is_err());
        assert!(run(&mut session, "track Onix --item Leftovers").is_err());
        assert!(run(&mut session, "battle Geodood --id 1").is_err());

        assert_eq!(fs::read_to_string(&tracker_path).unwrap(), saved);
        assert_eq!(session.tracker().get(1).unwrap().evs, EvSet::default());
        assert_eq!(session.tracker().len(), 1);
    }

    #[test]
    fn test_failed_save_rolls_back_changes() {
        let (dir, mut session) = create_test_session();
        run(&mut session, "track Pikachu").unwrap();
        run(&mut session, "withdraw 1").unwrap();

        // A directory in place of the tracker file makes every save fail
        let tracker_path = dir.path().join("tracker.json");
        fs::remove_file(&tracker_path).unwrap();
        fs::create_dir(&tracker_path).unwrap();

        assert!(matches!(
            run(&mut session, "set-effort 1 --speed 100"),
            Err(TrackerError::Storage(_))
        ));
        assert!(run(&mut session, "battle Rattata").is_err());
        assert!(run(&mut session, "vitamin 1 Carbos").is_err());
        assert!(run(&mut session, "track Onix").is_err());
        assert!(run(&mut session, "release 1").is_err());

        let tracker = session.tracker();
        assert_eq!(tracker.len(), 1);
        assert!(tracker.on_team(1));
        assert_eq!(tracker.get(1).unwrap().evs, EvSet::default());

        // Once the file is writable again the lost changes do not reappear
        fs::remove_dir(&tracker_path).unwrap();
        run(&mut session, "set-effort 1 --hp 4").unwrap();
        let reopened = open_session(&dir);
        assert_eq!(reopened.tracker().get(1).unwrap().evs, EvSet::single(Stat::Hp, 4));
    }

    #[test]
    fn test_saves_keep_a_backup() {
        let (dir, mut session) = create_test_session();
        let tracker_path = dir.path().join("tracker.json");
        let backup_path = dir.path().join("tracker.json.bak");

        run(&mut session, "track Onix").unwrap();
        assert!(!backup_path.exists());
        let first = fs::read_to_string(&tracker_path).unwrap();

        run(&mut session, "track Geodude").unwrap();
        assert_eq!(fs::read_to_string(&backup_path).unwrap(), first);
    }

    #[test]
    fn test_config_is_written_on_open() {
        let (dir, session) = create_test_session();
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("config.json")).unwrap())
                .unwrap();

        assert_eq!(written["generation"], 8);
        assert_eq!(written["alternate_ruleset"], false);
        assert_eq!(
            written["filename"],
            dir.path().join("tracker.json").to_string_lossy().as_ref()
        );
        assert_eq!(session.config().tracker_path(), dir.path().join("tracker.json"));
    }
}
