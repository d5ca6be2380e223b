use santa_core::{generate_arrangement, Arrangement, HistoryStore, Pair, SantaError};

fn roster(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter().map(|r| roster(r)).collect()
}

#[test]
fn applied_year_reads_back_as_one_year_ago() {
    let participants = roster(&["Ann", "Bob", "Cat", "Dan", "Eve"]);
    let mut history = HistoryStore::new();

    for seed in 0u64..4 {
        let arrangement = generate_arrangement(seed, &participants).unwrap();
        history.apply(&arrangement);
        for pair in arrangement.pairs() {
            assert_eq!(
                history.recipient_years_ago(&pair.giver, 1),
                Some(pair.receiver.as_str()),
                "year {seed}: {} should read back their receiver",
                pair.giver
            );
        }
    }
    assert_eq!(history.number_of_years(), 4);
}

#[test]
fn newcomers_are_padded_to_elapsed_years() {
    let rows = grid(&[
        &["Name", "2023", "2024"],
        &["Ann", "Bob", "Cat"],
        &["Bob", "Cat", "Ann"],
        &["Cat", "Ann", "Bob"],
    ]);
    let mut history = HistoryStore::from_rows(&rows, "N/A").unwrap();

    let arrangement = Arrangement::from_pairs(vec![
        Pair::new("Ann", "Dan"),
        Pair::new("Dan", "Ann"),
        Pair::new("Bob", "Cat"),
        Pair::new("Cat", "Bob"),
    ])
    .unwrap();
    history.apply(&arrangement);

    assert_eq!(history.number_of_years(), 3);
    assert_eq!(history.history("Dan").unwrap(), &[None, None, Some("Ann".to_string())]);
    assert_eq!(history.recipient_years_ago("Dan", 1), Some("Ann"));
    assert_eq!(history.recipient_years_ago("Dan", 2), None);
}

#[test]
fn lapsed_participants_are_padded_before_appending() {
    let rows = grid(&[
        &["Name", "2022", "2023", "2024"],
        &["Ann", "Bob", "N/A", "Cat"],
        &["Bob", "Ann", "Cat", "Ann"],
        &["Cat", "N/A", "Bob", "Bob"],
    ]);
    let mut history = HistoryStore::from_rows(&rows, "N/A").unwrap();
    history.insert_history("Old", vec![Some("Ann".into())]).unwrap();

    history.apply(&Arrangement::from_pairs(vec![Pair::new("Old", "Bob"), Pair::new("Bob", "Old")]).unwrap());

    let old = history.history("Old").unwrap();
    assert_eq!(old.len(), 4);
    assert_eq!(old[0].as_deref(), Some("Ann"));
    assert_eq!(old[1], None);
    assert_eq!(old[2], None);
    assert_eq!(old[3].as_deref(), Some("Bob"));
    assert_eq!(history.years_since_gave("Old", "Ann"), Some(4));
}

#[test]
fn non_givers_are_left_untouched() {
    let rows = grid(&[
        &["Name", "2024"],
        &["Ann", "Bob"],
        &["Bob", "Cat"],
        &["Cat", "Ann"],
    ]);
    let mut history = HistoryStore::from_rows(&rows, "N/A").unwrap();

    history.apply(&Arrangement::from_pairs(vec![Pair::new("Ann", "Bob"), Pair::new("Bob", "Ann")]).unwrap());

    assert_eq!(history.number_of_years(), 2);
    assert_eq!(history.history("Cat").unwrap().len(), 1);
    assert_eq!(history.recipient_years_ago("Cat", 1), None);
    assert_eq!(history.recipient_years_ago("Cat", 2), Some("Ann"));
}

#[test]
fn applied_copy_leaves_original_alone() {
    let history = HistoryStore::new();
    let arrangement = generate_arrangement(1u64, &roster(&["A", "B", "C"])).unwrap();
    let next = history.applied(&arrangement);
    assert!(history.is_empty());
    assert_eq!(next.number_of_years(), 1);
}

#[test]
fn duplicate_givers_in_table_rejected() {
    let rows = grid(&[&["Name", "2024"], &["Ann", "Bob"], &["Ann", "Cat"]]);
    let err = HistoryStore::from_rows(&rows, "N/A").unwrap_err();
    assert!(matches!(err, SantaError::DuplicateParticipant { name } if name == "Ann"));
}

#[test]
fn exported_grid_reimports_identically() {
    let participants = roster(&["Ann", "Bob", "Cat", "Dan"]);
    let mut history = HistoryStore::new();
    for seed in 10u64..13 {
        history.apply(&generate_arrangement(seed, &participants).unwrap());
    }
    let rows = history.to_rows("N/A");
    assert_eq!(rows.len(), 5);
    assert_eq!(HistoryStore::from_rows(&rows, "N/A").unwrap(), history);
}
