//! THE MOST IMPORTANT TEST IN THE PROJECT.
//!
//! Same seed, same inputs, same operations.
//! Arrangements and search results must be byte-identical.
//! Any divergence is a blocker. Do not merge until fixed.

use santa_core::{
    best_arrangement, generate_arrangement, optimal_arrangement_count, HistoryStore,
    PenaltyTable, SantaRng,
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn sample_history() -> HistoryStore {
    let rows: Vec<Vec<String>> = vec![
        names(&["Name", "2022", "2023", "2024"]),
        names(&["Ann", "Bob", "Cat", "Dan"]),
        names(&["Bob", "Cat", "Dan", "Eve"]),
        names(&["Cat", "Dan", "Eve", "Ann"]),
        names(&["Dan", "Eve", "Ann", "Bob"]),
        names(&["Eve", "Ann", "N/A", "Cat"]),
    ];
    HistoryStore::from_rows(&rows, "N/A").expect("history grid")
}

#[test]
fn same_seed_produces_identical_arrangements() {
    let participants = names(&["A", "B", "C", "D"]);

    let a = generate_arrangement(42u64, &participants).expect("arrangement a");
    let b = generate_arrangement(42u64, &participants).expect("arrangement b");

    let json_a = serde_json::to_string(&a).expect("serialize a");
    let json_b = serde_json::to_string(&b).expect("serialize b");
    assert_eq!(json_a, json_b, "Arrangements diverged:\n  A: {json_a}\n  B: {json_b}");
}

#[test]
fn same_seed_produces_identical_searches() {
    let history = sample_history();
    let participants: Vec<String> = history.participants().map(String::from).collect();
    let policy = PenaltyTable::default();

    let a = best_arrangement(2024u64, 300, &policy, &participants, &history).expect("search a");
    let b = best_arrangement(2024u64, 300, &policy, &participants, &history).expect("search b");
    assert_eq!(a, b);

    let count_a = optimal_arrangement_count(2024u64, 300, &policy, &participants, &history)
        .expect("count a");
    let count_b = optimal_arrangement_count(2024u64, 300, &policy, &participants, &history)
        .expect("count b");
    assert_eq!(count_a, count_b);
}

#[test]
fn text_and_numeric_seeds_share_a_stream() {
    let participants = names(&["A", "B", "C", "D", "E", "F"]);
    let numeric = generate_arrangement(255i64, &participants).expect("numeric");
    let text = generate_arrangement("ff", &participants).expect("text");
    assert_eq!(numeric, text);
}

#[test]
fn different_seeds_produce_different_arrangements() {
    // Over many seeds, a 6-person draw must not always come out the same.
    let participants = names(&["A", "B", "C", "D", "E", "F"]);
    let first = generate_arrangement(0u64, &participants).expect("seed 0");
    let any_different = (1u64..50)
        .map(|seed| generate_arrangement(seed, &participants).expect("arrangement"))
        .any(|a| a != first);
    assert!(any_different, "Different seeds produced identical arrangements; seed is not being used");
}

#[test]
fn generator_consumes_only_its_own_rng() {
    // Drawing from one stream must not disturb another.
    let participants = names(&["A", "B", "C", "D", "E"]);
    let mut rng_a = SantaRng::new(9u64);
    let mut rng_b = SantaRng::new(9u64);

    let first = santa_core::Arrangement::generate(&mut rng_a, &participants).expect("a");
    let _noise = generate_arrangement(123u64, &participants).expect("noise");
    let second = santa_core::Arrangement::generate(&mut rng_b, &participants).expect("b");

    assert_eq!(first, second);
    assert_eq!(rng_a.next_i32(), rng_b.next_i32());
}
