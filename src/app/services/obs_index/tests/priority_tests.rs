//! Precedence rule tests

use proptest::prelude::*;

use crate::app::services::obs_index::retains_priority;

#[test]
fn original_never_displaces_anything() {
    assert!(retains_priority("NNN", "NNN"));
    assert!(retains_priority("CCA", "NNN"));
    assert!(retains_priority("CCB", "NNN"));
}

#[test]
fn amendment_displaces_original() {
    assert!(!retains_priority("NNN", "CCA"));
    assert!(!retains_priority("NNN", "CCB"));
}

#[test]
fn later_amendment_displaces_earlier() {
    assert!(!retains_priority("CCA", "CCB"));
    assert!(!retains_priority("CCB", "CCZ"));
}

#[test]
fn earlier_or_equal_amendment_is_retained() {
    assert!(retains_priority("CCB", "CCA"));
    assert!(retains_priority("CCA", "CCA"));
    assert!(retains_priority("CCZ", "CCB"));
}

/// Apply the rule over a sequence of tags the way the store does: start
/// with the first tag, replace whenever the stored one loses.
fn winner(sequence: &[&str]) -> String {
    let mut stored = sequence[0].to_string();
    for incoming in &sequence[1..] {
        if !retains_priority(&stored, incoming) {
            stored = incoming.to_string();
        }
    }
    stored
}

#[test]
fn highest_amendment_wins_in_any_order() {
    let tags = ["NNN", "CCA", "CCB"];
    let orders: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];
    for order in orders {
        let sequence: Vec<&str> = order.iter().map(|&i| tags[i]).collect();
        assert_eq!(winner(&sequence), "CCB", "order {:?}", sequence);
    }
}

#[test]
fn amendment_survives_resent_original() {
    assert_eq!(winner(&["CCB", "NNN"]), "CCB");
    assert_eq!(winner(&["CCA", "NNN", "NNN"]), "CCA");
}

fn amendment_tag() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "NNN".to_string(),
        "CCA".to_string(),
        "CCB".to_string(),
        "CCC".to_string(),
        "CCD".to_string(),
    ])
}

proptest! {
    /// The surviving tag never depends on arrival order.
    #[test]
    fn winner_is_order_insensitive(
        mut tags in prop::collection::vec(amendment_tag(), 1..6),
        seed in any::<u64>(),
    ) {
        let baseline = winner(&tags.iter().map(String::as_str).collect::<Vec<_>>());

        // Fisher-Yates with a cheap LCG keyed on the proptest seed.
        let mut state = seed | 1;
        for i in (1..tags.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let j = (state >> 33) as usize % (i + 1);
            tags.swap(i, j);
        }
        let shuffled = winner(&tags.iter().map(String::as_str).collect::<Vec<_>>());

        prop_assert_eq!(baseline, shuffled);
    }
}
