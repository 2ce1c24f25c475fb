use assert_float_eq::assert_float_absolute_eq;

use super::*;
use crate::store::store_fixtures::{team, unplayed_game};
use crate::store::{MemoryStore, Snapshot};

fn two_game_store(p_first: f64, p_second: f64) -> MemoryStore {
    MemoryStore::new(Snapshot {
        teams: vec![team("AA"), team("BB"), team("XX"), team("YY")],
        games: vec![
            unplayed_game(2025, 1, "AA", "XX", p_first),
            unplayed_game(2025, 1, "BB", "YY", p_second),
        ],
        ..Snapshot::default()
    })
}

#[test]
fn entries_diversify_under_near_ties() {
    let store = two_game_store(0.9, 0.88);
    let entry_states = vec![EntryState::alive(1, vec![]), EntryState::alive(2, vec![])];

    let recommendations = recommend(&store, 2025, 1, &entry_states, 10_000);
    assert_eq!(2, recommendations.len());

    // the dominant team goes to the first entry
    let first = &recommendations[0];
    assert_eq!((1, "AA"), (first.entry_id, first.team.as_str()));
    assert_float_absolute_eq!(0.9, first.win_prob.unwrap());
    assert_float_absolute_eq!(0.9, first.survival_prob, 0.02);
    assert_float_absolute_eq!(first.survival_prob, first.portfolio_coverage);
    assert_eq!("AA", first.strategy_picks[&1]);

    // the 5% duplicate discount pushes the second entry to the near-tied
    // alternative
    let second = &recommendations[1];
    assert_eq!((2, "BB"), (second.entry_id, second.team.as_str()));
    assert_float_absolute_eq!(0.88, second.win_prob.unwrap());
}

#[test]
fn dominant_team_repeats_when_no_alternative_is_close() {
    let store = two_game_store(0.9, 0.7);
    let entry_states = vec![EntryState::alive(1, vec![]), EntryState::alive(2, vec![])];

    let recommendations = recommend(&store, 2025, 1, &entry_states, 10_000);
    assert_eq!(2, recommendations.len());
    assert_eq!("AA", recommendations[0].team);
    // 0.9 * 0.95 still beats 0.7, so the duplicate is worth it
    assert_eq!("AA", recommendations[1].team);
    assert!(recommendations[1].portfolio_coverage < recommendations[0].portfolio_coverage);
}

#[test]
fn used_teams_constrain_each_entry() {
    let store = two_game_store(0.9, 0.88);
    let entry_states = vec![EntryState::alive(1, vec!["AA".to_string()])];

    let recommendations = recommend(&store, 2025, 1, &entry_states, 10_000);
    assert_eq!(1, recommendations.len());
    assert_eq!("BB", recommendations[0].team);
}

#[test]
fn dead_entries_get_no_recommendation() {
    let store = two_game_store(0.9, 0.88);
    let entry_states = vec![
        EntryState {
            entry_id: 1,
            used_teams: vec![],
            is_alive: false,
        },
        EntryState::alive(2, vec![]),
    ];

    let recommendations = recommend(&store, 2025, 1, &entry_states, 10_000);
    assert_eq!(1, recommendations.len());
    assert_eq!(2, recommendations[0].entry_id);
}

#[test]
fn no_matchups_means_no_recommendations() {
    let store = MemoryStore::default();
    let entry_states = vec![EntryState::alive(1, vec![])];
    assert!(recommend(&store, 2025, 1, &entry_states, 10_000).is_empty());
}

#[test]
fn recommendations_are_reproducible() {
    let store = two_game_store(0.9, 0.88);
    let entry_states = vec![EntryState::alive(1, vec![]), EntryState::alive(2, vec![])];
    assert_eq!(
        recommend(&store, 2025, 1, &entry_states, 10_000),
        recommend(&store, 2025, 1, &entry_states, 10_000)
    );
}

#[test]
fn entry_states_reflect_the_store() {
    use crate::domain::Pick;
    use crate::store::Store;

    let mut store = two_game_store(0.9, 0.88);
    let entry = store.insert_entry("main", 2025);
    store.insert_pick(Pick {
        entry_id: entry.id,
        team: "XX".into(),
        season: 2025,
        week: 1,
        win_prob: None,
        is_recommended: false,
        outcome: None,
        submitted_at: chrono::Utc::now(),
    });
    store.eliminate_entry(entry.id, 1);
    let hedge = store.insert_entry("hedge", 2025);

    let states = entry_states(&store, 2025);
    assert_eq!(2, states.len());
    assert_eq!(entry.id, states[0].entry_id);
    assert_eq!(vec!["XX"], states[0].used_teams);
    assert!(!states[0].is_alive);
    assert_eq!(hedge.id, states[1].entry_id);
    assert!(states[1].used_teams.is_empty());
    assert!(states[1].is_alive);
}
