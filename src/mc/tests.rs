use assert_float_eq::assert_float_absolute_eq;

use super::*;
use crate::matrix::fixtures::matrix_from_rows;

const NAN: f64 = f64::NAN;

#[test]
fn single_week_survival_tracks_win_prob() {
    let matrix = matrix_from_rows(1, &["A", "B"], &[&[0.9, 0.6]]);
    let mut rand = seeded_rand();
    let survival = simulate_survival(&matrix, TeamSet::default(), 10_000, &mut rand);

    assert_eq!(2, survival.len());
    assert_float_absolute_eq!(0.9, survival["A"], 0.01);
    assert_float_absolute_eq!(0.6, survival["B"], 0.01);
}

#[test]
fn forced_greedy_continuation() {
    // picking A leaves B (0.85) then C (0.9) as the greedy path
    let matrix = matrix_from_rows(
        1,
        &["A", "B", "C"],
        &[&[0.9, 0.8, 0.5], &[0.1, 0.85, 0.6], &[0.1, 0.1, 0.9]],
    );
    let mut rand = seeded_rand();
    let survival = simulate_survival(&matrix, TeamSet::default(), 50_000, &mut rand);
    assert_float_absolute_eq!(0.9 * 0.85 * 0.9, survival["A"], 0.01);
}

#[test]
fn recommended_team_dominates_the_field() {
    let matrix = matrix_from_rows(1, &["A", "B", "C"], &[&[0.9, 0.6, 0.75]]);
    let mut rand = seeded_rand();
    let survival = simulate_survival(&matrix, TeamSet::default(), 20_000, &mut rand);

    let (best_team, best_prob) = survival
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
        .unwrap();
    assert_eq!("A", best_team);
    for prob in survival.values() {
        assert!(best_prob >= prob);
    }
}

#[test]
fn exhausted_first_week_yields_nothing() {
    let matrix = matrix_from_rows(1, &["A", "B", "C"], &[&[0.9, 0.6, NAN]]);
    let used: TeamSet = [0, 1].into_iter().collect();
    let mut rand = seeded_rand();
    assert!(simulate_survival(&matrix, used, 10_000, &mut rand).is_empty());
}

#[test]
fn empty_matrix_yields_nothing() {
    let mut rand = seeded_rand();
    assert!(
        simulate_survival(&WinMatrix::empty(), TeamSet::default(), 10_000, &mut rand).is_empty()
    );
}

#[test]
fn used_and_bye_teams_are_not_candidates() {
    let matrix = matrix_from_rows(1, &["A", "B", "C"], &[&[0.9, NAN, 0.7], &[0.5, 0.6, 0.4]]);
    let mut rand = seeded_rand();
    let survival = simulate_survival(&matrix, TeamSet::default().with(0), 10_000, &mut rand);
    assert_eq!(vec!["C"], survival.keys().collect::<Vec<_>>());
}

#[test]
fn dead_end_week_kills_every_path() {
    // only one team ever playable: week 2 has no legal continuation
    let matrix = matrix_from_rows(1, &["A", "B"], &[&[1.0, NAN], &[1.0, NAN]]);
    let mut rand = seeded_rand();
    let survival = simulate_survival(&matrix, TeamSet::default(), 10_000, &mut rand);
    assert_float_absolute_eq!(0.0, survival["A"]);
}

#[test]
fn sure_wins_always_survive() {
    let matrix = matrix_from_rows(1, &["A", "B"], &[&[1.0, 1.0], &[1.0, 1.0]]);
    let mut rand = seeded_rand();
    let survival = simulate_survival(&matrix, TeamSet::default(), 10_000, &mut rand);
    assert_float_absolute_eq!(1.0, survival["A"]);
    assert_float_absolute_eq!(1.0, survival["B"]);
}

#[test]
fn fixed_seed_is_reproducible() {
    let matrix = matrix_from_rows(
        1,
        &["A", "B", "C", "D"],
        &[&[0.9, 0.8, 0.5, NAN], &[0.1, 0.85, 0.6, 0.7]],
    );
    let first = simulate_survival(&matrix, TeamSet::default(), 10_000, &mut seeded_rand());
    let second = simulate_survival(&matrix, TeamSet::default(), 10_000, &mut seeded_rand());
    assert_eq!(first, second);
}

#[test]
fn simulation_count_is_clamped() {
    assert_eq!(MIN_SIMULATIONS, clamp_sims(1));
    assert_eq!(N_SIMULATIONS, clamp_sims(N_SIMULATIONS));
    assert_eq!(MAX_SIMULATIONS, clamp_sims(u64::MAX));
}

#[test]
fn greedy_pick_prefers_highest_then_lowest_index() {
    assert_eq!(Some(1), greedy_pick(&[0.4, 0.8, 0.8], TeamSet::default()));
    assert_eq!(Some(2), greedy_pick(&[0.4, 0.8, 0.8], TeamSet::default().with(1)));
    assert_eq!(Some(0), greedy_pick(&[0.4, NAN, NAN], TeamSet::default()));
    assert_eq!(None, greedy_pick(&[NAN, NAN], TeamSet::default()));
    assert_eq!(None, greedy_pick(&[0.4, 0.8], [0, 1].into_iter().collect()));
}

#[test]
fn zero_probability_team_is_still_playable() {
    // a certain loser is a legal pick, unlike a bye
    assert_eq!(Some(0), greedy_pick(&[0.0, NAN], TeamSet::default()));
}
