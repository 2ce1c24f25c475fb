use assert_float_eq::assert_float_absolute_eq;

use super::*;
use crate::matrix::fixtures::matrix_from_rows;
use crate::mc::greedy_pick;

const NAN: f64 = f64::NAN;

#[test]
fn finds_the_obvious_sequence() {
    let matrix = matrix_from_rows(
        1,
        &["A", "B", "C"],
        &[&[0.9, 0.8, 0.5], &[0.1, 0.85, 0.6], &[0.1, 0.1, 0.9]],
    );
    let strategy = search(&matrix, TeamSet::default());
    assert_eq!(vec![Some(0), Some(1), Some(2)], strategy.picks);
    assert_float_absolute_eq!(0.9 * 0.85 * 0.9, strategy.survival);
    assert_eq!(vec!["A", "B", "C"], strategy.labels(matrix.teams()));
}

#[test]
fn looks_past_the_greedy_trap() {
    // greedy burns A in week 1 and is stuck with B's 0.3; the beam holds B
    // back instead
    let matrix = matrix_from_rows(1, &["A", "B"], &[&[0.9, 0.89], &[0.9, 0.3]]);
    let strategy = search(&matrix, TeamSet::default());
    assert_eq!(vec![Some(1), Some(0)], strategy.picks);
    assert_float_absolute_eq!(0.89 * 0.9, strategy.survival);
}

#[test]
fn beam_dominates_any_greedy_trace() {
    let matrix = matrix_from_rows(
        1,
        &["A", "B", "C", "D"],
        &[
            &[0.9, 0.85, 0.6, NAN],
            &[0.88, 0.3, 0.7, 0.65],
            &[0.2, 0.4, 0.5, 0.65],
        ],
    );

    let mut greedy_survival = 1.0;
    let mut used = TeamSet::default();
    for week_index in 0..matrix.n_weeks() {
        match greedy_pick(matrix.row(week_index), used) {
            None => {
                greedy_survival = 0.0;
                break;
            }
            Some(pick) => {
                used.insert(pick);
                greedy_survival *= matrix.prob(week_index, pick);
            }
        }
    }

    let strategy = search(&matrix, TeamSet::default());
    assert!(
        strategy.survival >= greedy_survival,
        "beam {} fell below greedy {greedy_survival}",
        strategy.survival
    );
}

#[test]
fn short_circuits_when_teams_run_out() {
    let matrix = matrix_from_rows(1, &["A", "B"], &[&[0.9, 0.6], &[0.8, 0.7], &[0.5, 0.5]]);
    let strategy = search(&matrix, TeamSet::default());
    assert_float_absolute_eq!(0.0, strategy.survival);
    assert_eq!(3, strategy.picks.len());
    assert_eq!(1, strategy.picks.iter().filter(|pick| pick.is_none()).count());
    assert_eq!(
        Some(&NO_PICK.to_string()),
        strategy.labels(matrix.teams()).last()
    );
}

#[test]
fn respects_already_used_teams() {
    let matrix = matrix_from_rows(1, &["A", "B"], &[&[0.9, 0.6]]);
    let strategy = search(&matrix, TeamSet::default().with(0));
    assert_eq!(vec![Some(1)], strategy.picks);
    assert_float_absolute_eq!(0.6, strategy.survival);
}

#[test]
fn empty_matrix_is_a_trivial_win() {
    let strategy = search(&WinMatrix::empty(), TeamSet::default());
    assert!(strategy.picks.is_empty());
    assert_float_absolute_eq!(1.0, strategy.survival);
}

#[test]
fn search_is_deterministic() {
    let matrix = matrix_from_rows(
        1,
        &["A", "B", "C"],
        &[&[0.9, 0.8, 0.5], &[0.1, 0.85, 0.6], &[0.1, 0.1, 0.9]],
    );
    assert_eq!(
        search(&matrix, TeamSet::default()),
        search(&matrix, TeamSet::default())
    );
}
