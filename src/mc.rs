//! The core of the Monte Carlo survival simulator.

use std::collections::BTreeMap;

use tinyrand::{Rand, Seeded, StdRand};

use crate::domain::TeamSet;
use crate::matrix::WinMatrix;

/// Fixed seed of the default generator; reruns with identical inputs are
/// bit-identical.
pub const SEED: u64 = 42;

pub const N_SIMULATIONS: u64 = 50_000;
pub const MIN_SIMULATIONS: u64 = 1_000;
pub const MAX_SIMULATIONS: u64 = 500_000;

/// A generator seeded with the engine default.
pub fn seeded_rand() -> StdRand {
    StdRand::seed(SEED)
}

/// Clamps a requested simulation count into the supported band.
pub fn clamp_sims(n_sims: u64) -> u64 {
    n_sims.clamp(MIN_SIMULATIONS, MAX_SIMULATIONS)
}

/// Survival probability per candidate first-week pick, over every team that
/// is available (unused and not on bye) in the first remaining week.
///
/// Each candidate fixes its own first pick, then all simulations share one
/// greedy continuation: the highest-probability available team each later
/// week, ties to the lower column index. Randomness enters only through the
/// Bernoulli game outcomes, which keeps the estimates low-variance across
/// candidates.
pub fn simulate_survival(
    matrix: &WinMatrix,
    used: TeamSet,
    n_sims: u64,
    rand: &mut impl Rand,
) -> BTreeMap<String, f64> {
    if matrix.is_empty() {
        return BTreeMap::new();
    }
    let n_sims = clamp_sims(n_sims) as usize;
    let n_teams = matrix.n_teams();

    let mut survival_probs = BTreeMap::new();
    let mut alive = vec![true; n_sims];

    for candidate in 0..n_teams {
        let first_prob = matrix.prob(0, candidate);
        if used.contains(candidate) || first_prob.is_nan() {
            continue;
        }

        alive.fill(true);
        let mut used_sim = used.with(candidate);
        draw_week(first_prob, &mut alive, rand);

        for week_index in 1..matrix.n_weeks() {
            if !alive.iter().any(|&sim_alive| sim_alive) {
                break;
            }
            match greedy_pick(matrix.row(week_index), used_sim) {
                None => {
                    // dead end: no team left to play this week
                    alive.fill(false);
                    break;
                }
                Some(pick) => {
                    used_sim.insert(pick);
                    draw_week(matrix.prob(week_index, pick), &mut alive, rand);
                }
            }
        }

        let survivors = alive.iter().filter(|&&sim_alive| sim_alive).count();
        let team = matrix.teams()[candidate].to_string();
        survival_probs.insert(team, survivors as f64 / n_sims as f64);
    }
    survival_probs
}

/// The best-probability available column, ties to the lower index; `None`
/// when every team is used or on bye.
pub(crate) fn greedy_pick(row: &[f64], used: TeamSet) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (team, &prob) in row.iter().enumerate() {
        if used.contains(team) || prob.is_nan() {
            continue;
        }
        match best {
            Some(current) if prob <= row[current] => {}
            _ => best = Some(team),
        }
    }
    best
}

fn draw_week(prob: f64, alive: &mut [bool], rand: &mut impl Rand) {
    for sim_alive in alive {
        // every sim consumes a draw, keeping the stream aligned across weeks
        let won = random_f64(rand) < prob;
        *sim_alive &= won;
    }
}

#[inline(always)]
fn random_f64(rand: &mut impl Rand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}

#[cfg(test)]
mod tests;
