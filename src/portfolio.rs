//! Diversified pick recommendations across a portfolio of entries.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::domain::EntryState;
use crate::matchup;
use crate::matrix::WinMatrix;
use crate::store::Store;
use crate::{beam, mc};

/// Score penalty per earlier entry committed to the same team this week. A
/// greedy stand-in for joint portfolio optimization; tune with care.
pub const DIVERSITY_PENALTY: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub entry_id: u32,
    pub week: u8,
    pub team: String,
    pub win_prob: Option<f64>,
    pub survival_prob: f64,
    pub portfolio_coverage: f64,
    pub strategy_picks: BTreeMap<u8, String>,
}

/// Recommends one pick per alive entry, in input order, trading a little
/// individual survival for coverage: a team already committed to an earlier
/// entry is discounted by [`DIVERSITY_PENALTY`] per duplicate, which improves
/// the odds that at least one entry gets through the week.
pub fn recommend<S: Store>(
    store: &S,
    season: u16,
    current_week: u8,
    entry_states: &[EntryState],
    n_sims: u64,
) -> Vec<Recommendation> {
    let matchups_by_week = matchup::remaining_matchups(store, season, current_week);
    if matchups_by_week.is_empty() {
        warn!("no matchup data for season {season} week {current_week}+");
        return vec![];
    }
    let matrix = WinMatrix::from_matchups(&matchups_by_week);
    let mut rand = mc::seeded_rand();

    let mut recommendations = vec![];
    let mut committed_this_week: Vec<String> = vec![];

    for entry_state in entry_states {
        if !entry_state.is_alive {
            continue;
        }
        let used = matrix
            .teams()
            .set_of(entry_state.used_teams.iter().map(String::as_str));

        let strategy = beam::search(&matrix, used);
        let single_probs = mc::simulate_survival(&matrix, used, n_sims, &mut rand);

        let mut recommended: Option<(&String, f64)> = None;
        for (team, &survival) in &single_probs {
            let duplicates = committed_this_week
                .iter()
                .filter(|committed| *committed == team)
                .count();
            let score = survival * (1.0 - DIVERSITY_PENALTY * duplicates as f64);
            // strict comparison keeps the lexicographically first team on ties
            if recommended.map_or(true, |(_, best)| score > best) {
                recommended = Some((team, score));
            }
        }
        let Some((team, coverage)) = recommended else {
            continue;
        };
        let team = team.clone();
        committed_this_week.push(team.clone());

        let win_prob = matchups_by_week
            .get(&current_week)
            .and_then(|matchups| {
                matchups
                    .iter()
                    .find(|matchup| matchup.team == team)
                    .map(|matchup| matchup.win_prob)
            });

        let strategy_picks = matrix
            .weeks()
            .iter()
            .copied()
            .zip(strategy.labels(matrix.teams()))
            .collect();

        recommendations.push(Recommendation {
            entry_id: entry_state.entry_id,
            week: current_week,
            team: team.clone(),
            win_prob,
            survival_prob: single_probs.get(&team).copied().unwrap_or(0.0),
            portfolio_coverage: coverage,
            strategy_picks,
        });
    }
    recommendations
}

/// Reads an entry's optimizer state back out of the store.
pub fn entry_states<S: Store>(store: &S, season: u16) -> Vec<EntryState> {
    store
        .entries(season)
        .into_iter()
        .map(|entry| EntryState {
            entry_id: entry.id,
            used_teams: store
                .picks_for_entry(entry.id)
                .into_iter()
                .filter(|pick| pick.season == season)
                .map(|pick| pick.team)
                .collect(),
            is_alive: entry.is_alive,
        })
        .collect()
}

#[cfg(test)]
mod tests;
