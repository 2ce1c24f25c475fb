//! Dense win-probability matrix over the remaining schedule.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use crate::domain::WeekMatchup;
use crate::lookup::TeamLookup;

/// Row-major `(n_weeks, n_teams)` matrix of win probabilities. Rows are the
/// distinct remaining weeks in ascending order; columns are all teams that
/// appear in any remaining matchup, in sorted-abbreviation order. A NaN cell
/// marks a bye (or an unusable input probability).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinMatrix {
    data: Vec<f64>,
    weeks: Vec<u8>,
    teams: TeamLookup,
}
impl WinMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the matrix from a remaining-matchup map. Probabilities outside
    /// `[0, 1]` are stored as NaN, rendering the team unavailable that week.
    pub fn from_matchups(matchups_by_week: &BTreeMap<u8, Vec<WeekMatchup>>) -> Self {
        let weeks: Vec<u8> = matchups_by_week.keys().copied().collect();
        let teams = TeamLookup::from_unsorted(
            matchups_by_week
                .values()
                .flatten()
                .map(|matchup| matchup.team.clone()),
        );

        let mut data = vec![f64::NAN; weeks.len() * teams.len()];
        for (week_index, matchups) in matchups_by_week.values().enumerate() {
            let row_start = week_index * teams.len();
            for matchup in matchups {
                if let Some(team_index) = teams.index_of(&matchup.team) {
                    data[row_start + team_index] = guard_prob(matchup.win_prob);
                }
            }
        }
        Self { data, weeks, teams }
    }

    pub fn n_weeks(&self) -> usize {
        self.weeks.len()
    }

    pub fn n_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Calendar week numbers backing each row, ascending.
    pub fn weeks(&self) -> &[u8] {
        &self.weeks
    }

    pub fn teams(&self) -> &TeamLookup {
        &self.teams
    }

    pub fn prob(&self, week_index: usize, team_index: usize) -> f64 {
        debug_assert!(self.validate_indices(week_index, team_index));
        self.data[week_index * self.teams.len() + team_index]
    }

    pub fn row(&self, week_index: usize) -> &[f64] {
        debug_assert!(self.validate_indices(week_index, 0));
        let row_start = week_index * self.teams.len();
        &self.data[row_start..row_start + self.teams.len()]
    }

    fn validate_indices(&self, week_index: usize, team_index: usize) -> bool {
        assert!(
            week_index < self.weeks.len(),
            "invalid week index {week_index} for a {}x{} win matrix",
            self.weeks.len(),
            self.teams.len()
        );
        assert!(
            team_index < self.teams.len(),
            "invalid team index {team_index} for a {}x{} win matrix",
            self.weeks.len(),
            self.teams.len()
        );
        true
    }
}

impl Display for WinMatrix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for week_index in 0..self.weeks.len() {
            writeln!(f, "{:?}", self.row(week_index))?;
        }
        Ok(())
    }
}

fn guard_prob(prob: f64) -> f64 {
    if (0.0..=1.0).contains(&prob) {
        prob
    } else {
        f64::NAN
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Builds a matchup map from literal rows: `probs[w][t]` is team `t`'s win
    /// probability in the `w`-th remaining week; NaN means a bye.
    pub fn matchups_from_rows(
        first_week: u8,
        teams: &[&str],
        probs: &[&[f64]],
    ) -> BTreeMap<u8, Vec<WeekMatchup>> {
        let mut matchups_by_week = BTreeMap::new();
        for (week_offset, row) in probs.iter().enumerate() {
            let week = first_week + week_offset as u8;
            let mut matchups = vec![];
            for (team_index, &win_prob) in row.iter().enumerate() {
                if win_prob.is_nan() {
                    continue;
                }
                matchups.push(WeekMatchup {
                    week,
                    team: teams[team_index].to_string(),
                    opponent: "OPP".to_string(),
                    is_home: true,
                    win_prob,
                });
            }
            matchups_by_week.insert(week, matchups);
        }
        matchups_by_week
    }

    pub fn matrix_from_rows(first_week: u8, teams: &[&str], probs: &[&[f64]]) -> WinMatrix {
        WinMatrix::from_matchups(&matchups_from_rows(first_week, teams, probs))
    }
}
