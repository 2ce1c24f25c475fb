//! Materialization of the remaining schedule into per-week matchups and the
//! per-team season view.

use std::collections::BTreeMap;

use crate::domain::WeekMatchup;
use crate::store::Store;

/// Remaining matchups from `from_week` onward, keyed by week. Each game
/// contributes two entries, one from each side's perspective. Only unplayed
/// games with computed win probabilities qualify; with none present, the map
/// is empty.
pub fn remaining_matchups<S: Store>(
    store: &S,
    season: u16,
    from_week: u8,
) -> BTreeMap<u8, Vec<WeekMatchup>> {
    let mut matchups_by_week: BTreeMap<u8, Vec<WeekMatchup>> = BTreeMap::new();
    for game in store.games(season, from_week, true, true) {
        let (Some(p_home), Some(p_away)) = (game.home_win_prob, game.away_win_prob) else {
            continue;
        };
        let matchups = matchups_by_week.entry(game.week).or_default();
        matchups.push(WeekMatchup {
            week: game.week,
            team: game.home.clone(),
            opponent: game.away.clone(),
            is_home: true,
            win_prob: p_home,
        });
        matchups.push(WeekMatchup {
            week: game.week,
            team: game.away.clone(),
            opponent: game.home.clone(),
            is_home: false,
            win_prob: p_away,
        });
    }
    matchups_by_week
}

/// One game of a team's season, from that team's perspective.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamGame {
    pub week: u8,
    pub opponent: String,
    pub is_home: bool,
    pub win_prob: Option<f64>,
    pub won: Option<bool>,
}
impl TeamGame {
    pub fn is_played(&self) -> bool {
        self.won.is_some()
    }
}

/// A team's full-season schedule with win probabilities and results, plus the
/// entries that have already burned the team.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamSchedule {
    pub team: String,
    pub season: u16,
    pub games: Vec<TeamGame>,
    pub used_by_entries: Vec<u32>,
}

/// The season through one team's eyes; `None` when the team is unknown.
pub fn team_schedule<S: Store>(store: &S, season: u16, abbr: &str) -> Option<TeamSchedule> {
    let team = store.team(abbr)?;

    let games = store
        .games(season, 0, false, false)
        .into_iter()
        .filter(|game| game.involves(&team.abbr))
        .map(|game| {
            let is_home = game.home == team.abbr;
            TeamGame {
                week: game.week,
                opponent: if is_home {
                    game.away.clone()
                } else {
                    game.home.clone()
                },
                is_home,
                win_prob: game.win_prob_for(&team.abbr),
                won: game.won_by(&team.abbr),
            }
        })
        .collect();

    let mut used_by_entries: Vec<u32> = store
        .entries(season)
        .iter()
        .filter(|entry| {
            store
                .picks_for_entry(entry.id)
                .iter()
                .any(|pick| pick.season == season && pick.team == team.abbr)
        })
        .map(|entry| entry.id)
        .collect();
    used_by_entries.sort_unstable();

    Some(TeamSchedule {
        team: team.abbr,
        season,
        games,
        used_by_entries,
    })
}
