//! Domain entities shared across the engine: teams, games, stats, entries,
//! picks and the transient shapes the optimizer works with.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

pub mod error;

/// NFL conference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
pub enum Conference {
    #[strum(serialize = "AFC")]
    #[serde(rename = "AFC")]
    Afc,
    #[strum(serialize = "NFC")]
    #[serde(rename = "NFC")]
    Nfc,
}

/// A team, keyed by its canonical 2-3 letter abbreviation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub abbr: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<Conference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub division: Option<String>,
}

/// One scheduled game. `home_win` is `None` iff the game is unplayed;
/// `home_win_prob + away_win_prob = 1` whenever both are set.
/// `(season, week, home)` is unique across a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub season: u16,
    pub week: u8,
    pub home: String,
    pub away: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_date: Option<NaiveDate>,
    #[serde(default)]
    pub neutral_site: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_score: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_score: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_win: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_win_prob: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_win_prob: Option<f64>,
}
impl Game {
    pub fn is_played(&self) -> bool {
        self.home_win.is_some()
    }

    pub fn involves(&self, abbr: &str) -> bool {
        self.home == abbr || self.away == abbr
    }

    /// Win probability from the perspective of the given team, if computed.
    pub fn win_prob_for(&self, abbr: &str) -> Option<f64> {
        if self.home == abbr {
            self.home_win_prob
        } else if self.away == abbr {
            self.away_win_prob
        } else {
            None
        }
    }

    /// Whether the given team won, once the game has concluded.
    pub fn won_by(&self, abbr: &str) -> Option<bool> {
        let home_win = self.home_win?;
        if self.home == abbr {
            Some(home_win)
        } else if self.away == abbr {
            Some(!home_win)
        } else {
            None
        }
    }
}

/// Per-team, per-week feature bundle sourced from the ingestion pipeline.
/// Every rating may be absent; consumers substitute through
/// [`StatLine::resolve`](crate::feature::StatLine::resolve).
/// `(team, season, week)` is unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamWeekStats {
    pub team: String,
    pub season: u16,
    pub week: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_dvoa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offense_dvoa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense_dvoa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st_dvoa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_epa_per_play: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub def_epa_per_play: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_differential: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_form: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_days: Option<i64>,
}

/// One survivor-pool account. Terminal once `is_alive` flips to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    pub name: String,
    pub season: u16,
    pub is_alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eliminated_week: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// A pick made (or recommended) for an entry and week. `outcome` stays `None`
/// until the picked team's game completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub entry_id: u32,
    pub team: String,
    pub season: u16,
    pub week: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub win_prob: Option<f64>,
    pub is_recommended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<bool>,
    pub submitted_at: DateTime<Utc>,
}

/// One side of one remaining game; emitted twice per game, once per team.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekMatchup {
    pub week: u8,
    pub team: String,
    pub opponent: String,
    pub is_home: bool,
    pub win_prob: f64,
}

/// The optimizer's view of one entry: which teams it has burned and whether
/// it is still in contention.
#[derive(Debug, Clone, Default)]
pub struct EntryState {
    pub entry_id: u32,
    pub used_teams: Vec<String>,
    pub is_alive: bool,
}
impl EntryState {
    pub fn alive(entry_id: u32, used_teams: Vec<String>) -> Self {
        Self {
            entry_id,
            used_teams,
            is_alive: true,
        }
    }
}

/// Frozen audit record of one optimizer invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub season: u16,
    pub week: u8,
    pub n_simulations: u64,
    pub run_at: DateTime<Utc>,
    /// Team abbreviation to survival probability for the current-week decision.
    pub results: BTreeMap<String, f64>,
}

/// A set of team column indices, packed into a single word. Supports the 32
/// current franchises plus historical aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamSet(u64);
impl TeamSet {
    pub fn contains(&self, index: usize) -> bool {
        debug_assert!(index < u64::BITS as usize, "team index {index} out of range");
        self.0 & (1 << index) != 0
    }

    pub fn insert(&mut self, index: usize) {
        debug_assert!(index < u64::BITS as usize, "team index {index} out of range");
        self.0 |= 1 << index;
    }

    #[must_use]
    pub fn with(mut self, index: usize) -> Self {
        self.insert(index);
        self
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}
impl FromIterator<usize> for TeamSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = TeamSet::default();
        for index in iter {
            set.insert(index);
        }
        set
    }
}
