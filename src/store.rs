//! The persistence seam. The engine only ever talks to [`Store`]; the
//! bundled [`MemoryStore`] keeps everything in memory and round-trips
//! through a JSON [`Snapshot`] file, which is what the CLI binaries use.

use std::fs::File;
use std::io::Error;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};

use crate::domain::{Entry, Game, Pick, SimulationRun, Team, TeamWeekStats};

/// Read and write operations the engine needs from the enclosing service.
/// All reads return deterministic orderings: games by `(week, home)`,
/// entries by id, picks by `(week, team)`.
pub trait Store {
    fn teams(&self) -> Vec<Team>;

    fn team(&self, abbr: &str) -> Option<Team>;

    /// Games of a season from `week_min` onward. `unplayed_only` keeps games
    /// with no result; `require_win_prob` keeps games with computed
    /// probabilities.
    fn games(
        &self,
        season: u16,
        week_min: u8,
        unplayed_only: bool,
        require_win_prob: bool,
    ) -> Vec<Game>;

    /// The most recent stats row for a team with `week <= week_upper`
    /// (`week < week_upper` when `strictly_before` is set).
    fn latest_stats(
        &self,
        team: &str,
        season: u16,
        week_upper: u8,
        strictly_before: bool,
    ) -> Option<TeamWeekStats>;

    fn entries(&self, season: u16) -> Vec<Entry>;

    fn entry(&self, entry_id: u32) -> Option<Entry>;

    fn picks_for_entry(&self, entry_id: u32) -> Vec<Pick>;

    fn picks_for_week(&self, season: u16, week: u8) -> Vec<Pick>;

    fn set_game_win_prob(&mut self, season: u16, week: u8, home: &str, p_home: f64, p_away: f64);

    fn insert_entry(&mut self, name: &str, season: u16) -> Entry;

    fn insert_pick(&mut self, pick: Pick);

    fn insert_run(&mut self, run: SimulationRun);

    fn set_pick_outcome(&mut self, entry_id: u32, season: u16, week: u8, outcome: bool);

    fn eliminate_entry(&mut self, entry_id: u32, week: u8);
}

/// Serialized form of the whole store, human-diffable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub stats: Vec<TeamWeekStats>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    #[serde(default)]
    pub picks: Vec<Pick>,
    #[serde(default)]
    pub runs: Vec<SimulationRun>,
}
impl Snapshot {
    pub fn read_json(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(from_reader(file)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let file = File::create(path)?;
        Ok(to_writer_pretty(file, self)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    snapshot: Snapshot,
}
impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(Snapshot::read_json(path)?))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.snapshot.write_json(path)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn next_entry_id(&self) -> u32 {
        self.snapshot
            .entries
            .iter()
            .map(|entry| entry.id)
            .max()
            .map_or(1, |max| max + 1)
    }
}

impl Store for MemoryStore {
    fn teams(&self) -> Vec<Team> {
        let mut teams = self.snapshot.teams.clone();
        teams.sort_by(|a, b| a.abbr.cmp(&b.abbr));
        teams
    }

    fn team(&self, abbr: &str) -> Option<Team> {
        self.snapshot
            .teams
            .iter()
            .find(|team| team.abbr == abbr)
            .cloned()
    }

    fn games(
        &self,
        season: u16,
        week_min: u8,
        unplayed_only: bool,
        require_win_prob: bool,
    ) -> Vec<Game> {
        let mut games: Vec<Game> = self
            .snapshot
            .games
            .iter()
            .filter(|game| game.season == season && game.week >= week_min)
            .filter(|game| !unplayed_only || game.home_win.is_none())
            .filter(|game| !require_win_prob || game.home_win_prob.is_some())
            .cloned()
            .collect();
        games.sort_by(|a, b| (a.week, &a.home).cmp(&(b.week, &b.home)));
        games
    }

    fn latest_stats(
        &self,
        team: &str,
        season: u16,
        week_upper: u8,
        strictly_before: bool,
    ) -> Option<TeamWeekStats> {
        self.snapshot
            .stats
            .iter()
            .filter(|stats| stats.team == team && stats.season == season)
            .filter(|stats| {
                if strictly_before {
                    stats.week < week_upper
                } else {
                    stats.week <= week_upper
                }
            })
            .max_by_key(|stats| stats.week)
            .cloned()
    }

    fn entries(&self, season: u16) -> Vec<Entry> {
        let mut entries: Vec<Entry> = self
            .snapshot
            .entries
            .iter()
            .filter(|entry| entry.season == season)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.id);
        entries
    }

    fn entry(&self, entry_id: u32) -> Option<Entry> {
        self.snapshot
            .entries
            .iter()
            .find(|entry| entry.id == entry_id)
            .cloned()
    }

    fn picks_for_entry(&self, entry_id: u32) -> Vec<Pick> {
        let mut picks: Vec<Pick> = self
            .snapshot
            .picks
            .iter()
            .filter(|pick| pick.entry_id == entry_id)
            .cloned()
            .collect();
        picks.sort_by(|a, b| (a.week, &a.team).cmp(&(b.week, &b.team)));
        picks
    }

    fn picks_for_week(&self, season: u16, week: u8) -> Vec<Pick> {
        let mut picks: Vec<Pick> = self
            .snapshot
            .picks
            .iter()
            .filter(|pick| pick.season == season && pick.week == week)
            .cloned()
            .collect();
        picks.sort_by(|a, b| (a.entry_id, &a.team).cmp(&(b.entry_id, &b.team)));
        picks
    }

    fn set_game_win_prob(&mut self, season: u16, week: u8, home: &str, p_home: f64, p_away: f64) {
        if let Some(game) = self
            .snapshot
            .games
            .iter_mut()
            .find(|game| game.season == season && game.week == week && game.home == home)
        {
            game.home_win_prob = Some(p_home);
            game.away_win_prob = Some(p_away);
        }
    }

    fn insert_entry(&mut self, name: &str, season: u16) -> Entry {
        let entry = Entry {
            id: self.next_entry_id(),
            name: name.to_string(),
            season,
            is_alive: true,
            eliminated_week: None,
            created_at: Utc::now(),
        };
        self.snapshot.entries.push(entry.clone());
        entry
    }

    fn insert_pick(&mut self, pick: Pick) {
        self.snapshot.picks.push(pick);
    }

    fn insert_run(&mut self, run: SimulationRun) {
        self.snapshot.runs.push(run);
    }

    fn set_pick_outcome(&mut self, entry_id: u32, season: u16, week: u8, outcome: bool) {
        if let Some(pick) = self
            .snapshot
            .picks
            .iter_mut()
            .find(|pick| pick.entry_id == entry_id && pick.season == season && pick.week == week)
        {
            pick.outcome = Some(outcome);
        }
    }

    fn eliminate_entry(&mut self, entry_id: u32, week: u8) {
        if let Some(entry) = self
            .snapshot
            .entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
        {
            entry.is_alive = false;
            entry.eliminated_week = Some(week);
        }
    }
}
