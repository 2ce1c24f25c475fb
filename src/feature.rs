//! Assembly of per-game feature vectors from team-week stats.

use tracing::debug;

use crate::domain::error::TrainError;
use crate::domain::TeamWeekStats;
use crate::store::Store;

pub const NUM_FEATURES: usize = 10;

/// Minimum sample count below which training is refused.
pub const MIN_TRAINING_SAMPLES: usize = 100;

/// A stat bundle with every absence already resolved: missing ratings become
/// 0, missing rest becomes a regular 7-day week. This is the only place the
/// substitution rule lives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatLine {
    pub total_dvoa: f64,
    pub offense_dvoa: f64,
    pub defense_dvoa: f64,
    pub off_epa: f64,
    pub def_epa: f64,
    pub srs: f64,
    pub recent_form: f64,
    pub rest_days: f64,
}
impl StatLine {
    pub fn resolve(stats: Option<&TeamWeekStats>) -> Self {
        match stats {
            None => Self {
                rest_days: 7.0,
                ..Self::default()
            },
            Some(stats) => Self {
                total_dvoa: stats.total_dvoa.unwrap_or(0.0),
                offense_dvoa: stats.offense_dvoa.unwrap_or(0.0),
                defense_dvoa: stats.defense_dvoa.unwrap_or(0.0),
                off_epa: stats.off_epa_per_play.unwrap_or(0.0),
                def_epa: stats.def_epa_per_play.unwrap_or(0.0),
                srs: stats.srs.unwrap_or(0.0),
                recent_form: stats.recent_form.unwrap_or(0.0),
                rest_days: stats.rest_days.unwrap_or(7) as f64,
            },
        }
    }
}

/// The fixed feature order, home perspective. Defensive ratings are inverted
/// since a lower defensive rating is the better one.
pub fn game_features(home: &StatLine, away: &StatLine, neutral: bool) -> [f64; NUM_FEATURES] {
    [
        home.total_dvoa - away.total_dvoa,
        home.offense_dvoa - away.offense_dvoa,
        away.defense_dvoa - home.defense_dvoa,
        home.off_epa - away.off_epa,
        away.def_epa - home.def_epa,
        home.srs - away.srs,
        home.recent_form - away.recent_form,
        home.rest_days - away.rest_days,
        if neutral { 0.0 } else { 1.0 },
        if neutral { 1.0 } else { 0.0 },
    ]
}

/// Labelled samples for the win-probability fit.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    pub x: Vec<[f64; NUM_FEATURES]>,
    pub y: Vec<bool>,
}
impl TrainingSet {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn home_win_rate(&self) -> f64 {
        if self.y.is_empty() {
            return 0.0;
        }
        self.y.iter().filter(|&&won| won).count() as f64 / self.y.len() as f64
    }
}

/// Builds the training set from every completed game of the given seasons.
/// A sample whose first six features are all exactly zero is a proxy for
/// missing stats and is skipped.
pub fn build_training_set<S: Store>(store: &S, seasons: &[u16]) -> TrainingSet {
    let mut training_set = TrainingSet::default();
    let mut skipped = 0;
    let mut total = 0;

    for &season in seasons {
        for game in store.games(season, 0, false, false) {
            let Some(home_win) = game.home_win else {
                continue;
            };
            total += 1;

            let home = StatLine::resolve(
                store
                    .latest_stats(&game.home, season, game.week, false)
                    .as_ref(),
            );
            let away = StatLine::resolve(
                store
                    .latest_stats(&game.away, season, game.week, false)
                    .as_ref(),
            );
            let features = game_features(&home, &away, game.neutral_site);

            if features[..6].iter().all(|&feature| feature == 0.0) {
                skipped += 1;
                continue;
            }

            training_set.x.push(features);
            training_set.y.push(home_win);
        }
    }

    debug!(
        "built feature matrix: {} samples from {total} games ({skipped} skipped for missing data)",
        training_set.len()
    );
    training_set
}

/// Guards the fit against a corpus too small to be meaningful.
pub fn require_samples(training_set: &TrainingSet) -> Result<(), TrainError> {
    if training_set.len() < MIN_TRAINING_SAMPLES {
        return Err(TrainError::InsufficientData {
            samples: training_set.len(),
        });
    }
    Ok(())
}
