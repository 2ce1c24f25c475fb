//! The calibrated win-probability model and its deterministic SRS fallback.

use std::fs::File;
use std::io::Error;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{from_reader, to_writer_pretty};
use tracing::warn;

use crate::feature::{game_features, StatLine, NUM_FEATURES};
use crate::model::fit::{Coefficients, PlattScaling, Standardizer};

pub mod fit;

/// Points of home-field advantage folded into the fallback spread.
pub const HOME_FIELD_PTS: f64 = 3.0;

/// Spread-to-probability scale: σ(spread / 13.86) gives 50% at a pick-em and
/// roughly 62% at a 7-point edge.
pub const FALLBACK_LOGISTIC_SCALE: f64 = 13.86;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Mean squared error between predicted probabilities and binary outcomes.
pub fn brier_score(probs: &[f64], outcomes: &[bool]) -> f64 {
    debug_assert_eq!(probs.len(), outcomes.len());
    if probs.is_empty() {
        return 0.0;
    }
    let sum: f64 = probs
        .iter()
        .zip(outcomes)
        .map(|(prob, &won)| (prob - if won { 1.0 } else { 0.0 }).powi(2))
        .sum();
    sum / probs.len() as f64
}

pub fn log_loss(probs: &[f64], outcomes: &[bool]) -> f64 {
    debug_assert_eq!(probs.len(), outcomes.len());
    if probs.is_empty() {
        return 0.0;
    }
    let sum: f64 = probs
        .iter()
        .zip(outcomes)
        .map(|(prob, &won)| {
            let truth_prob = if won { *prob } else { 1.0 - prob };
            -truth_prob.clamp(1e-12, 1.0).ln()
        })
        .sum();
    sum / probs.len() as f64
}

/// A fitted, calibrated classifier. Immutable once loaded; cheap to pass by
/// reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinModel {
    pub scaler: Standardizer,
    pub coefficients: Coefficients,
    pub platt: PlattScaling,
}
impl WinModel {
    /// Calibrated home-win probability for a raw (unstandardized) feature
    /// vector.
    pub fn prob_home(&self, features: &[f64; NUM_FEATURES]) -> f64 {
        let standardized = self.scaler.transform(features);
        let score = self.coefficients.decision(&standardized);
        self.platt.calibrate(score)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(from_reader(file)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let file = File::create(path)?;
        Ok(to_writer_pretty(file, self)?)
    }
}

/// One matchup to score: resolved home and away stat lines plus the neutral
/// flag.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchupStats {
    pub home: StatLine,
    pub away: StatLine,
    pub neutral: bool,
}

/// The prediction seam handed to consumers: a fitted model when one is
/// available, otherwise the deterministic SRS logistic.
#[derive(Debug, Clone)]
pub enum Predictor {
    Fitted(WinModel),
    SrsFallback,
}
impl Predictor {
    /// Loads a model from `path`, falling back to the SRS logistic when the
    /// file is absent or unreadable.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        match WinModel::load(&path) {
            Ok(model) => Predictor::Fitted(model),
            Err(error) => {
                warn!(
                    "no win model at {} ({error}); using SRS fallback",
                    path.as_ref().display()
                );
                Predictor::SrsFallback
            }
        }
    }

    /// Predicts `(p_home, p_away)`; the two always sum to 1.
    pub fn predict(&self, home: &StatLine, away: &StatLine, neutral: bool) -> (f64, f64) {
        match self {
            Predictor::Fitted(model) => {
                let features = game_features(home, away, neutral);
                let p_home = model.prob_home(&features);
                (p_home, 1.0 - p_home)
            }
            Predictor::SrsFallback => srs_fallback(home, away, neutral),
        }
    }

    /// Scores matchups independently, preserving order.
    pub fn predict_batch(&self, matchups: &[MatchupStats]) -> Vec<(f64, f64)> {
        matchups
            .iter()
            .map(|matchup| self.predict(&matchup.home, &matchup.away, matchup.neutral))
            .collect()
    }
}

/// SRS-based logistic used before any model has been trained.
pub fn srs_fallback(home: &StatLine, away: &StatLine, neutral: bool) -> (f64, f64) {
    let hfa = if neutral { 0.0 } else { HOME_FIELD_PTS };
    let spread = home.srs - away.srs + hfa;
    let p_home = sigmoid(spread / FALLBACK_LOGISTIC_SCALE);
    (p_home, 1.0 - p_home)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;

    use super::*;

    fn with_srs(srs: f64) -> StatLine {
        StatLine {
            srs,
            ..StatLine::default()
        }
    }

    #[test]
    fn sigmoid_shape() {
        assert_float_absolute_eq!(0.5, sigmoid(0.0));
        assert!(sigmoid(5.0) > 0.99);
        assert!(sigmoid(-5.0) < 0.01);
        assert_float_absolute_eq!(1.0, sigmoid(3.0) + sigmoid(-3.0));
    }

    #[test]
    fn fallback_even_matchup_on_neutral_ground() {
        let (p_home, p_away) = srs_fallback(&with_srs(4.0), &with_srs(4.0), true);
        assert_float_absolute_eq!(0.5, p_home);
        assert_float_absolute_eq!(0.5, p_away);
    }

    #[test]
    fn fallback_home_field_tilts_even_matchup() {
        let (p_home, p_away) = srs_fallback(&with_srs(0.0), &with_srs(0.0), false);
        assert!(p_home > 0.5);
        assert_float_absolute_eq!(sigmoid(HOME_FIELD_PTS / FALLBACK_LOGISTIC_SCALE), p_home);
        assert_float_absolute_eq!(1.0, p_home + p_away);
    }

    #[test]
    fn fallback_favours_stronger_side() {
        let (strong_home, _) = srs_fallback(&with_srs(8.0), &with_srs(-2.0), true);
        let (weak_home, _) = srs_fallback(&with_srs(-2.0), &with_srs(8.0), true);
        assert!(strong_home > 0.6);
        assert_float_absolute_eq!(1.0 - strong_home, weak_home);
    }

    #[test]
    fn predictor_fallback_closure() {
        let predictor = Predictor::SrsFallback;
        let matchups = [
            MatchupStats {
                home: with_srs(3.0),
                away: with_srs(-1.0),
                neutral: false,
            },
            MatchupStats {
                home: with_srs(-6.0),
                away: with_srs(2.0),
                neutral: true,
            },
        ];
        let predictions = predictor.predict_batch(&matchups);
        assert_eq!(2, predictions.len());
        for (p_home, p_away) in predictions {
            assert_float_absolute_eq!(1.0, p_home + p_away, 1e-9);
        }
    }

    #[test]
    fn brier_rewards_confidence_in_the_truth() {
        let outcomes = [true, false];
        assert_float_absolute_eq!(0.0, brier_score(&[1.0, 0.0], &outcomes));
        assert_float_absolute_eq!(0.25, brier_score(&[0.5, 0.5], &outcomes));
        assert_float_absolute_eq!(1.0, brier_score(&[0.0, 1.0], &outcomes));
    }

    #[test]
    fn log_loss_penalises_certain_misses() {
        let outcomes = [true];
        assert!(log_loss(&[0.99], &outcomes) < 0.02);
        assert!(log_loss(&[0.01], &outcomes) > 4.0);
        // clamped rather than infinite
        assert!(log_loss(&[0.0], &outcomes).is_finite());
    }

    #[test]
    fn empty_metrics_are_zero() {
        assert_eq!(0.0, brier_score(&[], &[]));
        assert_eq!(0.0, log_loss(&[], &[]));
    }
}
