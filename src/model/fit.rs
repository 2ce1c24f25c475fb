//! Fitting of the win-probability classifier: feature standardization, a
//! class-weighted L2 logistic fit by gradient descent, and Platt calibration
//! on pooled out-of-fold decision scores.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::feature::{self, NUM_FEATURES};
use crate::model::{brier_score, log_loss, sigmoid, WinModel};
use crate::store::Store;

const CALIBRATION_FOLDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Inverse regularization strength; larger means weaker regularization.
    pub regularization_c: f64,
    pub learning_rate: f64,
    pub max_epochs: u64,
    /// Convergence threshold on the largest gradient component.
    pub tolerance: f64,
}
impl FitOptions {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.regularization_c <= 0.0 {
            bail!("regularization strength must be positive");
        }
        if self.learning_rate <= 0.0 {
            bail!("learning rate must be positive");
        }
        const MIN_MAX_EPOCHS: u64 = 10;
        if self.max_epochs < MIN_MAX_EPOCHS {
            bail!("maximum number of epochs cannot be fewer than {MIN_MAX_EPOCHS}");
        }
        if self.tolerance < 0.0 {
            bail!("tolerance must be non-negative");
        }
        Ok(())
    }
}
impl Default for FitOptions {
    fn default() -> Self {
        Self {
            regularization_c: 1.0,
            learning_rate: 0.1,
            max_epochs: 10_000,
            tolerance: 1e-6,
        }
    }
}

/// Per-feature location and scale learned from the training corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub mean: [f64; NUM_FEATURES],
    pub stdev: [f64; NUM_FEATURES],
}
impl Standardizer {
    pub fn fit(samples: &[[f64; NUM_FEATURES]]) -> Self {
        let n = samples.len().max(1) as f64;
        let mut mean = [0.0; NUM_FEATURES];
        for sample in samples {
            for (feature, value) in mean.iter_mut().zip(sample) {
                *feature += value;
            }
        }
        for feature in &mut mean {
            *feature /= n;
        }

        let mut stdev = [0.0; NUM_FEATURES];
        for sample in samples {
            for feature in 0..NUM_FEATURES {
                stdev[feature] += (sample[feature] - mean[feature]).powi(2);
            }
        }
        for feature in &mut stdev {
            *feature = (*feature / n).sqrt();
            // constant columns pass through unscaled
            if *feature == 0.0 {
                *feature = 1.0;
            }
        }
        Self { mean, stdev }
    }

    pub fn transform(&self, features: &[f64; NUM_FEATURES]) -> [f64; NUM_FEATURES] {
        let mut standardized = [0.0; NUM_FEATURES];
        for feature in 0..NUM_FEATURES {
            standardized[feature] = (features[feature] - self.mean[feature]) / self.stdev[feature];
        }
        standardized
    }
}

/// The linear decision function over standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub weights: [f64; NUM_FEATURES],
    pub intercept: f64,
}
impl Coefficients {
    pub fn decision(&self, standardized: &[f64; NUM_FEATURES]) -> f64 {
        let dot: f64 = self
            .weights
            .iter()
            .zip(standardized)
            .map(|(weight, feature)| weight * feature)
            .sum();
        dot + self.intercept
    }
}

/// Sigmoid post-fit mapping a raw decision score to a calibrated probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlattScaling {
    pub slope: f64,
    pub offset: f64,
}
impl PlattScaling {
    pub fn identity() -> Self {
        Self {
            slope: 1.0,
            offset: 0.0,
        }
    }

    pub fn calibrate(&self, score: f64) -> f64 {
        sigmoid(self.slope * score + self.offset)
    }
}

/// Balanced per-class sample weights, `n / (2 * n_class)`.
pub fn class_weights(labels: &[bool]) -> (f64, f64) {
    let n = labels.len() as f64;
    let positives = labels.iter().filter(|&&won| won).count();
    let n_pos = positives.max(1) as f64;
    let n_neg = (labels.len() - positives).max(1) as f64;
    (n / (2.0 * n_pos), n / (2.0 * n_neg))
}

/// Batch gradient descent on the weighted cross-entropy with an L2 penalty
/// (intercept unpenalized).
pub fn fit_logistic(
    standardized: &[[f64; NUM_FEATURES]],
    labels: &[bool],
    options: &FitOptions,
) -> Coefficients {
    options.validate().unwrap();
    assert_eq!(
        standardized.len(),
        labels.len(),
        "a label must exist for each sample"
    );

    let n = standardized.len() as f64;
    let (weight_pos, weight_neg) = class_weights(labels);
    let total_weight: f64 = labels
        .iter()
        .map(|&won| if won { weight_pos } else { weight_neg })
        .sum();
    let lambda = 1.0 / (options.regularization_c * n);

    let mut coefficients = Coefficients {
        weights: [0.0; NUM_FEATURES],
        intercept: 0.0,
    };
    for _ in 0..options.max_epochs {
        let mut gradient = [0.0; NUM_FEATURES];
        let mut gradient_intercept = 0.0;
        for (sample, &won) in standardized.iter().zip(labels) {
            let sample_weight = if won { weight_pos } else { weight_neg };
            let target = if won { 1.0 } else { 0.0 };
            let residual = sample_weight * (sigmoid(coefficients.decision(sample)) - target);
            for (feature, value) in gradient.iter_mut().zip(sample) {
                *feature += residual * value;
            }
            gradient_intercept += residual;
        }

        let mut largest = 0.0_f64;
        for feature in 0..NUM_FEATURES {
            let slope = gradient[feature] / total_weight + lambda * coefficients.weights[feature];
            coefficients.weights[feature] -= options.learning_rate * slope;
            largest = largest.max(slope.abs());
        }
        let intercept_slope = gradient_intercept / total_weight;
        coefficients.intercept -= options.learning_rate * intercept_slope;
        largest = largest.max(intercept_slope.abs());

        if largest < options.tolerance {
            break;
        }
    }
    coefficients
}

/// Fits the Platt sigmoid to decision scores by gradient descent on the
/// cross-entropy, using Platt's smoothed targets.
pub fn fit_platt(scores: &[f64], labels: &[bool], options: &FitOptions) -> PlattScaling {
    options.validate().unwrap();
    assert_eq!(
        scores.len(),
        labels.len(),
        "a label must exist for each score"
    );
    if scores.is_empty() {
        return PlattScaling::identity();
    }

    let n = scores.len() as f64;
    let n_pos = labels.iter().filter(|&&won| won).count() as f64;
    let n_neg = n - n_pos;
    let target_pos = (n_pos + 1.0) / (n_pos + 2.0);
    let target_neg = 1.0 / (n_neg + 2.0);

    let mut platt = PlattScaling::identity();
    for _ in 0..options.max_epochs {
        let mut gradient_slope = 0.0;
        let mut gradient_offset = 0.0;
        for (&score, &won) in scores.iter().zip(labels) {
            let target = if won { target_pos } else { target_neg };
            let residual = platt.calibrate(score) - target;
            gradient_slope += residual * score;
            gradient_offset += residual;
        }
        gradient_slope /= n;
        gradient_offset /= n;

        platt.slope -= options.learning_rate * gradient_slope;
        platt.offset -= options.learning_rate * gradient_offset;

        if gradient_slope.abs().max(gradient_offset.abs()) < options.tolerance {
            break;
        }
    }
    platt
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub season: u16,
    pub n_samples: usize,
    pub brier: f64,
    pub log_loss: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainReport {
    pub train_seasons: Vec<u16>,
    pub n_train_samples: usize,
    pub train_brier: f64,
    pub train_log_loss: f64,
    pub home_win_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

/// Trains and calibrates the win-probability model on historical seasons,
/// optionally scoring a held-out validation season.
pub fn train<S: Store>(
    store: &S,
    train_seasons: &[u16],
    val_season: Option<u16>,
    options: &FitOptions,
) -> Result<(WinModel, TrainReport), anyhow::Error> {
    options.validate()?;
    info!("building training data for seasons {train_seasons:?}");
    let training_set = feature::build_training_set(store, train_seasons);
    feature::require_samples(&training_set)?;

    let scaler = Standardizer::fit(&training_set.x);
    let standardized: Vec<_> = training_set
        .x
        .iter()
        .map(|sample| scaler.transform(sample))
        .collect();

    // out-of-fold decision scores feed the calibration fit
    let mut pooled_scores = Vec::with_capacity(standardized.len());
    let mut pooled_labels = Vec::with_capacity(standardized.len());
    for fold in 0..CALIBRATION_FOLDS {
        let (held_start, held_end) = fold_bounds(standardized.len(), CALIBRATION_FOLDS, fold);
        let mut fold_x = Vec::with_capacity(standardized.len() - (held_end - held_start));
        let mut fold_y = Vec::with_capacity(fold_x.capacity());
        for index in (0..standardized.len()).filter(|index| !(held_start..held_end).contains(index))
        {
            fold_x.push(standardized[index]);
            fold_y.push(training_set.y[index]);
        }
        let fold_coefficients = fit_logistic(&fold_x, &fold_y, options);
        for index in held_start..held_end {
            pooled_scores.push(fold_coefficients.decision(&standardized[index]));
            pooled_labels.push(training_set.y[index]);
        }
    }
    let platt = fit_platt(&pooled_scores, &pooled_labels, options);
    debug!(
        "calibrated sigmoid over {} out-of-fold scores: slope {:.4}, offset {:.4}",
        pooled_scores.len(),
        platt.slope,
        platt.offset
    );

    let coefficients = fit_logistic(&standardized, &training_set.y, options);
    let model = WinModel {
        scaler,
        coefficients,
        platt,
    };

    let train_probs: Vec<_> = training_set
        .x
        .iter()
        .map(|sample| model.prob_home(sample))
        .collect();
    let mut report = TrainReport {
        train_seasons: train_seasons.to_vec(),
        n_train_samples: training_set.len(),
        train_brier: brier_score(&train_probs, &training_set.y),
        train_log_loss: log_loss(&train_probs, &training_set.y),
        home_win_rate: training_set.home_win_rate(),
        validation: None,
    };

    if let Some(season) = val_season {
        report.validation = validate(store, &model, season);
    }
    info!(
        "trained on {} samples: Brier {:.4}, log-loss {:.4}",
        report.n_train_samples, report.train_brier, report.train_log_loss
    );
    Ok((model, report))
}

fn validate<S: Store>(store: &S, model: &WinModel, season: u16) -> Option<ValidationReport> {
    let validation_set = feature::build_training_set(store, &[season]);
    if validation_set.is_empty() {
        warn!("no validation samples for season {season}");
        return None;
    }
    let probs: Vec<_> = validation_set
        .x
        .iter()
        .map(|sample| model.prob_home(sample))
        .collect();
    let hits = probs
        .iter()
        .zip(&validation_set.y)
        .filter(|(&prob, &won)| (prob >= 0.5) == won)
        .count();
    let report = ValidationReport {
        season,
        n_samples: validation_set.len(),
        brier: brier_score(&probs, &validation_set.y),
        log_loss: log_loss(&probs, &validation_set.y),
        accuracy: hits as f64 / validation_set.len() as f64,
    };
    info!(
        "validation on season {season}: Brier {:.4} (target <= 0.22), accuracy {:.1}%",
        report.brier,
        report.accuracy * 100.0
    );
    Some(report)
}

fn fold_bounds(n: usize, folds: usize, fold: usize) -> (usize, usize) {
    (n * fold / folds, n * (fold + 1) / folds)
}
