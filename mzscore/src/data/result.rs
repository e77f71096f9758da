use serde::{Deserialize, Serialize};

use crate::data::coefficient::CoefficientRow;
use crate::data::feature::QueryFeature;

/// The matcher's output for a single query feature.
///
/// `matches` is the order-preserving subset of the reference table that fell
/// inside the tolerance box around the feature; it may be empty, which is a
/// valid outcome and not an error. `distances[i]` is the raw-unit 3-D
/// Euclidean distance from the query point to `matches[i]`, mixing m/z and
/// retention time units directly. It is a relative proximity indicator
/// within one feature's matches only and is never used for inclusion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchResult {
    /// Position of the feature in the query list.
    pub feature_index: usize,
    pub feature: QueryFeature,
    pub matches: Vec<CoefficientRow>,
    pub distances: Vec<f64>,
}

impl MatchResult {
    /// True when the feature matched zero reference rows.
    pub fn is_unmatched(&self) -> bool {
        self.matches.is_empty()
    }

    /// Signed sum of the matched coefficients.
    pub fn contribution(&self) -> f64 {
        self.matches.iter().map(|row| row.coefficient).sum()
    }
}

/// One entry of the ranked contribution breakdown.
///
/// Either a query feature that matched at least one reference row (labeled
/// with the feature's coordinate key) or the synthetic intercept entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contribution {
    pub label: String,
    /// Signed contribution to the logit. Positive pushes toward class 1,
    /// negative toward class 0.
    pub value: f64,
    /// Share of the total absolute contribution, in percent. The intercept
    /// counts toward the denominator.
    pub percent_impact: f64,
}

/// The scorer's complete output for one invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Linear predictor: intercept plus the summed contributions of every
    /// feature that matched at least one row.
    pub logit: f64,
    /// Raw P(class = 1) from the logistic transform of the logit.
    pub probability: f64,
    pub predicted_class: u8,
    /// Confidence in the predicted class: `probability` when class 1 was
    /// predicted, `1 - probability` when class 0 was.
    pub displayed_probability: f64,
    /// True when at least one query feature matched zero reference rows.
    pub unmatched_feature_exists: bool,
    /// All contributing entries, intercept included, sorted by descending
    /// absolute value.
    pub contributions: Vec<Contribution>,
}
