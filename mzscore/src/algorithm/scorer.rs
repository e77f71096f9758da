use std::cmp::Reverse;
use std::f64::consts::E;

use ordered_float::OrderedFloat;

use crate::data::result::{Contribution, MatchResult, ScoreResult};

/// Label of the synthetic intercept entry in the contribution breakdown.
pub const INTERCEPT_LABEL: &str = "Intercept";

/// Standard logistic transform of a logit value.
///
/// # Example
///
/// ```rust
/// # use mzscore::algorithm::scorer::sigmoid;
/// assert_eq!(sigmoid(0.0), 0.5);
/// assert!(sigmoid(2.0) > sigmoid(1.0));
/// assert!(sigmoid(-5.0) < 0.01);
/// ```
pub fn sigmoid(logit: f64) -> f64 {
    1.0 / (1.0 + E.powf(-logit))
}

/// Aggregates per-feature match sets into a classification.
///
/// Every feature with at least one match contributes the signed sum of its
/// matched coefficients; features with zero matches contribute nothing and
/// set `unmatched_feature_exists`. The logit is the intercept plus the total
/// contribution, and the probability is its logistic transform.
///
/// Classification is intentionally asymmetric: whenever at least one
/// contributing match exists and the total contribution is negative, class 0
/// is forced regardless of the 0.5 probability threshold. This override is
/// part of the model's contract, a borderline positive logit can still be
/// pushed to class 0 by a net-negative match set.
///
/// An empty query (or one where nothing matched) yields an intercept-only
/// result with the class decided by the plain threshold; that is a valid
/// outcome, not an error.
///
/// # Example
///
/// ```rust
/// # use mzscore::data::coefficient::CoefficientRow;
/// # use mzscore::data::feature::{QueryFeature, ToleranceSet};
/// # use mzscore::algorithm::matcher::match_all;
/// # use mzscore::algorithm::scorer::score;
/// let reference = vec![CoefficientRow::new(-0.02, 100.0, 5.0, 1.0, String::new(), 0)];
/// let query = vec![QueryFeature::new(100.0, 5.0, 1.0)];
/// let matches = match_all(&reference, &query, &ToleranceSet::new(0.5, 0.5, 0.5));
/// let result = score(&matches, 0.03806688);
/// assert_eq!(result.predicted_class, 0);
/// assert!((result.logit - 0.01806688).abs() < 1e-12);
/// ```
pub fn score(matches_per_feature: &[MatchResult], intercept: f64) -> ScoreResult {
    let mut total_contribution = 0.0;
    let mut unmatched_feature_exists = false;
    let mut per_feature: Vec<Contribution> = Vec::new();

    for result in matches_per_feature {
        if result.is_unmatched() {
            unmatched_feature_exists = true;
            continue;
        }

        let contribution = result.contribution();
        total_contribution += contribution;
        per_feature.push(Contribution {
            label: result.feature.key(),
            value: contribution,
            percent_impact: 0.0,
        });
    }

    let logit = intercept + total_contribution;
    let probability = sigmoid(logit);

    // Net-negative matched evidence forces class 0, bypassing the threshold.
    let has_contributing_match = !per_feature.is_empty();
    let predicted_class = if has_contributing_match && total_contribution < 0.0 {
        0
    } else if probability >= 0.5 {
        1
    } else {
        0
    };

    let displayed_probability = if predicted_class == 0 { 1.0 - probability } else { probability };

    ScoreResult {
        logit,
        probability,
        predicted_class,
        displayed_probability,
        unmatched_feature_exists,
        contributions: rank_contributions(intercept, per_feature),
    }
}

/// Builds the ranked contribution breakdown from the per-feature sums.
///
/// A synthetic intercept entry joins the per-feature entries, then all of
/// them are stably sorted by descending absolute value, ties keeping their
/// prior relative order. Each entry's `percent_impact` is its share of the
/// summed absolute values, intercept included in the denominator; the
/// percentages add up to 100 whenever any entry is non-zero.
///
/// # Example
///
/// ```rust
/// # use mzscore::data::result::Contribution;
/// # use mzscore::algorithm::scorer::rank_contributions;
/// let ranked = rank_contributions(0.05, vec![
///     Contribution { label: "a".to_string(), value: -0.2, percent_impact: 0.0 },
///     Contribution { label: "b".to_string(), value: 0.1, percent_impact: 0.0 },
/// ]);
/// let labels: Vec<&str> = ranked.iter().map(|c| c.label.as_str()).collect();
/// assert_eq!(labels, vec!["a", "b", "Intercept"]);
/// ```
pub fn rank_contributions(intercept: f64, per_feature: Vec<Contribution>) -> Vec<Contribution> {
    let mut entries = Vec::with_capacity(per_feature.len() + 1);
    entries.push(Contribution {
        label: INTERCEPT_LABEL.to_string(),
        value: intercept,
        percent_impact: 0.0,
    });
    entries.extend(per_feature);

    entries.sort_by_key(|entry| Reverse(OrderedFloat(entry.value.abs())));

    let total_abs: f64 = entries.iter().map(|entry| entry.value.abs()).sum();
    if total_abs > 0.0 {
        for entry in entries.iter_mut() {
            entry.percent_impact = entry.value.abs() / total_abs * 100.0;
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::matcher::match_all;
    use crate::data::coefficient::CoefficientRow;
    use crate::data::feature::{QueryFeature, ToleranceSet};

    const INTERCEPT: f64 = 0.03806688;

    fn single_row_table() -> Vec<CoefficientRow> {
        vec![CoefficientRow::new(-0.02, 100.0, 5.0, 1.0, "Murchison".to_string(), 0)]
    }

    #[test]
    fn test_matching_feature_with_negative_contribution_forces_class_zero() {
        let query = vec![QueryFeature::new(100.0, 5.0, 1.0)];
        let matches = match_all(&single_row_table(), &query, &ToleranceSet::new(0.5, 0.5, 0.5));
        let result = score(&matches, INTERCEPT);

        assert!(!result.unmatched_feature_exists);
        assert!((result.logit - 0.01806688).abs() < 1e-12);
        assert!((result.probability - 0.5045).abs() < 1e-4);
        // logit is positive, but the net-negative match set overrides
        assert_eq!(result.predicted_class, 0);
        assert!((result.displayed_probability - 0.4955).abs() < 1e-4);
    }

    #[test]
    fn test_unmatched_feature_falls_back_to_intercept() {
        let query = vec![QueryFeature::new(500.0, 50.0, 50.0)];
        let matches = match_all(&single_row_table(), &query, &ToleranceSet::new(0.5, 0.5, 0.5));
        let result = score(&matches, INTERCEPT);

        assert!(result.unmatched_feature_exists);
        assert!((result.logit - INTERCEPT).abs() < 1e-12);
        assert!((result.probability - 0.5095).abs() < 1e-4);
        assert_eq!(result.predicted_class, 1);
        assert_eq!(result.displayed_probability, result.probability);
    }

    #[test]
    fn test_empty_query_yields_intercept_only_result() {
        let result = score(&[], INTERCEPT);

        assert!(!result.unmatched_feature_exists);
        assert!((result.logit - INTERCEPT).abs() < 1e-12);
        // no contributing match, so the plain threshold decides
        assert_eq!(result.predicted_class, 1);
        assert_eq!(result.contributions.len(), 1);
        assert_eq!(result.contributions[0].label, INTERCEPT_LABEL);
        assert!((result.contributions[0].percent_impact - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ranking_and_percentages_with_two_features() {
        let reference = vec![
            CoefficientRow::new(0.10, 100.0, 5.0, 1.0, String::new(), 1),
            CoefficientRow::new(-0.05, 200.0, 10.0, 2.0, String::new(), 0),
        ];
        let query = vec![
            QueryFeature::new(100.0, 5.0, 1.0),
            QueryFeature::new(200.0, 10.0, 2.0),
        ];
        let matches = match_all(&reference, &query, &ToleranceSet::new(0.5, 0.5, 0.5));
        let result = score(&matches, INTERCEPT);

        // both features outrank the intercept by absolute value
        assert_eq!(result.contributions.len(), 3);
        assert!((result.contributions[0].value - 0.10).abs() < 1e-12);
        assert!((result.contributions[1].value + 0.05).abs() < 1e-12);
        assert_eq!(result.contributions[2].label, INTERCEPT_LABEL);

        let percent_sum: f64 = result.contributions.iter().map(|c| c.percent_impact).sum();
        assert!((percent_sum - 100.0).abs() < 1e-9);

        // net contribution is positive, no override
        assert_eq!(result.predicted_class, 1);
    }

    #[test]
    fn test_feature_matching_many_rows_sums_their_coefficients() {
        let reference = vec![
            CoefficientRow::new(0.02, 100.0, 5.0, 1.0, String::new(), 1),
            CoefficientRow::new(0.03, 100.1, 5.1, 1.1, String::new(), 1),
            CoefficientRow::new(-0.01, 100.2, 4.9, 0.9, String::new(), 0),
        ];
        let query = vec![QueryFeature::new(100.1, 5.0, 1.0)];
        let matches = match_all(&reference, &query, &ToleranceSet::new(0.5, 0.5, 0.5));
        let result = score(&matches, 0.0);

        assert!((result.logit - 0.04).abs() < 1e-12);
        assert_eq!(result.contributions.len(), 2);
        assert!((result.contributions[0].value - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_duplicate_valued_features_stay_distinct_entries() {
        let reference = vec![CoefficientRow::new(-0.02, 100.0, 5.0, 1.0, String::new(), 0)];
        let query = vec![
            QueryFeature::new(100.0, 5.0, 1.0),
            QueryFeature::new(100.0, 5.0, 1.0),
        ];
        let matches = match_all(&reference, &query, &ToleranceSet::new(0.5, 0.5, 0.5));
        let result = score(&matches, INTERCEPT);

        // intercept entry plus one entry per feature, duplicates included
        assert_eq!(result.contributions.len(), 3);
        assert!((result.logit - (INTERCEPT - 0.04)).abs() < 1e-12);
        assert_eq!(result.predicted_class, 0);
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let ranked = rank_contributions(
            0.5,
            vec![
                Contribution { label: "first".to_string(), value: 0.5, percent_impact: 0.0 },
                Contribution { label: "second".to_string(), value: -0.5, percent_impact: 0.0 },
            ],
        );

        // all tie at |0.5|; prior order (intercept, first, second) survives
        assert_eq!(ranked[0].label, INTERCEPT_LABEL);
        assert_eq!(ranked[1].label, "first");
        assert_eq!(ranked[2].label, "second");
    }

    #[test]
    fn test_sigmoid_midpoint_and_monotonicity() {
        assert_eq!(sigmoid(0.0), 0.5);
        let mut previous = sigmoid(-10.0);
        for i in -9..=10 {
            let next = sigmoid(i as f64);
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_negative_logit_without_matches_classifies_by_threshold() {
        let result = score(&[], -0.25);
        assert!(result.probability < 0.5);
        assert_eq!(result.predicted_class, 0);
        assert!((result.displayed_probability - (1.0 - result.probability)).abs() < 1e-12);
    }
}
