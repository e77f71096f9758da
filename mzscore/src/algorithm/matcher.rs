use rayon::prelude::*;

use crate::data::coefficient::CoefficientRow;
use crate::data::feature::{QueryFeature, ToleranceSet};
use crate::data::result::MatchResult;

/// Tests whether a reference row lies inside the tolerance box around a
/// query feature.
///
/// The three axes are checked independently (axis-aligned box, not a
/// spherical radius) and every comparison is boundary-inclusive, so a row
/// sitting exactly on a tolerance edge matches.
///
/// # Example
///
/// ```rust
/// # use mzscore::data::coefficient::CoefficientRow;
/// # use mzscore::data::feature::{QueryFeature, ToleranceSet};
/// # use mzscore::algorithm::matcher::within_tolerance;
/// let row = CoefficientRow::new(-0.02, 100.5, 5.0, 1.0, String::new(), 0);
/// let feature = QueryFeature::new(100.0, 5.0, 1.0);
/// // |100.0 - 100.5| == 0.5, equality counts as a match
/// assert!(within_tolerance(&feature, &row, &ToleranceSet::new(0.5, 0.5, 0.5)));
/// assert!(!within_tolerance(&feature, &row, &ToleranceSet::new(0.4, 0.5, 0.5)));
/// ```
pub fn within_tolerance(feature: &QueryFeature, row: &CoefficientRow, tol: &ToleranceSet) -> bool {
    (feature.mz - row.mz).abs() <= tol.mz_tol
        && (feature.rt1 - row.rt1_center).abs() <= tol.rt1_tol
        && (feature.rt2 - row.rt2_center).abs() <= tol.rt2_tol
}

/// Raw-unit Euclidean distance between a query feature and a reference row
/// in the 3-axis (m/z, RT1, RT2) space.
///
/// No normalization is applied, so the value mixes m/z and retention time
/// units. It is meaningful only as a relative proximity indicator among one
/// feature's matches and plays no part in the inclusion decision.
pub fn euclidean_distance(feature: &QueryFeature, row: &CoefficientRow) -> f64 {
    ((feature.mz - row.mz).powi(2)
        + (feature.rt1 - row.rt1_center).powi(2)
        + (feature.rt2 - row.rt2_center).powi(2))
    .sqrt()
}

/// Finds all reference rows within the tolerance box around one query
/// feature.
///
/// Returns an order-preserving subset of `reference`. A feature may match
/// zero, one, or many rows; zero matches is a valid, reported outcome. The
/// reference table is scanned fresh on every call, there is no index or
/// cache.
///
/// # Example
///
/// ```rust
/// # use mzscore::data::coefficient::CoefficientRow;
/// # use mzscore::data::feature::{QueryFeature, ToleranceSet};
/// # use mzscore::algorithm::matcher::match_feature;
/// let reference = vec![
///     CoefficientRow::new(-0.02, 100.0, 5.0, 1.0, String::new(), 0),
///     CoefficientRow::new(0.01, 350.0, 20.0, 3.0, String::new(), 1),
/// ];
/// let feature = QueryFeature::new(100.1, 5.1, 1.1);
/// let matches = match_feature(&reference, &feature, &ToleranceSet::new(0.5, 0.5, 0.5));
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].mz, 100.0);
/// ```
pub fn match_feature(reference: &[CoefficientRow], feature: &QueryFeature, tol: &ToleranceSet) -> Vec<CoefficientRow> {
    reference
        .iter()
        .filter(|row| within_tolerance(feature, row, tol))
        .cloned()
        .collect()
}

/// Matches every feature of a query list against the reference table.
///
/// Features are matched independently and in parallel over the query list;
/// the output is always in query order, never in completion order. Each
/// `MatchResult` carries the matched rows together with their display
/// distances.
///
/// # Example
///
/// ```rust
/// # use mzscore::data::coefficient::CoefficientRow;
/// # use mzscore::data::feature::{QueryFeature, ToleranceSet};
/// # use mzscore::algorithm::matcher::match_all;
/// let reference = vec![CoefficientRow::new(-0.02, 100.0, 5.0, 1.0, String::new(), 0)];
/// let query = vec![QueryFeature::new(100.0, 5.0, 1.0), QueryFeature::new(500.0, 50.0, 50.0)];
/// let results = match_all(&reference, &query, &ToleranceSet::new(0.5, 0.5, 0.5));
/// assert_eq!(results.len(), 2);
/// assert_eq!(results[0].matches.len(), 1);
/// assert!(results[1].is_unmatched());
/// ```
pub fn match_all(reference: &[CoefficientRow], query: &[QueryFeature], tol: &ToleranceSet) -> Vec<MatchResult> {
    query
        .par_iter()
        .enumerate()
        .map(|(feature_index, feature)| {
            let matches = match_feature(reference, feature, tol);
            let distances = matches.iter().map(|row| euclidean_distance(feature, row)).collect();
            MatchResult {
                feature_index,
                feature: feature.clone(),
                matches,
                distances,
            }
        })
        .collect()
}
