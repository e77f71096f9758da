use serde::{Deserialize, Serialize};

/// A user-supplied chromatography feature: one m/z value and the retention
/// times of the two separation dimensions.
///
/// A query is an ordered sequence of features; two features carrying
/// identical values are still distinct entries by list position. The core
/// never mutates a query list, it only reads it per invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryFeature {
    pub mz: f64,
    pub rt1: f64,
    pub rt2: f64,
}

impl QueryFeature {
    pub fn new(mz: f64, rt1: f64, rt2: f64) -> Self {
        QueryFeature { mz, rt1, rt2 }
    }

    /// Formats the feature as a stable display key of its three coordinates.
    ///
    /// The key is a display identity only, it is never used to deduplicate
    /// features against each other.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mzscore::data::feature::QueryFeature;
    /// let feature = QueryFeature::new(100.0, 5.25, 1.0);
    /// assert_eq!(feature.key(), "(100.0000, 5.2500, 1.0000)");
    /// ```
    pub fn key(&self) -> String {
        format!("({:.4}, {:.4}, {:.4})", self.mz, self.rt1, self.rt2)
    }
}

/// Axis-aligned half-widths of the match acceptance box, one per axis.
///
/// The matcher treats the three tolerances independently, so matching stays
/// transparent and tunable per axis. Tolerances must be finite and
/// non-negative; validating that is the caller's responsibility before the
/// matcher is invoked.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ToleranceSet {
    pub mz_tol: f64,
    pub rt1_tol: f64,
    pub rt2_tol: f64,
}

impl ToleranceSet {
    pub fn new(mz_tol: f64, rt1_tol: f64, rt2_tol: f64) -> Self {
        ToleranceSet { mz_tol, rt1_tol, rt2_tol }
    }

    /// Checks that all three tolerances are finite and non-negative.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mzscore::data::feature::ToleranceSet;
    /// assert!(ToleranceSet::new(0.5, 0.5, 0.5).is_valid());
    /// assert!(!ToleranceSet::new(-0.1, 0.5, 0.5).is_valid());
    /// assert!(!ToleranceSet::new(f64::NAN, 0.5, 0.5).is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        [self.mz_tol, self.rt1_tol, self.rt2_tol]
            .iter()
            .all(|t| t.is_finite() && *t >= 0.0)
    }
}
