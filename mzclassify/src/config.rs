use mzscore::data::coefficient::ClassLabels;
use mzscore::data::feature::ToleranceSet;

/// Intercept of the bundled meteorite-vs-terrestrial model.
pub const DEFAULT_INTERCEPT: f64 = 0.03806688;

/// Default tolerance half-width shared by all three axes.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Everything one scoring run needs besides the data itself.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub intercept: f64,
    pub tolerances: ToleranceSet,
    pub labels: ClassLabels,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            intercept: DEFAULT_INTERCEPT,
            tolerances: ToleranceSet::new(DEFAULT_TOLERANCE, DEFAULT_TOLERANCE, DEFAULT_TOLERANCE),
            labels: ClassLabels::default(),
        }
    }
}

impl RunConfig {
    /// Validates the numeric inputs before the core is invoked.
    ///
    /// The core assumes finite numbers throughout, so the boundary has to
    /// reject non-finite intercepts and negative or non-finite tolerances.
    pub fn validate(&self) -> Result<(), String> {
        if !self.intercept.is_finite() {
            return Err("intercept must be a finite number".to_string());
        }
        if !self.tolerances.is_valid() {
            return Err("tolerances must be finite and non-negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.intercept, 0.03806688);
        assert_eq!(config.tolerances.mz_tol, 0.5);
        assert_eq!(config.labels.class1, "Earth Sample");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut config = RunConfig::default();
        config.tolerances.rt1_tol = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_finite_intercept_rejected() {
        let mut config = RunConfig::default();
        config.intercept = f64::NAN;
        assert!(config.validate().is_err());
    }
}
