use serde::{Deserialize, Serialize};

/// A single entry of a pre-trained logistic regression coefficient table.
///
/// Each row carries the model coefficient together with the feature location
/// it was trained on: an m/z value and the centers of the two retention time
/// dimensions. Rows are immutable once loaded; ingestion guarantees that all
/// numeric fields are finite before a row reaches the matcher.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoefficientRow {
    pub coefficient: f64,
    pub mz: f64,
    pub rt1_center: f64,
    pub rt2_center: f64,
    /// Free-text label naming the training samples this feature was seen in.
    pub samples: String,
    /// Class the coefficient pushes toward, 0 or 1.
    pub class_label: u8,
}

impl CoefficientRow {
    /// Constructs a new `CoefficientRow`.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mzscore::data::coefficient::CoefficientRow;
    /// let row = CoefficientRow::new(-0.02, 100.0, 5.0, 1.0, "Murchison".to_string(), 0);
    /// assert_eq!(row.coefficient, -0.02);
    /// assert_eq!(row.class_label, 0);
    /// ```
    pub fn new(coefficient: f64, mz: f64, rt1_center: f64, rt2_center: f64, samples: String, class_label: u8) -> Self {
        CoefficientRow { coefficient, mz, rt1_center, rt2_center, samples, class_label }
    }
}

/// Display names for the two model classes.
///
/// The scoring core only ever deals in class 0 and class 1; what those
/// classes are called is an application concern. The default pair matches
/// the meteorite-vs-terrestrial model this crate ships with, but callers
/// can relabel freely.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassLabels {
    pub class0: String,
    pub class1: String,
}

impl ClassLabels {
    pub fn new(class0: String, class1: String) -> Self {
        ClassLabels { class0, class1 }
    }

    /// Returns the display name for a binary class value.
    ///
    /// Any non-zero value is treated as class 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use mzscore::data::coefficient::ClassLabels;
    /// let labels = ClassLabels::default();
    /// assert_eq!(labels.label_for(0), "Meteorite");
    /// assert_eq!(labels.label_for(1), "Earth Sample");
    /// ```
    pub fn label_for(&self, class: u8) -> &str {
        if class == 0 { &self.class0 } else { &self.class1 }
    }
}

impl Default for ClassLabels {
    fn default() -> Self {
        ClassLabels {
            class0: "Meteorite".to_string(),
            class1: "Earth Sample".to_string(),
        }
    }
}
