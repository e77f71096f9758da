use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{info, warn};
use mzscore::data::coefficient::CoefficientRow;

// Column layout of the trained-model export: feature name at 0, then the
// fields the classifier needs scattered across the remaining columns.
const COEFFICIENT_COL: usize = 1;
const MZ_COL: usize = 2;
const RT1_CENTER_COL: usize = 5;
const RT2_CENTER_COL: usize = 6;
const SAMPLES_COL: usize = 7;
const CLASS_COL: usize = 9;

/// Reads the pre-trained coefficient table from a CSV file.
///
/// Rows with a missing or non-finite required field are skipped and counted,
/// they never reach the matching core. The `samples` column may contain
/// quoted text with embedded commas.
pub fn read_coefficient_table<P: AsRef<Path>>(path: P) -> Result<Vec<CoefficientRow>, Box<dyn std::error::Error>> {
    let file = File::open(path.as_ref())?;
    let rows = parse_coefficient_table(file)?;
    info!("loaded {} coefficient rows from {}", rows.len(), path.as_ref().display());
    Ok(rows)
}

/// Parses the coefficient table from any reader.
///
/// The first record is treated as a header and ignored.
pub fn parse_coefficient_table<R: Read>(source: R) -> Result<Vec<CoefficientRow>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.records() {
        let record = record?;
        match parse_row(&record) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("skipped {} coefficient rows with missing or non-finite fields", skipped);
    }

    Ok(rows)
}

fn parse_row(record: &csv::StringRecord) -> Option<CoefficientRow> {
    let coefficient = finite_field(record, COEFFICIENT_COL)?;
    let mz = finite_field(record, MZ_COL)?;
    let rt1_center = finite_field(record, RT1_CENTER_COL)?;
    let rt2_center = finite_field(record, RT2_CENTER_COL)?;
    let samples = record.get(SAMPLES_COL).unwrap_or("").to_string();
    let class_label = record.get(CLASS_COL)?.trim().parse::<u8>().ok()?;

    Some(CoefficientRow::new(coefficient, mz, rt1_center, rt2_center, samples, class_label))
}

fn finite_field(record: &csv::StringRecord, index: usize) -> Option<f64> {
    let value = record.get(index)?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "feature,coefficient,mz,mz_min,mz_max,RT1_center,RT2_center,samples,n_samples,class\n";

    #[test]
    fn test_parse_valid_rows() {
        let csv_text = format!(
            "{}F1,-0.02,100.0,99.9,100.1,5.0,1.0,Murchison,1,0\nF2,0.015,350.5,350.4,350.6,20.0,3.0,Iceland,1,1\n",
            HEADER
        );
        let rows = parse_coefficient_table(csv_text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].coefficient, -0.02);
        assert_eq!(rows[0].rt1_center, 5.0);
        assert_eq!(rows[0].class_label, 0);
        assert_eq!(rows[1].samples, "Iceland");
        assert_eq!(rows[1].class_label, 1);
    }

    #[test]
    fn test_quoted_samples_field_with_commas() {
        let csv_text = format!(
            "{}F1,-0.02,100.0,99.9,100.1,5.0,1.0,\"Murchison, Orgueil\",2,0\n",
            HEADER
        );
        let rows = parse_coefficient_table(csv_text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].samples, "Murchison, Orgueil");
    }

    #[test]
    fn test_non_finite_and_malformed_rows_are_skipped() {
        let csv_text = format!(
            "{}F1,not_a_number,100.0,99.9,100.1,5.0,1.0,A,1,0\nF2,-0.02,inf,99.9,100.1,5.0,1.0,B,1,0\nF3,-0.02,100.0,99.9,100.1,5.0,1.0,C,1,0\n",
            HEADER
        );
        let rows = parse_coefficient_table(csv_text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].samples, "C");
    }

    #[test]
    fn test_short_records_are_skipped() {
        let csv_text = format!("{}F1,-0.02,100.0\n", HEADER);
        let rows = parse_coefficient_table(csv_text.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
