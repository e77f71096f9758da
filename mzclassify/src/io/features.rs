use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{info, warn};
use mzscore::data::feature::QueryFeature;

/// Reads query features from a CSV file.
///
/// Two layouts are accepted and detected automatically:
///
/// * headered sample exports, where the `m/z`, `RT1`/`RT1_center` and
///   `RT2`/`RT2_center` columns are located by header name,
/// * bare `mz,rt1,rt2` triplet files with no header.
///
/// Rows with missing or non-finite values are skipped and counted.
pub fn read_feature_file<P: AsRef<Path>>(path: P) -> Result<Vec<QueryFeature>, Box<dyn std::error::Error>> {
    let file = File::open(path.as_ref())?;
    let features = parse_feature_csv(file)?;
    info!("loaded {} query features from {}", features.len(), path.as_ref().display());
    Ok(features)
}

/// Parses query features from any reader, with the same layout detection as
/// [`read_feature_file`].
pub fn parse_feature_csv<R: Read>(source: R) -> Result<Vec<QueryFeature>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut records = reader.records();
    let first = match records.next() {
        Some(record) => record?,
        None => return Ok(Vec::new()),
    };

    let mut features = Vec::new();
    let mut skipped = 0usize;

    let columns = match resolve_columns(&first) {
        // headered file, first record already consumed
        Some(columns) => columns,
        // headerless triplet file, first record is data
        None => {
            let columns = FeatureColumns { mz: 0, rt1: 1, rt2: 2 };
            match parse_feature(&first, &columns) {
                Some(feature) => features.push(feature),
                None => skipped += 1,
            }
            columns
        }
    };

    for record in records {
        let record = record?;
        match parse_feature(&record, &columns) {
            Some(feature) => features.push(feature),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("skipped {} feature rows with missing or non-finite values", skipped);
    }

    Ok(features)
}

struct FeatureColumns {
    mz: usize,
    rt1: usize,
    rt2: usize,
}

/// Detects a header record and resolves the column of each coordinate.
///
/// A record counts as a header when any field mentions `m/z`. Column
/// matching is case-insensitive and by substring, so both `RT1` and
/// `RT1_center` resolve the first retention time axis.
fn resolve_columns(record: &csv::StringRecord) -> Option<FeatureColumns> {
    let has_header = record.iter().any(|field| field.to_lowercase().contains("m/z"));
    if !has_header {
        return None;
    }

    let mut columns = FeatureColumns { mz: 0, rt1: 1, rt2: 2 };
    for (index, field) in record.iter().enumerate() {
        let field = field.to_lowercase();
        if field.contains("m/z") {
            columns.mz = index;
        } else if field.contains("rt1") {
            columns.rt1 = index;
        } else if field.contains("rt2") {
            columns.rt2 = index;
        }
    }

    Some(columns)
}

fn parse_feature(record: &csv::StringRecord, columns: &FeatureColumns) -> Option<QueryFeature> {
    let mz = finite_field(record, columns.mz)?;
    let rt1 = finite_field(record, columns.rt1)?;
    let rt2 = finite_field(record, columns.rt2)?;
    Some(QueryFeature::new(mz, rt1, rt2))
}

fn finite_field(record: &csv::StringRecord, index: usize) -> Option<f64> {
    let value = record.get(index)?.trim().parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
