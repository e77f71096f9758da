use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::warn;

const FEATURE_FILE_SUFFIX: &str = "_features.csv";

/// One preset sample of the bundled library.
#[derive(Clone, Debug)]
pub struct SampleEntry {
    pub path: PathBuf,
    pub file_name: String,
    /// Human-readable name: suffix stripped, underscores to spaces.
    pub display_name: String,
    /// Feature count from the summary file, when one was present.
    pub feature_count: Option<usize>,
}

/// Derives the display name of a sample from its file name.
///
/// # Example
///
/// ```rust
/// # use mzclassify::io::samples::sample_display_name;
/// assert_eq!(sample_display_name("Jbilet_Winselwan_features.csv"), "Jbilet Winselwan");
/// assert_eq!(sample_display_name("Atacama.csv"), "Atacama.csv");
/// ```
pub fn sample_display_name(file_name: &str) -> String {
    match file_name.strip_suffix(FEATURE_FILE_SUFFIX) {
        Some(stem) => stem.replace('_', " "),
        None => file_name.to_string(),
    }
}

/// Parses the optional `name,count` sample summary CSV.
///
/// The first record is treated as a header and ignored; malformed lines are
/// skipped.
pub fn parse_sample_summary<R: Read>(source: R) -> Result<HashMap<String, usize>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let mut summary = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let name = match record.get(0) {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => continue,
        };
        if let Some(count) = record.get(1).and_then(|c| c.trim().parse::<usize>().ok()) {
            summary.insert(name, count);
        }
    }

    Ok(summary)
}

/// Lists the sample library of a directory.
///
/// Every `*_features.csv` file becomes a `SampleEntry`, sorted by file name,
/// annotated with its feature count when `summary_path` names a readable
/// summary CSV. A missing or unreadable summary is not an error, the library
/// is still usable without counts.
pub fn list_samples(dir: &Path, summary_path: Option<&Path>) -> Result<Vec<SampleEntry>, Box<dyn std::error::Error>> {
    let summary = match summary_path {
        Some(path) => match File::open(path) {
            Ok(file) => parse_sample_summary(file)?,
            Err(err) => {
                warn!("could not load sample summary {}: {}", path.display(), err);
                HashMap::new()
            }
        },
        None => HashMap::new(),
    };

    let mut entries = Vec::new();
    for dir_entry in std::fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        let file_name = dir_entry.file_name().to_string_lossy().to_string();
        if !file_name.ends_with(FEATURE_FILE_SUFFIX) {
            continue;
        }

        let display_name = sample_display_name(&file_name);
        let feature_count = summary.get(&display_name).copied();
        entries.push(SampleEntry {
            path: dir_entry.path(),
            file_name,
            display_name,
            feature_count,
        });
    }

    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

/// Finds a sample by display or file name, case-insensitively.
pub fn find_sample<'a>(entries: &'a [SampleEntry], name: &str) -> Option<&'a SampleEntry> {
    let wanted = name.to_lowercase();
    entries
        .iter()
        .find(|entry| entry.display_name.to_lowercase() == wanted || entry.file_name.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_rules() {
        assert_eq!(sample_display_name("Aguas_Zarcas_features.csv"), "Aguas Zarcas");
        assert_eq!(sample_display_name("GSFC_features.csv"), "GSFC");
        assert_eq!(sample_display_name("notes.txt"), "notes.txt");
    }

    #[test]
    fn test_parse_sample_summary() {
        let csv_text = "sample,n_features\nAguas Zarcas,42\nGSFC,17\n,3\nBroken,abc\n";
        let summary = parse_sample_summary(csv_text.as_bytes()).unwrap();

        assert_eq!(summary.len(), 2);
        assert_eq!(summary.get("Aguas Zarcas"), Some(&42));
        assert_eq!(summary.get("GSFC"), Some(&17));
    }

    #[test]
    fn test_find_sample_by_either_name() {
        let entries = vec![SampleEntry {
            path: PathBuf::from("Aguas_Zarcas_features.csv"),
            file_name: "Aguas_Zarcas_features.csv".to_string(),
            display_name: "Aguas Zarcas".to_string(),
            feature_count: Some(42),
        }];

        assert!(find_sample(&entries, "aguas zarcas").is_some());
        assert!(find_sample(&entries, "Aguas_Zarcas_features.csv").is_some());
        assert!(find_sample(&entries, "Murchison").is_none());
    }
}
