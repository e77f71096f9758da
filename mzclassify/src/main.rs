use std::path::PathBuf;

use clap::Parser;
use log::warn;

use mzclassify::config::{RunConfig, DEFAULT_INTERCEPT, DEFAULT_TOLERANCE};
use mzclassify::io::coefficients::read_coefficient_table;
use mzclassify::io::features::read_feature_file;
use mzclassify::io::samples::{find_sample, list_samples};
use mzscore::algorithm::matcher::match_all;
use mzscore::algorithm::scorer::score;
use mzscore::data::coefficient::ClassLabels;
use mzscore::data::feature::{QueryFeature, ToleranceSet};
use mzscore::data::result::{MatchResult, ScoreResult};

/// Matches query features against a trained coefficient table and prints the
/// classification with a ranked contribution breakdown.
#[derive(Parser, Debug)]
#[command(name = "mzclassify", version)]
struct Cli {
    /// Trained coefficient table CSV
    #[arg(long)]
    coefficients: Option<PathBuf>,

    /// Query feature CSV: bare mz,rt1,rt2 triplets or a headered sample export
    #[arg(long, conflicts_with = "sample")]
    features: Option<PathBuf>,

    /// Name of a preset sample from the sample directory
    #[arg(long, requires = "sample_dir")]
    sample: Option<String>,

    /// Directory holding *_features.csv preset files
    #[arg(long)]
    sample_dir: Option<PathBuf>,

    /// Optional name,count summary CSV for the sample library
    #[arg(long)]
    sample_summary: Option<PathBuf>,

    /// List the available preset samples and exit
    #[arg(long, requires = "sample_dir")]
    list_samples: bool,

    /// m/z tolerance half-width
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    mz_tol: f64,

    /// First retention time tolerance half-width
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    rt1_tol: f64,

    /// Second retention time tolerance half-width
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    rt2_tol: f64,

    /// Model intercept
    #[arg(long, default_value_t = DEFAULT_INTERCEPT)]
    intercept: f64,

    /// Display name for class 0
    #[arg(long, default_value = "Meteorite")]
    class0: String,

    /// Display name for class 1
    #[arg(long, default_value = "Earth Sample")]
    class1: String,

    /// Emit the score result as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list_samples {
        let dir = cli.sample_dir.as_deref().ok_or("--sample-dir is required to list samples")?;
        for entry in list_samples(dir, cli.sample_summary.as_deref())? {
            match entry.feature_count {
                Some(count) => println!("{} ({})", entry.display_name, count),
                None => println!("{}", entry.display_name),
            }
        }
        return Ok(());
    }

    let config = RunConfig {
        intercept: cli.intercept,
        tolerances: ToleranceSet::new(cli.mz_tol, cli.rt1_tol, cli.rt2_tol),
        labels: ClassLabels::new(cli.class0.clone(), cli.class1.clone()),
    };
    config.validate()?;

    let coefficients_path = cli
        .coefficients
        .as_deref()
        .ok_or("--coefficients is required to run a prediction")?;
    let reference = read_coefficient_table(coefficients_path)?;

    let query = load_query(&cli)?;
    let match_results = match_all(&reference, &query, &config.tolerances);
    let result = score(&match_results, config.intercept);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    render_matches(&match_results, &config.labels);
    render_score(&result, &config.labels);
    render_contributions(&result, &config.labels);
    Ok(())
}

fn load_query(cli: &Cli) -> Result<Vec<QueryFeature>, Box<dyn std::error::Error>> {
    if let Some(path) = &cli.features {
        return read_feature_file(path);
    }
    if let Some(name) = &cli.sample {
        let dir = cli.sample_dir.as_deref().ok_or("--sample-dir is required with --sample")?;
        let entries = list_samples(dir, cli.sample_summary.as_deref())?;
        let entry = find_sample(&entries, name)
            .ok_or_else(|| format!("no sample named '{}' in {}", name, dir.display()))?;
        return read_feature_file(&entry.path);
    }
    Err("supply --features <path> or --sample <name> --sample-dir <dir>".into())
}

fn render_matches(match_results: &[MatchResult], labels: &ClassLabels) {
    println!("Matched reference rows");
    println!(
        "{:<34} {:>12} {:>10} {:>10} {:>10} {:>12}  {:<24} {}",
        "feature", "coefficient", "mz", "RT1", "RT2", "distance", "samples", "class"
    );

    for result in match_results {
        for (row, distance) in result.matches.iter().zip(result.distances.iter()) {
            println!(
                "{:<34} {:>12.6} {:>10.4} {:>10.4} {:>10.4} {:>12.6}  {:<24} {} ({})",
                result.feature.key(),
                row.coefficient,
                row.mz,
                row.rt1_center,
                row.rt2_center,
                distance,
                row.samples,
                labels.label_for(row.class_label),
                row.class_label,
            );
        }
    }
    println!();
}

fn render_score(result: &ScoreResult, labels: &ClassLabels) {
    if result.unmatched_feature_exists {
        warn!("some query features matched no reference rows and contribute nothing");
        println!("Warning: at least one query feature matched no reference rows.\n");
    }

    println!("Logit:       {:.6}", result.logit);
    println!("Probability: {:.4}", result.displayed_probability);
    println!(
        "Class:       {} ({})",
        result.predicted_class,
        labels.label_for(result.predicted_class)
    );
    println!();
}

fn render_contributions(result: &ScoreResult, labels: &ClassLabels) {
    println!("Feature contributions");
    println!("{:<5} {:<34} {:>12} {:>9}  {}", "rank", "feature", "value", "impact", "direction");

    for (index, entry) in result.contributions.iter().enumerate() {
        let direction = if entry.value >= 0.0 {
            format!("{} (+)", labels.class1)
        } else {
            format!("{} (-)", labels.class0)
        };
        println!(
            "{:<5} {:<34} {:>12} {:>8.2}%  {}",
            index + 1,
            entry.label,
            format_signed(entry.value),
            entry.percent_impact,
            direction,
        );
    }
}

/// Formats a contribution with an explicit sign for positive values.
fn format_signed(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.6}", value)
    } else {
        format!("{:.6}", value)
    }
}
