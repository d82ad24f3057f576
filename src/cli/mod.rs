//! Kolosal Eval CLI Module
//!
//! Command-line interface for evaluating classifiers, scanning split fractions and
//! inspecting datasets.

use clap::{Args, Parser, Subcommand};
use colored::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::data::{iris, load_csv, Dataset, SplitConfig};
use crate::evaluation::{
    scan_split_fractions, EvaluationHarness, EvaluationReport, HarnessConfig, DEFAULT_SCAN_FRACTIONS,
};
use crate::training::{AdaBoostConfig, CVStrategy, DecisionTreeConfig, ModelType, Trainer};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kolosal-eval")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluation harness for tree-based classifiers")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Split, train, score and cross-validate a model
    Evaluate(EvaluateArgs),

    /// Sweep the held-out fraction and record train/test accuracy
    Scan {
        #[command(flatten)]
        source: DataSource,

        /// Model type (adaboost, decision_tree)
        #[arg(short, long, default_value = "adaboost")]
        model: ModelType,

        /// Comma-separated held-out fractions
        #[arg(long, value_delimiter = ',')]
        fractions: Option<Vec<f64>>,

        /// Split seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },

    /// Show dataset information
    Info {
        #[command(flatten)]
        source: DataSource,
    },
}

/// Where the labeled data comes from; the built-in Iris set when no file is given
#[derive(Args, Debug, Clone, Default)]
pub struct DataSource {
    /// Input CSV file
    #[arg(short, long, requires = "target")]
    pub data: Option<PathBuf>,

    /// Target column name
    #[arg(short, long)]
    pub target: Option<String>,
}

impl DataSource {
    pub fn load(&self) -> anyhow::Result<Dataset> {
        match (&self.data, &self.target) {
            (Some(path), Some(target)) => Ok(load_csv(path, target)?),
            (Some(_), None) => anyhow::bail!("--target is required with --data"),
            (None, _) => Ok(iris()?),
        }
    }

    fn describe(&self) -> String {
        match &self.data {
            Some(path) => path.display().to_string(),
            None => "iris (built-in)".to_string(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub source: DataSource,

    /// Model type (adaboost, decision_tree)
    #[arg(short, long)]
    pub model: Option<ModelType>,

    /// Held-out test fraction
    #[arg(long)]
    pub test_size: Option<f64>,

    /// Seed for the split and shuffled folds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of cross-validation folds
    #[arg(long)]
    pub cv_folds: Option<usize>,

    /// Shuffle samples before assigning folds
    #[arg(long)]
    pub shuffle_folds: bool,

    /// Keep class proportions in every fold
    #[arg(long)]
    pub stratify_folds: bool,

    /// Skip cross-validation
    #[arg(long, conflicts_with_all = ["cv_folds", "shuffle_folds", "stratify_folds"])]
    pub no_cv: bool,

    /// Keep class proportions in the train/test split
    #[arg(long)]
    pub stratify: bool,

    /// Boosting rounds
    #[arg(long)]
    pub n_estimators: Option<usize>,

    /// Boosting learning rate
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Depth of each tree
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// JSON run configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

// ─── Run configuration ─────────────────────────────────────────────────────────

/// Learner choice plus harness settings, as read from `--config`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub model: ModelType,
    pub n_estimators: usize,
    pub learning_rate: f64,
    /// `None` keeps the learner's own default (stumps for AdaBoost, unbounded for a tree)
    pub max_depth: Option<usize>,
    #[serde(flatten)]
    pub harness: HarnessConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let boost = AdaBoostConfig::default();
        Self {
            model: ModelType::default(),
            n_estimators: boost.n_estimators,
            learning_rate: boost.learning_rate,
            max_depth: None,
            harness: HarnessConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn from_json_file(path: &Path) -> crate::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn adaboost(&self) -> AdaBoostConfig {
        let config = AdaBoostConfig::new(self.n_estimators, self.learning_rate);
        match self.max_depth {
            Some(depth) => config.with_max_depth(depth),
            None => config,
        }
    }

    pub fn decision_tree(&self) -> DecisionTreeConfig {
        let config = DecisionTreeConfig::default();
        match self.max_depth {
            Some(depth) => config.with_max_depth(depth),
            None => config,
        }
    }

    pub fn describe(&self) -> String {
        match self.model {
            ModelType::AdaBoost => {
                let boost = self.adaboost();
                format!(
                    "adaboost ({} estimators, learning rate {}, depth {})",
                    boost.n_estimators,
                    boost.learning_rate,
                    boost.base.max_depth.map_or("unbounded".to_string(), |d| d.to_string())
                )
            }
            ModelType::DecisionTree => format!(
                "decision_tree (depth {})",
                self.max_depth.map_or("unbounded".to_string(), |d| d.to_string())
            ),
        }
    }
}

impl EvaluateArgs {
    /// Layer the command-line flags over `config`
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(n) = self.n_estimators {
            config.n_estimators = n;
        }
        if let Some(lr) = self.learning_rate {
            config.learning_rate = lr;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }

        let harness = &mut config.harness;
        if let Some(fraction) = self.test_size {
            harness.split.test_fraction = fraction;
        }
        if let Some(seed) = self.seed {
            harness.split.random_state = Some(seed);
            harness.cv_random_state = Some(seed);
        }
        if self.stratify {
            harness.split.stratify = true;
        }
        harness.cv = self.fold_strategy(harness.cv.take());
    }

    fn fold_strategy(&self, current: Option<CVStrategy>) -> Option<CVStrategy> {
        if self.no_cv {
            return None;
        }
        let changed = self.cv_folds.is_some() || self.shuffle_folds || self.stratify_folds;
        if !changed {
            return current;
        }

        let base = current.unwrap_or_default();
        let n_splits = self.cv_folds.unwrap_or_else(|| base.n_splits());
        let (was_stratified, was_shuffled) = match base {
            CVStrategy::KFold { shuffle, .. } => (false, shuffle),
            CVStrategy::StratifiedKFold { shuffle, .. } => (true, shuffle),
        };
        let shuffle = self.shuffle_folds || was_shuffled;
        Some(if self.stratify_folds || was_stratified {
            CVStrategy::StratifiedKFold { n_splits, shuffle }
        } else {
            CVStrategy::KFold { n_splits, shuffle }
        })
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn run_harness<T: Trainer>(trainer: &T, dataset: &Dataset, config: &HarnessConfig) -> crate::Result<EvaluationReport> {
    EvaluationHarness::new(config.clone()).run(trainer, dataset)
}

pub fn cmd_evaluate(args: &EvaluateArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    args.apply(&mut config);

    if args.json {
        let dataset = args.source.load()?;
        let report = evaluate(&config, &dataset)?;
        println!("{}", report.to_json()?);
        return Ok(());
    }

    section("Evaluate");

    step_run(&format!("Loading {}", args.source.describe()));
    let start = Instant::now();
    let dataset = args.source.load()?;
    step_done(&format!(
        "{} rows × {} features, {} classes in {:?}",
        dataset.n_samples(),
        dataset.n_features(),
        dataset.n_classes(),
        start.elapsed()
    ));

    step_run(&format!("Evaluating {}", config.model.to_string().cyan()));
    let start = Instant::now();
    let report = evaluate(&config, &dataset)?;
    step_done(&format!("{:?}", start.elapsed()));

    println!();
    for line in report.to_string().lines() {
        println!("  {}", line);
    }
    println!();
    println!(
        "  {:<16} {}",
        muted("Test accuracy"),
        format!("{:.4}", report.test_accuracy).white().bold()
    );
    println!();

    Ok(())
}

fn evaluate(config: &RunConfig, dataset: &Dataset) -> anyhow::Result<EvaluationReport> {
    let report = match config.model {
        ModelType::AdaBoost => run_harness(&config.adaboost(), dataset, &config.harness)?,
        ModelType::DecisionTree => run_harness(&config.decision_tree(), dataset, &config.harness)?,
    };
    Ok(report.with_model(config.describe()))
}

pub fn cmd_scan(
    source: &DataSource,
    model: ModelType,
    fractions: Option<&[f64]>,
    seed: u64,
) -> anyhow::Result<()> {
    section("Split scan");

    step_run(&format!("Loading {}", source.describe()));
    let dataset = source.load()?;
    step_done(&format!("{} rows", dataset.n_samples()));

    let fractions = fractions.unwrap_or(&DEFAULT_SCAN_FRACTIONS);
    let split = SplitConfig::default().with_random_state(seed);
    let config = RunConfig {
        model,
        ..RunConfig::default()
    };

    let start = Instant::now();
    let points = match model {
        ModelType::AdaBoost => scan_split_fractions(&config.adaboost(), &dataset, fractions, &split)?,
        ModelType::DecisionTree => scan_split_fractions(&config.decision_tree(), &dataset, fractions, &split)?,
    };

    println!();
    println!(
        "  {:>9} {:>7} {:>7} {:>10} {:>10}",
        muted("fraction"),
        muted("train"),
        muted("test"),
        muted("train acc"),
        muted("test acc")
    );
    println!("  {}", dim(&"─".repeat(47)));
    for point in &points {
        println!(
            "  {:>9.2} {:>7} {:>7} {:>10.4} {:>10.4}",
            point.test_fraction, point.n_train, point.n_test, point.train_accuracy, point.test_accuracy
        );
    }
    println!("  {}", dim(&"─".repeat(47)));

    if let Some(best) = points
        .iter()
        .max_by(|a, b| a.test_accuracy.total_cmp(&b.test_accuracy))
    {
        println!();
        println!(
            "  {} fraction {:.2} {} {:.4} {}",
            ok("best"),
            best.test_fraction,
            muted("test accuracy:"),
            best.test_accuracy,
            dim(&format!("({:?})", start.elapsed()))
        );
    }

    println!();
    Ok(())
}

pub fn cmd_info(source: &DataSource) -> anyhow::Result<()> {
    section("Data Info");

    let dataset = source.load()?;

    println!("  {:<12} {}", muted("Source"), source.describe());
    println!("  {:<12} {}", muted("Rows"), dataset.n_samples());
    println!("  {:<12} {}", muted("Features"), dataset.n_features());
    println!("  {:<12} {}", muted("Classes"), dataset.n_classes());
    println!();

    if !dataset.feature_names().is_empty() {
        println!("  {}", muted("Features"));
        for name in dataset.feature_names() {
            println!("    {}", name);
        }
        println!();
    }

    println!("  {:<20} {:>8} {:>8}", muted("Class"), muted("Count"), muted("Share"));
    println!("  {}", dim(&"─".repeat(38)));
    let total = dataset.n_samples() as f64;
    for (label, count) in dataset.class_counts().into_iter().enumerate() {
        println!(
            "  {:<20} {:>8} {:>7.1}%",
            dataset.class_name(label),
            count,
            100.0 * count as f64 / total
        );
    }

    println!();
    Ok(())
}
