//! Train/evaluate runs over a loaded dataset.
//!
//! A static run fits on a prefix of the rows and scores the rest. A streaming
//! run fits on a prefix too, then walks the remaining rows as a sliding
//! window: each row is decided, inserted, and the oldest row is deleted.
use crate::{
    data::dataset::{Dataset, RealNumber},
    error::{Result, TreeError},
    metrics::confusion::{f1_score, precision_recall},
    trees::{classifier::DecisionTreeClassifier, params::TreeParams},
};
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentParams {
    pub tree_params: TreeParams,
    pub train_fraction: f64,
    /// Shuffle rows with this seed before splitting; keep file order when `None`.
    pub shuffle_seed: Option<u64>,
}

impl Default for ExperimentParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperimentParams {
    pub fn new() -> Self {
        Self {
            tree_params: TreeParams::new(),
            train_fraction: 0.8,
            shuffle_seed: None,
        }
    }

    /// Defaults for a streaming run, which seeds on a smaller prefix.
    pub fn streaming() -> Self {
        Self {
            train_fraction: 0.3,
            ..Self::new()
        }
    }

    pub fn set_train_fraction(&mut self, train_fraction: f64) -> Result<()> {
        if !(train_fraction > 0.0 && train_fraction <= 1.0) {
            return Err(TreeError::InvalidParameter(
                "Train fraction should be in (0.0, 1.0]".into(),
            ));
        }
        self.train_fraction = train_fraction;
        Ok(())
    }

    pub fn train_fraction(&self) -> f64 {
        self.train_fraction
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentReport {
    pub train_size: usize,
    pub expected: Vec<bool>,
    pub actual: Vec<bool>,
    pub precision: f64,
    pub recall: f64,
    /// `None` when precision and recall are both 0.
    pub f1: Option<f64>,
    pub depth: usize,
}

impl ExperimentReport {
    fn new(train_size: usize, expected: Vec<bool>, actual: Vec<bool>, depth: usize) -> Result<Self> {
        let (precision, recall) = precision_recall(&expected, &actual)?;
        let f1 = f1_score(&expected, &actual).ok();
        info!(train_size, decisions = actual.len(), precision, recall, ?f1, depth, "run finished");
        Ok(Self {
            train_size,
            expected,
            actual,
            precision,
            recall,
            f1,
            depth,
        })
    }
}

fn prepare<T: RealNumber>(dataset: &Dataset<T>, params: &ExperimentParams) -> Dataset<T> {
    match params.shuffle_seed {
        Some(seed) => dataset.shuffled(Some(seed)),
        None => dataset.clone(),
    }
}

/// Fits on the first `⌊n · train_fraction⌋` rows and decides the rest.
pub fn run_static<T: RealNumber>(
    dataset: &Dataset<T>,
    params: &ExperimentParams,
) -> Result<ExperimentReport> {
    let dataset = prepare(dataset, params);
    let (train, test) = dataset.split_at_fraction(params.train_fraction)?;

    let mut classifier = DecisionTreeClassifier::from_params(params.tree_params.clone())?;
    classifier.fit(&train)?;
    let actual = classifier.predict(&test.x)?;

    ExperimentReport::new(train.nrows(), test.y, actual, classifier.depth()?)
}

/// Fits on the prefix, then for the `i`-th held-out row: decide it, insert it,
/// and delete row `i` of the whole dataset, so the tree always holds a window
/// of the same size.
pub fn run_streaming<T: RealNumber>(
    dataset: &Dataset<T>,
    params: &ExperimentParams,
) -> Result<ExperimentReport> {
    let dataset = prepare(dataset, params);
    let (train, stream) = dataset.split_at_fraction(params.train_fraction)?;

    let mut classifier = DecisionTreeClassifier::from_params(params.tree_params.clone())?;
    classifier.fit(&train)?;

    let mut actual = Vec::with_capacity(stream.nrows());
    for i in 0..stream.nrows() {
        let point = stream.row(i);
        let label = stream.y[i];
        actual.push(classifier.decide(&point)?);
        classifier.add_training_point(&point, label)?;
        classifier.del_training_point(&dataset.row(i), dataset.y[i])?;
    }

    ExperimentReport::new(train.nrows(), stream.y, actual, classifier.depth()?)
}
