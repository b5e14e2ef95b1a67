//! Training points of one tree node and the Gini split search over them.
use super::split::{BestSplit, SplitRule, Threshold};
use crate::data::dataset::{Dataset, FeatureType, RealNumber};
use crate::error::{Result, TreeError};
use nalgebra::{DMatrix, DVectorView};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::cmp::Ordering;

/// Label counts on each side of a candidate cut, `[negatives, positives]`.
#[derive(Clone, Copy, Debug, Default)]
struct SideCounts {
    below: [usize; 2],
    above: [usize; 2],
}

impl SideCounts {
    fn below_total(&self) -> usize {
        self.below[0] + self.below[1]
    }

    fn above_total(&self) -> usize {
        self.above[0] + self.above[1]
    }
}

#[derive(Clone, Copy, Debug)]
struct Candidate<T: RealNumber> {
    gain: f64,
    threshold: Threshold<T>,
    counts: SideCounts,
}

/// A node-local set of points with one boolean label each.
#[derive(Clone, Debug)]
pub struct PointSet<T: RealNumber> {
    features: DMatrix<T>,
    labels: Vec<bool>,
    types: Vec<FeatureType>,
    last_split: Option<BestSplit<T>>,
    searched: bool,
}

impl<T: RealNumber> PartialEq for PointSet<T> {
    /// Cached search results are not part of the data.
    fn eq(&self, other: &Self) -> bool {
        self.features == other.features && self.labels == other.labels && self.types == other.types
    }
}

impl<T: RealNumber> PointSet<T> {
    pub fn new(features: DMatrix<T>, labels: Vec<bool>, types: Vec<FeatureType>) -> Result<Self> {
        let dataset = Dataset::new(features, labels, types)?;
        Ok(Self::from(dataset))
    }

    pub fn from_rows(rows: &[Vec<T>], labels: Vec<bool>, types: Vec<FeatureType>) -> Result<Self> {
        Dataset::from_rows(rows, labels, types).map(Self::from)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn features(&self) -> &DMatrix<T> {
        &self.features
    }

    pub fn labels(&self) -> &[bool] {
        &self.labels
    }

    pub fn types(&self) -> &[FeatureType] {
        &self.types
    }

    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&label| label).count()
    }

    /// Leaf decision: true unless false labels are strictly in the majority.
    pub fn majority_label(&self) -> bool {
        let true_count = self.positives();
        true_count >= self.len() - true_count
    }

    /// Gini impurity of the labels. An empty set has no impurity and yields 0.
    pub fn gini(&self) -> f64 {
        let positives = self.positives();
        gini(self.len() - positives, positives)
    }

    pub fn push(&mut self, point: &[T], label: bool) {
        let n = self.features.nrows();
        let features = std::mem::replace(&mut self.features, DMatrix::zeros(0, 0));
        let mut features = features.insert_row(n, T::zero());
        features.row_mut(n).copy_from_slice(point);
        self.features = features;
        self.labels.push(label);
    }

    /// Removes the first point whose every feature equals `point`. Returns
    /// whether one was found.
    pub fn remove(&mut self, point: &[T]) -> bool {
        if point.len() != self.features.ncols() {
            return false;
        }
        let found = self
            .features
            .row_iter()
            .position(|row| row.iter().zip(point).all(|(a, b)| a == b));

        match found {
            Some(index) => {
                let features = std::mem::replace(&mut self.features, DMatrix::zeros(0, 0));
                self.features = features.remove_row(index);
                self.labels.remove(index);
                true
            }
            None => false,
        }
    }

    /// Routes every point through `rule`.
    pub fn partition(&self, rule: &SplitRule<T>) -> (Self, Self) {
        let (left, right): (Vec<usize>, Vec<usize>) = (0..self.len()).partition(|&i| {
            let row = self.features.row(i).iter().copied().collect::<Vec<_>>();
            rule.goes_left(&row)
        });
        (self.select(&left), self.select(&right))
    }

    fn select(&self, indices: &[usize]) -> Self {
        let rows = indices
            .iter()
            .map(|&i| self.features.row(i))
            .collect::<Vec<_>>();
        let features = if rows.is_empty() {
            DMatrix::zeros(0, self.features.ncols())
        } else {
            DMatrix::from_rows(&rows)
        };
        Self {
            features,
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
            types: self.types.clone(),
            last_split: None,
            searched: false,
        }
    }

    /// Best feature to split on and its Gini gain, or `(None, None)` when no
    /// feature yields a usable split. Caches the winner for
    /// [`get_best_threshold`](Self::get_best_threshold).
    pub fn get_best_gain(&mut self, min_split_points: Option<usize>) -> (Option<usize>, Option<f64>) {
        match self.search(min_split_points) {
            Some(best) => (Some(best.feature_index), Some(best.gain)),
            None => (None, None),
        }
    }

    /// Threshold or category of the last successful search.
    pub fn get_best_threshold(&self) -> Result<Threshold<T>> {
        if !self.searched {
            return Err(TreeError::InvalidState(
                "get_best_gain() must be called before get_best_threshold()".into(),
            ));
        }
        self.last_split
            .map(|best| best.threshold)
            .ok_or_else(|| TreeError::InvalidState("the last search found no split".into()))
    }

    /// Runs [`best_split`](Self::best_split) and caches its outcome.
    pub fn search(&mut self, min_split_points: Option<usize>) -> Option<BestSplit<T>> {
        let best = self.best_split(min_split_points);
        self.last_split = best;
        self.searched = true;
        best
    }

    /// Finds the split with the highest Gini gain. Every side of the winner
    /// holds at least `min_split_points` points when a floor is given. Ties go
    /// to the lowest feature index, then to the first candidate of that
    /// feature.
    pub fn best_split(&self, min_split_points: Option<usize>) -> Option<BestSplit<T>> {
        if self.is_empty() {
            return None;
        }
        let parent = self.gini();

        let per_feature = (0..self.types.len())
            .into_par_iter()
            .map(|feature_index| {
                let column = self.features.column(feature_index);
                let candidate = match self.types[feature_index] {
                    FeatureType::Continuous => self.best_continuous(column, parent, min_split_points),
                    FeatureType::Categorical => {
                        self.best_categorical(column, parent, min_split_points)
                    }
                    FeatureType::Boolean => self.best_boolean(column, parent, min_split_points),
                };
                candidate.map(|c| (feature_index, c))
            })
            .collect::<Vec<_>>();

        per_feature
            .into_iter()
            .flatten()
            .fold(None, |best: Option<(usize, Candidate<T>)>, (i, c)| match best {
                Some((_, b)) if c.gain <= b.gain => best,
                _ => Some((i, c)),
            })
            .map(|(feature_index, c)| BestSplit {
                feature_index,
                gain: c.gain,
                threshold: c.threshold,
                left_count: c.counts.below_total(),
                right_count: c.counts.above_total(),
            })
    }

    /// Sorts once, then moves one point at a time across the cut. Only
    /// positions where the value changes are candidate cuts.
    fn best_continuous(
        &self,
        column: DVectorView<T>,
        parent: f64,
        min_split_points: Option<usize>,
    ) -> Option<Candidate<T>> {
        let mut order = (0..column.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| column[a].partial_cmp(&column[b]).unwrap_or(Ordering::Equal));
        let values = order.iter().map(|&i| column[i]).collect::<Vec<_>>();

        let positives = self.positives();
        let mut counts = SideCounts {
            below: [0, 0],
            above: [self.len() - positives, positives],
        };
        let two = T::one() + T::one();

        let mut best: Option<Candidate<T>> = None;
        for k in 0..values.len() {
            if k > 0 {
                let moved = usize::from(self.labels[order[k - 1]]);
                counts.below[moved] += 1;
                counts.above[moved] -= 1;
            }
            if k == 0 || values[k] == values[k - 1] {
                continue;
            }
            let threshold = (values[k - 1] + values[k]) / two;
            offer(&mut best, parent, counts, Threshold::Continuous(threshold), min_split_points);
        }
        best
    }

    /// One-vs-rest over the distinct values present in the column.
    fn best_categorical(
        &self,
        column: DVectorView<T>,
        parent: f64,
        min_split_points: Option<usize>,
    ) -> Option<Candidate<T>> {
        let mut values = column.iter().copied().collect::<Vec<_>>();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        values.dedup();

        let mut best = None;
        for value in values {
            let counts = self.one_vs_rest(column, value);
            offer(&mut best, parent, counts, Threshold::Category(value), min_split_points);
        }
        best
    }

    fn best_boolean(
        &self,
        column: DVectorView<T>,
        parent: f64,
        min_split_points: Option<usize>,
    ) -> Option<Candidate<T>> {
        let mut best = None;
        let counts = self.one_vs_rest(column, T::zero());
        offer(&mut best, parent, counts, Threshold::None, min_split_points);
        best
    }

    fn one_vs_rest(&self, column: DVectorView<T>, value: T) -> SideCounts {
        let mut counts = SideCounts::default();
        for (f, &label) in column.iter().zip(&self.labels) {
            let label = usize::from(label);
            if *f == value {
                counts.below[label] += 1;
            } else {
                counts.above[label] += 1;
            }
        }
        counts
    }
}

impl<T: RealNumber> From<Dataset<T>> for PointSet<T> {
    fn from(dataset: Dataset<T>) -> Self {
        Self {
            features: dataset.x,
            labels: dataset.y,
            types: dataset.types,
            last_split: None,
            searched: false,
        }
    }
}

/// Gini impurity of a side holding `negatives` and `positives` points.
pub fn gini(negatives: usize, positives: usize) -> f64 {
    let total = negatives + positives;
    if total == 0 {
        return 0.0;
    }
    let p = positives as f64 / total as f64;
    let q = negatives as f64 / total as f64;
    1.0 - p * p - q * q
}

/// Gain of a cut, or `None` when one side is empty.
fn split_gain(parent: f64, counts: SideCounts) -> Option<f64> {
    let below = counts.below_total();
    let above = counts.above_total();
    if below == 0 || above == 0 {
        return None;
    }
    let total = (below + above) as f64;
    let split = below as f64 / total * gini(counts.below[0], counts.below[1])
        + above as f64 / total * gini(counts.above[0], counts.above[1]);
    Some(parent - split)
}

/// Keeps `candidate` if it strictly beats `best` and respects the floor.
fn offer<T: RealNumber>(
    best: &mut Option<Candidate<T>>,
    parent: f64,
    counts: SideCounts,
    threshold: Threshold<T>,
    min_split_points: Option<usize>,
) {
    let Some(gain) = split_gain(parent, counts) else {
        return;
    };
    if best.map_or(false, |b| gain <= b.gain) {
        return;
    }
    if let Some(min) = min_split_points {
        if counts.below_total() < min || counts.above_total() < min {
            return;
        }
    }
    *best = Some(Candidate {
        gain,
        threshold,
        counts,
    });
}
