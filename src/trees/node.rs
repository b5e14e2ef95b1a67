use super::{params::TreeParams, point_set::PointSet, split::SplitRule};
use crate::data::dataset::RealNumber;
use tracing::{debug, trace};

/// Split rule of an internal node and the two subtrees it owns.
#[derive(Clone, Debug)]
pub struct Branch<T: RealNumber> {
    pub rule: SplitRule<T>,
    pub left: Box<Tree<T>>,
    pub right: Box<Tree<T>>,
}

/// Decision tree node. Internal nodes carry a [`Branch`], leaves predict the
/// majority label of their points.
///
/// Every node keeps the points that were routed to it, so an ancestor always
/// reflects the whole population below it. Nodes at height 0 keep the points
/// they were built with and do not absorb updates.
#[derive(Clone, Debug)]
pub struct Tree<T: RealNumber> {
    points: PointSet<T>,
    branch: Option<Branch<T>>,
    height: usize,
    min_split_points: usize,
    beta: f64,
    counter: usize,
    rebuilds: usize,
}

impl<T: RealNumber> Tree<T> {
    /// Builds a tree of at most `params.max_height` levels over `points`.
    pub fn new(points: PointSet<T>, params: &TreeParams) -> Self {
        Self::grow(points, params.max_height, params.min_split_points, params.beta)
    }

    fn grow(points: PointSet<T>, height: usize, min_split_points: usize, beta: f64) -> Self {
        let mut tree = Self {
            points,
            branch: None,
            height,
            min_split_points,
            beta,
            counter: 0,
            rebuilds: 0,
        };
        tree.build();
        tree
    }

    /// (Re)builds this node and its whole subtree from the node's points.
    pub fn build(&mut self) {
        self.counter = 0;
        self.branch = None;

        if self.height == 0 {
            return;
        }

        let Some(best) = self.points.search(Some(self.min_split_points)) else {
            debug!(
                points = self.points.len(),
                height = self.height,
                "no usable split, node becomes a leaf"
            );
            return;
        };

        let column = self.points.features().column(best.feature_index);
        let rule = SplitRule::from_best(&best, column.iter().copied());
        let (left, right) = self.points.partition(&rule);

        if left.len() < self.min_split_points || right.len() < self.min_split_points {
            debug!(
                left = left.len(),
                right = right.len(),
                min_split_points = self.min_split_points,
                "split side below minimum, node becomes a leaf"
            );
            return;
        }

        trace!(
            feature = best.feature_index,
            gain = best.gain,
            height = self.height,
            ?rule,
            "installing split"
        );
        let height = self.height - 1;
        self.branch = Some(Branch {
            rule,
            left: Box::new(Self::grow(left, height, self.min_split_points, self.beta)),
            right: Box::new(Self::grow(right, height, self.min_split_points, self.beta)),
        });
    }

    /// Predicted label of `point`.
    ///
    /// # Panics
    ///
    /// If `point` is shorter than the feature vector used to build the tree.
    pub fn decide(&self, point: &[T]) -> bool {
        match &self.branch {
            None => self.points.majority_label(),
            Some(branch) if branch.rule.goes_left(point) => branch.left.decide(point),
            Some(branch) => branch.right.decide(point),
        }
    }

    /// Inserts a labeled point, rebuilding the first node on its path whose
    /// update budget is exhausted.
    ///
    /// # Panics
    ///
    /// If `point` does not have exactly one value per feature.
    pub fn add_training_point(&mut self, point: &[T], label: bool) {
        self.counter += 1;
        if self.height > 0 {
            self.points.push(point, label);
        }
        if self.rebuild_due() {
            return self.rebuild();
        }
        if let Some(branch) = &mut self.branch {
            if branch.rule.goes_left(point) {
                branch.left.add_training_point(point, label);
            } else {
                branch.right.add_training_point(point, label);
            }
        }
    }

    /// Removes the first point equal to `point`, with the same rebuild policy
    /// as [`add_training_point`](Self::add_training_point). A node that does
    /// not hold the point still forwards the removal to its routed child.
    ///
    /// # Panics
    ///
    /// If `point` is shorter than the feature vector used to build the tree.
    /// A longer point never matches a stored one.
    pub fn del_training_point(&mut self, point: &[T], label: bool) {
        self.counter += 1;
        if self.height > 0 && !self.points.remove(point) {
            trace!(height = self.height, "point to delete not found at node");
        }
        if self.rebuild_due() {
            return self.rebuild();
        }
        if let Some(branch) = &mut self.branch {
            if branch.rule.goes_left(point) {
                branch.left.del_training_point(point, label);
            } else {
                branch.right.del_training_point(point, label);
            }
        }
    }

    /// Evaluated after the local mutation, for inserts and deletes alike.
    fn rebuild_due(&self) -> bool {
        self.counter as f64 >= self.beta * self.points.len() as f64
    }

    fn rebuild(&mut self) {
        debug!(
            points = self.points.len(),
            height = self.height,
            updates = self.counter,
            "update budget exhausted, rebuilding subtree"
        );
        self.rebuilds += 1;
        self.build();
    }

    pub fn is_leaf(&self) -> bool {
        self.branch.is_none()
    }

    /// Remaining height budget of this node.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of edges on the longest path to a leaf.
    pub fn depth(&self) -> usize {
        match &self.branch {
            None => 0,
            Some(branch) => 1 + branch.left.depth().max(branch.right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match &self.branch {
            None => 1,
            Some(branch) => branch.left.leaf_count() + branch.right.leaf_count(),
        }
    }

    /// Points stored at this node.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &PointSet<T> {
        &self.points
    }

    pub fn split(&self) -> Option<&SplitRule<T>> {
        self.branch.as_ref().map(|branch| &branch.rule)
    }

    pub fn left(&self) -> Option<&Tree<T>> {
        self.branch.as_ref().map(|branch| branch.left.as_ref())
    }

    pub fn right(&self) -> Option<&Tree<T>> {
        self.branch.as_ref().map(|branch| branch.right.as_ref())
    }

    /// Updates absorbed since the last (re)build of this node.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Rebuilds triggered at this node by its update budget.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    /// Leaves from left to right.
    pub fn leaves(&self) -> Vec<&Tree<T>> {
        match &self.branch {
            None => vec![self],
            Some(branch) => {
                let mut leaves = branch.left.leaves();
                leaves.extend(branch.right.leaves());
                leaves
            }
        }
    }

    /// Prediction of every leaf, left to right.
    pub fn leaf_predictions(&self) -> Vec<bool> {
        self.leaves()
            .iter()
            .map(|leaf| leaf.points.majority_label())
            .collect()
    }
}
