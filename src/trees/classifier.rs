//! Decision Tree Classifier
use super::{node::Tree, params::TreeParams, point_set::PointSet};
use crate::{
    data::dataset::{Dataset, FeatureType, RealNumber},
    error::{Result, TreeError},
    metrics::confusion::ClassificationMetrics,
};
use nalgebra::DMatrix;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Binary decision tree that can be updated point by point after `fit`.
#[derive(Clone, Debug)]
pub struct DecisionTreeClassifier<T: RealNumber> {
    root: Option<Tree<T>>,
    types: Vec<FeatureType>,
    tree_params: TreeParams,
}

impl<T: RealNumber> Default for DecisionTreeClassifier<T> {
    /// Creates a new instance of the decision tree classifier with default parameters.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealNumber> ClassificationMetrics for DecisionTreeClassifier<T> {}

impl<T: RealNumber> DecisionTreeClassifier<T> {
    /// Creates a new instance of the decision tree classifier with default parameters.
    pub fn new() -> Self {
        Self {
            root: None,
            types: Vec::new(),
            tree_params: TreeParams::new(),
        }
    }

    /// Creates a new instance of the decision tree classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `max_height` - The maximum number of split levels.
    /// * `min_split_points` - The minimum number of points on each side of a split.
    /// * `beta` - The rebuild amortization factor for incremental updates.
    ///
    /// # Errors
    ///
    /// This method will return an error if any parameter is out of range.
    pub fn with_params(
        max_height: Option<usize>,
        min_split_points: Option<usize>,
        beta: Option<f64>,
    ) -> Result<Self> {
        let mut tree = Self::new();
        tree.set_max_height(max_height.unwrap_or(5))?;
        tree.set_min_split_points(min_split_points.unwrap_or(1))?;
        tree.set_beta(beta.unwrap_or(0.0))?;
        Ok(tree)
    }

    /// # Errors
    ///
    /// If any field of `tree_params` is out of range.
    pub fn from_params(tree_params: TreeParams) -> Result<Self> {
        tree_params.validate()?;
        Ok(Self {
            root: None,
            types: Vec::new(),
            tree_params,
        })
    }

    pub fn set_max_height(&mut self, max_height: usize) -> Result<()> {
        self.tree_params.set_max_height(max_height)
    }

    pub fn set_min_split_points(&mut self, min_split_points: usize) -> Result<()> {
        self.tree_params.set_min_split_points(min_split_points)
    }

    pub fn set_beta(&mut self, beta: f64) -> Result<()> {
        self.tree_params.set_beta(beta)
    }

    pub fn params(&self) -> &TreeParams {
        &self.tree_params
    }

    /// Builds the tree from a dataset, discarding any previous tree.
    pub fn fit(&mut self, dataset: &Dataset<T>) -> Result<()> {
        self.types = dataset.types.clone();
        self.root = Some(Tree::new(PointSet::from(dataset.clone()), &self.tree_params));
        Ok(())
    }

    /// Predicted label of a single point.
    ///
    /// # Errors
    ///
    /// If the tree wasn't built yet or the point has the wrong number of features.
    pub fn decide(&self, point: &[T]) -> Result<bool> {
        let root = self.fitted_root()?;
        self.check_arity(point)?;
        Ok(root.decide(point))
    }

    /// Predicts every row of `features`, in row order.
    pub fn predict(&self, features: &DMatrix<T>) -> Result<Vec<bool>> {
        let root = self.fitted_root()?;
        if features.ncols() != self.types.len() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} columns but the tree was fitted on {}",
                features.ncols(),
                self.types.len()
            )));
        }
        Ok((0..features.nrows())
            .into_par_iter()
            .map(|i| {
                let row = features.row(i).iter().copied().collect::<Vec<_>>();
                root.decide(&row)
            })
            .collect())
    }

    pub fn add_training_point(&mut self, point: &[T], label: bool) -> Result<()> {
        self.check_arity(point)?;
        self.root
            .as_mut()
            .ok_or(TreeError::NotFitted)?
            .add_training_point(point, label);
        Ok(())
    }

    pub fn del_training_point(&mut self, point: &[T], label: bool) -> Result<()> {
        self.check_arity(point)?;
        self.root
            .as_mut()
            .ok_or(TreeError::NotFitted)?
            .del_training_point(point, label);
        Ok(())
    }

    pub fn root(&self) -> Option<&Tree<T>> {
        self.root.as_ref()
    }

    pub fn depth(&self) -> Result<usize> {
        Ok(self.fitted_root()?.depth())
    }

    pub fn leaf_count(&self) -> Result<usize> {
        Ok(self.fitted_root()?.leaf_count())
    }

    /// Points currently held by the root.
    pub fn point_count(&self) -> Result<usize> {
        Ok(self.fitted_root()?.point_count())
    }

    fn fitted_root(&self) -> Result<&Tree<T>> {
        self.root.as_ref().ok_or(TreeError::NotFitted)
    }

    fn check_arity(&self, point: &[T]) -> Result<()> {
        if point.len() != self.types.len() {
            return Err(TreeError::ShapeMismatch(format!(
                "point has {} features, expected {}",
                point.len(),
                self.types.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dataset() -> Dataset<f64> {
        Dataset::from_rows(
            &[
                vec![0.1, 1.0],
                vec![0.2, 1.0],
                vec![0.9, 0.0],
                vec![0.8, 0.0],
            ],
            vec![true, true, false, false],
            vec![FeatureType::Continuous, FeatureType::Categorical],
        )
        .unwrap()
    }

    #[test]
    fn test_with_params_validates() {
        assert!(DecisionTreeClassifier::<f64>::with_params(Some(0), None, None).is_err());
        assert!(DecisionTreeClassifier::<f64>::with_params(None, Some(0), None).is_err());
        assert!(DecisionTreeClassifier::<f64>::with_params(None, None, Some(-1.0)).is_err());
        let tree = DecisionTreeClassifier::<f64>::with_params(Some(3), Some(2), Some(0.5)).unwrap();
        assert_eq!(tree.params().max_height(), 3);
    }

    #[test]
    fn test_from_params_validates() {
        let mut params = TreeParams::new();
        params.beta = f64::NAN;
        assert!(matches!(
            DecisionTreeClassifier::<f64>::from_params(params),
            Err(TreeError::InvalidParameter(_))
        ));

        let mut params = TreeParams::new();
        params.max_height = 0;
        assert!(DecisionTreeClassifier::<f64>::from_params(params).is_err());

        let tree = DecisionTreeClassifier::<f64>::from_params(TreeParams::new()).unwrap();
        assert_eq!(tree.params(), &TreeParams::new());
    }

    #[test]
    fn test_unfitted_classifier_errors() {
        let mut tree = DecisionTreeClassifier::<f64>::new();
        assert!(matches!(tree.decide(&[]), Err(TreeError::NotFitted)));
        assert!(matches!(
            tree.predict(&DMatrix::zeros(1, 2)),
            Err(TreeError::NotFitted)
        ));
        assert!(tree.depth().is_err());
        assert!(tree.add_training_point(&[], true).is_err());
    }

    #[test]
    fn test_fit_and_predict() {
        let mut tree = DecisionTreeClassifier::with_params(Some(1), Some(1), None).unwrap();
        tree.fit(&dataset()).unwrap();

        let test_x = DMatrix::from_row_slice(2, 2, &[0.3, 1.0, 0.95, 0.0]);
        assert_eq!(tree.predict(&test_x).unwrap(), vec![true, false]);
        assert!(tree.decide(&[0.3, 1.0]).unwrap());
        assert!(!tree.decide(&[0.95, 0.0]).unwrap());
        assert_eq!(tree.depth().unwrap(), 1);
        assert_eq!(tree.leaf_count().unwrap(), 2);
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&dataset()).unwrap();
        assert!(matches!(tree.decide(&[0.3]), Err(TreeError::ShapeMismatch(_))));
        assert!(tree.add_training_point(&[0.3, 1.0, 2.0], true).is_err());
        assert!(tree.predict(&DMatrix::zeros(1, 3)).is_err());
    }

    #[test]
    fn test_incremental_updates_through_facade() {
        let mut tree = DecisionTreeClassifier::with_params(Some(2), Some(1), Some(0.0)).unwrap();
        tree.fit(&dataset()).unwrap();
        tree.add_training_point(&[0.5, 1.0], true).unwrap();
        assert_eq!(tree.point_count().unwrap(), 5);
        tree.del_training_point(&[0.1, 1.0], true).unwrap();
        assert_eq!(tree.point_count().unwrap(), 4);
    }

    #[test]
    fn test_metrics_on_predictions() {
        let mut tree = DecisionTreeClassifier::with_params(Some(1), Some(1), None).unwrap();
        tree.fit(&dataset()).unwrap();
        let test_x = DMatrix::from_row_slice(4, 2, &[0.1, 1.0, 0.6, 1.0, 0.7, 0.0, 0.9, 0.0]);
        let predictions = tree.predict(&test_x).unwrap();

        let expected = vec![true, true, false, false];
        assert_eq!(predictions, vec![true, false, false, false]);
        assert_relative_eq!(tree.precision(&expected, &predictions).unwrap(), 1.0);
        assert_relative_eq!(tree.recall(&expected, &predictions).unwrap(), 0.5);
        assert_relative_eq!(
            tree.f1_score(&expected, &predictions).unwrap(),
            2.0 / 3.0,
            epsilon = 1e-12
        );
    }
}
