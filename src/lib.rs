//! # dyntree
//!
//! `dyntree` builds a binary decision tree over boolean, categorical and
//! continuous features with greedy Gini splitting, and keeps it up to date as
//! labeled points are inserted or removed. Each node absorbs a number of
//! updates proportional to its size (the `beta` factor) before its subtree is
//! rebuilt from scratch.
//!
//! ## Example Usage
//!
//! ```rust
//! use dyntree::data::dataset::{Dataset, FeatureType};
//! use dyntree::trees::classifier::DecisionTreeClassifier;
//!
//! let dataset = Dataset::from_rows(
//!     &[vec![0.1, 1.0], vec![0.2, 1.0], vec![0.9, 0.0], vec![0.8, 0.0]],
//!     vec![true, true, false, false],
//!     vec![FeatureType::Continuous, FeatureType::Categorical],
//! )
//! .unwrap();
//!
//! let mut tree = DecisionTreeClassifier::with_params(Some(1), Some(1), Some(0.5)).unwrap();
//! tree.fit(&dataset).unwrap();
//! assert!(tree.decide(&[0.3, 1.0]).unwrap());
//! assert!(!tree.decide(&[0.95, 0.0]).unwrap());
//!
//! tree.add_training_point(&[0.4, 1.0], true).unwrap();
//! tree.del_training_point(&[0.1, 1.0], true).unwrap();
//! assert_eq!(tree.point_count().unwrap(), 4);
//! ```

/// Datasets, feature types and CSV loading
pub mod data;
/// Error types
pub mod error;
/// Static and streaming train/evaluate runs
pub mod experiment;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;
