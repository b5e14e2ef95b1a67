use crate::error::{Result, TreeError};
use nalgebra::DMatrix;
use num_traits::{Float, FromPrimitive, ToPrimitive};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;

pub trait DataValue:
    Debug + Clone + Copy + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

impl<T> DataValue for T where
    T: Debug + Clone + Copy + FromPrimitive + ToPrimitive + Send + Sync + Display + 'static
{
}

/// Scalar type of a feature value. Booleans are stored as `0`/`1` and
/// categories as their numeric codes, so one scalar covers every column.
pub trait RealNumber: DataValue + Float {}
impl<T> RealNumber for T where T: DataValue + Float {}

/// Kind of a feature column. Fixed for the lifetime of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureType {
    /// `0` is false, anything else is true.
    Boolean,
    /// Unordered values, compared only for equality.
    Categorical,
    /// Totally ordered real values.
    Continuous,
}

impl FromStr for FeatureType {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boolean" | "bool" => Ok(FeatureType::Boolean),
            "categorical" | "category" | "classes" => Ok(FeatureType::Categorical),
            "continuous" | "real" => Ok(FeatureType::Continuous),
            other => Err(TreeError::Parse(format!("unknown feature type '{}'", other))),
        }
    }
}

/// Feature matrix (one row per point), boolean labels and column types.
#[derive(Clone, PartialEq)]
pub struct Dataset<T: RealNumber> {
    pub x: DMatrix<T>,
    pub y: Vec<bool>,
    pub types: Vec<FeatureType>,
}

impl<T: RealNumber> Debug for Dataset<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    types: {:?},\n    x: [\n", self.types)?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: {:?}\n}}", self.y)
    }
}

impl<T: RealNumber> Dataset<T> {
    pub fn new(x: DMatrix<T>, y: Vec<bool>, types: Vec<FeatureType>) -> Result<Self> {
        if x.nrows() != y.len() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} rows but {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if x.ncols() != types.len() {
            return Err(TreeError::ShapeMismatch(format!(
                "{} columns but {} feature types",
                x.ncols(),
                types.len()
            )));
        }
        Ok(Self { x, y, types })
    }

    /// Builds a dataset from row-major points.
    pub fn from_rows(rows: &[Vec<T>], y: Vec<bool>, types: Vec<FeatureType>) -> Result<Self> {
        if let Some(bad) = rows.iter().position(|row| row.len() != types.len()) {
            return Err(TreeError::ShapeMismatch(format!(
                "row {} has {} values, expected {}",
                bad,
                rows[bad].len(),
                types.len()
            )));
        }
        let x = DMatrix::from_row_slice(rows.len(), types.len(), &rows.concat());
        Self::new(x, y, types)
    }

    pub fn is_not_empty(&self) -> bool {
        !(self.x.is_empty() || self.y.is_empty())
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.x.ncols()
    }

    pub fn row(&self, index: usize) -> Vec<T> {
        self.x.row(index).iter().copied().collect()
    }

    pub fn rows(&self) -> Vec<Vec<T>> {
        (0..self.nrows()).map(|i| self.row(i)).collect()
    }

    /// Splits off the first `⌊n · fraction⌋` rows, keeping row order.
    pub fn split_at_fraction(&self, fraction: f64) -> Result<(Self, Self)> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(TreeError::InvalidParameter(
                "Train fraction should be in (0.0, 1.0]".into(),
            ));
        }
        let cut = (self.nrows() as f64 * fraction).floor() as usize;
        let head = (0..cut).collect::<Vec<_>>();
        let tail = (cut..self.nrows()).collect::<Vec<_>>();
        Ok((self.select(&head), self.select(&tail)))
    }

    /// Returns a copy with rows in a random order.
    pub fn shuffled(&self, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.nrows()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        self.select(&indices)
    }

    fn select(&self, indices: &[usize]) -> Self {
        let values = indices
            .iter()
            .flat_map(|&index| self.x.row(index).iter().copied().collect::<Vec<_>>())
            .collect::<Vec<_>>();
        Self {
            x: DMatrix::from_row_slice(indices.len(), self.ncols(), &values),
            y: indices.iter().map(|&index| self.y[index]).collect(),
            types: self.types.clone(),
        }
    }
}
