use crate::error::{Result, TreeError};

#[derive(Clone, Debug, PartialEq)]
pub struct TreeParams {
    pub max_height: usize,
    pub min_split_points: usize,
    pub beta: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self {
            max_height: 5,
            min_split_points: 1,
            beta: 0.0,
        }
    }

    pub fn set_max_height(&mut self, max_height: usize) -> Result<()> {
        if max_height < 1 {
            return Err(TreeError::InvalidParameter(
                "The maximum height must be greater than 0.".into(),
            ));
        }
        self.max_height = max_height;
        Ok(())
    }

    pub fn set_min_split_points(&mut self, min_split_points: usize) -> Result<()> {
        if min_split_points < 1 {
            return Err(TreeError::InvalidParameter(
                "The minimum number of points per split must be greater than 0.".into(),
            ));
        }
        self.min_split_points = min_split_points;
        Ok(())
    }

    /// `beta` scales the number of updates a node absorbs between rebuilds.
    /// `0.0` rebuilds on every update.
    pub fn set_beta(&mut self, beta: f64) -> Result<()> {
        if !beta.is_finite() || beta < 0.0 {
            return Err(TreeError::InvalidParameter(
                "Beta must be a finite, non-negative number.".into(),
            ));
        }
        self.beta = beta;
        Ok(())
    }

    /// Runs the setter checks on the current field values.
    pub fn validate(&self) -> Result<()> {
        let mut checked = Self::new();
        checked.set_max_height(self.max_height)?;
        checked.set_min_split_points(self.min_split_points)?;
        checked.set_beta(self.beta)
    }

    pub fn max_height(&self) -> usize {
        self.max_height
    }

    pub fn min_split_points(&self) -> usize {
        self.min_split_points
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }
}
