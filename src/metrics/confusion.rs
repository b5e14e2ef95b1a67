use crate::error::{Result, TreeError};
use nalgebra::DMatrix;

/// 2×2 counts, rows are expected labels and columns predicted labels, `false`
/// first.
pub type ConfusionMatrix = DMatrix<usize>;

pub fn confusion_matrix(expected: &[bool], actual: &[bool]) -> Result<ConfusionMatrix> {
    if expected.len() != actual.len() {
        return Err(TreeError::UndefinedMetric(
            "Predictions and labels are of different sizes.".into(),
        ));
    }

    let mut matrix = DMatrix::zeros(2, 2);
    for (&e, &a) in expected.iter().zip(actual) {
        matrix[(usize::from(e), usize::from(a))] += 1;
    }
    Ok(matrix)
}

/// Precision and recall of the positive class. Both are 1 when nothing was
/// predicted positive; recall is 1 when there are no expected positives.
pub fn precision_recall(expected: &[bool], actual: &[bool]) -> Result<(f64, f64)> {
    let matrix = confusion_matrix(expected, actual)?;
    let tp = matrix[(1, 1)];
    let fp = matrix[(0, 1)];
    let fn_ = matrix[(1, 0)];

    if tp + fp == 0 {
        return Ok((1.0, 1.0));
    }
    let precision = tp as f64 / (tp + fp) as f64;
    let recall = match tp + fn_ {
        0 => 1.0,
        positives => tp as f64 / positives as f64,
    };
    Ok((precision, recall))
}

pub fn f1_score(expected: &[bool], actual: &[bool]) -> Result<f64> {
    let (precision, recall) = precision_recall(expected, actual)?;

    match (precision + recall).abs() < f64::EPSILON {
        true => Err(TreeError::UndefinedMetric(
            "Precision and recall are both 0, F1 score undefined.".into(),
        )),
        false => Ok(2.0 * (precision * recall) / (precision + recall)),
    }
}

pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels.
    fn confusion_matrix(&self, y_true: &[bool], y_pred: &[bool]) -> Result<ConfusionMatrix> {
        confusion_matrix(y_true, y_pred)
    }

    /// Fraction of predictions equal to the true label.
    fn accuracy(&self, y_true: &[bool], y_pred: &[bool]) -> Result<f64> {
        let matrix = confusion_matrix(y_true, y_pred)?;
        if y_true.is_empty() {
            return Err(TreeError::UndefinedMetric("No predictions to score.".into()));
        }
        Ok(matrix.trace() as f64 / y_true.len() as f64)
    }

    fn precision(&self, y_true: &[bool], y_pred: &[bool]) -> Result<f64> {
        precision_recall(y_true, y_pred).map(|(precision, _)| precision)
    }

    fn recall(&self, y_true: &[bool], y_pred: &[bool]) -> Result<f64> {
        precision_recall(y_true, y_pred).map(|(_, recall)| recall)
    }

    /// Harmonic mean of precision and recall.
    ///
    /// # Errors
    ///
    /// If precision and recall are both 0.
    fn f1_score(&self, y_true: &[bool], y_pred: &[bool]) -> Result<f64> {
        f1_score(y_true, y_pred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct MockClassifier;

    impl ClassificationMetrics for MockClassifier {}

    #[test]
    fn test_confusion_matrix() {
        let y_true = [true, false, true, false, true];
        let y_pred = [true, true, false, false, true];

        let result = confusion_matrix(&y_true, &y_pred).unwrap();
        // column-major: [tn, fn, fp, tp]
        let expected = DMatrix::from_vec(2, 2, vec![1, 1, 1, 2]);

        assert_eq!(result, expected);
    }

    #[test]
    fn test_confusion_matrix_unequal() {
        let result = confusion_matrix(&[true, false], &[true]);
        assert!(result.is_err());
    }

    #[test]
    fn test_accuracy() {
        let classifier = MockClassifier;
        let y_true = [true, false, true, false, true];
        let y_pred = [true, true, false, false, true];
        assert_relative_eq!(classifier.accuracy(&y_true, &y_pred).unwrap(), 0.6);
    }

    #[test]
    fn test_precision_recall_f1() {
        let expected = [true, true, false, false];
        let actual = [true, false, false, false];

        let (precision, recall) = precision_recall(&expected, &actual).unwrap();
        assert_relative_eq!(precision, 1.0);
        assert_relative_eq!(recall, 0.5);
        assert_relative_eq!(f1_score(&expected, &actual).unwrap(), 0.6667, epsilon = 1e-4);
    }

    #[test]
    fn test_no_positive_predictions() {
        let classifier = MockClassifier;
        let expected = [true, true, true];
        let actual = [false, false, false];

        assert_eq!(precision_recall(&expected, &actual).unwrap(), (1.0, 1.0));
        assert_relative_eq!(classifier.f1_score(&expected, &actual).unwrap(), 1.0);
    }

    #[test]
    fn test_no_expected_positives() {
        let (precision, recall) = precision_recall(&[false, false], &[true, false]).unwrap();
        assert_relative_eq!(precision, 0.0);
        assert_relative_eq!(recall, 1.0);
    }

    #[test]
    fn test_f1_score_error() {
        let classifier = MockClassifier;
        let y_true = [true, false];
        let y_pred = [false, true];

        assert!(classifier.f1_score(&y_true, &y_pred).is_err());
    }

    #[test]
    fn test_f1_score_perfect_classification() {
        let classifier = MockClassifier;
        let labels = [true, false, true, false, true];
        assert_relative_eq!(classifier.f1_score(&labels, &labels).unwrap(), 1.0);
    }
}
