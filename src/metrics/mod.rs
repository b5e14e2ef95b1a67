/// Precision, recall and F1 over boolean predictions
pub mod confusion;
