/// Datasets and feature types
pub mod dataset;
/// Reading datasets from CSV files
pub mod loader;
