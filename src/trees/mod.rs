/// Classifier facade over a single tree
pub mod classifier;
/// Recursive tree nodes and the incremental update protocol
pub mod node;
/// Tree hyperparameters
pub mod params;
/// Node-local points and the split search
pub mod point_set;
/// Split results and routing rules
pub mod split;
