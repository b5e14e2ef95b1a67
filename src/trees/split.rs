use crate::data::dataset::RealNumber;

/// Winning split point of a search, typed by the feature it was found on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Threshold<T: RealNumber> {
    /// Boolean splits are always `false` vs `true` and carry no value.
    None,
    /// `value < threshold` goes left.
    Continuous(T),
    /// `value == category` goes left.
    Category(T),
}

/// Outcome of a split search over a point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BestSplit<T: RealNumber> {
    pub feature_index: usize,
    pub gain: f64,
    pub threshold: Threshold<T>,
    /// Points routed left by the candidate, as counted during the search.
    pub left_count: usize,
    pub right_count: usize,
}

/// Decision rule installed at an internal node.
#[derive(Clone, Debug, PartialEq)]
pub enum SplitRule<T: RealNumber> {
    Boolean {
        feature_index: usize,
    },
    /// One-vs-rest. `others` lists the remaining values seen at build time and
    /// is not used for routing.
    Categorical {
        feature_index: usize,
        category: T,
        others: Vec<T>,
    },
    Continuous {
        feature_index: usize,
        threshold: T,
    },
}

impl<T: RealNumber> SplitRule<T> {
    /// Turns a search result into a routing rule. `column` is the winning
    /// feature's values and only feeds the informational `others` list.
    pub fn from_best<I>(best: &BestSplit<T>, column: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let feature_index = best.feature_index;
        match best.threshold {
            Threshold::None => SplitRule::Boolean { feature_index },
            Threshold::Continuous(threshold) => SplitRule::Continuous {
                feature_index,
                threshold,
            },
            Threshold::Category(category) => {
                let mut others: Vec<T> = column.into_iter().filter(|v| *v != category).collect();
                others.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                others.dedup();
                SplitRule::Categorical {
                    feature_index,
                    category,
                    others,
                }
            }
        }
    }

    pub fn feature_index(&self) -> usize {
        match self {
            SplitRule::Boolean { feature_index }
            | SplitRule::Categorical { feature_index, .. }
            | SplitRule::Continuous { feature_index, .. } => *feature_index,
        }
    }

    /// Whether `point` is routed to the left child.
    ///
    /// # Panics
    ///
    /// If `point` has no value at the rule's feature index.
    pub fn goes_left(&self, point: &[T]) -> bool {
        let value = point[self.feature_index()];
        match self {
            SplitRule::Boolean { .. } => value == T::zero(),
            SplitRule::Categorical { category, .. } => value == *category,
            SplitRule::Continuous { threshold, .. } => value < *threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(threshold: Threshold<f64>) -> BestSplit<f64> {
        BestSplit {
            feature_index: 1,
            gain: 0.25,
            threshold,
            left_count: 1,
            right_count: 1,
        }
    }

    #[test]
    fn test_boolean_rule_routes_false_left() {
        let rule = SplitRule::from_best(&best(Threshold::None), vec![]);
        assert_eq!(rule, SplitRule::Boolean { feature_index: 1 });
        assert!(rule.goes_left(&[9.0, 0.0]));
        assert!(!rule.goes_left(&[9.0, 1.0]));
    }

    #[test]
    fn test_continuous_rule_is_strict() {
        let rule = SplitRule::from_best(&best(Threshold::Continuous(0.5)), vec![]);
        assert!(rule.goes_left(&[0.0, 0.49]));
        assert!(!rule.goes_left(&[0.0, 0.5]));
    }

    #[test]
    fn test_categorical_rule_lists_others() {
        let rule = SplitRule::from_best(
            &best(Threshold::Category(2.0)),
            vec![3.0, 2.0, 0.0, 3.0, 2.0],
        );
        assert_eq!(
            rule,
            SplitRule::Categorical {
                feature_index: 1,
                category: 2.0,
                others: vec![0.0, 3.0],
            }
        );
        assert!(rule.goes_left(&[0.0, 2.0]));
        // values never seen at build time still go right
        assert!(!rule.goes_left(&[0.0, 7.0]));
    }
}
