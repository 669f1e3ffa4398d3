//! Feature-importance diagnostic from a shallow CART decision tree.
//!
//! The tree is fitted on the suggestions themselves, predicting the
//! adjustment type from the numeric columns. Importance is the weighted Gini
//! impurity decrease each feature contributes across all splits, normalized
//! to sum to one. Output is advisory and never fails.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use webprice_core::{AdjustmentType, Suggestion};

use crate::types::{FeatureImportance, FeatureWeight};

const MAX_DEPTH: usize = 3;
const FEATURES: [&str; 5] = [
    "current_price",
    "competitor_price",
    "adjustment_amount",
    "adjustment_percent",
    "priority_value",
];

fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn row(s: &Suggestion) -> [f64; 5] {
    [
        as_f64(s.current_price),
        as_f64(s.competitor_price),
        as_f64(s.adjustment_amount),
        as_f64(s.adjustment_percent),
        as_f64(s.priority_value),
    ]
}

struct Dataset {
    x: Vec<[f64; 5]>,
    y: Vec<usize>,
    n_classes: usize,
}

struct Split {
    feature: usize,
    threshold: f64,
    decrease: f64,
}

#[allow(clippy::cast_precision_loss)]
fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

impl Dataset {
    fn class_counts(&self, idx: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &i in idx {
            counts[self.y[i]] += 1;
        }
        counts
    }

    /// Best split of `idx`, scanning features in order and thresholds in
    /// ascending order; the first strictly better candidate wins.
    #[allow(clippy::cast_precision_loss)]
    fn best_split(&self, idx: &[usize]) -> Option<Split> {
        let n = idx.len();
        let parent = self.class_counts(idx);
        let parent_impurity = gini(&parent, n);
        let mut best: Option<Split> = None;

        for feature in 0..FEATURES.len() {
            let mut sorted = idx.to_vec();
            sorted.sort_by(|&a, &b| self.x[a][feature].total_cmp(&self.x[b][feature]));

            let mut left = vec![0; self.n_classes];
            let mut right = parent.clone();
            for pos in 1..n {
                let moved = sorted[pos - 1];
                left[self.y[moved]] += 1;
                right[self.y[moved]] -= 1;

                let lo = self.x[moved][feature];
                let hi = self.x[sorted[pos]][feature];
                if hi <= lo {
                    continue;
                }
                let children = (pos as f64 * gini(&left, pos)
                    + (n - pos) as f64 * gini(&right, n - pos))
                    / n as f64;
                let decrease = parent_impurity - children;
                if decrease > best.as_ref().map_or(0.0, |b| b.decrease) {
                    best = Some(Split {
                        feature,
                        threshold: (lo + hi) / 2.0,
                        decrease,
                    });
                }
            }
        }
        best
    }

    /// Grows the subtree under `idx`, adding each split's weighted impurity
    /// decrease to `importances`.
    #[allow(clippy::cast_precision_loss)]
    fn grow(&self, idx: &[usize], depth: usize, importances: &mut [f64; 5]) {
        if depth >= MAX_DEPTH || idx.len() < 2 {
            return;
        }
        let Some(split) = self.best_split(idx) else {
            return;
        };
        importances[split.feature] += idx.len() as f64 * split.decrease;

        let (left, right): (Vec<usize>, Vec<usize>) = idx
            .iter()
            .partition(|&&i| self.x[i][split.feature] <= split.threshold);
        self.grow(&left, depth + 1, importances);
        self.grow(&right, depth + 1, importances);
    }
}

/// Fits the diagnostic tree and reports per-feature importance.
///
/// Needs at least two suggestions spanning at least two adjustment types;
/// otherwise returns [`FeatureImportance::Insufficient`].
#[must_use]
pub fn feature_importance(suggestions: &[Suggestion]) -> FeatureImportance {
    if suggestions.len() < 2 {
        return FeatureImportance::Insufficient {
            message: format!(
                "at least 2 suggestions are needed, got {}",
                suggestions.len()
            ),
        };
    }

    let mut classes: Vec<AdjustmentType> = suggestions.iter().map(|s| s.adjustment_type).collect();
    classes.sort();
    classes.dedup();
    if classes.len() < 2 {
        return FeatureImportance::Insufficient {
            message: "all suggestions share one adjustment type".to_string(),
        };
    }

    let data = Dataset {
        x: suggestions.iter().map(row).collect(),
        y: suggestions
            .iter()
            .map(|s| classes.binary_search(&s.adjustment_type).unwrap_or(0))
            .collect(),
        n_classes: classes.len(),
    };

    let mut importances = [0.0_f64; 5];
    let all: Vec<usize> = (0..suggestions.len()).collect();
    data.grow(&all, 0, &mut importances);

    let total: f64 = importances.iter().sum();
    let features = FEATURES
        .iter()
        .zip(importances)
        .map(|(name, weight)| FeatureWeight {
            feature: (*name).to_string(),
            importance: if total > 0.0 {
                round4(weight / total)
            } else {
                0.0
            },
        })
        .collect();

    FeatureImportance::Trained {
        classes: classes.iter().map(|c| c.as_str().to_string()).collect(),
        features,
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
