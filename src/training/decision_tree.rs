//! Decision tree classifier with sample weights (CART)

use super::models::{class_index, Classifier, Trainer};
use crate::error::{EvalError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Impurity criterion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Criterion {
    /// Gini impurity
    Gini,
    /// Shannon entropy
    Entropy,
}

impl Criterion {
    fn impurity(&self, class_weights: &[f64], total: f64) -> f64 {
        if total <= 0.0 {
            return 0.0;
        }
        match self {
            Criterion::Gini => {
                1.0 - class_weights
                    .iter()
                    .map(|&w| (w / total).powi(2))
                    .sum::<f64>()
            }
            Criterion::Entropy => -class_weights
                .iter()
                .filter(|&&w| w > 0.0)
                .map(|&w| {
                    let p = w / total;
                    p * p.ln()
                })
                .sum::<f64>(),
        }
    }
}

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf predicting the heaviest class
    Leaf { class: usize, n_samples: usize },
    /// Internal node; samples with `x[feature_idx] <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

impl TreeNode {
    fn predict(&self, sample: ArrayView1<'_, f64>) -> usize {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { class, .. } => return *class,
                TreeNode::Split { feature_idx, threshold, left, right, .. } => {
                    node = if sample[*feature_idx] <= *threshold { left.as_ref() } else { right.as_ref() };
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

/// Tree hyperparameters; also acts as the tree [`Trainer`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeConfig {
    /// Maximum depth (`None` grows until pure)
    pub max_depth: Option<usize>,
    /// Minimum samples to split a node
    pub min_samples_split: usize,
    /// Minimum samples in each leaf
    pub min_samples_leaf: usize,
    pub criterion: Criterion,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            criterion: Criterion::Gini,
        }
    }
}

impl DecisionTreeConfig {
    /// Depth-one tree, the usual boosting base learner
    pub fn stump() -> Self {
        Self::default().with_max_depth(1)
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    pub fn with_criterion(mut self, criterion: Criterion) -> Self {
        self.criterion = criterion;
        self
    }

    /// Fit a tree where each sample counts with the given non-negative weight
    pub fn fit_weighted(
        &self,
        x: &Array2<f64>,
        y: &[usize],
        sample_weight: &[f64],
    ) -> Result<DecisionTreeClassifier> {
        let n_samples = x.nrows();
        if n_samples != y.len() || n_samples != sample_weight.len() {
            return Err(EvalError::ShapeError {
                expected: format!("{} labels and weights", n_samples),
                actual: format!("{} labels, {} weights", y.len(), sample_weight.len()),
            });
        }
        if n_samples == 0 {
            return Err(EvalError::InvalidInput("cannot fit a tree on zero samples".to_string()));
        }
        if sample_weight.iter().any(|&w| !(w >= 0.0) || !w.is_finite()) {
            return Err(EvalError::InvalidInput("sample weights must be finite and non-negative".to_string()));
        }

        let (classes, position) = class_index(y);
        let encoded: Vec<usize> = y.iter().filter_map(|&label| position[label]).collect();

        let builder = TreeBuilder {
            config: self,
            x,
            y: &encoded,
            weights: sample_weight,
            n_classes: classes.len(),
        };
        let mut importances = vec![0.0; x.ncols()];
        let indices: Vec<usize> = (0..n_samples).collect();
        let root = builder.build(&indices, 0, &mut importances);

        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            importances.iter_mut().for_each(|imp| *imp /= total);
        }

        let root = relabel(root, &classes);
        Ok(DecisionTreeClassifier {
            root,
            classes,
            n_features: x.ncols(),
            feature_importances: Array1::from_vec(importances),
        })
    }
}

impl Trainer for DecisionTreeConfig {
    type Model = DecisionTreeClassifier;

    fn train(&self, x: &Array2<f64>, y: &[usize]) -> Result<DecisionTreeClassifier> {
        let weights = vec![1.0; y.len()];
        self.fit_weighted(x, y, &weights)
    }
}

/// Map encoded class positions in leaves back to the original labels
fn relabel(node: TreeNode, classes: &[usize]) -> TreeNode {
    match node {
        TreeNode::Leaf { class, n_samples } => TreeNode::Leaf {
            class: classes[class],
            n_samples,
        },
        TreeNode::Split { feature_idx, threshold, left, right, n_samples, impurity } => {
            TreeNode::Split {
                feature_idx,
                threshold,
                left: Box::new(relabel(*left, classes)),
                right: Box::new(relabel(*right, classes)),
                n_samples,
                impurity,
            }
        }
    }
}

struct TreeBuilder<'a> {
    config: &'a DecisionTreeConfig,
    x: &'a Array2<f64>,
    /// Class positions, not raw labels
    y: &'a [usize],
    weights: &'a [f64],
    n_classes: usize,
}

struct BestSplit {
    feature_idx: usize,
    threshold: f64,
    gain: f64,
}

impl TreeBuilder<'_> {
    fn class_weights(&self, indices: &[usize]) -> Vec<f64> {
        let mut dist = vec![0.0; self.n_classes];
        for &i in indices {
            dist[self.y[i]] += self.weights[i];
        }
        dist
    }

    fn build(&self, indices: &[usize], depth: usize, importances: &mut [f64]) -> TreeNode {
        let n_samples = indices.len();
        let dist = self.class_weights(indices);
        let total: f64 = dist.iter().sum();
        let leaf = TreeNode::Leaf {
            class: argmax(&dist),
            n_samples,
        };

        let is_pure = dist.iter().filter(|&&w| w > 0.0).count() <= 1;
        let should_stop = n_samples < self.config.min_samples_split
            || n_samples < 2 * self.config.min_samples_leaf
            || self.config.max_depth.map_or(false, |d| depth >= d)
            || total <= 0.0
            || is_pure;
        if should_stop {
            return leaf;
        }

        let impurity = self.config.criterion.impurity(&dist, total);
        let Some(best) = self.find_best_split(indices, &dist, total, impurity) else {
            return leaf;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| self.x[[i, best.feature_idx]] <= best.threshold);

        importances[best.feature_idx] += total * best.gain;

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left: Box::new(self.build(&left_idx, depth + 1, importances)),
            right: Box::new(self.build(&right_idx, depth + 1, importances)),
            n_samples,
            impurity,
        }
    }

    /// Scan every feature in parallel; each sweep moves samples left in sorted order
    fn find_best_split(
        &self,
        indices: &[usize],
        dist: &[f64],
        total: f64,
        parent_impurity: f64,
    ) -> Option<BestSplit> {
        let min_leaf = self.config.min_samples_leaf;
        let n = indices.len();

        let per_feature: Vec<Option<BestSplit>> = (0..self.x.ncols())
            .into_par_iter()
            .map(|feature_idx| {
                let mut order = indices.to_vec();
                order.sort_by(|&a, &b| {
                    self.x[[a, feature_idx]]
                        .partial_cmp(&self.x[[b, feature_idx]])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });

                let mut left = vec![0.0; self.n_classes];
                let mut right = dist.to_vec();
                let mut left_total = 0.0;
                let mut best: Option<BestSplit> = None;

                for pos in 0..n - 1 {
                    let idx = order[pos];
                    let w = self.weights[idx];
                    left[self.y[idx]] += w;
                    right[self.y[idx]] -= w;
                    left_total += w;

                    let here = self.x[[idx, feature_idx]];
                    let next = self.x[[order[pos + 1], feature_idx]];
                    if here >= next {
                        continue;
                    }
                    let n_left = pos + 1;
                    if n_left < min_leaf || n - n_left < min_leaf {
                        continue;
                    }

                    let right_total = total - left_total;
                    let child = (left_total * self.config.criterion.impurity(&left, left_total)
                        + right_total * self.config.criterion.impurity(&right, right_total))
                        / total;
                    let gain = parent_impurity - child;
                    if gain > 1e-12 && best.as_ref().map_or(true, |b| gain > b.gain) {
                        best = Some(BestSplit {
                            feature_idx,
                            threshold: (here + next) / 2.0,
                            gain,
                        });
                    }
                }
                best
            })
            .collect();

        // First feature wins ties so results do not depend on scan order
        per_feature.into_iter().flatten().fold(None, |acc, cand| match acc {
            Some(b) if b.gain >= cand.gain => Some(b),
            _ => Some(cand),
        })
    }
}

/// Index of the largest weight; lowest index wins ties
fn argmax(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(bi, bv), (i, &v)| if v > bv { (i, v) } else { (bi, bv) })
        .0
}

/// Fitted decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeClassifier {
    root: TreeNode,
    classes: Vec<usize>,
    n_features: usize,
    feature_importances: Array1<f64>,
}

impl DecisionTreeClassifier {
    pub fn root(&self) -> &TreeNode {
        &self.root
    }

    /// Labels seen during training, ascending
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Weighted impurity decrease per feature, normalised to sum to one
    pub fn feature_importances(&self) -> &Array1<f64> {
        &self.feature_importances
    }
}

impl Classifier for DecisionTreeClassifier {
    fn predict_one(&self, sample: ArrayView1<'_, f64>) -> usize {
        self.root.predict(sample)
    }
}
